use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// HistoryEntry: One past search prompt
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub prompt: String,
    pub date: Option<String>,
}

/// The history endpoint sends either `{prompt, date}` records or bare strings.
impl<'de> Deserialize<'de> for HistoryEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Prompt(String),
            Record {
                prompt: String,
                date: Option<String>,
            },
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Prompt(prompt) => HistoryEntry { prompt, date: None },
            Raw::Record { prompt, date } => HistoryEntry { prompt, date },
        })
    }
}

impl HistoryEntry {
    /// The calendar date part of `date`, if any (`2024-05-01T10:00:00` -> `2024-05-01`).
    pub fn day(&self) -> Option<&str> {
        self.date
            .as_deref()
            .map(|d| d.split(|c: char| c == 'T' || c == ' ').next().unwrap_or(d))
            .filter(|d| !d.is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryAddRequest {
    pub prompt: String,
}
