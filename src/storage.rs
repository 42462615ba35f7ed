//! Token storage scopes.
//!
//! A bearer token lives in one of two slots: a persistent file in the user's
//! config directory (kept across runs) or a process-scoped memory slot (gone
//! when the process exits). Reads check the persistent slot first.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tempfile::NamedTempFile;

use crate::config;
use crate::error::{MagicSearchError, Result};

/// Where a token is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageScope {
    /// Survives restarts ("remember me").
    Persistent,
    /// Lives only as long as the current process.
    Tab,
}

/// A single slot holding at most one token string.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<String>>;
    fn save(&self, token: &str) -> Result<()>;
    /// Remove the token. Removing an empty slot is not an error.
    fn remove(&self) -> Result<()>;
}

// ---------------------------------------------------------------------------
// FileTokenStore
// ---------------------------------------------------------------------------

/// Persistent slot backed by a single file.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Create a store under `dir`. The directory is created on first save.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            path: dir.as_ref().join(config::TOKEN_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)?;
        let token = contents.trim();
        if token.is_empty() {
            Ok(None)
        } else {
            Ok(Some(token.to_string()))
        }
    }

    /// Writes to a temp file in the same directory and renames it into place,
    /// so an interrupted write never leaves a truncated token behind.
    fn save(&self, token: &str) -> Result<()> {
        let dir = self.path.parent().ok_or_else(|| {
            MagicSearchError::InvalidArgument(format!(
                "token path {} has no parent directory",
                self.path.display()
            ))
        })?;
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(token.as_bytes())?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(tmp.path(), fs::Permissions::from_mode(0o600))?;
        }
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// MemoryTokenStore
// ---------------------------------------------------------------------------

/// Process-scoped slot.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            token: RwLock::new(Some(token.to_string())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>> {
        let guard = self
            .token
            .read()
            .map_err(|_| MagicSearchError::InvalidArgument("token store lock poisoned".into()))?;
        Ok(guard.clone())
    }

    fn save(&self, token: &str) -> Result<()> {
        let mut guard = self
            .token
            .write()
            .map_err(|_| MagicSearchError::InvalidArgument("token store lock poisoned".into()))?;
        *guard = Some(token.to_string());
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        let mut guard = self
            .token
            .write()
            .map_err(|_| MagicSearchError::InvalidArgument("token store lock poisoned".into()))?;
        *guard = None;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// CredentialStore
// ---------------------------------------------------------------------------

/// The pair of scopes a session is read from.
pub struct CredentialStore {
    persistent: Box<dyn TokenStore>,
    tab: Box<dyn TokenStore>,
}

impl CredentialStore {
    pub fn new(persistent: Box<dyn TokenStore>, tab: Box<dyn TokenStore>) -> Self {
        Self { persistent, tab }
    }

    /// Both scopes in memory; nothing touches disk.
    pub fn in_memory() -> Self {
        Self::new(
            Box::new(MemoryTokenStore::new()),
            Box::new(MemoryTokenStore::new()),
        )
    }

    /// Persistent scope under `dir`, tab scope in memory.
    pub fn on_disk<P: AsRef<Path>>(dir: P) -> Self {
        Self::new(
            Box::new(FileTokenStore::new(dir)),
            Box::new(MemoryTokenStore::new()),
        )
    }

    /// The stored token, persistent scope first.
    ///
    /// A scope that cannot be read is treated as empty.
    pub fn read(&self) -> Option<String> {
        for (scope, store) in [
            (StorageScope::Persistent, &self.persistent),
            (StorageScope::Tab, &self.tab),
        ] {
            match store.load() {
                Ok(Some(token)) if !token.trim().is_empty() => return Some(token),
                Ok(_) => {}
                Err(e) => tracing::warn!(?scope, error = %e, "failed to read token store"),
            }
        }
        None
    }

    pub fn write(&self, scope: StorageScope, token: &str) -> Result<()> {
        self.scope(scope).save(token)
    }

    /// Remove the token from both scopes.
    pub fn clear(&self) -> Result<()> {
        let persistent = self.persistent.remove();
        let tab = self.tab.remove();
        persistent.and(tab)
    }

    fn scope(&self, scope: StorageScope) -> &dyn TokenStore {
        match scope {
            StorageScope::Persistent => self.persistent.as_ref(),
            StorageScope::Tab => self.tab.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_round_trips_and_removes() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("nested"));

        assert_eq!(store.load().unwrap(), None);
        store.save("a.b.c").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("a.b.c"));

        store.remove().unwrap();
        assert_eq!(store.load().unwrap(), None);
        // Second removal is a no-op
        store.remove().unwrap();
    }

    #[test]
    fn persistent_scope_wins_on_read() {
        let store = CredentialStore::in_memory();
        store.write(StorageScope::Tab, "tab-token").unwrap();
        assert_eq!(store.read().as_deref(), Some("tab-token"));

        store.write(StorageScope::Persistent, "disk-token").unwrap();
        assert_eq!(store.read().as_deref(), Some("disk-token"));
    }

    #[test]
    fn clear_empties_both_scopes() {
        let store = CredentialStore::in_memory();
        store.write(StorageScope::Tab, "one").unwrap();
        store.write(StorageScope::Persistent, "two").unwrap();
        store.clear().unwrap();
        assert_eq!(store.read(), None);
        store.clear().unwrap();
    }
}
