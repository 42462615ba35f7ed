//! Terminal front-end for the MagicSearch API.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use magicsearch_client::models::SearchFilters;
use magicsearch_client::overlay::OverlayContent;
use magicsearch_client::queries::Registration;
use magicsearch_client::view::home::HistoryView;
use magicsearch_client::view::{
    failure_notice, AccountController, DecksController, FavoritesController, HeaderView,
    HomeController, Notice, PageState, ResultsView,
};
use magicsearch_client::{CreateDeckRoute, MagicSearchClient};

#[derive(Parser)]
#[command(name = "magicsearch", version, about = "Search Magic cards and manage decks")]
struct Cli {
    /// API base URL (defaults to $MAGICSEARCH_API_URL, then the public server)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Directory for the remembered login token
    #[arg(long, global = true)]
    token_dir: Option<PathBuf>,

    /// Use the legacy /deck/create route
    #[arg(long, global = true)]
    legacy_deck_route: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in and keep the token for later runs
    Login { username: String },
    /// Create an account
    Register {
        username: String,
        email: String,
        #[arg(long)]
        accept_terms: bool,
    },
    /// Forget the stored token
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Semantic search
    Search(SearchArgs),
    /// Structured search on filters only
    Filter {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long, default_value_t = 8)]
        limit: u32,
    },
    /// Past search prompts, most recent first
    History,
    #[command(subcommand)]
    Decks(DeckCommand),
    #[command(subcommand)]
    Favorites(FavoriteCommand),
}

#[derive(Args)]
struct SearchArgs {
    text: String,
    #[arg(long)]
    limit: Option<u32>,
    #[command(flatten)]
    filters: FilterArgs,
}

#[derive(Args, Default)]
struct FilterArgs {
    /// Color code (W, U, B, R, G); repeatable
    #[arg(long = "color")]
    colors: Vec<String>,
    #[arg(long)]
    mana_min: Option<u32>,
    #[arg(long)]
    mana_max: Option<u32>,
}

impl FilterArgs {
    fn is_empty(&self) -> bool {
        self.colors.is_empty() && self.mana_min.is_none() && self.mana_max.is_none()
    }

    fn to_filters(&self) -> SearchFilters {
        SearchFilters {
            colors: self.colors.iter().map(|c| c.trim().to_uppercase()).collect(),
            mana_value_gte: self.mana_min,
            mana_value_lte: self.mana_max,
        }
    }
}

#[derive(Subcommand)]
enum DeckCommand {
    List,
    Create { name: String },
    Delete { deck_id: i64 },
    Show { deck_id: i64 },
    AddCard { deck_id: i64, card_id: i64 },
    RemoveCard { deck_id: i64, card_id: i64 },
}

#[derive(Subcommand)]
enum FavoriteCommand {
    List,
    Add { card_id: i64 },
    Remove { card_id: i64 },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut builder = MagicSearchClient::builder();
    if let Some(url) = cli.api_url {
        builder = builder.base_url(url);
    }
    if let Some(dir) = cli.token_dir {
        builder = builder.token_dir(dir);
    }
    if cli.legacy_deck_route {
        builder = builder.create_deck_route(CreateDeckRoute::Plain);
    }
    let client = match builder.build() {
        Ok(client) => client,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match run(&client, cli.command) {
        Some(notice) => {
            eprintln!("{notice}");
            if notice.is_error() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        None => ExitCode::SUCCESS,
    }
}

fn run(client: &MagicSearchClient, command: Command) -> Option<Notice> {
    match command {
        Command::Login { username } => {
            let password = match prompt("Password: ") {
                Ok(p) => p,
                Err(e) => return Some(Notice::Error(format!("could not read password: {e}"))),
            };
            Some(login(client, &username, &password))
        }
        Command::Register {
            username,
            email,
            accept_terms,
        } => {
            let password = match prompt("Password: ") {
                Ok(p) => p,
                Err(e) => return Some(Notice::Error(format!("could not read password: {e}"))),
            };
            let form = Registration {
                username,
                email,
                password,
                accepted_terms: accept_terms,
            };
            Some(AccountController::new(client).register(&form))
        }
        Command::Logout => Some(AccountController::new(client).logout()),
        Command::Whoami => {
            match HeaderView::resolve(client) {
                HeaderView::LoggedIn { username } => println!("{username}"),
                HeaderView::Anonymous => println!("not logged in"),
            }
            None
        }
        Command::Search(args) => search(client, args),
        Command::Filter { filters, limit } => {
            match client.search().structured(&filters.to_filters(), limit) {
                Ok(resp) if resp.results.is_empty() => {
                    println!("{}", resp.message.as_deref().unwrap_or("No cards found."));
                }
                Ok(resp) => {
                    for hit in resp.results {
                        println!("{:>8}  {}  ({})", hit.card.id, hit.card.name, hit.caption());
                    }
                }
                Err(e) => return Some(failure_notice(&e, "search")),
            }
            None
        }
        Command::History => {
            let home = HomeController::new(client);
            match home.load_history() {
                Some(HistoryView::Entries(entries)) => {
                    for entry in entries {
                        match entry.day() {
                            Some(day) => println!("{day}  {}", entry.prompt),
                            None => println!("{}", entry.prompt),
                        }
                    }
                }
                Some(HistoryView::Empty) => println!("{}", HistoryView::EMPTY_TEXT),
                None => {
                    return Some(Notice::Warning(
                        "You need to be logged in to see your history".into(),
                    ))
                }
            }
            None
        }
        Command::Decks(cmd) => decks(client, cmd),
        Command::Favorites(cmd) => favorites(client, cmd),
    }
}

/// Each command is its own process, so the token always goes to the token file.
fn login(client: &MagicSearchClient, username: &str, password: &str) -> Notice {
    AccountController::new(client).login(username, password, true)
}

fn search(client: &MagicSearchClient, args: SearchArgs) -> Option<Notice> {
    let mut home = HomeController::new(client);
    if args.filters.is_empty() {
        home.submit_search(&args.text, args.limit);
    } else {
        let ctx = home.context_mut();
        for color in &args.filters.colors {
            ctx.toggle_color(color);
        }
        ctx.set_mana_range(args.filters.mana_min, args.filters.mana_max);
        home.submit_filtered_search(&args.text, args.limit);
    }

    match home.results() {
        ResultsView::Tiles(tiles) => {
            for tile in tiles {
                println!(
                    "{:>8}  {:<32}  {}",
                    tile.card.id,
                    tile.card.name,
                    tile.card.image_url.as_deref().unwrap_or("")
                );
                println!("          {}", tile.caption);
            }
            None
        }
        ResultsView::Message(msg) => {
            println!("{msg}");
            None
        }
        ResultsView::Error(msg) => Some(Notice::Error(msg.clone())),
        ResultsView::Idle => None,
    }
}

fn decks(client: &MagicSearchClient, cmd: DeckCommand) -> Option<Notice> {
    let mut page = DecksController::new(client);
    match cmd {
        DeckCommand::List => {
            print_page(page.load(), |deck| {
                format!(
                    "{:>6}  {}  [{}]",
                    deck.id,
                    deck.name,
                    deck.deck_type.as_deref().unwrap_or("-")
                )
            });
            None
        }
        DeckCommand::Create { name } => page.create_deck(&name).or_else(|| {
            println!("Created deck {name:?} ({} decks)", page.state().count());
            None
        }),
        DeckCommand::Delete { deck_id } => page.delete_deck(deck_id),
        DeckCommand::Show { deck_id } => {
            if let Some(notice) = page.view_deck(deck_id) {
                return Some(notice);
            }
            if let Some(OverlayContent::DeckContents { deck, cards }) =
                page.overlays().deck_contents().and_then(|o| o.content())
            {
                println!("{}", deck.name);
                if cards.is_empty() {
                    println!("This deck is empty");
                }
                for card in cards {
                    println!("{:>8}  {} x{}", card.id, card.name, card.quantity());
                }
            }
            page.close_deck(Instant::now());
            None
        }
        DeckCommand::AddCard { deck_id, card_id } => Some(page.add_card(deck_id, card_id)),
        DeckCommand::RemoveCard { deck_id, card_id } => page.remove_card(deck_id, card_id),
    }
}

fn favorites(client: &MagicSearchClient, cmd: FavoriteCommand) -> Option<Notice> {
    let mut page = FavoritesController::new(client);
    match cmd {
        FavoriteCommand::List => {
            print_page(page.load(), |card| {
                format!(
                    "{:>8}  {:<32}  {}",
                    card.id,
                    card.name,
                    card.image_url.as_deref().unwrap_or("")
                )
            });
            None
        }
        FavoriteCommand::Add { card_id } => {
            let outcome = client
                .authorize()
                .and_then(|auth| client.favorites().add(&auth, card_id));
            match outcome {
                Ok(_) => Some(Notice::Info("Added to favorites".into())),
                Err(e) if e.detail_contains("already in favorites") => Some(Notice::Warning(
                    "This card is already in your favorites!".into(),
                )),
                Err(e) => Some(failure_notice(&e, "add favorites")),
            }
        }
        FavoriteCommand::Remove { card_id } => {
            match prompt("Remove this card from your favorites? [y/N] ") {
                Ok(answer) if answer.eq_ignore_ascii_case("y") => page.remove(card_id),
                _ => None,
            }
        }
    }
}

fn print_page<T>(state: &PageState<T>, line: impl Fn(&T) -> String) {
    match state {
        PageState::AuthRequired => println!("Log in to see this page."),
        PageState::Empty => println!("Nothing here yet."),
        PageState::Loaded(items) => {
            for item in items {
                println!("{}", line(item));
            }
        }
        PageState::Error(msg) => println!("{msg}"),
        PageState::Idle => {}
    }
}

fn prompt(label: &str) -> io::Result<String> {
    let mut stderr = io::stderr();
    stderr.write_all(label.as_bytes())?;
    stderr.flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn token(username: &str) -> String {
        let exp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs()
            + 3600;
        let payload = json!({"username": username, "user_id": 7, "exp": exp});
        format!(
            "{}.{}.c2ln",
            URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256"}"#),
            URL_SAFE_NO_PAD.encode(payload.to_string())
        )
    }

    #[test]
    fn login_survives_into_the_next_run() {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap();
        let server = runtime.block_on(MockServer::start());
        runtime.block_on(
            Mock::given(method("POST"))
                .and(path("/login"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "user": {"id": 7, "username": "jace"},
                    "access_token": token("jace"),
                })))
                .mount(&server),
        );

        let tmp = tempfile::tempdir().unwrap();
        let build = || {
            MagicSearchClient::builder()
                .base_url(server.uri())
                .token_dir(tmp.path())
                .build()
                .unwrap()
        };

        let notice = login(&build(), "jace", "Secret123");
        assert_eq!(notice, Notice::Info("Login successful! Welcome jace".into()));

        let next_run = build();
        assert_eq!(next_run.session().unwrap().username, "jace");
    }
}
