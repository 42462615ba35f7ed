//! Integration tests for search, filters and history on the home page.

mod common;

use common::{bearer_of, body_of, TestServer};
use magicsearch_client::view::home::HistoryView;
use magicsearch_client::view::{HomeController, Notice, ResultsView};
use magicsearch_client::MagicSearchError;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

fn dragon_results() -> serde_json::Value {
    json!({
        "results": [
            {"id": 101, "name": "Shivan Dragon", "image_url": "https://img/101.jpg", "distance": 0.1234},
            {"id": "202", "name": "Ancient Dragon", "image_url": "https://img/202.jpg", "distance": 0.2},
            {"id": 303, "name": "Dragon Whelp", "image_url": "https://img/303.jpg"}
        ]
    })
}

// ---------------------------------------------------------------------------
// Plain search
// ---------------------------------------------------------------------------

#[test]
fn test_search_sends_one_post_with_text_and_limit() {
    let server = TestServer::start();
    server.mount(
        Mock::given(method("POST"))
            .and(path("/search"))
            .and(body_json(json!({"text": "dragon", "limit": 8})))
            .respond_with(ResponseTemplate::new(200).set_body_json(dragon_results()))
            .expect(1),
    );

    let client = server.client();
    let mut home = HomeController::new(&client);
    home.submit_search("dragon", None);

    let tiles = home.results().tiles();
    let names: Vec<&str> = tiles.iter().map(|t| t.card.name.as_str()).collect();
    assert_eq!(names, vec!["Shivan Dragon", "Ancient Dragon", "Dragon Whelp"]);
    assert_eq!(tiles[0].caption, "Distance: 0.123");
    assert_eq!(tiles[1].card.id, 202);
    assert_eq!(tiles[2].caption, "Dragon Whelp");

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(body_of(&requests[0]), json!({"text": "dragon", "limit": 8}));
}

#[test]
fn test_anonymous_search_has_no_actions_and_no_history() {
    let server = TestServer::start();
    server.mount(
        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(dragon_results())),
    );

    let client = server.client();
    let mut home = HomeController::new(&client);
    home.submit_search("dragon", Some(3));

    assert!(home.results().tiles().iter().all(|t| !t.actions));
    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(bearer_of(&requests[0]), None);
    assert_eq!(body_of(&requests[0])["limit"], 3);
}

#[test]
fn test_logged_in_search_records_history_first() {
    let server = TestServer::start();
    server.mount(
        Mock::given(method("POST"))
            .and(path("/history/add"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"}))),
    );
    server.mount(
        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(dragon_results())),
    );

    let client = server.logged_in_client("jace", 7);
    let mut home = HomeController::new(&client);
    home.submit_search("dragon", None);

    let paths: Vec<String> = server
        .requests()
        .iter()
        .map(|r| r.url.path().to_string())
        .collect();
    assert_eq!(paths, vec!["/history/add", "/search"]);

    let history = &server.requests_to("/history/add")[0];
    assert_eq!(body_of(history), json!({"prompt": "dragon"}));
    let token = client.sessions().token().unwrap();
    assert_eq!(bearer_of(history), Some(format!("Bearer {token}")));
    let search = &server.requests_to("/search")[0];
    assert_eq!(bearer_of(search), Some(format!("Bearer {token}")));
    assert!(home.results().tiles().iter().all(|t| t.actions));
}

#[test]
fn test_history_failure_does_not_block_search() {
    let server = TestServer::start();
    server.mount(
        Mock::given(method("POST"))
            .and(path("/history/add"))
            .respond_with(ResponseTemplate::new(500)),
    );
    server.mount(
        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(dragon_results())),
    );

    let client = server.logged_in_client("jace", 7);
    let mut home = HomeController::new(&client);
    home.submit_search("dragon", None);
    assert_eq!(home.results().tiles().len(), 3);
}

#[test]
fn test_empty_results_show_server_message() {
    let server = TestServer::start();
    server.mount(
        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"results": [], "message": "Nothing matched"})),
            ),
    );

    let client = server.client();
    let mut home = HomeController::new(&client);
    assert_eq!(
        home.submit_search("zzz", None),
        &ResultsView::Message("Nothing matched".into())
    );
}

#[test]
fn test_search_error_is_shown_inline() {
    let server = TestServer::start();
    server.mount(
        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(
                ResponseTemplate::new(503).set_body_json(json!({"detail": "Index is warming up"})),
            ),
    );

    let client = server.client();
    let mut home = HomeController::new(&client);
    assert_eq!(
        home.submit_search("dragon", None),
        &ResultsView::Error("Index is warming up".into())
    );
}

#[test]
fn test_blank_search_is_rejected_without_request() {
    let server = TestServer::start();
    let client = server.client();

    let err = client.search().semantic("   ", 8).unwrap_err();
    assert!(matches!(err, MagicSearchError::InvalidArgument(_)));
    assert!(server.requests().is_empty());
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

#[test]
fn test_apply_filters_requires_prior_search() {
    let server = TestServer::start();
    let client = server.client();
    let mut home = HomeController::new(&client);
    home.context_mut().toggle_color("r");

    let notice = home.apply_filters().unwrap_err();
    assert_eq!(notice, Notice::Warning("Please perform a search first!".into()));
    assert!(server.requests().is_empty());
}

#[test]
fn test_apply_then_reset_filters() {
    let server = TestServer::start();
    server.mount(
        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(dragon_results())),
    );

    let client = server.client();
    let mut home = HomeController::new(&client);
    home.submit_search("dragon", None);

    let ctx = home.context_mut();
    ctx.toggle_color("r");
    ctx.toggle_color("G");
    ctx.set_mana_range(Some(2), Some(5));
    home.apply_filters().unwrap();

    home.reset_filters();
    assert!(home.context().colors().is_empty());
    assert_eq!(home.context().text(), "dragon");

    let bodies: Vec<_> = server.requests_to("/search").iter().map(body_of).collect();
    assert_eq!(bodies.len(), 3);
    assert_eq!(bodies[0], json!({"text": "dragon", "limit": 8}));
    assert_eq!(
        bodies[1],
        json!({
            "text": "dragon",
            "limit": 8,
            "filters": {"colors": ["R", "G"], "mana_value__gte": 2, "mana_value__lte": 5}
        })
    );
    assert_eq!(
        bodies[2],
        json!({"text": "dragon", "limit": 8, "filters": {}})
    );
}

#[test]
fn test_filtered_submit_sends_a_single_request() {
    let server = TestServer::start();
    server.mount(
        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(dragon_results()))
            .expect(1),
    );

    let client = server.client();
    let mut home = HomeController::new(&client);
    let ctx = home.context_mut();
    ctx.toggle_color("r");
    ctx.set_mana_range(None, Some(4));
    home.submit_filtered_search("dragon", Some(3));

    assert_eq!(home.results().tiles().len(), 3);
    let bodies: Vec<_> = server.requests_to("/search").iter().map(body_of).collect();
    assert_eq!(
        bodies,
        vec![json!({
            "text": "dragon",
            "limit": 3,
            "filters": {"colors": ["R"], "mana_value__lte": 4}
        })]
    );
}

#[test]
fn test_structured_filter_endpoint() {
    let server = TestServer::start();
    server.mount(
        Mock::given(method("POST"))
            .and(path("/filter"))
            .and(body_json(json!({"filters": {"colors": ["U"]}, "limit": 4})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{"id": 5, "name": "Counterspell"}]
            })))
            .expect(1),
    );

    let client = server.client();
    let filters = magicsearch_client::models::SearchFilters {
        colors: vec!["U".into()],
        ..Default::default()
    };
    let resp = client.search().structured(&filters, 4).unwrap();
    assert_eq!(resp.results[0].card.name, "Counterspell");
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

#[test]
fn test_history_is_listed_most_recent_first() {
    let server = TestServer::start();
    server.mount(
        Mock::given(method("GET"))
            .and(path("/history"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "history": [
                    {"prompt": "goblin", "date": "2024-05-01T10:00:00"},
                    "angel",
                    {"prompt": "dragon", "date": "2024-05-03 08:00:00"}
                ]
            }))),
    );

    let client = server.logged_in_client("jace", 7);
    let home = HomeController::new(&client);
    let Some(HistoryView::Entries(entries)) = home.load_history() else {
        panic!("expected history entries");
    };
    let prompts: Vec<&str> = entries.iter().map(|e| e.prompt.as_str()).collect();
    assert_eq!(prompts, vec!["dragon", "angel", "goblin"]);
    assert_eq!(entries[0].day(), Some("2024-05-03"));
    assert_eq!(entries[1].day(), None);
}

#[test]
fn test_history_needs_session() {
    let server = TestServer::start();
    let client = server.client();
    let home = HomeController::new(&client);
    assert_eq!(home.load_history(), None);
    assert!(server.requests().is_empty());
}

#[test]
fn test_empty_history() {
    let server = TestServer::start();
    server.mount(
        Mock::given(method("GET"))
            .and(path("/history"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"history": []}))),
    );

    let client = server.logged_in_client("jace", 7);
    let mut home = HomeController::new(&client);
    assert_eq!(home.load_history(), Some(HistoryView::Empty));

    let entry = magicsearch_client::models::HistoryEntry {
        prompt: "goblin".into(),
        date: None,
    };
    home.use_history_entry(&entry);
    assert_eq!(home.context().text(), "goblin");
}
