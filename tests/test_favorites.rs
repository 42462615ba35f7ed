//! Integration tests for the favorites page and favoriting search results.

mod common;

use common::{body_of, TestServer};
use magicsearch_client::overlay::OverlayContent;
use magicsearch_client::view::{FavoritesController, HomeController, Notice, PageState};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

fn mount_favorites(server: &TestServer) {
    server.mount(
        Mock::given(method("GET"))
            .and(path("/favorite"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "favorites": [
                    {"id": 101, "name": "Shivan Dragon", "image_url": "https://img/101.jpg"},
                    {"id": 102, "name": "Serra Angel", "image_url": "https://img/102.jpg"}
                ]
            }))),
    );
}

fn mount_search(server: &TestServer) {
    server.mount(
        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [
                    {"id": 101, "name": "Shivan Dragon", "distance": 0.1},
                    {"id": 102, "name": "Serra Angel", "distance": 0.3}
                ]
            }))),
    );
    server.mount(
        Mock::given(method("POST"))
            .and(path("/history/add"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({}))),
    );
}

#[test]
fn test_favorites_page_lists_cards() {
    let server = TestServer::start();
    mount_favorites(&server);

    let client = server.logged_in_client("jace", 7);
    let mut page = FavoritesController::new(&client);
    let names: Vec<String> = page.load().items().iter().map(|c| c.name.clone()).collect();
    assert_eq!(names, vec!["Shivan Dragon", "Serra Angel"]);
    assert_eq!(page.header().to_string(), "Hello, jace");
}

#[test]
fn test_favorites_load_error() {
    let server = TestServer::start();
    server.mount(
        Mock::given(method("GET"))
            .and(path("/favorite"))
            .respond_with(ResponseTemplate::new(500)),
    );

    let client = server.logged_in_client("jace", 7);
    let mut page = FavoritesController::new(&client);
    assert_eq!(
        page.load(),
        &PageState::Error("Error loading favorites: Failed to load favorites".into())
    );
}

#[test]
fn test_remove_favorite_reloads() {
    let server = TestServer::start();
    mount_favorites(&server);
    server.mount(
        Mock::given(method("POST"))
            .and(path("/favorite/remove"))
            .and(body_json(json!({"card_id": 102})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "removed"})))
            .expect(1),
    );

    let client = server.logged_in_client("jace", 7);
    let mut page = FavoritesController::new(&client);
    page.load();
    assert_eq!(page.remove(102), None);
    assert_eq!(server.requests_to("/favorite").len(), 2);
}

#[test]
fn test_open_favorite_shows_card() {
    let server = TestServer::start();
    mount_favorites(&server);

    let client = server.logged_in_client("jace", 7);
    let mut page = FavoritesController::new(&client);
    page.load();
    assert!(page.open_card(102));
    assert!(!page.open_card(999));

    let overlay = page.overlays().card_detail().unwrap();
    assert_eq!(
        overlay.content(),
        Some(&OverlayContent::CardDetail {
            image_url: "https://img/102.jpg".into(),
            name: "Serra Angel".into(),
        })
    );
}

#[test]
fn test_favorite_from_results_only_once() {
    let server = TestServer::start();
    mount_search(&server);
    server.mount(
        Mock::given(method("POST"))
            .and(path("/favorite/add"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "added"})))
            .expect(1),
    );

    let client = server.logged_in_client("jace", 7);
    let mut home = HomeController::new(&client);
    home.submit_search("dragon", None);

    assert_eq!(home.add_to_favorites(0), Notice::Info("Added to favorites".into()));
    assert!(home.results().tiles()[0].favorited);
    assert_eq!(home.add_to_favorites(0), Notice::Info("Added to favorites".into()));

    let adds = server.requests_to("/favorite/add");
    assert_eq!(adds.len(), 1);
    assert_eq!(body_of(&adds[0]), json!({"card_id": 101}));
}

#[test]
fn test_already_favorited_message() {
    let server = TestServer::start();
    mount_search(&server);
    server.mount(
        Mock::given(method("POST"))
            .and(path("/favorite/add"))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({
                "detail": "Card already in favorites"
            }))),
    );

    let client = server.logged_in_client("jace", 7);
    let mut home = HomeController::new(&client);
    home.submit_search("angel", None);

    assert_eq!(
        home.add_to_favorites(1),
        Notice::Warning("This card is already in your favorites!".into())
    );
    assert!(!home.results().tiles()[1].favorited);
}

#[test]
fn test_favorite_without_session_sends_nothing() {
    let server = TestServer::start();
    server.mount(
        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{"id": 101, "name": "Shivan Dragon"}]
            }))),
    );

    let client = server.client();
    let mut home = HomeController::new(&client);
    home.submit_search("dragon", None);

    assert_eq!(
        home.add_to_favorites(0),
        Notice::Warning("You need to be logged in to add favorites".into())
    );
    assert!(server.requests_to("/favorite/add").is_empty());
}
