//! End-to-end tests against a running server over raw TCP.

mod common;

use common::http::request;
use common::test_server::TestServer;
use serde_json::{json, Value};
use tracing_util::TestTracing;

const NEW_MOVIE: &str = r#"{"title":"X","year":2020,"director":"D","duration":90,"poster":"http://a.com/p.jpg","genre":["Action"]}"#;

fn first_seed_id(server: &TestServer) -> String {
    let resp = request(&server.addr(), "GET", "/movies", &[], None);
    resp.json()[0]["id"].as_str().unwrap().to_string()
}

#[test]
fn test_root_and_health() {
    let _tracing = TestTracing::init();
    let server = TestServer::new();

    let resp = request(&server.addr(), "GET", "/", &[], None);
    assert_eq!(resp.status, 200);
    assert_eq!(resp.json(), json!({"message": "Hello World"}));

    let resp = request(&server.addr(), "GET", "/health", &[], None);
    assert_eq!(resp.status, 200);
    assert_eq!(resp.json(), json!({"status": "ok"}));
}

#[test]
fn test_list_returns_seed_in_order() {
    let _tracing = TestTracing::init();
    let server = TestServer::new();

    let resp = request(&server.addr(), "GET", "/movies", &[], None);
    assert_eq!(resp.status, 200);
    assert!(resp
        .header("content-type")
        .unwrap()
        .starts_with("application/json"));
    let movies = resp.json();
    let movies = movies.as_array().unwrap();
    assert_eq!(movies.len(), server.store_len());
    assert_eq!(movies[0]["title"], "The Shawshank Redemption");
}

#[test]
fn test_create_movie_assigns_id_and_default_rate() {
    let _tracing = TestTracing::init();
    let server = TestServer::new();
    let before = server.store_len();

    let resp = request(&server.addr(), "POST", "/movies", &[], Some(NEW_MOVIE));
    assert_eq!(resp.status, 201);
    let created = resp.json();
    assert_eq!(created["title"], "X");
    assert_eq!(created["rate"].as_f64(), Some(5.0));
    let id = created["id"].as_str().unwrap();
    assert!(uuid::Uuid::parse_str(id).is_ok());

    let resp = request(&server.addr(), "GET", &format!("/movies/{id}"), &[], None);
    assert_eq!(resp.status, 200);
    assert_eq!(resp.json(), created);
    assert_eq!(server.store_len(), before + 1);
}

#[test]
fn test_create_movie_rejects_invalid_payloads() {
    let _tracing = TestTracing::init();
    let server = TestServer::new();
    let before = server.store_len();

    let resp = request(
        &server.addr(),
        "POST",
        "/movies",
        &[],
        Some(r#"{"title":"X","year":1800,"director":"D","duration":90,"poster":"http://a.com/p.png","genre":["Cooking"]}"#),
    );
    assert_eq!(resp.status, 400);
    let errors = resp.json();
    let fields: Vec<&str> = errors["error"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|e| e["field"].as_str())
        .collect();
    assert!(fields.contains(&"year"));
    assert!(fields.contains(&"poster"));
    assert!(fields.contains(&"genre"));

    let resp = request(&server.addr(), "POST", "/movies", &[], Some("{not json"));
    assert_eq!(resp.status, 400);

    let resp = request(&server.addr(), "POST", "/movies", &[], None);
    assert_eq!(resp.status, 400);
    assert_eq!(server.store_len(), before);
}

#[test]
fn test_patch_changes_only_given_fields() {
    let _tracing = TestTracing::init();
    let server = TestServer::new();
    let id = first_seed_id(&server);

    let original = request(&server.addr(), "GET", &format!("/movies/{id}"), &[], None).json();
    let resp = request(
        &server.addr(),
        "PATCH",
        &format!("/movies/{id}"),
        &[],
        Some(r#"{"rate":9}"#),
    );
    assert_eq!(resp.status, 200);
    let mut expected = original.clone();
    expected["rate"] = json!(9.0);
    assert_eq!(resp.json(), expected);
}

#[test]
fn test_patch_validation_and_missing_id() {
    let _tracing = TestTracing::init();
    let server = TestServer::new();

    let resp = request(
        &server.addr(),
        "PATCH",
        "/movies/does-not-exist",
        &[],
        Some(r#"{"rate":11}"#),
    );
    assert_eq!(resp.status, 400);

    let resp = request(
        &server.addr(),
        "PATCH",
        "/movies/does-not-exist",
        &[],
        Some(r#"{"rate":7}"#),
    );
    assert_eq!(resp.status, 404);
    assert_eq!(resp.json(), json!({"message": "Movie not found"}));
}

#[test]
fn test_genre_routes_filter() {
    let _tracing = TestTracing::init();
    let server = TestServer::new();

    let resp = request(&server.addr(), "GET", "/movies/genre/Comedy", &[], None);
    assert_eq!(resp.status, 200);
    assert_eq!(resp.json(), json!([]));

    let resp = request(&server.addr(), "GET", "/movies?genre=sci-fi", &[], None);
    assert_eq!(resp.status, 200);
    let hits = resp.json();
    let hits = hits.as_array().unwrap();
    assert!(!hits.is_empty());
    for movie in hits {
        let genres: Vec<&str> = movie["genre"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert!(genres.contains(&"Sci-Fi"));
    }

    let all = request(&server.addr(), "GET", "/movies?genre=", &[], None).json();
    assert_eq!(all.as_array().unwrap().len(), server.store_len());
}

#[test]
fn test_director_route_is_case_insensitive_substring() {
    let _tracing = TestTracing::init();
    let server = TestServer::new();

    let resp = request(&server.addr(), "GET", "/movies/director/nolan", &[], None);
    assert_eq!(resp.status, 200);
    let hits = resp.json();
    let hits = hits.as_array().unwrap();
    assert!(!hits.is_empty());
    assert!(hits
        .iter()
        .all(|m| m["director"].as_str().unwrap().contains("Nolan")));

    let resp = request(
        &server.addr(),
        "GET",
        "/movies/director/Christopher%20Nolan",
        &[],
        None,
    );
    assert_eq!(resp.json().as_array().unwrap().len(), hits.len());
}

#[test]
fn test_delete_then_get_is_404() {
    let _tracing = TestTracing::init();
    let server = TestServer::new();
    let id = first_seed_id(&server);
    let before = server.store_len();

    let resp = request(&server.addr(), "DELETE", &format!("/movies/{id}"), &[], None);
    assert_eq!(resp.status, 204);
    assert!(resp.body.is_empty());

    let resp = request(&server.addr(), "GET", &format!("/movies/{id}"), &[], None);
    assert_eq!(resp.status, 404);

    let resp = request(&server.addr(), "DELETE", &format!("/movies/{id}"), &[], None);
    assert_eq!(resp.status, 404);
    assert_eq!(server.store_len(), before - 1);
}

#[test]
fn test_unknown_route_is_404() {
    let _tracing = TestTracing::init();
    let server = TestServer::new();

    let resp = request(&server.addr(), "GET", "/nope", &[], None);
    assert_eq!(resp.status, 404);
    assert_eq!(resp.json()["error"], "Not Found");

    let resp = request(&server.addr(), "PUT", "/movies/abc", &[], None);
    assert_eq!(resp.status, 404);
}

#[test]
fn test_delete_missing_id_is_idempotent() {
    let _tracing = TestTracing::init();
    let server = TestServer::new();
    let before = server.store_len();

    for _ in 0..2 {
        let resp = request(&server.addr(), "DELETE", "/movies/never-existed", &[], None);
        assert_eq!(resp.status, 404);
        assert_eq!(resp.json(), json!({"message": "Movie not found"}));
    }
    assert_eq!(server.store_len(), before);
}

#[test]
fn test_request_id_header_is_accepted() {
    let _tracing = TestTracing::init();
    let server = TestServer::new();

    let resp = request(
        &server.addr(),
        "GET",
        "/health",
        &[("X-Request-Id", "01ARZ3NDEKTSV4RRFFQ69G5FAV")],
        None,
    );
    assert_eq!(resp.status, 200);
}
