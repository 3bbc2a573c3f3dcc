//! Catalog pass-through integration tests
//!
//! Each catalog route is served from the gateway cache while the entry is
//! fresh, so the mock TMDB server sees one request per TTL window.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::{constants, TestApp};
use crate::mocks::TmdbTestData;

#[tokio::test]
async fn test_movie_details_hit_provider_once_per_ttl() {
    let app = TestApp::spawn().await;
    app.tmdb.mock_movie(550, "Fight Club").await;

    // Detail TTL is one hour
    for _ in 0..2 {
        let response = app.server.get("/api/movies/550").await;
        response.assert_status(StatusCode::OK);
        assert_eq!(response.json::<Value>()["title"], "Fight Club");
        app.advance(chrono::Duration::seconds(10));
    }
    assert_eq!(app.tmdb.hits("/movie/550").await, 1);

    app.advance(chrono::Duration::seconds(4000));
    app.server
        .get("/api/movies/550")
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(app.tmdb.hits("/movie/550").await, 2);
}

#[tokio::test]
async fn test_requests_carry_credential_and_localization() {
    let app = TestApp::spawn().await;
    app.tmdb
        .mock_json("/movie/now_playing", TmdbTestData::page(vec![]))
        .await;

    app.server
        .get("/api/movies/now-playing")
        .await
        .assert_status(StatusCode::OK);

    let requests = app.tmdb.received_requests().await;
    assert_eq!(requests.len(), 1);

    let request = &requests[0];
    let auth = request
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert_eq!(auth, format!("Bearer {}", constants::TEST_TMDB_API_KEY));

    let query: Vec<(String, String)> = request.url.query_pairs().into_owned().collect();
    assert!(query.contains(&("language".to_string(), "tr-TR".to_string())));
    assert!(query.contains(&("region".to_string(), "TR".to_string())));
    assert!(query.contains(&("page".to_string(), "1".to_string())));
}

#[tokio::test]
async fn test_failed_fetch_is_not_cached() {
    let app = TestApp::spawn().await;
    app.tmdb.mock_status("/tv/popular", 500).await;

    let response = app.server.get("/api/tv/popular").await;
    response.assert_status(StatusCode::BAD_GATEWAY);
    assert_eq!(
        response.json::<Value>()["error"]["code"],
        "UPSTREAM_UNAVAILABLE"
    );

    // Provider recovers; the next request must go upstream again
    app.tmdb.reset().await;
    app.tmdb
        .mock_json(
            "/tv/popular",
            TmdbTestData::page(vec![TmdbTestData::tv(1399, "Game of Thrones")]),
        )
        .await;

    let response = app.server.get("/api/tv/popular").await;
    response.assert_status(StatusCode::OK);
    assert_eq!(
        response.json::<Value>()["results"][0]["name"],
        "Game of Thrones"
    );
    assert_eq!(app.tmdb.hits("/tv/popular").await, 1);
}

#[tokio::test]
async fn test_unknown_title_is_not_found() {
    let app = TestApp::spawn().await;
    app.tmdb.mock_status("/person/999999", 404).await;

    let response = app.server.get("/api/person/999999").await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_search_cache_key_ignores_parameter_order() {
    let app = TestApp::spawn().await;
    app.tmdb
        .mock_json("/search/multi", TmdbTestData::page(vec![]))
        .await;

    app.server
        .get("/api/search")
        .add_query_param("query", "dune")
        .add_query_param("page", "1")
        .await
        .assert_status(StatusCode::OK);
    app.server
        .get("/api/search")
        .add_query_param("page", "1")
        .add_query_param("query", "dune")
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(app.tmdb.hits("/search/multi").await, 1);

    app.server
        .get("/api/search")
        .add_query_param("query", "dune")
        .add_query_param("page", "2")
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(app.tmdb.hits("/search/multi").await, 2);
}

#[tokio::test]
async fn test_search_requires_query() {
    let app = TestApp::spawn().await;

    app.server
        .get("/api/search")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    app.server
        .get("/api/search/person")
        .add_query_param("query", "   ")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_trending_routes() {
    let app = TestApp::spawn().await;
    app.tmdb
        .mock_json("/trending/movie/day", TmdbTestData::page(vec![]))
        .await;

    app.server
        .get("/api/trending/movie/day")
        .await
        .assert_status(StatusCode::OK);

    let response = app.server.get("/api/trending/album/day").await;
    assert!(response.status_code().is_client_error());
}

#[tokio::test]
async fn test_discover_forwards_filters() {
    let app = TestApp::spawn().await;
    app.tmdb
        .mock_json("/discover/movie", TmdbTestData::page(vec![]))
        .await;

    app.server
        .get("/api/discover/movie")
        .add_query_param("year", "1999")
        .add_query_param("with_genres", "18")
        .add_query_param("vote_average.gte", "7")
        .await
        .assert_status(StatusCode::OK);

    let requests = app.tmdb.received_requests().await;
    let query: Vec<(String, String)> = requests[0].url.query_pairs().into_owned().collect();
    for expected in [
        ("primary_release_year", "1999"),
        ("with_genres", "18"),
        ("vote_average.gte", "7"),
        ("include_adult", "false"),
        ("region", "TR"),
    ] {
        assert!(
            query.contains(&(expected.0.to_string(), expected.1.to_string())),
            "missing {:?} in {:?}",
            expected,
            query
        );
    }
}

#[tokio::test]
async fn test_watch_providers_return_region_or_null() {
    let app = TestApp::spawn().await;
    app.tmdb
        .mock_json(
            "/movie/550/watch/providers",
            json!({"id": 550, "results": {"TR": {"link": "https://tmdb.example/550"}}}),
        )
        .await;
    app.tmdb.mock_status("/tv/1/watch/providers", 500).await;

    let movie: Value = app.server.get("/api/movies/550/watch-providers").await.json();
    assert_eq!(movie["link"], "https://tmdb.example/550");

    let response = app.server.get("/api/tv/1/watch-providers").await;
    response.assert_status(StatusCode::OK);
    assert!(response.json::<Value>().is_null());
}

#[tokio::test]
async fn test_reference_data_routes() {
    let app = TestApp::spawn().await;
    app.tmdb
        .mock_json("/genre/tv/list", json!({"genres": [{"id": 18, "name": "Dram"}]}))
        .await;
    app.tmdb
        .mock_json("/watch/providers/movie", json!({"results": []}))
        .await;
    app.tmdb
        .mock_json("/certification/movie/list", json!({"certifications": {}}))
        .await;

    let genres: Value = app.server.get("/api/genres/tv").await.json();
    assert_eq!(genres["genres"][0]["name"], "Dram");

    app.server
        .get("/api/watch-providers/movie")
        .await
        .assert_status(StatusCode::OK);
    app.server
        .get("/api/certifications/movie")
        .await
        .assert_status(StatusCode::OK);

    let requests = app.tmdb.received_requests().await;
    let providers = requests
        .iter()
        .find(|r| r.url.path() == "/watch/providers/movie")
        .unwrap();
    assert!(providers
        .url
        .query_pairs()
        .any(|(k, v)| k == "watch_region" && v == "TR"));
}

#[tokio::test]
async fn test_person_routes() {
    let app = TestApp::spawn().await;
    app.tmdb.mock_person(287, "Brad Pitt").await;
    for suffix in ["movie_credits", "tv_credits", "combined_credits", "external_ids"] {
        app.tmdb
            .mock_json(&format!("/person/287/{}", suffix), json!({"id": 287}))
            .await;
    }

    let person: Value = app.server.get("/api/person/287").await.json();
    assert_eq!(person["name"], "Brad Pitt");

    for route in ["movie-credits", "tv-credits", "combined-credits", "external-ids"] {
        app.server
            .get(&format!("/api/person/287/{}", route))
            .await
            .assert_status(StatusCode::OK);
    }
}
