//! RadarrClient against a mock HTTP server.

use collection_sync_models::{AddMovieRequest, CollectionMovie};
use collection_sync_sources::{LibraryApi, RadarrClient, SourceError};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "0123456789abcdef";

fn client_for(server: &MockServer) -> RadarrClient {
    RadarrClient::new(&server.uri(), API_KEY, Duration::from_secs(5)).unwrap()
}

fn add_request() -> AddMovieRequest {
    let movie = CollectionMovie {
        title: "Alien 3".to_string(),
        year: Some(1992),
        tmdb_id: 8077,
    };
    AddMovieRequest::monitored(&movie, 4, "/movies")
}

#[tokio::test]
async fn test_requests_carry_api_key() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/qualityProfile"))
        .and(header("x-api-key", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "name": "Any" },
            { "id": 4, "name": "HD-1080p" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let profiles = client_for(&server).list_quality_profiles().await.unwrap();

    assert_eq!(profiles.len(), 2);
    assert_eq!(profiles[1].id, 4);
    assert_eq!(profiles[1].name, "HD-1080p");
}

#[tokio::test]
async fn test_wrong_api_key_is_not_matched() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/movie"))
        .and(header("x-api-key", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = RadarrClient::new(&server.uri(), "someone-else", Duration::from_secs(5)).unwrap();
    let err = client.list_movies().await.unwrap_err();

    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_collection_detail_includes_members() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/collection/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7,
            "title": "Alien Collection",
            "tmdbId": 8091,
            "monitored": false,
            "movies": [
                { "title": "Alien", "year": 1979, "tmdbId": 348 },
                { "title": "Aliens", "year": 1986, "tmdbId": 679 }
            ]
        })))
        .mount(&server)
        .await;

    let collection = client_for(&server).get_collection(7).await.unwrap();

    assert_eq!(collection.title, "Alien Collection");
    assert_eq!(collection.movies.len(), 2);
    assert_eq!(collection.movies[1].tmdb_id, 679);
}

#[tokio::test]
async fn test_error_status_becomes_status_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/collection"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&server)
        .await;

    let err = client_for(&server).list_collections().await.unwrap_err();

    match &err {
        SourceError::Status { endpoint, status, body } => {
            assert_eq!(endpoint, "/api/v3/collection");
            assert_eq!(*status, 503);
            assert_eq!(body, "Service Unavailable");
        }
        other => panic!("expected Status, got {:?}", other),
    }
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_client_error_is_not_transient() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/qualityProfile"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;

    let err = client_for(&server).list_quality_profiles().await.unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn test_malformed_body_becomes_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/movie"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).list_movies().await.unwrap_err();

    assert!(matches!(err, SourceError::Decode { ref endpoint, .. } if endpoint == "/api/v3/movie"));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn test_add_movie_posts_body_and_accepts_created() {
    let server = MockServer::start().await;
    let request = add_request();

    Mock::given(method("POST"))
        .and(path("/api/v3/movie"))
        .and(header("x-api-key", API_KEY))
        .and(body_json(serde_json::to_value(&request).unwrap()))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 1001, "title": "Alien 3" })))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server).add_movie(&request).await.unwrap();
}

#[tokio::test]
async fn test_add_movie_ok_without_created_is_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v3/movie"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 1001 })))
        .mount(&server)
        .await;

    let err = client_for(&server).add_movie(&add_request()).await.unwrap_err();

    assert_eq!(err.status(), Some(200));
}

#[tokio::test]
async fn test_add_movie_rejection_keeps_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v3/movie"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_string(r#"[{"propertyName":"TmdbId","errorMessage":"This movie has already been added"}]"#),
        )
        .mount(&server)
        .await;

    let err = client_for(&server).add_movie(&add_request()).await.unwrap_err();

    match err {
        SourceError::Status { status, body, .. } => {
            assert_eq!(status, 400);
            assert!(body.contains("already been added"));
        }
        other => panic!("expected Status, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_server_is_transient_transport_error() {
    // Nothing listens on port 1
    let client = RadarrClient::new("http://127.0.0.1:1", API_KEY, Duration::from_secs(2)).unwrap();
    let err = client.list_quality_profiles().await.unwrap_err();

    assert!(matches!(err, SourceError::Transport { .. }));
    assert!(err.is_transient());
}
