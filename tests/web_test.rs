//! Integration tests for the HTTP API.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use mockito::Server;
use reelpress::config::Config;
use reelpress::publisher::WordPressClient;
use reelpress::utils::HttpClient;
use reelpress::web::{create_app, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app(config: Config) -> Router {
    let http = HttpClient::new(&config.http).expect("Failed to build HTTP client");
    let publisher = WordPressClient::new(http.inner().clone(), config.content.max_screenshots);
    create_app(AppState::new(config, Arc::new(http), publisher))
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn test_healthz() {
    let response = app(Config::default())
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_extract_links_requires_url() {
    let (status, body) = send(
        app(Config::default()),
        json_request("POST", "/api/extract-links", json!({})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "URL is required");
    assert_eq!(body["matchedLinks"], json!([]));
    assert_eq!(body["totalFound"], 0);
}

#[tokio::test]
async fn test_extract_links_rejects_malformed_url() {
    let (status, body) = send(
        app(Config::default()),
        json_request("POST", "/api/extract-links", json!({ "url": "not a url" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid URL"));
}

#[tokio::test]
async fn test_extract_links_upstream_failure_is_ok_with_error() {
    let mut server = Server::new_async().await;
    server.mock("GET", "/missing/").with_status(404).create_async().await;

    let url = format!("{}/missing/", server.url());
    let (status, body) = send(
        app(Config::default()),
        json_request("POST", "/api/extract-links", json!({ "url": url })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["url"], url);
    assert_eq!(body["error"], "Failed to fetch: 404 Not Found");
    assert_eq!(body["matchedLinks"], json!([]));
    assert!(body.get("movieDetails").is_none());
}

#[tokio::test]
async fn test_movies_listing_with_lenient_page() {
    let mut server = Server::new_async().await;
    let base = server.url();
    let mock = server
        .mock("GET", "/")
        .with_status(200)
        .with_body(format!(
            r#"<a href="{base}/a-movie-2022/"><div class="poster-card"><img src="{base}/a.jpg"><p class="poster-title">A Movie (2022)</p></div></a>"#
        ))
        .create_async()
        .await;

    let mut config = Config::default();
    config.site.movies_drive_domain = base.clone();

    let request = Request::builder()
        .uri("/api/movies?page=abc")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(config), request).await;
    mock.assert_async().await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalFound"], 1);
    assert_eq!(body["posts"][0]["title"], "A Movie (2022)");
    assert_eq!(body["posts"][0]["url"], format!("{}/a-movie-2022/", base));
    assert_eq!(body["posts"][0]["thumbnail"], format!("{}/a.jpg", base));
}

#[tokio::test]
async fn test_domain_settings_update_and_read_back() {
    let app = app(Config::default());

    let (status, body) = send(
        app.clone(),
        Request::builder()
            .uri("/api/domain-settings")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["moviesDriveDomain"], "moviesdrive.forum");
    assert_eq!(body["hubcloudDomain"], "hubcloud.foo");
    assert_eq!(body["mdrivePattern"], "mdrive.today");

    let update = json!({
        "moviesDriveDomain": "moviesdrive.example",
        "hubcloudDomain": "hubcloud.example",
        "mdrivePattern": "mdrive.example",
    });
    let (status, body) = send(
        app.clone(),
        json_request("PUT", "/api/domain-settings", update),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["moviesDriveDomain"], "moviesdrive.example");

    let (_, body) = send(
        app,
        Request::builder()
            .uri("/api/domain-settings")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(body["hubcloudDomain"], "hubcloud.example");
    assert_eq!(body["mdrivePattern"], "mdrive.example");
}

#[tokio::test]
async fn test_domain_settings_rejects_blank_domain() {
    let update = json!({
        "moviesDriveDomain": "  ",
        "hubcloudDomain": "hubcloud.example",
        "mdrivePattern": "mdrive.example",
    });
    let (status, body) = send(
        app(Config::default()),
        json_request("PUT", "/api/domain-settings", update),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "MoviesDrive domain is required");
}

#[tokio::test]
async fn test_wordpress_post_validates_settings() {
    let request = json_request(
        "POST",
        "/api/wordpress/post",
        json!({
            "movieDetails": { "title": "Example", "sourceUrl": "https://moviesdrive.forum/example/" },
            "settings": { "siteUrl": "not a site", "username": "editor", "appPassword": "secret" },
        }),
    );
    let (status, body) = send(app(Config::default()), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Please enter a valid WordPress site URL");
}

#[tokio::test]
async fn test_wordpress_connection_test_reports_failure() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/wp-json/wp/v2/users/me")
        .with_status(403)
        .with_body(r#"{"message": "Forbidden for this user"}"#)
        .create_async()
        .await;

    let request = json_request(
        "POST",
        "/api/wordpress/test",
        json!({
            "settings": { "siteUrl": server.url(), "username": "editor", "appPassword": "secret" },
        }),
    );
    let (status, body) = send(app(Config::default()), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "WordPress API error: 403 Forbidden for this user");
}
