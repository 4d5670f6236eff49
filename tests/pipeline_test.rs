//! Integration tests for the listing and link-finder pipeline against a mock site.

use std::sync::Arc;

use mockito::{Matcher, Server, ServerGuard};
use reelpress::config::HttpConfig;
use reelpress::extract::PairingStrategy;
use reelpress::models::{DomainSettings, DownloadLink};
use reelpress::pipeline::Pipeline;
use reelpress::utils::HttpClient;

fn pipeline() -> Pipeline {
    let http = HttpClient::new(&HttpConfig::default()).expect("Failed to build HTTP client");
    Pipeline::new(Arc::new(http), PairingStrategy::Positional, 4)
}

/// Domain settings pointing the listing site and the intermediate hop at `server`.
fn domains(server: &ServerGuard) -> DomainSettings {
    DomainSettings {
        movies_drive_domain: server.url(),
        mdrive_pattern: format!("{}/mdrive", server.host_with_port()),
        ..DomainSettings::default()
    }
}

fn listing_page(base: &str) -> String {
    let card = |slug: &str, title: &str| {
        format!(
            r#"<a href="{base}/{slug}/"><div class="poster-card"><img src="{base}/thumbs/{slug}.jpg" alt=""><p class="poster-title">{title}</p></div></a>"#
        )
    };
    format!(
        "<html><body>{}{}{}</body></html>",
        card("first-movie-2024", "First Movie (2024) 1080p"),
        card("short", "Home"),
        card("second-movie-2023", "Second Movie (2023) &amp; More"),
    )
}

fn detail_page(base: &str) -> String {
    format!(
        r#"<html><body>
<h1 class="entry-title">Example Movie (2024) Hindi</h1>
<div class="entry-content">
  <p><strong>Genre:</strong> Drama</p>
  <h2>Download Links 480p 720p</h2>
  <h5>Example Movie (2024) 480p [400MB]</h5>
  <p><a href="{base}/mdrive/archives/1">Download</a></p>
  <h5>Example Movie (2024) 720p [1GB]</h5>
  <p><a href="{base}/mdrive/archives/2">Download</a></p>
  <h5>Example Movie (2024) 1080p [2GB]</h5>
  <p><a href="{base}/mdrive/archives/3">Download</a></p>
</div>
</body></html>"#
    )
}

#[tokio::test]
async fn test_listing_page_one_is_site_root() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body(listing_page(&server.url()))
        .create_async()
        .await;

    let result = pipeline().list_movies(&domains(&server), 1).await;
    mock.assert_async().await;

    assert!(result.error.is_none());
    assert_eq!(result.total_found, 2);
    assert_eq!(result.posts[0].title, "First Movie (2024) 1080p");
    assert_eq!(result.posts[0].url, format!("{}/first-movie-2024/", server.url()));
    assert_eq!(
        result.posts[0].thumbnail.as_deref(),
        Some(format!("{}/thumbs/first-movie-2024.jpg", server.url()).as_str())
    );
    assert_eq!(result.posts[1].title, "Second Movie (2023) & More");
}

#[tokio::test]
async fn test_listing_later_pages_use_page_path() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/page/3/")
        .with_status(200)
        .with_body(listing_page(&server.url()))
        .create_async()
        .await;

    let result = pipeline().list_movies(&domains(&server), 3).await;
    mock.assert_async().await;
    assert_eq!(result.total_found, 2);
}

#[tokio::test]
async fn test_listing_upstream_error_is_reported() {
    let mut server = Server::new_async().await;
    server.mock("GET", "/").with_status(404).create_async().await;

    let result = pipeline().list_movies(&domains(&server), 1).await;

    assert!(result.posts.is_empty());
    assert_eq!(result.total_found, 0);
    assert_eq!(result.error.as_deref(), Some("Failed to fetch: 404 Not Found"));
}

#[tokio::test]
async fn test_extract_links_resolves_through_intermediate_pages() {
    let mut server = Server::new_async().await;
    let base = server.url();
    server
        .mock("GET", "/example-movie-2024/")
        .with_status(200)
        .with_body(detail_page(&base))
        .create_async()
        .await;
    server
        .mock("GET", "/mdrive/archives/1")
        .with_status(200)
        .with_body(r#"<a href="https://hubcloud.foo/drive/aaa">HubCloud</a>"#)
        .create_async()
        .await;
    server
        .mock("GET", "/mdrive/archives/2")
        .with_status(200)
        .with_body(r#"<p>No hosting link here</p>"#)
        .create_async()
        .await;
    server
        .mock("GET", "/mdrive/archives/3")
        .with_status(200)
        .with_body(r#"<a class="btn" href='https://hubcloud.foo/drive/ccc'>HubCloud</a>"#)
        .create_async()
        .await;

    let url = format!("{}/example-movie-2024/", base);
    let result = pipeline()
        .extract_links(&domains(&server), &url)
        .await
        .expect("valid URL");

    assert!(result.error.is_none());
    assert_eq!(result.url, url);
    assert_eq!(
        result.matched_links,
        vec![
            "https://hubcloud.foo/drive/aaa".to_string(),
            "https://hubcloud.foo/drive/ccc".to_string(),
        ]
    );
    assert_eq!(result.total_found, 2);

    let details = result.movie_details.expect("details present");
    assert_eq!(details.title, "Example Movie (2024) Hindi");
    assert_eq!(details.genre.as_deref(), Some("Drama"));
    assert_eq!(details.source_url, url);
    assert_eq!(
        details.download_links,
        vec![
            DownloadLink::new("Example Movie (2024) 480p [400MB]", "https://hubcloud.foo/drive/aaa"),
            DownloadLink::new("Example Movie (2024) 1080p [2GB]", "https://hubcloud.foo/drive/ccc"),
        ]
    );
}

#[tokio::test]
async fn test_extract_links_keeps_candidates_when_nothing_resolves() {
    let mut server = Server::new_async().await;
    let base = server.url();
    server
        .mock("GET", "/example-movie-2024/")
        .with_status(200)
        .with_body(detail_page(&base))
        .create_async()
        .await;
    let hops = server
        .mock("GET", Matcher::Regex(r"^/mdrive/archives/\d+$".to_string()))
        .with_status(500)
        .expect(3)
        .create_async()
        .await;

    let url = format!("{}/example-movie-2024/", base);
    let result = pipeline()
        .extract_links(&domains(&server), &url)
        .await
        .expect("valid URL");
    hops.assert_async().await;

    assert!(result.error.is_none());
    let candidates: Vec<String> = (1..=3)
        .map(|n| format!("{}/mdrive/archives/{}", base, n))
        .collect();
    assert_eq!(result.matched_links, candidates);
    assert_eq!(result.total_found, 3);

    let details = result.movie_details.expect("details present");
    assert_eq!(
        details.download_links,
        vec![
            DownloadLink::new("Example Movie (2024) 480p [400MB]", candidates[0].as_str()),
            DownloadLink::new("Example Movie (2024) 720p [1GB]", candidates[1].as_str()),
            DownloadLink::new("Example Movie (2024) 1080p [2GB]", candidates[2].as_str()),
        ]
    );
}

#[tokio::test]
async fn test_extract_links_labels_from_quality_h1() {
    let mut server = Server::new_async().await;
    let base = server.url();
    server
        .mock("GET", "/single/")
        .with_status(200)
        .with_body(format!(
            r#"<h1 class="entry-title">Single Movie (2019) 720p</h1>
<p><a href="{base}/mdrive/archives/9">Download</a></p>"#
        ))
        .create_async()
        .await;
    server
        .mock("GET", "/mdrive/archives/9")
        .with_status(200)
        .with_body(r#"<a href="https://hubcloud.foo/drive/nine">HubCloud</a>"#)
        .create_async()
        .await;

    let url = format!("{}/single/", base);
    let result = pipeline()
        .extract_links(&domains(&server), &url)
        .await
        .expect("valid URL");

    let details = result.movie_details.expect("details present");
    assert_eq!(
        details.download_links,
        vec![DownloadLink::new(
            "Single Movie (2019) 720p",
            "https://hubcloud.foo/drive/nine"
        )]
    );
}

#[tokio::test]
async fn test_extract_links_sends_browser_headers() {
    let mut server = Server::new_async().await;
    let config = HttpConfig::default();
    let mock = server
        .mock("GET", "/page/")
        .match_header("user-agent", config.user_agent.as_str())
        .match_header("accept-language", Matcher::Any)
        .with_status(200)
        .with_body("<html><body><h1>Only A Title Here</h1></body></html>")
        .create_async()
        .await;

    let url = format!("{}/page/", server.url());
    let result = pipeline()
        .extract_links(&domains(&server), &url)
        .await
        .expect("valid URL");
    mock.assert_async().await;

    let details = result.movie_details.expect("details present");
    assert_eq!(details.title, "Only A Title Here");
    assert!(details.download_links.is_empty());
    assert!(result.matched_links.is_empty());
}

#[tokio::test]
async fn test_extract_links_upstream_error_is_a_result() {
    let mut server = Server::new_async().await;
    server.mock("GET", "/gone/").with_status(404).create_async().await;

    let url = format!("{}/gone/", server.url());
    let result = pipeline()
        .extract_links(&domains(&server), &url)
        .await
        .expect("upstream failures are not errors");

    assert_eq!(result.error.as_deref(), Some("Failed to fetch: 404 Not Found"));
    assert!(result.matched_links.is_empty());
    assert!(result.movie_details.is_none());
}

#[tokio::test]
async fn test_extract_links_rejects_missing_url() {
    let result = pipeline()
        .extract_links(&DomainSettings::default(), "   ")
        .await;
    assert_eq!(
        result.expect_err("empty URL is invalid").to_string(),
        "URL is required"
    );
}
