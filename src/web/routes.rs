use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::error::ReelError;
use crate::models::{DomainSettings, LinkFinderResult, MovieDetails, WordPressPostResult, WordPressSettings};
use crate::traits::Publisher;

/// Create the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/movies", get(list_movies))
        .route("/api/extract-links", post(extract_links))
        .route("/api/domain-settings", get(get_domain_settings).put(put_domain_settings))
        .route("/api/wordpress/test", post(test_wordpress))
        .route("/api/wordpress/post", post(post_to_wordpress))
        .route("/api/wordpress/publish-all", post(publish_all))
        .route("/healthz", get(health))
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    page: Option<String>,
}

/// Lenient page parsing: anything that is not a positive integer is page 1.
fn parse_page(raw: Option<&str>) -> u32 {
    raw.and_then(|p| p.trim().parse::<u32>().ok())
        .filter(|p| *p >= 1)
        .unwrap_or(1)
}

async fn list_movies(State(state): State<AppState>, Query(params): Query<ListParams>) -> Response {
    let page = parse_page(params.page.as_deref());
    let domains = state.domains.read().await.clone();
    Json(state.pipeline.list_movies(&domains, page).await).into_response()
}

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    #[serde(default)]
    url: Option<String>,
}

async fn extract_links(
    State(state): State<AppState>,
    payload: Result<Json<ExtractRequest>, JsonRejection>,
) -> Response {
    let started = Instant::now();
    let url = match payload {
        Ok(Json(request)) => request.url.unwrap_or_default(),
        Err(rejection) => {
            let result = LinkFinderResult::failed("", rejection.body_text(), 0);
            return (StatusCode::BAD_REQUEST, Json(result)).into_response();
        }
    };

    let domains = state.domains.read().await.clone();
    match state.pipeline.extract_links(&domains, &url).await {
        Ok(result) => Json(result).into_response(),
        Err(e) => {
            let elapsed = started.elapsed().as_millis() as u64;
            let result = LinkFinderResult::failed(url, e.to_string(), elapsed);
            (StatusCode::BAD_REQUEST, Json(result)).into_response()
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

fn bad_request(error: impl Into<String>) -> Response {
    (StatusCode::BAD_REQUEST, Json(ErrorBody { error: error.into() })).into_response()
}

async fn get_domain_settings(State(state): State<AppState>) -> Response {
    Json(state.domains.read().await.clone()).into_response()
}

async fn put_domain_settings(
    State(state): State<AppState>,
    payload: Result<Json<DomainSettings>, JsonRejection>,
) -> Response {
    let settings = match payload {
        Ok(Json(settings)) => settings,
        Err(rejection) => return bad_request(rejection.body_text()),
    };
    if let Err(e) = settings.validate() {
        return bad_request(e.to_string());
    }

    tracing::info!("Domain settings updated: {:?}", settings);
    *state.domains.write().await = settings.clone();
    Json(settings).into_response()
}

#[derive(Debug, Deserialize)]
pub struct TestRequest {
    settings: WordPressSettings,
}

#[derive(Debug, Serialize)]
struct TestResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

async fn test_wordpress(
    State(state): State<AppState>,
    payload: Result<Json<TestRequest>, JsonRejection>,
) -> Response {
    let settings = match payload {
        Ok(Json(request)) => request.settings,
        Err(rejection) => return bad_request(rejection.body_text()),
    };
    if let Err(e) = settings.validate() {
        return bad_request(e.to_string());
    }

    let response = match state.publisher.test_connection(&settings).await {
        Ok(()) => TestResponse {
            success: true,
            error: None,
        },
        Err(e) => TestResponse {
            success: false,
            error: Some(match e {
                ReelError::WordPress(message) => message,
                other => other.to_string(),
            }),
        },
    };
    Json(response).into_response()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRequest {
    movie_details: MovieDetails,
    settings: WordPressSettings,
}

async fn post_to_wordpress(
    State(state): State<AppState>,
    payload: Result<Json<PostRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            let result = WordPressPostResult::failed(rejection.body_text());
            return (StatusCode::BAD_REQUEST, Json(result)).into_response();
        }
    };
    if let Err(e) = request.settings.validate() {
        let result = WordPressPostResult::failed(e.to_string());
        return (StatusCode::BAD_REQUEST, Json(result)).into_response();
    }

    let result = state
        .publisher
        .publish_draft(&request.settings, &request.movie_details)
        .await;
    Json(result).into_response()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishAllRequest {
    movie_details: MovieDetails,
}

async fn publish_all(
    State(state): State<AppState>,
    payload: Result<Json<PublishAllRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return bad_request(rejection.body_text()),
    };
    let results = state
        .publisher
        .publish_all(&state.config.wordpress, &request.movie_details)
        .await;
    Json(results).into_response()
}

async fn health() -> &'static str {
    "ok"
}
