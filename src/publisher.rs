use futures::future::join_all;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::WordPressSite;
use crate::content;
use crate::error::{ReelError, Result};
use crate::models::{MovieDetails, WordPressPostResult, WordPressSettings};
use crate::traits::Publisher;

/// Draft publisher for the WordPress REST API (`/wp-json/wp/v2`).
#[derive(Clone)]
pub struct WordPressClient {
    client: Client,
    max_screenshots: usize,
}

#[derive(Debug, Serialize)]
struct NewPost<'a> {
    title: &'a str,
    content: &'a str,
    status: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreatedPost {
    id: Option<u64>,
    link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: Option<String>,
}

/// Outcome of publishing to one configured site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SitePublishResult {
    pub site: String,
    pub result: WordPressPostResult,
}

impl WordPressClient {
    pub fn new(client: Client, max_screenshots: usize) -> Self {
        Self {
            client,
            max_screenshots,
        }
    }

    /// Publish the same draft to every site; results follow `sites` order.
    pub async fn publish_all(
        &self,
        sites: &[WordPressSite],
        details: &MovieDetails,
    ) -> Vec<SitePublishResult> {
        let tasks = sites.iter().map(|site| async move {
            let settings = site.settings();
            let result = match settings.validate() {
                Ok(()) => self.publish_draft(&settings, details).await,
                Err(e) => WordPressPostResult::failed(e.to_string()),
            };
            SitePublishResult {
                site: site.name.clone(),
                result,
            }
        });
        join_all(tasks).await
    }
}

async fn api_error(response: reqwest::Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiError>(&body)
        .ok()
        .and_then(|e| e.message)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or_default().to_string());
    format!("WordPress API error: {} {}", status.as_u16(), message)
        .trim_end()
        .to_string()
}

#[async_trait::async_trait]
impl Publisher for WordPressClient {
    async fn publish_draft(
        &self,
        settings: &WordPressSettings,
        details: &MovieDetails,
    ) -> WordPressPostResult {
        let title = content::post_title(details);
        let body = content::render_post(details, self.max_screenshots);
        let post = NewPost {
            title: &title,
            content: &body,
            status: "draft",
        };

        let response = match self
            .client
            .post(settings.endpoint("posts"))
            .basic_auth(&settings.username, Some(&settings.app_password))
            .json(&post)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("WordPress request to {} failed: {}", settings.site_url, e);
                return WordPressPostResult::failed(e.to_string());
            }
        };

        if !response.status().is_success() {
            let error = api_error(response).await;
            warn!("Publishing '{}' to {} failed: {}", title, settings.site_url, error);
            return WordPressPostResult::failed(error);
        }

        match response.json::<CreatedPost>().await {
            Ok(created) => {
                info!("📝 Draft '{}' created on {} (id {:?})", title, settings.site_url, created.id);
                WordPressPostResult::published(created.id, created.link)
            }
            Err(e) => WordPressPostResult::failed(format!("Unexpected WordPress response: {}", e)),
        }
    }

    async fn test_connection(&self, settings: &WordPressSettings) -> Result<()> {
        let response = self
            .client
            .get(settings.endpoint("users/me"))
            .basic_auth(&settings.username, Some(&settings.app_password))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ReelError::wordpress(api_error(response).await));
        }
        Ok(())
    }
}
