use crate::config::HttpConfig;
use crate::error::Result;
use crate::traits::PageFetcher;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Why a single page fetch did not produce a body.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    #[error("Failed to fetch: {}", format_status(.status, .reason))]
    Status { status: u16, reason: String },

    #[error("{0}")]
    Transport(String),
}

fn format_status(status: &u16, reason: &str) -> String {
    if reason.is_empty() {
        status.to_string()
    } else {
        format!("{} {}", status, reason)
    }
}

/// Outbound page fetcher that presents itself as a desktop browser.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    accept: String,
    accept_language: String,
}

impl HttpClient {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            accept: config.accept.clone(),
            accept_language: config.accept_language.clone(),
        })
    }

    /// Underlying client, shared with the publisher.
    pub fn inner(&self) -> &Client {
        &self.client
    }

    pub async fn get(&self, url: &str) -> std::result::Result<String, FetchFailure> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, &self.accept)
            .header(ACCEPT_LANGUAGE, &self.accept_language)
            .send()
            .await
            .map_err(|e| FetchFailure::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchFailure::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| FetchFailure::Transport(e.to_string()))?;
        debug!("Fetched {} ({} bytes)", url, text.len());
        Ok(text)
    }
}

#[async_trait::async_trait]
impl PageFetcher for HttpClient {
    async fn fetch(&self, url: &str) -> std::result::Result<String, FetchFailure> {
        self.get(url).await
    }
}
