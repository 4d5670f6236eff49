use crate::models::{MovieDetails, WordPressPostResult, WordPressSettings};
use crate::utils::FetchFailure;

/// Fetches raw page HTML. Implementations never panic past this boundary:
/// every outcome is either a body or a `FetchFailure`.
#[async_trait::async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchFailure>;
}

/// Publishes assembled movie posts to a remote blog.
#[async_trait::async_trait]
pub trait Publisher: Send + Sync {
    /// Create a draft post for `details`.
    async fn publish_draft(
        &self,
        settings: &WordPressSettings,
        details: &MovieDetails,
    ) -> WordPressPostResult;

    /// Check that the credentials are accepted by the site.
    async fn test_connection(&self, settings: &WordPressSettings) -> crate::error::Result<()>;
}
