use serde::{Deserialize, Serialize};

use crate::error::{ReelError, Result};

pub const DEFAULT_MOVIES_DRIVE_DOMAIN: &str = "moviesdrive.forum";
pub const DEFAULT_HUBCLOUD_DOMAIN: &str = "hubcloud.foo";
pub const DEFAULT_MDRIVE_PATTERN: &str = "mdrive.today";

pub fn default_screenshot_hosts() -> Vec<String> {
    ["catimages.org", "imgbox.com", "pixhost.to", "ibb.co", "imagetwist.com"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// One entry of a listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadLink {
    pub label: String,
    pub url: String,
}

impl DownloadLink {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
        }
    }

    pub fn default_label(index: usize) -> String {
        format!("Download Link {}", index + 1)
    }
}

/// Everything scraped from a single detail page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieDetails {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_image: Option<String>,
    #[serde(default)]
    pub screenshots: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imdb_rating: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storyline: Option<String>,
    #[serde(default)]
    pub download_links: Vec<DownloadLink>,
    pub source_url: String,
}

impl MovieDetails {
    pub fn new(source_url: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieListResult {
    pub posts: Vec<PostSummary>,
    pub total_found: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MovieListResult {
    pub fn found(posts: Vec<PostSummary>) -> Self {
        Self {
            total_found: posts.len(),
            posts,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            posts: Vec::new(),
            total_found: 0,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkFinderResult {
    pub url: String,
    pub matched_links: Vec<String>,
    pub total_found: usize,
    /// Milliseconds spent handling the request.
    pub processing_time: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movie_details: Option<MovieDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LinkFinderResult {
    pub fn failed(url: impl Into<String>, error: impl Into<String>, processing_time: u64) -> Self {
        Self {
            url: url.into(),
            processing_time,
            error: Some(error.into()),
            ..Default::default()
        }
    }
}

/// Hosts the extractors are tuned to.
///
/// A domain may carry an explicit scheme (`http://127.0.0.1:8080`); bare
/// hosts are addressed over https.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainSettings {
    pub movies_drive_domain: String,
    pub hubcloud_domain: String,
    pub mdrive_pattern: String,
    #[serde(default = "default_screenshot_hosts")]
    pub screenshot_hosts: Vec<String>,
}

impl Default for DomainSettings {
    fn default() -> Self {
        Self {
            movies_drive_domain: DEFAULT_MOVIES_DRIVE_DOMAIN.to_string(),
            hubcloud_domain: DEFAULT_HUBCLOUD_DOMAIN.to_string(),
            mdrive_pattern: DEFAULT_MDRIVE_PATTERN.to_string(),
            screenshot_hosts: default_screenshot_hosts(),
        }
    }
}

impl DomainSettings {
    pub fn validate(&self) -> Result<()> {
        if self.movies_drive_domain.trim().is_empty() {
            return Err(ReelError::validation("MoviesDrive domain is required"));
        }
        if self.hubcloud_domain.trim().is_empty() {
            return Err(ReelError::validation("HubCloud domain is required"));
        }
        if self.mdrive_pattern.trim().is_empty() {
            return Err(ReelError::validation("mdrive pattern is required"));
        }
        Ok(())
    }

    /// Site root without a trailing slash, e.g. `https://moviesdrive.forum`.
    pub fn site_base_url(&self) -> String {
        let domain = self.movies_drive_domain.trim().trim_end_matches('/');
        if domain.starts_with("http://") || domain.starts_with("https://") {
            domain.to_string()
        } else {
            format!("https://{}", domain)
        }
    }

    /// Host (and port) of the listing site with any scheme removed.
    pub fn site_host(&self) -> String {
        strip_scheme(&self.movies_drive_domain)
    }

    pub fn final_host(&self) -> String {
        strip_scheme(&self.hubcloud_domain)
    }

    pub fn intermediate_pattern(&self) -> String {
        strip_scheme(&self.mdrive_pattern)
    }

    /// Listing page URL; page 1 is the site root.
    pub fn listing_url(&self, page: u32) -> String {
        if page <= 1 {
            self.site_base_url()
        } else {
            format!("{}/page/{}/", self.site_base_url(), page)
        }
    }
}

fn strip_scheme(domain: &str) -> String {
    let domain = domain.trim();
    domain
        .strip_prefix("https://")
        .or_else(|| domain.strip_prefix("http://"))
        .unwrap_or(domain)
        .trim_end_matches('/')
        .to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordPressSettings {
    pub site_url: String,
    pub username: String,
    pub app_password: String,
}

impl WordPressSettings {
    pub fn validate(&self) -> Result<()> {
        let parsed = url::Url::parse(self.site_url.trim())
            .map_err(|_| ReelError::validation("Please enter a valid WordPress site URL"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ReelError::validation("Please enter a valid WordPress site URL"));
        }
        if self.username.trim().is_empty() {
            return Err(ReelError::validation("Username is required"));
        }
        if self.app_password.trim().is_empty() {
            return Err(ReelError::validation("Application password is required"));
        }
        Ok(())
    }

    /// REST endpoint under the site's `wp-json` root.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/wp-json/wp/v2/{}",
            self.site_url.trim().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordPressPostResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WordPressPostResult {
    pub fn published(post_id: Option<u64>, post_url: Option<String>) -> Self {
        Self {
            success: true,
            post_id,
            post_url,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Default::default()
        }
    }
}
