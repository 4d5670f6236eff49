use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use crate::config::Config;
use crate::error::{ReelError, Result};
use crate::extract::detail::{DetailExtractor, PairingStrategy};
use crate::extract::listing::ListingExtractor;
use crate::models::{DomainSettings, LinkFinderResult, MovieListResult};
use crate::resolver::LinkResolver;
use crate::traits::PageFetcher;

/// Fetch → extract → resolve, with every failure turned into a result value.
#[derive(Clone)]
pub struct Pipeline {
    fetcher: Arc<dyn PageFetcher>,
    pairing: PairingStrategy,
    max_concurrent: usize,
}

impl Pipeline {
    pub fn new(fetcher: Arc<dyn PageFetcher>, pairing: PairingStrategy, max_concurrent: usize) -> Self {
        Self {
            fetcher,
            pairing,
            max_concurrent,
        }
    }

    pub fn from_config(config: &Config, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self::new(fetcher, config.resolver.pairing, config.resolver.max_concurrent)
    }

    /// One listing page; page 0 is treated as page 1.
    pub async fn list_movies(&self, domains: &DomainSettings, page: u32) -> MovieListResult {
        let url = domains.listing_url(page.max(1));
        info!("🌐 Fetching listing page {}: {}", page.max(1), url);

        let extractor = match ListingExtractor::new(domains) {
            Ok(extractor) => extractor,
            Err(e) => return MovieListResult::failed(e.to_string()),
        };

        match self.fetcher.fetch(&url).await {
            Ok(html) => MovieListResult::found(extractor.extract(&html)),
            Err(e) => {
                warn!("Listing fetch failed for {}: {}", url, e);
                MovieListResult::failed(e.to_string())
            }
        }
    }

    /// Extract details and resolved download links from a detail page.
    ///
    /// Only a missing or malformed `url` is an `Err`; upstream failures are
    /// reported in the result's `error` field.
    pub async fn extract_links(&self, domains: &DomainSettings, url: &str) -> Result<LinkFinderResult> {
        let started = Instant::now();
        let url = validate_target_url(url)?;
        let elapsed = || started.elapsed().as_millis() as u64;

        let extractor = match DetailExtractor::new(domains, self.pairing) {
            Ok(extractor) => extractor,
            Err(e) => return Ok(LinkFinderResult::failed(url, e.to_string(), elapsed())),
        };

        let html = match self.fetcher.fetch(&url).await {
            Ok(html) => html,
            Err(e) => {
                warn!("Detail fetch failed for {}: {}", url, e);
                return Ok(LinkFinderResult::failed(url, e.to_string(), elapsed()));
            }
        };

        let mut details = extractor.extract(&html, &url);
        match LinkResolver::new(self.fetcher.clone(), domains, self.max_concurrent) {
            Ok(resolver) => {
                let candidates = std::mem::take(&mut details.download_links);
                let resolved = resolver.resolve(candidates.clone()).await;
                details.download_links = if resolved.is_empty() && !candidates.is_empty() {
                    warn!(
                        "No candidate link resolved for {}, keeping {} unresolved links",
                        url,
                        candidates.len()
                    );
                    candidates
                } else {
                    resolved
                };
            }
            Err(e) => warn!("Link resolution skipped, keeping candidates: {}", e),
        }

        let matched_links: Vec<String> = details
            .download_links
            .iter()
            .map(|link| link.url.clone())
            .collect();
        info!("✅ {} download links for {}", matched_links.len(), url);

        Ok(LinkFinderResult {
            url,
            total_found: matched_links.len(),
            matched_links,
            processing_time: elapsed(),
            movie_details: Some(details),
            error: None,
        })
    }
}

/// Trimmed absolute http(s) URL, or a validation error.
pub fn validate_target_url(url: &str) -> Result<String> {
    let url = url.trim();
    if url.is_empty() {
        return Err(ReelError::validation("URL is required"));
    }
    let parsed = url::Url::parse(url)
        .map_err(|e| ReelError::validation(format!("Invalid URL: {}", e)))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ReelError::validation(format!(
            "Invalid URL: unsupported scheme '{}'",
            parsed.scheme()
        )));
    }
    Ok(url.to_string())
}
