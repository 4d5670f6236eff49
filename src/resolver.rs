use std::collections::HashSet;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use regex::Regex;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::models::{DomainSettings, DownloadLink};
use crate::traits::PageFetcher;

/// Follows candidate links one hop to their final hosting link.
pub struct LinkResolver {
    fetcher: Arc<dyn PageFetcher>,
    final_re: Regex,
    final_host: String,
    max_concurrent: usize,
}

impl LinkResolver {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        domains: &DomainSettings,
        max_concurrent: usize,
    ) -> Result<Self> {
        let final_host = domains.final_host().to_lowercase();
        let final_re = Regex::new(&format!(
            r#"(?i)href\s*=\s*["'](https?://[^"'\s]*{}[^"'\s]*)["']"#,
            regex::escape(&final_host)
        ))?;

        Ok(Self {
            fetcher,
            final_re,
            final_host,
            max_concurrent: max_concurrent.max(1),
        })
    }

    /// Resolve every candidate and keep only links on the final host.
    ///
    /// Fetches run concurrently (at most `max_concurrent` at a time) and the
    /// output keeps input order. A failed fetch or a page without a final link
    /// falls back to the candidate itself, which the host filter then drops
    /// unless it already points at the final host.
    pub async fn resolve(&self, links: Vec<DownloadLink>) -> Vec<DownloadLink> {
        let candidates = links.len();
        let resolved: Vec<DownloadLink> = stream::iter(links)
            .map(|link| self.resolve_one(link))
            .buffered(self.max_concurrent)
            .collect()
            .await;

        let mut seen = HashSet::new();
        let kept: Vec<DownloadLink> = resolved
            .into_iter()
            .filter(|link| self.is_final(&link.url))
            .filter(|link| seen.insert(link.url.clone()))
            .collect();

        info!("[RESOLVER] resolved {} of {} candidate links", kept.len(), candidates);
        kept
    }

    async fn resolve_one(&self, link: DownloadLink) -> DownloadLink {
        match self.fetcher.fetch(&link.url).await {
            Ok(html) => match self.find_final_link(&html) {
                Some(url) => {
                    debug!("[RESOLVER] {} -> {}", link.url, url);
                    DownloadLink::new(link.label, url)
                }
                None => {
                    warn!("[RESOLVER] no final link found on {}", link.url);
                    link
                }
            },
            Err(e) => {
                warn!("[RESOLVER] failed to fetch {}: {}", link.url, e);
                link
            }
        }
    }

    /// First href on the page that points at the final host.
    pub fn find_final_link(&self, html: &str) -> Option<String> {
        self.final_re
            .captures(html)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    pub fn is_final(&self, url: &str) -> bool {
        url.to_lowercase().contains(&self.final_host)
    }
}
