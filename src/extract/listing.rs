use std::collections::HashSet;

use regex::Regex;
use tracing::{debug, info};

use crate::error::Result;
use crate::extract::entities::clean_text;
use crate::models::{DomainSettings, PostSummary};

/// Listing pages never yield more posts than this.
pub const MAX_POSTS: usize = 30;

/// Titles this short are navigation noise, not posts.
const MIN_TITLE_CHARS: usize = 5;

/// Pulls post cards out of a listing page.
pub struct ListingExtractor {
    card_re: Regex,
    loose_re: Regex,
}

impl ListingExtractor {
    pub fn new(domains: &DomainSettings) -> Result<Self> {
        let host = regex::escape(&domains.site_host());

        // <a href=URL><div class="poster-card">..<img src=THUMB>..<p class="poster-title">TITLE</p>..</div></a>
        let card_re = Regex::new(&format!(
            r#"(?is)<a\s+href="(https?://{host}/[^"]+)"[^>]*>\s*<div\s+class="poster-card"[^>]*>.*?<img\b[^>]*?\ssrc="([^"]*)"[^>]*>.*?<p\s+class="poster-title">([^<]+)</p>.*?</div>\s*</a>"#
        ))?;

        // Older markup: a year-bearing href followed somewhere by the title paragraph.
        let loose_re = Regex::new(&format!(
            r#"(?is)href="(https?://{host}/[^"]*\d{{4}}[^"]*)"[^>]*>.*?<p\s+class="poster-title">([^<]+)</p>"#
        ))?;

        Ok(Self { card_re, loose_re })
    }

    pub fn extract(&self, html: &str) -> Vec<PostSummary> {
        let mut seen = HashSet::new();
        let mut posts = Vec::new();

        for caps in self.card_re.captures_iter(html) {
            let url = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            let thumbnail = caps
                .get(2)
                .map(|m| m.as_str().trim())
                .filter(|s| !s.is_empty())
                .map(str::to_string);
            let title = caps.get(3).map(|m| m.as_str()).unwrap_or_default();
            push_post(&mut posts, &mut seen, url, title, thumbnail);
        }

        if posts.is_empty() {
            debug!("[LISTING] no poster cards matched, trying loose pattern");
            for caps in self.loose_re.captures_iter(html) {
                let url = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
                let title = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
                push_post(&mut posts, &mut seen, url, title, None);
            }
        }

        posts.truncate(MAX_POSTS);
        info!("[LISTING] page parsed, posts: {}", posts.len());
        posts
    }
}

fn push_post(
    posts: &mut Vec<PostSummary>,
    seen: &mut HashSet<String>,
    url: &str,
    raw_title: &str,
    thumbnail: Option<String>,
) {
    let title = clean_text(raw_title);
    if title.chars().count() <= MIN_TITLE_CHARS || url.is_empty() {
        return;
    }
    if !seen.insert(url.to_string()) {
        return;
    }
    posts.push(PostSummary {
        title,
        url: url.to_string(),
        thumbnail,
    });
}
