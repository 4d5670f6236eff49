use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Result;
use crate::extract::entities::{clean_text, non_empty};
use crate::models::{DomainSettings, DownloadLink, MovieDetails};

static TITLE_CLASS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<h1\b[^>]*class\s*=\s*["'][^"']*\b(?:entry-title|post-title|page-title)\b[^"']*["'][^>]*>(.*?)</h1>"#).unwrap()
});
static H1_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<h1\b[^>]*>(.*?)</h1>").unwrap());

static IMG_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<img\b[^>]*>").unwrap());
static SRC_ATTR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\ssrc\s*=\s*["']([^"']+)["']"#).unwrap());
static DATA_SRC_ATTR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\sdata-src\s*=\s*["']([^"']+)["']"#).unwrap());
static CLASS_ATTR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\sclass\s*=\s*["']([^"']*)["']"#).unwrap());

static RATING_RE: Lazy<Regex> = Lazy::new(|| labeled_value_regex(r"(?:IMDb\s*)?Rating"));
static GENRE_RE: Lazy<Regex> = Lazy::new(|| labeled_value_regex(r"Genres?"));
static LANGUAGE_RE: Lazy<Regex> = Lazy::new(|| labeled_value_regex(r"Languages?"));
static QUALITY_RE: Lazy<Regex> = Lazy::new(|| labeled_value_regex(r"Quality"));
static DIRECTOR_RE: Lazy<Regex> = Lazy::new(|| labeled_value_regex(r"Direct(?:ors?|ed\s+By)"));

static STORYLINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)\bStory\s*line\b\s*(?:</?[a-z][a-z0-9]*\b[^>]*>\s*|:\s*)*([^<]{10,})").unwrap()
});
static LABELED_PARAGRAPH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<p\b[^>]*>\s*<(?:strong|b)>\s*(?:Plot|Synopsis|Summary|Overview|Story)\s*:?\s*</(?:strong|b)>\s*:?\s*([^<]{30,1500})</p>").unwrap()
});
static CONTENT_BLOCK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)class\s*=\s*["'][^"']*\bentry-content\b"#).unwrap()
});
static PARAGRAPH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<p\b[^>]*>(.*?)</p>").unwrap());

static HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<h[1-6]\b[^>]*>(.*?)</h[1-6]>").unwrap());
static RESOLUTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:480p|576p|720p|1080p|1440p|2160p|4k)\b").unwrap());
static SECTION_TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bdownload\s+links\b").unwrap());

/// Paragraphs shorter than this are not a synopsis.
const MIN_SYNOPSIS_CHARS: usize = 100;

fn labeled_value_regex(label: &str) -> Regex {
    // "<strong>Genre:</strong> Action", "<b>Genre</b>: Action" and "Genre: <em>Action</em>"
    Regex::new(&format!(
        r"(?i)\b{label}\s*(?:</(?:strong|b|em|span)>\s*)?:\s*(?:</?(?:strong|b|em|i|span|a)\b[^>]*>\s*)*([^<\r\n]+)"
    ))
    .unwrap()
}

/// How candidate link labels are matched to candidate link URLs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PairingStrategy {
    /// The Nth URL takes the Nth quality heading.
    #[default]
    Positional,
    /// Each URL takes the nearest quality heading before it in the document.
    Interleaved,
}

/// Builds a `MovieDetails` record from one detail page.
///
/// Every field is extracted independently; a miss leaves that field empty
/// and never affects the others.
pub struct DetailExtractor {
    intermediate_re: Regex,
    screenshot_hosts: Vec<String>,
    pairing: PairingStrategy,
}

impl DetailExtractor {
    pub fn new(domains: &DomainSettings, pairing: PairingStrategy) -> Result<Self> {
        let pattern = regex::escape(&domains.intermediate_pattern());
        let intermediate_re = Regex::new(&format!(
            r#"(?i)href\s*=\s*["'](https?://[^"'\s]*{pattern}[^"'\s]*)["']"#
        ))?;

        Ok(Self {
            intermediate_re,
            screenshot_hosts: domains
                .screenshot_hosts
                .iter()
                .map(|h| h.trim().to_lowercase())
                .filter(|h| !h.is_empty())
                .collect(),
            pairing,
        })
    }

    pub fn extract(&self, html: &str, source_url: &str) -> MovieDetails {
        let details = MovieDetails {
            title: extract_title(html).unwrap_or_default(),
            poster_image: extract_poster(html),
            screenshots: self.extract_screenshots(html),
            genre: labeled_value(&GENRE_RE, html),
            language: labeled_value(&LANGUAGE_RE, html),
            quality: labeled_value(&QUALITY_RE, html),
            imdb_rating: labeled_value(&RATING_RE, html),
            director: labeled_value(&DIRECTOR_RE, html),
            storyline: extract_synopsis(html),
            download_links: self.extract_download_links(html),
            source_url: source_url.to_string(),
        };

        info!(
            "[DETAIL] title={:?} screenshots={} candidates={}",
            details.title,
            details.screenshots.len(),
            details.download_links.len()
        );
        details
    }

    pub fn extract_screenshots(&self, html: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        IMG_TAG_RE
            .find_iter(html)
            .filter_map(|tag| image_source(tag.as_str()))
            .filter(|src| self.is_screenshot_host(src))
            .filter(|src| seen.insert(src.clone()))
            .collect()
    }

    fn is_screenshot_host(&self, src: &str) -> bool {
        let Ok(parsed) = url::Url::parse(src) else {
            return false;
        };
        let Some(host) = parsed.host_str() else {
            return false;
        };
        let host = host.to_lowercase();
        self.screenshot_hosts
            .iter()
            .any(|known| host == *known || host.ends_with(&format!(".{}", known)))
    }

    /// Candidate URLs on the intermediate host, first occurrence wins.
    pub fn extract_candidate_urls(&self, html: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        self.intermediate_re
            .captures_iter(html)
            .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
            .filter(|url| seen.insert(url.clone()))
            .collect()
    }

    pub fn extract_download_links(&self, html: &str) -> Vec<DownloadLink> {
        let links = match self.pairing {
            PairingStrategy::Positional => {
                pair_by_position(extract_link_labels(html), self.extract_candidate_urls(html))
            }
            PairingStrategy::Interleaved => self.pair_in_document_order(html),
        };
        debug!("[DETAIL] {:?} pairing produced {} links", self.pairing, links.len());
        links
    }

    fn pair_in_document_order(&self, html: &str) -> Vec<DownloadLink> {
        enum Marker {
            Label(String),
            Url(String),
        }

        let mut markers: Vec<(usize, Marker)> = HEADING_RE
            .captures_iter(html)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let label = quality_label(caps.get(1)?.as_str())?;
                Some((whole.start(), Marker::Label(label)))
            })
            .collect();
        markers.extend(self.intermediate_re.captures_iter(html).filter_map(|caps| {
            let url = caps.get(1)?;
            Some((url.start(), Marker::Url(url.as_str().to_string())))
        }));
        markers.sort_by_key(|(pos, _)| *pos);

        let mut seen = HashSet::new();
        let mut current: Option<String> = None;
        let mut links = Vec::new();
        for (_, marker) in markers {
            match marker {
                Marker::Label(label) => current = Some(label),
                Marker::Url(url) => {
                    if !seen.insert(url.clone()) {
                        continue;
                    }
                    let label = current
                        .clone()
                        .unwrap_or_else(|| DownloadLink::default_label(links.len()));
                    links.push(DownloadLink::new(label, url));
                }
            }
        }
        links
    }
}

pub fn extract_title(html: &str) -> Option<String> {
    TITLE_CLASS_RE
        .captures(html)
        .and_then(|caps| caps.get(1))
        .and_then(|m| non_empty(m.as_str()))
        .or_else(|| {
            H1_RE
                .captures(html)
                .and_then(|caps| caps.get(1))
                .and_then(|m| non_empty(m.as_str()))
        })
}

/// First image whose class list carries `aligncenter`.
pub fn extract_poster(html: &str) -> Option<String> {
    IMG_TAG_RE
        .find_iter(html)
        .map(|tag| tag.as_str())
        .find(|tag| {
            CLASS_ATTR_RE
                .captures(tag)
                .and_then(|caps| caps.get(1))
                .map(|class| {
                    class
                        .as_str()
                        .split_whitespace()
                        .any(|token| token.eq_ignore_ascii_case("aligncenter"))
                })
                .unwrap_or(false)
        })
        .and_then(image_source)
}

/// `src`, unless it is missing or an inline `data:` placeholder for a
/// lazy-loaded `data-src`.
fn image_source(tag: &str) -> Option<String> {
    let attr = |re: &Regex| {
        re.captures(tag)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|src| !src.is_empty())
    };
    match attr(&SRC_ATTR_RE) {
        Some(src) if !src.to_ascii_lowercase().starts_with("data:") => Some(src),
        placeholder => attr(&DATA_SRC_ATTR_RE).or(placeholder),
    }
}

fn labeled_value(re: &Regex, html: &str) -> Option<String> {
    re.captures_iter(html)
        .filter_map(|caps| caps.get(1))
        .find_map(|m| non_empty(m.as_str()))
}

/// Storyline label, then a labelled plot paragraph, then the first long
/// paragraph of the post body.
pub fn extract_synopsis(html: &str) -> Option<String> {
    if let Some(text) = labeled_value(&STORYLINE_RE, html) {
        debug!("[DETAIL] synopsis from storyline label");
        return Some(text);
    }
    if let Some(text) = labeled_value(&LABELED_PARAGRAPH_RE, html) {
        debug!("[DETAIL] synopsis from labelled paragraph");
        return Some(text);
    }

    let start = CONTENT_BLOCK_RE.find(html)?.start();
    PARAGRAPH_RE
        .captures_iter(&html[start..])
        .filter_map(|caps| caps.get(1))
        .map(|m| clean_text(m.as_str()))
        .find(|text| text.chars().count() >= MIN_SYNOPSIS_CHARS)
}

/// Text of every quality heading, in document order.
pub fn extract_link_labels(html: &str) -> Vec<String> {
    HEADING_RE
        .captures_iter(html)
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| quality_label(m.as_str()))
        .collect()
}

fn quality_label(inner_html: &str) -> Option<String> {
    let text = clean_text(inner_html);
    if text.is_empty() || !RESOLUTION_RE.is_match(&text) || SECTION_TITLE_RE.is_match(&text) {
        return None;
    }
    Some(text)
}

/// The Nth URL takes the Nth label; URLs past the last label get a default.
pub fn pair_by_position(labels: Vec<String>, urls: Vec<String>) -> Vec<DownloadLink> {
    let mut labels = labels.into_iter();
    urls.into_iter()
        .enumerate()
        .map(|(index, url)| {
            let label = labels
                .next()
                .unwrap_or_else(|| DownloadLink::default_label(index));
            DownloadLink::new(label, url)
        })
        .collect()
}
