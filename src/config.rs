use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::extract::detail::PairingStrategy;
use crate::models::{self, DomainSettings, WordPressSettings};

pub const ENV_PREFIX: &str = "REELPRESS";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub site: SiteConfig,
    pub http: HttpConfig,
    pub resolver: ResolverConfig,
    pub content: ContentConfig,
    pub wordpress: Vec<WordPressSite>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Hosts scraped and matched by the extractors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub movies_drive_domain: String,
    pub hubcloud_domain: String,
    pub mdrive_pattern: String,
    pub screenshot_hosts: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub max_concurrent: usize,
    pub pairing: PairingStrategy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    pub max_screenshots: usize,
}

/// A named WordPress site to publish drafts to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordPressSite {
    pub name: String,
    pub site_url: String,
    pub username: String,
    pub app_password: String,
}

impl Config {
    /// Load the TOML file at `path` (if present) and overlay `REELPRESS_*`
    /// environment variables, e.g. `REELPRESS_SERVER__PORT=9000`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_string_lossy().to_string();
        let settings = config::Config::builder()
            .add_source(config::File::new(&path, config::FileFormat::Toml).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = settings.try_deserialize()?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn get_wordpress_site(&self, name: &str) -> Option<&WordPressSite> {
        self.wordpress.iter().find(|site| site.name == name)
    }
}

impl SiteConfig {
    pub fn domain_settings(&self) -> DomainSettings {
        DomainSettings {
            movies_drive_domain: self.movies_drive_domain.clone(),
            hubcloud_domain: self.hubcloud_domain.clone(),
            mdrive_pattern: self.mdrive_pattern.clone(),
            screenshot_hosts: self.screenshot_hosts.clone(),
        }
    }
}

impl WordPressSite {
    pub fn settings(&self) -> WordPressSettings {
        WordPressSettings {
            site_url: self.site_url.clone(),
            username: self.username.clone(),
            app_password: self.app_password.clone(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            movies_drive_domain: models::DEFAULT_MOVIES_DRIVE_DOMAIN.to_string(),
            hubcloud_domain: models::DEFAULT_HUBCLOUD_DOMAIN.to_string(),
            mdrive_pattern: models::DEFAULT_MDRIVE_PATTERN.to_string(),
            screenshot_hosts: models::default_screenshot_hosts(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            accept: "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8".to_string(),
            accept_language: "en-US,en;q=0.5".to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_concurrent: 8,
            pairing: PairingStrategy::Positional,
        }
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self { max_screenshots: 8 }
    }
}
