//! campusify-site: front end for a headless WordPress site
//!
//! Pages are fetched from the WordPress REST API by slug, their bodies are
//! sanitized against a fixed allow-list and the result is rendered with the
//! embedded site templates.

pub mod cache;
pub mod commands;
pub mod config;
pub mod content;
pub mod helpers;
pub mod sanitize;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};

pub use content::{ContentFetcher, ContentItem, FetchError};
pub use sanitize::sanitize;

/// The site application
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Static asset directory served under `/static`
    pub public_dir: PathBuf,
}

impl Site {
    /// Create a new site from a directory, reading `_config.yml` if present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let config_path = base_dir.as_ref().join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create a site from an already loaded configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let public_dir = base_dir.as_ref().join(&config.public_dir);

        Self { config, public_dir }
    }

    /// Point the site at another content API
    pub fn set_api_base(&mut self, base_url: &str) {
        self.config.api.base_url = base_url.to_string();
    }

    /// HTTP client for the configured content API
    pub fn fetcher(&self) -> Result<ContentFetcher> {
        ContentFetcher::new(&self.config.api, &self.config.revalidate)
    }

    /// Sanitization policy with configured overrides applied
    pub fn policy(&self) -> sanitize::SanitizationPolicy {
        sanitize::SanitizationPolicy::from_config(&self.config.sanitize)
    }

    /// Start the HTTP server
    pub async fn serve(&self, ip: &str, port: u16) -> Result<()> {
        server::start(self, ip, port).await
    }
}
