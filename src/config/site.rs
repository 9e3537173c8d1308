//! Site configuration (_config.yml)

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub language: String,

    // URL
    pub url: String,

    // Header
    pub logo: String,
    pub logo_alt: String,
    #[serde(default)]
    pub menu: Vec<MenuItem>,
    pub cta: MenuItem,

    // Directory
    pub public_dir: String,

    // Content API
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub revalidate: RevalidateConfig,

    // Markup
    #[serde(default)]
    pub sanitize: SanitizeConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Campusify".to_string(),
            description: "Campusify official website".to_string(),
            language: "en".to_string(),

            url: "https://campusify.io".to_string(),

            logo: "/static/campusify-icon.png".to_string(),
            logo_alt: "Campusify logo".to_string(),
            menu: ["Home", "Features", "About Us", "Resources", "Careers", "Contact"]
                .iter()
                .map(|name| MenuItem::new(name, "#"))
                .collect(),
            cta: MenuItem::new("Request Demo", "#"),

            public_dir: "public".to_string(),

            api: ApiConfig::default(),
            revalidate: RevalidateConfig::default(),
            sanitize: SanitizeConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        tracing::debug!("Loaded site config from {:?}", path.as_ref());
        Ok(config)
    }

    /// Reject values that would make fetching or caching meaningless
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            bail!("api.base_url must not be empty");
        }
        if self.api.timeout_secs == 0 {
            bail!("api.timeout_secs must be at least 1");
        }
        if self.revalidate.page_secs == 0 || self.revalidate.listing_secs == 0 {
            bail!("revalidate windows must be at least 1 second");
        }
        Ok(())
    }
}

/// Navigation entry shown in the header
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MenuItem {
    pub name: String,
    pub path: String,
}

impl MenuItem {
    pub fn new(name: &str, path: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
        }
    }
}

impl Default for MenuItem {
    fn default() -> Self {
        Self::new("", "#")
    }
}

/// Remote content API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base of the WordPress REST namespace, e.g. `https://host/wp-json/wp/v2`
    pub base_url: String,
    pub timeout_secs: u64,
    /// Sent as `per_page` on listing requests when set
    pub per_page: Option<u32>,
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://campusify.io/wp-json/wp/v2".to_string(),
            timeout_secs: 10,
            per_page: None,
            user_agent: format!("campusify-site/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Stale-while-revalidate windows, in seconds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RevalidateConfig {
    pub page_secs: u64,
    pub listing_secs: u64,
}

impl Default for RevalidateConfig {
    fn default() -> Self {
        Self {
            page_secs: 3600,
            listing_secs: 60,
        }
    }
}

/// Sanitizer overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SanitizeConfig {
    /// Disallowed tags whose children are kept instead of discarded
    pub unwrap_tags: Vec<String>,
}
