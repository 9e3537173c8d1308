//! Page models and the WordPress wire format they are read from

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A page as served by the content API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentItem {
    /// Upstream numeric id
    pub id: u64,

    /// URL-safe lookup key
    pub slug: String,

    /// Rendered title, may contain HTML entities
    pub title: String,

    /// Raw upstream HTML, not sanitized
    pub body: String,

    /// Last modification time (site-local, as reported upstream)
    pub modified: Option<NaiveDateTime>,

    /// SEO block, when the CMS exposes one
    pub seo: Option<SeoMeta>,
}

impl ContentItem {
    /// Site-relative path of the page
    pub fn path(&self) -> String {
        crate::helpers::page_path(&self.slug)
    }
}

/// SEO fields from the `yoast_head_json` block
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SeoMeta {
    pub title: Option<String>,
    pub description: Option<String>,
    pub canonical: Option<String>,
    pub og_title: Option<String>,
    pub og_description: Option<String>,
    pub og_url: Option<String>,
    pub og_site_name: Option<String>,
    pub og_image: Vec<OgImage>,
    pub twitter_card: Option<String>,
}

/// Social preview image
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OgImage {
    pub url: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

/// `{ "rendered": "..." }` wrapper used by the REST API
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct Rendered {
    #[serde(default)]
    pub rendered: String,
}

/// One element of the `/pages` response
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WpPage {
    #[serde(default)]
    pub id: u64,
    pub slug: String,
    #[serde(default)]
    pub title: Rendered,
    #[serde(default)]
    pub content: Rendered,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub modified: Option<NaiveDateTime>,
    #[serde(default)]
    pub yoast_head_json: Option<SeoMeta>,
}

impl From<WpPage> for ContentItem {
    fn from(page: WpPage) -> Self {
        Self {
            id: page.id,
            slug: page.slug,
            title: page.title.rendered,
            body: page.content.rendered,
            modified: page.modified,
            seo: page.yoast_head_json,
        }
    }
}

/// Unparseable timestamps become `None` instead of failing the whole page
fn lenient_datetime<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| NaiveDateTime::parse_from_str(&s, "%Y-%m-%dT%H:%M:%S").ok()))
}
