//! SEO metadata and route enumeration derived from fetched pages

use serde::Serialize;

use super::{ContentItem, OgImage};
use crate::config::SiteConfig;
use crate::helpers::full_url_for;
use crate::sanitize::plain_text;

/// Everything the document head needs to describe a page
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    pub canonical: String,
    pub open_graph: OpenGraph,
    pub twitter_card: Option<String>,
}

/// Open Graph block
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OpenGraph {
    pub title: String,
    pub description: String,
    pub url: String,
    pub site_name: String,
    pub images: Vec<OgImage>,
}

/// Metadata for the site root and any page without its own
pub fn site_metadata(config: &SiteConfig) -> PageMetadata {
    let canonical = full_url_for(config, "/");
    PageMetadata {
        title: config.title.clone(),
        description: config.description.clone(),
        canonical: canonical.clone(),
        open_graph: OpenGraph {
            title: config.title.clone(),
            description: config.description.clone(),
            url: canonical,
            site_name: config.title.clone(),
            images: Vec::new(),
        },
        twitter_card: None,
    }
}

/// Map a page's SEO block onto metadata, falling back to site defaults
pub fn page_metadata(item: &ContentItem, config: &SiteConfig) -> PageMetadata {
    let seo = item.seo.clone().unwrap_or_default();

    let page_title = Some(plain_text(&item.title))
        .filter(|t| !t.trim().is_empty());

    let title = non_empty(seo.title)
        .or_else(|| page_title.clone())
        .unwrap_or_else(|| config.title.clone());
    let description = non_empty(seo.og_description.clone())
        .or_else(|| non_empty(seo.description))
        .unwrap_or_else(|| config.description.clone());
    let canonical =
        non_empty(seo.canonical).unwrap_or_else(|| full_url_for(config, &item.path()));

    PageMetadata {
        open_graph: OpenGraph {
            title: non_empty(seo.og_title)
                .or(page_title)
                .unwrap_or_else(|| title.clone()),
            description: description.clone(),
            url: non_empty(seo.og_url).unwrap_or_else(|| canonical.clone()),
            site_name: non_empty(seo.og_site_name).unwrap_or_else(|| config.title.clone()),
            images: seo.og_image,
        },
        twitter_card: non_empty(seo.twitter_card),
        title,
        description,
        canonical,
    }
}

/// Site-relative paths for every page, in the given order
pub fn static_paths(items: &[ContentItem]) -> Vec<String> {
    items.iter().map(ContentItem::path).collect()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
