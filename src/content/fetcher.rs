//! Fetches pages from the WordPress REST API
//!
//! Every call issues exactly one GET. Results carry the revalidation window the
//! caller's cache should apply; failures are reported as-is without retrying.

use anyhow::Result;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::page::WpPage;
use super::ContentItem;
use crate::config::{ApiConfig, RevalidateConfig};

/// Failure to obtain content from upstream
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("no page with slug `{0}`")]
    NotFound(String),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl FetchError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// The content API could not be reached or answered with garbage
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("malformed response from {url}: {source}")]
    Malformed {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// How long a fetched value may be served before it should be refreshed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheDirective {
    pub revalidate: Duration,
}

impl CacheDirective {
    pub fn new(revalidate: Duration) -> Self {
        Self { revalidate }
    }

    /// `Cache-Control` value for shared caches
    pub fn header_value(&self) -> String {
        format!(
            "public, s-maxage={}, stale-while-revalidate",
            self.revalidate.as_secs()
        )
    }
}

/// A fetched value and the directive that comes with it
#[derive(Debug, Clone)]
pub struct Fetched<T> {
    pub value: T,
    pub directive: CacheDirective,
}

impl<T> Fetched<T> {
    pub fn into_inner(self) -> T {
        self.value
    }
}

/// Client for the `/pages` endpoint
#[derive(Debug, Clone)]
pub struct ContentFetcher {
    client: Client,
    pages_url: String,
    per_page: Option<u32>,
    page_window: Duration,
    listing_window: Duration,
}

impl ContentFetcher {
    /// Create a fetcher for the given API settings
    pub fn new(api: &ApiConfig, revalidate: &RevalidateConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(api.timeout())
            .user_agent(api.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self {
            client,
            pages_url: format!("{}/pages", api.base_url.trim_end_matches('/')),
            per_page: api.per_page,
            page_window: Duration::from_secs(revalidate.page_secs),
            listing_window: Duration::from_secs(revalidate.listing_secs),
        })
    }

    /// Look up a single page by slug
    pub async fn fetch_by_slug(&self, slug: &str) -> Result<Fetched<ContentItem>, FetchError> {
        // The API ignores an empty `slug` filter and answers with every page
        if slug.trim().is_empty() {
            return Err(FetchError::NotFound(slug.to_string()));
        }

        let pages = self.get_pages(&[("slug", slug.to_string())]).await?;

        let page = pages
            .into_iter()
            .next()
            .ok_or_else(|| FetchError::NotFound(slug.to_string()))?;

        info!("Fetched page `{}` ({} bytes)", page.slug, page.content.rendered.len());

        Ok(Fetched {
            value: page.into(),
            directive: CacheDirective::new(self.page_window),
        })
    }

    /// List every page, in upstream order
    pub async fn fetch_all(&self) -> Result<Fetched<Vec<ContentItem>>, FetchError> {
        let query: Vec<(&str, String)> = self
            .per_page
            .map(|n| vec![("per_page", n.to_string())])
            .unwrap_or_default();

        let pages = self.get_pages(&query).await?;
        info!("Fetched {} pages", pages.len());

        Ok(Fetched {
            value: pages.into_iter().map(ContentItem::from).collect(),
            directive: CacheDirective::new(self.listing_window),
        })
    }

    async fn get_pages(&self, query: &[(&str, String)]) -> Result<Vec<WpPage>, UpstreamError> {
        let url = &self.pages_url;
        debug!("GET {} {:?}", url, query);

        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|source| {
                warn!("Request to {} failed: {}", url, source);
                UpstreamError::Request {
                    url: url.clone(),
                    source,
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Content API answered {} for {}", status, url);
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                url: url.clone(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| UpstreamError::Request {
                url: url.clone(),
                source,
            })?;

        serde_json::from_str(&body).map_err(|source| {
            warn!("Content API returned malformed JSON: {}", source);
            UpstreamError::Malformed {
                url: url.clone(),
                source,
            }
        })
    }

    /// Endpoint this fetcher talks to
    pub fn pages_url(&self) -> &str {
        &self.pages_url
    }
}
