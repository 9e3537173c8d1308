//! Content module - remote pages, their metadata and how they are fetched

pub mod fetcher;
mod metadata;
mod page;

pub use fetcher::{CacheDirective, ContentFetcher, FetchError, Fetched, UpstreamError};
pub use metadata::{page_metadata, site_metadata, static_paths, OpenGraph, PageMetadata};
pub use page::{ContentItem, OgImage, SeoMeta};
