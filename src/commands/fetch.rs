//! Fetch a single page

use anyhow::Result;

use crate::content::{page_metadata, ContentItem, PageMetadata};
use crate::sanitize::Sanitizer;
use crate::Site;

/// What to print for a fetched page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    /// Body after sanitization
    Sanitized,
    /// Body exactly as upstream returned it
    Raw,
    /// Page and SEO metadata as JSON
    Meta,
}

/// Fetch the page with `slug` and print it
pub async fn run(site: &Site, slug: &str, output: Output) -> Result<()> {
    let fetcher = site.fetcher()?;
    let fetched = fetcher.fetch_by_slug(slug).await?;
    tracing::debug!("Cache-Control: {}", fetched.directive.header_value());

    println!("{}", render(site, &fetched.value, output)?);
    Ok(())
}

/// Format a fetched page for printing
pub fn render(site: &Site, item: &ContentItem, output: Output) -> Result<String> {
    match output {
        Output::Sanitized => {
            let policy = site.policy();
            Ok(Sanitizer::new(&policy).clean(&item.body))
        }
        Output::Raw => Ok(item.body.clone()),
        Output::Meta => {
            #[derive(serde::Serialize)]
            struct Report<'a> {
                page: &'a ContentItem,
                metadata: PageMetadata,
            }

            Ok(serde_json::to_string_pretty(&Report {
                page: item,
                metadata: page_metadata(item, &site.config),
            })?)
        }
    }
}
