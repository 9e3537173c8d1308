//! List pages published upstream

use anyhow::Result;

use crate::content::ContentItem;
use crate::sanitize::plain_text;
use crate::Site;

/// Print one `slug  title` line per page
pub async fn run(site: &Site) -> Result<()> {
    let pages = site.fetcher()?.fetch_all().await?.into_inner();

    println!("Pages ({}):", pages.len());
    print!("{}", render(&pages));
    Ok(())
}

/// Format pages as aligned `slug  title` lines
pub fn render(pages: &[ContentItem]) -> String {
    let width = pages.iter().map(|p| p.slug.len()).max().unwrap_or(0);

    pages
        .iter()
        .map(|p| format!("  {:<width$}  {}\n", p.slug, plain_text(&p.title), width = width))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(slug: &str, title: &str) -> ContentItem {
        ContentItem {
            id: 0,
            slug: slug.to_string(),
            title: title.to_string(),
            body: String::new(),
            modified: None,
            seo: None,
        }
    }

    #[test]
    fn test_render() {
        let out = render(&[page("home", "Home"), page("about-us", "About &amp; Us")]);
        assert_eq!(out, "  home      Home\n  about-us  About & Us\n");
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render(&[]), "");
    }
}
