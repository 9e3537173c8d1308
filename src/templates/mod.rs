//! Built-in site templates using the Tera template engine
//!
//! Templates are embedded in the binary. Autoescaping is off: every value is
//! escaped while the context structs below are built, and page bodies are
//! sanitized before they get here.

use anyhow::Result;
use serde::Serialize;
use tera::{Context, Tera};

use crate::config::{MenuItem, SiteConfig};
use crate::content::{page_metadata, site_metadata, ContentItem, PageMetadata};
use crate::helpers::{html_escape, meta_tags};
use crate::sanitize::{plain_text, Sanitizer};

/// Template renderer with the embedded site theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Values are escaped when the context is built; Tera would also mangle `/` in URLs
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("index.html", include_str!("site/index.html")),
            ("page.html", include_str!("site/page.html")),
            ("error.html", include_str!("site/error.html")),
            // Partials
            (
                "partials/head.html",
                include_str!("site/partials/head.html"),
            ),
            (
                "partials/header.html",
                include_str!("site/partials/header.html"),
            ),
        ])?;

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }

    /// Page listing at the site root
    pub fn render_index(&self, config: &SiteConfig, pages: &[ContentItem]) -> Result<String> {
        let mut context = base_context(config, &site_metadata(config));
        let pages: Vec<PageLink> = pages.iter().map(PageLink::from).collect();
        context.insert("pages", &pages);
        self.render("index.html", &context)
    }

    /// A single page with its body sanitized by `sanitizer`
    pub fn render_page(
        &self,
        config: &SiteConfig,
        item: &ContentItem,
        sanitizer: &Sanitizer<'_>,
    ) -> Result<String> {
        let mut context = base_context(config, &page_metadata(item, config));
        context.insert("page", &PageData::new(item, sanitizer));
        self.render("page.html", &context)
    }

    /// Error page for the given HTTP status
    pub fn render_error(&self, config: &SiteConfig, status: u16, message: &str) -> Result<String> {
        let mut meta = site_metadata(config);
        meta.title = format!("{} | {}", status, config.title);

        let mut context = base_context(config, &meta);
        context.insert(
            "error",
            &ErrorData {
                status,
                message: html_escape(message),
            },
        );
        self.render("error.html", &context)
    }
}

fn base_context(config: &SiteConfig, meta: &PageMetadata) -> Context {
    let mut context = Context::new();
    context.insert(
        "config",
        &ConfigData {
            language: html_escape(&config.language),
        },
    );
    context.insert("header", &HeaderData::from(config));
    context.insert("head_meta", &meta_tags(meta));
    context
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct ConfigData {
    pub language: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HeaderData {
    pub title: String,
    pub logo: String,
    pub logo_alt: String,
    pub menu: Vec<MenuItem>,
    pub cta: MenuItem,
}

impl From<&SiteConfig> for HeaderData {
    fn from(config: &SiteConfig) -> Self {
        Self {
            title: html_escape(&config.title),
            logo: html_escape(&config.logo),
            logo_alt: html_escape(&config.logo_alt),
            menu: config.menu.iter().map(escape_menu_item).collect(),
            cta: escape_menu_item(&config.cta),
        }
    }
}

fn escape_menu_item(item: &MenuItem) -> MenuItem {
    MenuItem::new(&html_escape(&item.name), &html_escape(&item.path))
}

#[derive(Debug, Clone, Serialize)]
pub struct PageLink {
    pub title: String,
    pub path: String,
}

impl From<&ContentItem> for PageLink {
    fn from(item: &ContentItem) -> Self {
        Self {
            title: html_escape(&display_title(item)),
            path: html_escape(&item.path()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PageData {
    pub title: String,
    pub body: String,
    pub modified: Option<String>,
    pub modified_display: Option<String>,
}

impl PageData {
    pub fn new(item: &ContentItem, sanitizer: &Sanitizer<'_>) -> Self {
        Self {
            title: html_escape(&display_title(item)),
            body: sanitizer.clean(&item.body),
            modified: item
                .modified
                .map(|m| m.format("%Y-%m-%dT%H:%M:%S").to_string()),
            modified_display: item.modified.map(|m| m.format("%B %d, %Y").to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorData {
    pub status: u16,
    pub message: String,
}

/// Upstream titles carry entities; fall back to the slug when blank
fn display_title(item: &ContentItem) -> String {
    let title = plain_text(&item.title);
    if title.trim().is_empty() {
        item.slug.clone()
    } else {
        title
    }
}
