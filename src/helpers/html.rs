//! HTML helper functions for the document head

use crate::content::{OpenGraph, PageMetadata};

/// Render `<title>`, description, canonical, Open Graph and Twitter tags
pub fn meta_tags(meta: &PageMetadata) -> String {
    let mut tags = vec![
        format!("<title>{}</title>", html_escape(&meta.title)),
        format!(
            r#"<meta name="description" content="{}">"#,
            html_escape(&meta.description)
        ),
        format!(
            r#"<link rel="canonical" href="{}">"#,
            html_escape(&meta.canonical)
        ),
        open_graph(&meta.open_graph),
    ];

    if let Some(card) = &meta.twitter_card {
        tags.push(format!(
            r#"<meta name="twitter:card" content="{}">"#,
            html_escape(card)
        ));
    }

    tags.join("\n")
}

/// Generate Open Graph meta tags
pub fn open_graph(og: &OpenGraph) -> String {
    let mut tags = vec![
        r#"<meta property="og:type" content="website">"#.to_string(),
        format!(
            r#"<meta property="og:title" content="{}">"#,
            html_escape(&og.title)
        ),
        format!(
            r#"<meta property="og:url" content="{}">"#,
            html_escape(&og.url)
        ),
        format!(
            r#"<meta property="og:site_name" content="{}">"#,
            html_escape(&og.site_name)
        ),
    ];

    if !og.description.is_empty() {
        tags.push(format!(
            r#"<meta property="og:description" content="{}">"#,
            html_escape(&og.description)
        ));
    }

    for image in &og.images {
        tags.push(format!(
            r#"<meta property="og:image" content="{}">"#,
            html_escape(&image.url)
        ));
        if let Some(width) = image.width {
            tags.push(format!(
                r#"<meta property="og:image:width" content="{}">"#,
                width
            ));
        }
        if let Some(height) = image.height {
            tags.push(format!(
                r#"<meta property="og:image:height" content="{}">"#,
                height
            ));
        }
    }

    tags.join("\n")
}

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
