use campusify_site::sanitize::{sanitize, DEFAULT_POLICY};
use html5ever::tendril::TendrilSink;
use html5ever::{local_name, namespace_url, ns, ParseOpts, QualName};
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use proptest::prelude::*;

const TAGS: &[&str] = &[
    "p", "em", "strong", "b", "a", "img", "br", "ul", "li", "h2", "blockquote", "div", "span",
    "script", "style", "iframe", "table", "section",
];

const ATTRIBUTES: &[&str] = &[
    "href", "src", "alt", "title", "class", "style", "id", "onclick", "loading", "target",
];

const VALUES: &[&str] = &[
    "https://campusify.io/a",
    "/about-us",
    "/search?q=a&page=2",
    "#top",
    "mailto:hi@campusify.io",
    "javascript:alert(1)",
    "color:red",
    "x\" onmouseover=\"y",
    " style=\"color:red\"",
    " class=\"x\"",
    "<style>x</style>",
    "eager",
];

fn text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 &<>.=\"]{0,12}"
}

fn attributes() -> impl Strategy<Value = String> {
    prop::collection::vec(
        (prop::sample::select(ATTRIBUTES), prop::sample::select(VALUES)),
        0..3,
    )
    .prop_map(|attrs| {
        attrs
            .into_iter()
            .map(|(name, value)| {
                let value = value.replace('&', "&amp;").replace('"', "&quot;");
                format!(" {}=\"{}\"", name, value)
            })
            .collect()
    })
}

/// Nested markup from a mix of allowed and disallowed elements, some left
/// unclosed so formatting elements end up misnested across blocks
fn markup() -> impl Strategy<Value = String> {
    let leaf = text();
    leaf.prop_recursive(4, 48, 4, |inner| {
        (
            prop::sample::select(TAGS),
            attributes(),
            prop::collection::vec(inner, 0..4),
            any::<bool>(),
        )
            .prop_map(|(tag, attrs, children, closed)| match tag {
                "img" | "br" => format!("<{}{}>", tag, attrs),
                _ if closed => format!("<{tag}{attrs}>{}</{tag}>", children.concat()),
                _ => format!("<{tag}{attrs}>{}", children.concat()),
            })
    })
}

/// Sequences of open and close tags in arbitrary order
fn tag_soup() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            prop::sample::select(TAGS).prop_map(|t| format!("<{}>", t)),
            prop::sample::select(TAGS).prop_map(|t| format!("</{}>", t)),
            text(),
        ],
        0..16,
    )
    .prop_map(|parts| parts.concat())
}

fn inputs() -> impl Strategy<Value = String> {
    prop_oneof![markup(), tag_soup()]
}

fn parse(html: &str) -> Handle {
    html5ever::parse_fragment(
        RcDom::default(),
        ParseOpts::default(),
        QualName::new(None, ns!(html), local_name!("body")),
        vec![],
    )
    .one(html)
    .document
}

/// Every element in `html` as (name, [(attribute, value)])
fn elements(html: &str) -> Vec<(String, Vec<(String, String)>)> {
    let mut found = Vec::new();
    let mut stack = vec![parse(html)];

    while let Some(node) = stack.pop() {
        if let NodeData::Element { name, attrs, .. } = &node.data {
            if &*name.local != "html" {
                let attrs = attrs
                    .borrow()
                    .iter()
                    .map(|a| (a.name.local.to_string(), a.value.to_string()))
                    .collect();
                found.push((name.local.to_string(), attrs));
            }
        }
        stack.extend(node.children.borrow().iter().cloned());
    }

    found
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(4096))]

    #[test]
    fn sanitizing_twice_changes_nothing(raw in inputs()) {
        let once = sanitize(&raw);
        prop_assert_eq!(sanitize(&once), once);
    }

    #[test]
    fn output_never_spells_style_or_class(raw in inputs()) {
        let clean = sanitize(&raw);
        prop_assert!(!clean.contains("<style"), "{}", clean);
        prop_assert!(!clean.contains("<script"), "{}", clean);
        prop_assert!(!clean.contains(" style="), "{}", clean);
        prop_assert!(!clean.contains(" class="), "{}", clean);
    }

    #[test]
    fn output_tags_are_balanced(raw in inputs()) {
        let clean = sanitize(&raw);
        for tag in DEFAULT_POLICY.tags() {
            if tag == "img" || tag == "br" {
                continue;
            }
            let opened = clean.matches(&format!("<{}>", tag)).count()
                + clean.matches(&format!("<{} ", tag)).count();
            let closed = clean.matches(&format!("</{}>", tag)).count();
            prop_assert_eq!(opened, closed, "<{}> in {}", tag, clean);
        }
    }

    #[test]
    fn output_elements_are_allowed(raw in inputs()) {
        let clean = sanitize(&raw);
        for (name, attrs) in elements(&clean) {
            prop_assert!(DEFAULT_POLICY.allows_tag(&name), "unexpected <{}>", name);
            for (attr, _) in attrs {
                prop_assert!(attr != "style" && attr != "class");
                prop_assert!(
                    DEFAULT_POLICY.allows_attribute(&name, &attr)
                        || DEFAULT_POLICY
                            .forced_attributes(&name)
                            .map(|f| f.contains_key(&attr))
                            .unwrap_or(false),
                    "unexpected {} on <{}>",
                    attr,
                    name
                );
            }
        }
    }

    #[test]
    fn output_has_no_unsafe_urls(raw in inputs()) {
        let clean = sanitize(&raw);
        for (_, attrs) in elements(&clean) {
            for (attr, value) in attrs {
                if attr == "href" || attr == "src" {
                    prop_assert!(DEFAULT_POLICY.allows_url(&value), "{}={}", attr, value);
                    prop_assert!(!value.starts_with("javascript:"));
                }
            }
        }
    }

    #[test]
    fn images_and_links_carry_forced_attributes(raw in inputs()) {
        let clean = sanitize(&raw);
        for (name, attrs) in elements(&clean) {
            let value = |key: &str| {
                attrs
                    .iter()
                    .find(|(a, _)| a == key)
                    .map(|(_, v)| v.as_str())
            };
            match name.as_str() {
                "img" => {
                    prop_assert_eq!(value("loading"), Some("lazy"));
                    prop_assert_eq!(value("decoding"), Some("async"));
                }
                "a" => {
                    prop_assert_eq!(value("target"), Some("_blank"));
                    prop_assert_eq!(value("rel"), Some("noopener noreferrer"));
                }
                _ => {}
            }
        }
    }

    #[test]
    fn plain_text_passes_through(raw in "[a-zA-Z0-9 .,!?]{1,40}") {
        prop_assert_eq!(sanitize(&raw), raw);
    }
}

#[test]
fn documented_examples() {
    let cases = [
        (
            r#"<style>.x{color:red}</style><p class="x" style="color:red">Hello <script>alert(1)</script>world</p>"#,
            "<p>Hello world</p>",
        ),
        (
            r#"<img src="a.png" class="y">"#,
            r#"<img src="a.png" loading="lazy" decoding="async">"#,
        ),
        (
            r#"<a href="http://x.com">link</a>"#,
            r#"<a href="http://x.com" target="_blank" rel="noopener noreferrer">link</a>"#,
        ),
        ("", ""),
        ("plain text", "plain text"),
    ];

    for (raw, expected) in cases {
        assert_eq!(sanitize(raw), expected, "input: {}", raw);
    }
}

#[test]
fn misnested_formatting_is_repaired() {
    for raw in [
        "<strong><ul>&<p><ul></strong>after",
        "<b><ul>&<p><ul></b><p>tail</p>",
        "<b href=/a><ul>&<p><ul></b>",
        "<em><p>one</em>two</p><strong>three",
    ] {
        let once = sanitize(raw);
        assert_eq!(sanitize(&once), once, "input: {}", raw);
    }
    assert!(sanitize("<strong><ul>&<p><ul></strong>after").contains("after"));
}
