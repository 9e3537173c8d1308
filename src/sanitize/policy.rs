//! Allow-list policy for upstream markup

use indexmap::IndexMap;
use lazy_static::lazy_static;
use std::collections::{HashMap, HashSet};

use crate::config::SanitizeConfig;

/// Attributes removed from every element, whatever the policy allows
pub const STRIPPED_ATTRIBUTES: &[&str] = &["style", "class"];

/// Elements removed together with their content, whatever the policy allows
pub const DISCARDED_TAGS: &[&str] = &[
    "style", "script", "template", "iframe", "frame", "frameset", "object", "embed", "noscript",
    "noembed", "noframes", "textarea", "title", "xmp", "plaintext", "svg", "math", "select",
];

const ALLOWED_TAGS: &[&str] = &[
    "h1", "h2", "h3", "h4", "h5", "h6", "p", "ul", "ol", "li", "strong", "em", "a", "img",
    "blockquote", "br",
];

lazy_static! {
    /// Policy applied to page bodies
    pub static ref DEFAULT_POLICY: SanitizationPolicy = SanitizationPolicy::default();
}

/// What the sanitizer does with an element it encounters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementAction {
    /// Emit the element with filtered attributes
    Keep,
    /// Drop the tags but keep filtering the children
    Unwrap,
    /// Drop the element and everything inside it
    Discard,
}

/// Tags, attributes and forced attribute values permitted in sanitized output
#[derive(Debug, Clone)]
pub struct SanitizationPolicy {
    tags: HashSet<String>,
    attributes: HashMap<String, HashSet<String>>,
    forced: HashMap<String, IndexMap<String, String>>,
    url_attributes: HashSet<String>,
    url_schemes: HashSet<String>,
    unwrap_tags: HashSet<String>,
}

impl SanitizationPolicy {
    /// A policy that allows nothing
    pub fn new() -> Self {
        Self {
            tags: HashSet::new(),
            attributes: HashMap::new(),
            forced: HashMap::new(),
            url_attributes: HashSet::new(),
            url_schemes: HashSet::new(),
            unwrap_tags: HashSet::new(),
        }
    }

    /// Default policy with the overrides from site configuration
    pub fn from_config(config: &SanitizeConfig) -> Self {
        Self::default().unwrap_tags(config.unwrap_tags.iter().map(String::as_str))
    }

    pub fn allow_tags(mut self, tags: &[&str]) -> Self {
        self.tags.extend(tags.iter().map(|t| t.to_ascii_lowercase()));
        self
    }

    pub fn allow_attributes(mut self, tag: &str, attributes: &[&str]) -> Self {
        self.attributes
            .entry(tag.to_ascii_lowercase())
            .or_default()
            .extend(attributes.iter().map(|a| a.to_ascii_lowercase()));
        self
    }

    /// Set `name="value"` on every `tag`, replacing any value from the input
    pub fn force_attribute(mut self, tag: &str, name: &str, value: &str) -> Self {
        self.forced
            .entry(tag.to_ascii_lowercase())
            .or_default()
            .insert(name.to_ascii_lowercase(), value.to_string());
        self
    }

    pub fn url_attributes(mut self, attributes: &[&str]) -> Self {
        self.url_attributes
            .extend(attributes.iter().map(|a| a.to_ascii_lowercase()));
        self
    }

    pub fn url_schemes(mut self, schemes: &[&str]) -> Self {
        self.url_schemes
            .extend(schemes.iter().map(|s| s.to_ascii_lowercase()));
        self
    }

    /// Keep the children of these disallowed tags instead of discarding them.
    ///
    /// Tags that are already allowed or always discarded are ignored.
    pub fn unwrap_tags<'a, I>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        for tag in tags {
            let tag = tag.trim().to_ascii_lowercase();
            if tag.is_empty() || self.tags.contains(&tag) {
                continue;
            }
            if DISCARDED_TAGS.contains(&tag.as_str()) {
                tracing::warn!("Refusing to unwrap <{}>, its content is always discarded", tag);
                continue;
            }
            self.unwrap_tags.insert(tag);
        }
        self
    }

    /// Decide how an element named `tag` is treated
    pub fn action(&self, tag: &str) -> ElementAction {
        if DISCARDED_TAGS.contains(&tag) {
            ElementAction::Discard
        } else if self.tags.contains(tag) {
            ElementAction::Keep
        } else if self.unwrap_tags.contains(tag) {
            ElementAction::Unwrap
        } else {
            ElementAction::Discard
        }
    }

    pub fn allows_tag(&self, tag: &str) -> bool {
        self.action(tag) == ElementAction::Keep
    }

    pub fn allows_attribute(&self, tag: &str, attribute: &str) -> bool {
        if STRIPPED_ATTRIBUTES.contains(&attribute) {
            return false;
        }
        self.attributes
            .get(tag)
            .map(|allowed| allowed.contains(attribute))
            .unwrap_or(false)
    }

    /// Attributes set on every `tag`, in insertion order
    pub fn forced_attributes(&self, tag: &str) -> Option<&IndexMap<String, String>> {
        self.forced.get(tag)
    }

    pub fn is_url_attribute(&self, attribute: &str) -> bool {
        self.url_attributes.contains(attribute)
    }

    /// Relative URLs always pass; absolute ones need an allowed scheme.
    pub fn allows_url(&self, value: &str) -> bool {
        // Browsers skip whitespace and control characters while reading a scheme
        let cleaned: String = value
            .chars()
            .filter(|c| !c.is_ascii_whitespace() && !c.is_control())
            .collect();

        match cleaned.find([':', '/', '?', '#']) {
            Some(idx) if cleaned[idx..].starts_with(':') => self
                .url_schemes
                .contains(&cleaned[..idx].to_ascii_lowercase()),
            _ => true,
        }
    }

    /// Allowed tag names, sorted
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<_> = self.tags.iter().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }
}

impl Default for SanitizationPolicy {
    fn default() -> Self {
        Self::new()
            .allow_tags(ALLOWED_TAGS)
            .allow_attributes("a", &["href", "title"])
            .allow_attributes("img", &["src", "alt", "title", "width", "height"])
            .force_attribute("img", "loading", "lazy")
            .force_attribute("img", "decoding", "async")
            .force_attribute("a", "target", "_blank")
            .force_attribute("a", "rel", "noopener noreferrer")
            .url_attributes(&["href", "src"])
            .url_schemes(&["http", "https", "mailto", "tel"])
    }
}
