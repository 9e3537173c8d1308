//! Markup sanitization for upstream page bodies
//!
//! Bodies coming from the CMS are parsed as an HTML fragment, filtered against a
//! [`SanitizationPolicy`] and serialized back. Disallowed elements are dropped
//! together with their subtree unless the policy says to unwrap them.

mod policy;
mod serialize;

pub use policy::{
    ElementAction, SanitizationPolicy, DEFAULT_POLICY, DISCARDED_TAGS, STRIPPED_ATTRIBUTES,
};

use html5ever::tendril::TendrilSink;
use html5ever::{local_name, namespace_url, ns, Attribute, LocalName, ParseOpts, QualName};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use serialize::{is_void, push_attribute, push_text};

/// Sanitize `raw` with the default policy
pub fn sanitize(raw: &str) -> String {
    Sanitizer::new(&DEFAULT_POLICY).clean(raw)
}

/// Decoded text of an HTML fragment, without any markup.
///
/// Script and style contents are not text and are skipped.
pub fn plain_text(raw: &str) -> String {
    let root = match parse_fragment(raw) {
        Some(root) => root,
        None => return String::new(),
    };

    let mut text = String::with_capacity(raw.len());
    let mut stack = children_of(&root);

    while let Some(node) = stack.pop() {
        match &node.data {
            NodeData::Text { contents } => text.push_str(&contents.borrow()),
            NodeData::Element { name, .. } if DISCARDED_TAGS.contains(&&*name.local) => {}
            NodeData::Element { .. } => stack.extend(children_of(&node)),
            _ => {}
        }
    }

    text
}

/// Parse `raw` in a `<body>` context and return the synthetic `<html>` root
fn parse_fragment(raw: &str) -> Option<Handle> {
    if raw.is_empty() {
        return None;
    }

    let dom = html5ever::parse_fragment(
        RcDom::default(),
        ParseOpts::default(),
        QualName::new(None, ns!(html), local_name!("body")),
        vec![],
    )
    .one(raw);

    let root = dom.document.children.borrow().first().cloned();
    root
}

/// Children of `node` in reverse, ready to be popped in document order
fn children_of(node: &Handle) -> Vec<Handle> {
    node.children.borrow().iter().rev().cloned().collect()
}

enum Step {
    Visit(Handle),
    Close(LocalName),
}

/// Applies a policy to HTML fragments
#[derive(Debug, Clone, Copy)]
pub struct Sanitizer<'p> {
    policy: &'p SanitizationPolicy,
}

impl<'p> Sanitizer<'p> {
    pub fn new(policy: &'p SanitizationPolicy) -> Self {
        Self { policy }
    }

    /// Filter `raw` down to what the policy permits.
    ///
    /// Never fails: unparseable markup is repaired by the HTML parser and
    /// anything the policy does not recognise is dropped. Every emitted start
    /// tag gets its end tag, so the output is balanced.
    pub fn clean(&self, raw: &str) -> String {
        let root = match parse_fragment(raw) {
            Some(root) => root,
            None => return String::new(),
        };

        let mut out = String::with_capacity(raw.len());
        // Explicit stack: depth of the input never reaches the call stack
        let mut stack: Vec<Step> = children_of(&root).into_iter().map(Step::Visit).collect();

        while let Some(step) = stack.pop() {
            let node = match step {
                Step::Close(name) => {
                    out.push_str("</");
                    out.push_str(&name);
                    out.push('>');
                    continue;
                }
                Step::Visit(node) => node,
            };

            match &node.data {
                NodeData::Text { contents } => push_text(&mut out, &contents.borrow()),
                NodeData::Element { name, attrs, .. } => {
                    let tag = &name.local;
                    match self.policy.action(tag) {
                        ElementAction::Keep => {
                            self.push_start_tag(&mut out, tag, &attrs.borrow());
                            if !is_void(tag) {
                                stack.push(Step::Close(tag.clone()));
                                stack.extend(children_of(&node).into_iter().map(Step::Visit));
                            }
                        }
                        ElementAction::Unwrap => {
                            stack.extend(children_of(&node).into_iter().map(Step::Visit));
                        }
                        ElementAction::Discard => {
                            tracing::trace!("Discarding <{}>", tag);
                        }
                    }
                }
                // comments, doctypes, processing instructions
                _ => {}
            }
        }

        out
    }

    fn push_start_tag(&self, out: &mut String, name: &str, attrs: &[Attribute]) {
        let forced = self.policy.forced_attributes(name);

        out.push('<');
        out.push_str(name);

        for attr in attrs {
            let (attr, value) = (&*attr.name.local, &*attr.value);
            if !self.policy.allows_attribute(name, attr) {
                continue;
            }
            if forced.map(|f| f.contains_key(attr)).unwrap_or(false) {
                continue;
            }
            if self.policy.is_url_attribute(attr) && !self.policy.allows_url(value) {
                tracing::debug!("Dropping {}={:?} on <{}>", attr, value, name);
                continue;
            }
            push_attribute(out, attr, value);
        }

        if let Some(forced) = forced {
            for (attr, value) in forced {
                push_attribute(out, attr, value);
            }
        }

        out.push('>');
    }
}
