//! HTML serialization helpers for the sanitizer

/// Elements that never have an end tag
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

pub(crate) fn is_void(tag: &str) -> bool {
    VOID_TAGS.contains(&tag)
}

/// Escape text content.
///
/// `=` is written as a reference too, so no `name=` sequence survives in text.
pub(crate) fn push_text(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '=' => out.push_str("&#61;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
}

/// Write ` name="value"` with the value escaped for a double-quoted attribute
pub(crate) fn push_attribute(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '=' => out.push_str("&#61;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_text() {
        let mut out = String::new();
        push_text(&mut out, "a < b && c > \"d\" x=1");
        assert_eq!(out, "a &lt; b &amp;&amp; c &gt; \"d\" x&#61;1");
    }

    #[test]
    fn test_push_attribute() {
        let mut out = String::new();
        push_attribute(&mut out, "title", "say \"hi\" & <bye>");
        assert_eq!(out, r#" title="say &quot;hi&quot; &amp; &lt;bye&gt;""#);

        let mut out = String::new();
        push_attribute(&mut out, "href", "/search?q=a b");
        assert_eq!(out, r#" href="/search?q&#61;a b""#);
    }

    #[test]
    fn test_is_void() {
        assert!(is_void("img"));
        assert!(is_void("br"));
        assert!(!is_void("p"));
    }
}
