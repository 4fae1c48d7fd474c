//! HTML helpers for the document tree.
//!
//! - `escape_attr()` - quoting of attribute values
//! - `unescape()` - character references back to characters
//! - `is_void_element()` - elements without end tag (br, img, etc.)
//! - `is_raw_text_element()` - elements whose content is not text (script, style)
//! - `parse_start_tag()` - attributes of a start tag in source order

use std::borrow::Cow;

/// Escape an attribute value for a double-quoted context.
///
/// Values are kept as written in the source, so existing character
/// references are left alone and only the delimiters are encoded.
#[inline]
pub fn escape_attr(s: &str) -> Cow<'_, str> {
    if !s.contains(['"', '<', '>']) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '"' => result.push_str("&quot;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    Cow::Owned(result)
}

/// Unescape HTML entities back to characters.
///
/// Handles common named entities and numeric character references.
pub fn unescape(s: &str) -> Cow<'_, str> {
    if !s.contains('&') {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(amp) = rest.find('&') {
        result.push_str(&rest[..amp]);
        rest = &rest[amp..];

        // Entities are short; anything longer is literal text
        let Some(semi) = rest[1..].find(';').filter(|&i| i > 0 && i <= 10) else {
            result.push('&');
            rest = &rest[1..];
            continue;
        };
        let entity = &rest[1..=semi];

        match decode_entity(entity) {
            Some(c) => result.push(c),
            None => result.push_str(&rest[..=semi + 1]),
        }
        rest = &rest[semi + 2..];
    }
    result.push_str(rest);

    Cow::Owned(result)
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{00A0}'),
        s if s.starts_with("#x") || s.starts_with("#X") => {
            u32::from_str_radix(&s[2..], 16).ok().and_then(char::from_u32)
        }
        s if s.starts_with('#') => s[1..].parse().ok().and_then(char::from_u32),
        _ => None,
    }
}

/// Check if an HTML tag is a void element (self-closing).
///
/// Void elements cannot have children and are rendered as `<tag/>`.
#[inline]
pub fn is_void_element(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "source"
            | "track"
            | "wbr"
    )
}

/// Check if tag is a raw text element (content is code, not text).
#[inline]
pub fn is_raw_text_element(tag: &str) -> bool {
    matches!(tag, "script" | "style")
}

/// Parse the attributes of the start tag at the beginning of `raw`.
///
/// `raw` may continue past the start tag (children, end tag); parsing stops
/// at the first `>` outside a quoted value. Values are kept as written,
/// `None` for bare attributes. A repeated name keeps its first occurrence.
///
/// # Example
/// ```ignore
/// parse_start_tag(r#"<img src="a.png" alt='A' hidden>"#)
/// // [("src", Some("a.png")), ("alt", Some("A")), ("hidden", None)]
/// ```
pub fn parse_start_tag(raw: &str) -> Vec<(String, Option<String>)> {
    let mut attrs: Vec<(String, Option<String>)> = Vec::new();
    let mut chars = raw.strip_prefix('<').unwrap_or(raw).chars().peekable();

    // Tag name
    while chars
        .peek()
        .is_some_and(|&c| !c.is_whitespace() && c != '>' && c != '/')
    {
        chars.next();
    }

    loop {
        while chars.peek().is_some_and(|&c| c.is_whitespace() || c == '/') {
            chars.next();
        }
        if matches!(chars.peek(), None | Some(&'>')) {
            break;
        }

        // Read attribute name
        let mut name = String::new();
        while let Some(&c) = chars.peek() {
            if c == '=' || c == '>' || c == '/' || c.is_whitespace() {
                break;
            }
            name.push(c);
            chars.next();
        }

        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
        }

        let value = if chars.peek() == Some(&'=') {
            chars.next();
            while chars.peek().is_some_and(|c| c.is_whitespace()) {
                chars.next();
            }

            let mut val = String::new();
            match chars.peek().copied() {
                Some(quote @ ('"' | '\'')) => {
                    chars.next();
                    for c in chars.by_ref() {
                        if c == quote {
                            break;
                        }
                        val.push(c);
                    }
                }
                _ => {
                    // Unquoted value (read until whitespace or end of tag)
                    while let Some(&c) = chars.peek() {
                        if c.is_whitespace() || c == '>' {
                            break;
                        }
                        val.push(c);
                        chars.next();
                    }
                }
            }
            Some(val)
        } else {
            None
        };

        if !name.is_empty() && !attrs.iter().any(|(k, _)| k.eq_ignore_ascii_case(&name)) {
            attrs.push((name, value));
        }
    }

    attrs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(raw: &str) -> Vec<(String, Option<String>)> {
        parse_start_tag(raw)
    }

    fn pair(k: &str, v: Option<&str>) -> (String, Option<String>) {
        (k.to_string(), v.map(str::to_string))
    }

    #[test]
    fn test_parse_start_tag_source_order() {
        assert_eq!(
            attrs(r#"<img alt="A" id="x" src="a.png" class="wide" width="10" height="20" loading="lazy">"#),
            vec![
                pair("alt", Some("A")),
                pair("id", Some("x")),
                pair("src", Some("a.png")),
                pair("class", Some("wide")),
                pair("width", Some("10")),
                pair("height", Some("20")),
                pair("loading", Some("lazy")),
            ]
        );
    }

    #[test]
    fn test_parse_start_tag_value_forms() {
        assert_eq!(
            attrs("<input type=checkbox checked value='a \"b\"' data-x = \"1\"/>"),
            vec![
                pair("type", Some("checkbox")),
                pair("checked", None),
                pair("value", Some("a \"b\"")),
                pair("data-x", Some("1")),
            ]
        );
        assert_eq!(attrs(r#"<a title="">"#), vec![pair("title", Some(""))]);
    }

    #[test]
    fn test_parse_start_tag_stops_at_tag_end() {
        assert_eq!(
            attrs(r#"<p title="a > b">x <b class="no">y</b></p>"#),
            vec![pair("title", Some("a > b"))]
        );
        assert!(attrs("<br/>").is_empty());
        assert!(attrs("<div>text=\"no\"</div>").is_empty());
    }

    #[test]
    fn test_parse_start_tag_first_duplicate_wins() {
        assert_eq!(
            attrs(r#"<div class="a" CLASS="b">"#),
            vec![pair("class", Some("a"))]
        );
    }

    #[test]
    fn test_escape_attr() {
        assert_eq!(escape_attr("body"), "body");
        assert_eq!(escape_attr(r#"say "hi""#), "say &quot;hi&quot;");
        assert_eq!(escape_attr("a &amp; b"), "a &amp; b");
    }

    #[test]
    fn test_unescape_named() {
        assert_eq!(unescape("plain"), "plain");
        assert_eq!(unescape("Fish &amp; Chips"), "Fish & Chips");
        assert_eq!(unescape("&lt;h1&gt;"), "<h1>");
        assert_eq!(unescape("a&nbsp;b"), "a\u{00A0}b");
    }

    #[test]
    fn test_unescape_numeric() {
        assert_eq!(unescape("&#34;quoted&#34;"), "\"quoted\"");
        assert_eq!(unescape("&#x2014;"), "\u{2014}");
        assert_eq!(unescape("&#X41;"), "A");
    }

    #[test]
    fn test_unescape_leaves_unknown() {
        assert_eq!(unescape("AT&T"), "AT&T");
        assert_eq!(unescape("&bogus;"), "&bogus;");
        assert_eq!(unescape("&;"), "&;");
        assert_eq!(unescape("tail &"), "tail &");
        assert_eq!(unescape("&#xZZ; &amp;"), "&#xZZ; &");
    }

    #[test]
    fn test_element_classification() {
        assert!(is_void_element("br"));
        assert!(!is_void_element("div"));
        assert!(is_raw_text_element("script"));
        assert!(!is_raw_text_element("p"));
    }
}
