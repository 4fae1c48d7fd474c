//! Atom 1.0 rendering.
//!
//! # Feed Format
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <feed xmlns="http://www.w3.org/2005/Atom">
//!   <author><name>Author Name</name></author>
//!   <id>http://example.com/</id>
//!   <link href="http://example.com/" rel="alternate"/>
//!   <link href="http://example.com/index.atom.xml" rel="self"/>
//!   <title>Site Name</title>
//!   <updated>2024-12-03T22:28:00Z</updated>
//!   <entry>
//!     <id>http://example.com/post.html</id>
//!     <link href="http://example.com/post.html" rel="alternate"/>
//!     <title>Post Title</title>
//!     <updated>2024-12-03T22:28:00Z</updated>
//!     <content type="html">&lt;article&gt;...&lt;/article&gt;</content>
//!   </entry>
//! </feed>
//! ```

use super::{ATOM_NS, Entry, FEED_LENGTH, Feed, FeedError};
use crate::dom::TreeNode;
use crate::logger::Diagnostics;
use crate::utils::date::DateTimeUtc;
use quick_xml::escape::escape;
use std::borrow::Cow;
use std::io::Write;
use url::Url;

/// Write `feed` as an Atom document.
///
/// Only the first [`FEED_LENGTH`] entries are visited.
pub fn render<N, W>(feed: &Feed<N>, writer: &mut W, diag: &dyn Diagnostics) -> Result<(), FeedError>
where
    N: TreeNode,
    W: Write,
{
    let mut url = Url::parse(feed.url()).map_err(|source| FeedError::Url {
        url: feed.url().to_string(),
        source,
    })?;
    let updated = feed.render_time().unwrap_or_else(DateTimeUtc::now);

    let mut xml = String::with_capacity(4096);
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<feed xmlns=\"");
    xml.push_str(ATOM_NS);
    xml.push_str("\">\n");

    xml.push_str("  <author><name>");
    xml.push_str(&escape(feed.author()));
    xml.push_str("</name></author>\n");

    // Stable across deployments regardless of the configured path
    url.set_path("/");
    push_element(&mut xml, 1, "id", url.as_str());
    push_link(&mut xml, 1, url.as_str(), "alternate");
    if let Some(self_path) = feed.self_path() {
        url.set_path(self_path);
        push_link(&mut xml, 1, url.as_str(), "self");
    }

    push_element(&mut xml, 1, "title", feed.title());
    push_element(&mut xml, 1, "updated", &updated.to_rfc3339());
    writer.write_all(xml.as_bytes())?;

    for entry in feed.entries().read().iter().take(FEED_LENGTH) {
        xml.clear();
        url.set_path(entry.path());
        push_entry(&mut xml, entry, url.as_str(), diag);
        writer.write_all(xml.as_bytes())?;
    }

    writer.write_all(b"</feed>\n")?;
    writer.flush()?;
    Ok(())
}

fn push_entry<N: TreeNode>(xml: &mut String, entry: &Entry<N>, href: &str, diag: &dyn Diagnostics) {
    xml.push_str("  <entry>\n");
    push_element(xml, 2, "id", href);
    push_link(xml, 2, href, "alternate");
    push_element(xml, 2, "title", &entry.title());
    push_element(xml, 2, "updated", &entry_updated(entry, diag));

    xml.push_str("    <content type=\"html\">");
    xml.push_str(&escape(&entry.fragment().markup()));
    xml.push_str("</content>\n");
    xml.push_str("  </entry>\n");
}

/// RFC 3339 form of the entry date, or the date as written if it does not
/// parse.
fn entry_updated<'a, N>(entry: &'a Entry<N>, diag: &dyn Diagnostics) -> Cow<'a, str> {
    match DateTimeUtc::parse(entry.date()) {
        Some(dt) => Cow::Owned(dt.to_rfc3339()),
        None => {
            diag.notice(
                "atom",
                &format!("error parsing date {:?} of {}", entry.date(), entry.path()),
            );
            Cow::Borrowed(entry.date())
        }
    }
}

/// `<name>text</name>` on its own line.
fn push_element(xml: &mut String, depth: usize, name: &str, text: &str) {
    indent(xml, depth);
    xml.push('<');
    xml.push_str(name);
    xml.push('>');
    xml.push_str(&escape(text));
    xml.push_str("</");
    xml.push_str(name);
    xml.push_str(">\n");
}

fn push_link(xml: &mut String, depth: usize, href: &str, rel: &str) {
    indent(xml, depth);
    xml.push_str("<link href=\"");
    xml.push_str(&escape(href));
    xml.push_str("\" rel=\"");
    xml.push_str(rel);
    xml.push_str("\"/>\n");
}

#[inline]
fn indent(xml: &mut String, depth: usize) {
    for _ in 0..depth {
        xml.push_str("  ");
    }
}
