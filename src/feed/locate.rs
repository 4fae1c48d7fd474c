//! Content fragment extraction.
//!
//! Picks the subtree of a document that becomes the entry content:
//!
//! 1. the first `<article>`, or else
//! 2. the first non-`<time>` element with `class="feed"`; a `<body>` found
//!    this way is renamed to `<div>` so feed content never carries a body.
//!
//! The fragment must contain an `<h1>`, which becomes the entry title.

use super::FeedError;
use crate::dom::{NodePath, Predicate, TreeNode, find_path, has_attr, is_tag, not};
use crate::logger::Diagnostics;

/// Which rule selected the fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentKind {
    Article,
    /// Element marked with `class="feed"`, by tag name after any rename.
    Marked(String),
}

/// An extracted fragment and the location of its heading.
#[derive(Debug)]
pub struct Content<N> {
    pub fragment: N,
    /// Path of the `<h1>` relative to `fragment`.
    pub heading: NodePath,
    pub kind: FragmentKind,
}

/// Extract the entry content of `document`.
///
/// `path` only names the document in errors and notices.
pub fn locate<N>(mut document: N, path: &str, diag: &dyn Diagnostics) -> Result<Content<N>, FeedError>
where
    N: TreeNode + Default,
{
    let (at, is_article) = match find_path(&document, &is_tag("article")) {
        Some(at) => (at, true),
        None => {
            diag.notice("locate", &format!("no <article> in {path}, using class=\"feed\""));
            let marked = not(is_tag("time")).and(has_attr("class", "feed"));
            let at = find_path(&document, &marked)
                .ok_or_else(|| FeedError::NoContentFragment(path.to_string()))?;
            (at, false)
        }
    };

    let node = at
        .resolve_mut(&mut document)
        .ok_or_else(|| FeedError::NoContentFragment(path.to_string()))?;
    if !is_article && node.tag() == Some("body") {
        node.rename("div");
    }
    let fragment = std::mem::take(node);

    let kind = if is_article {
        FragmentKind::Article
    } else {
        FragmentKind::Marked(fragment.tag().unwrap_or_default().to_string())
    };

    let heading = find_path(&fragment, &is_tag("h1"))
        .ok_or_else(|| FeedError::NoHeading(path.to_string()))?;

    Ok(Content {
        fragment,
        heading,
        kind,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Node, parse};
    use crate::logger::CollectDiagnostics;

    fn locate_str(html: &str, diag: &CollectDiagnostics) -> Result<Content<Node>, FeedError> {
        locate(parse(html).unwrap(), "doc.html", diag)
    }

    #[test]
    fn test_article_wins() {
        let diag = CollectDiagnostics::new();
        let content = locate_str(
            r#"<body class="feed"><header><h1>Site</h1></header>
<article class="body"><h1>Post</h1><p>text</p></article></body>"#,
            &diag,
        )
        .unwrap();

        assert_eq!(content.kind, FragmentKind::Article);
        assert_eq!(content.fragment.tag(), Some("article"));
        assert_eq!(
            content.heading.resolve(&content.fragment).map(TreeNode::text),
            Some("Post".to_string())
        );
        assert!(diag.is_empty());
    }

    #[test]
    fn test_marked_element_fallback() {
        let diag = CollectDiagnostics::new();
        let content = locate_str(
            r#"<body><time class="feed" datetime="2024-01-01"></time>
<section class="feed"><h1>Post</h1></section></body>"#,
            &diag,
        )
        .unwrap();

        assert_eq!(content.kind, FragmentKind::Marked("section".to_string()));
        assert_eq!(content.fragment.markup(), r#"<section class="feed"><h1>Post</h1></section>"#);
        assert_eq!(diag.notices().len(), 1);
        assert!(diag.notices()[0].1.contains("doc.html"));
    }

    #[test]
    fn test_marked_body_becomes_div() {
        let diag = CollectDiagnostics::new();
        let content = locate_str(
            r#"<html><body class="feed" lang="en"><h1>Post</h1><time class="feed" datetime="2024-01-01">x</time></body></html>"#,
            &diag,
        )
        .unwrap();

        assert_eq!(content.kind, FragmentKind::Marked("div".to_string()));
        assert_eq!(
            content.fragment.markup(),
            r#"<div class="feed" lang="en"><h1>Post</h1><time class="feed" datetime="2024-01-01">x</time></div>"#
        );
    }

    #[test]
    fn test_time_is_never_the_fragment() {
        let diag = CollectDiagnostics::new();
        let err = locate_str(r#"<p><time class="feed" datetime="2024-01-01">x</time></p>"#, &diag)
            .unwrap_err();
        assert!(matches!(err, FeedError::NoContentFragment(ref p) if p == "doc.html"));
    }

    #[test]
    fn test_missing_heading() {
        let diag = CollectDiagnostics::new();
        let err = locate_str("<h1>Outside</h1><article><p>no title</p></article>", &diag)
            .unwrap_err();
        assert!(matches!(err, FeedError::NoHeading(ref p) if p == "doc.html"));
    }

    #[test]
    fn test_heading_found_deep_in_fragment() {
        let diag = CollectDiagnostics::new();
        let content = locate_str(
            "<article><header><div><h1>Deep <em>title</em></h1></div></header></article>",
            &diag,
        )
        .unwrap();
        assert_eq!(content.heading.indices().len(), 3);
        assert_eq!(
            content.heading.resolve(&content.fragment).map(TreeNode::text),
            Some("Deep title".to_string())
        );
    }
}
