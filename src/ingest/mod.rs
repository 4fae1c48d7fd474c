//! Ingestion: discover documents under the docroots and feed them to a
//! [`Feed`] in parallel.
//!
//! Every document is an independent rayon task. A document takes part in
//! the feed only if it carries a `<time class="feed">` element; its
//! `datetime` attribute becomes the entry date. The first failing document
//! aborts the run.

mod scan;

pub use scan::{Document, scan};

use crate::dom::{self, Predicate, TreeNode, find, has_attr, is_tag};
use crate::feed::{Feed, FeedError};
use crate::logger::{Diagnostics, ProgressLine, is_verbose};
use rayon::prelude::*;
use std::fs;
use std::io::{IsTerminal, stderr};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

/// What an ingestion run did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IngestSummary {
    /// HTML files found under the docroots.
    pub scanned: usize,
    /// Documents carrying a feed date.
    pub dated: usize,
    /// Entries actually inserted (duplicates excluded).
    pub added: usize,
}

/// Ingest every HTML document below `roots` into `feed`.
///
/// Returns once all tasks have finished; the feed is then safe to render.
pub fn ingest(
    feed: &Feed,
    roots: &[PathBuf],
    exclude: &[String],
    diag: &dyn Diagnostics,
) -> Result<IngestSummary, FeedError> {
    let mut documents = Vec::new();
    for root in roots {
        documents.extend(scan(root, exclude)?);
    }

    let progress = (is_verbose() && stderr().is_terminal() && !documents.is_empty())
        .then(|| ProgressLine::new(&[("documents", documents.len())]));

    let dated = AtomicUsize::new(0);
    let added = AtomicUsize::new(0);

    documents.par_iter().try_for_each(|doc| {
        if let Some(inserted) = ingest_document(feed, doc, diag)? {
            dated.fetch_add(1, Ordering::Relaxed);
            if inserted {
                added.fetch_add(1, Ordering::Relaxed);
            }
        }
        if let Some(p) = &progress {
            p.inc("documents");
        }
        Ok::<(), FeedError>(())
    })?;

    if let Some(p) = progress {
        p.finish();
    }

    Ok(IngestSummary {
        scanned: documents.len(),
        dated: dated.into_inner(),
        added: added.into_inner(),
    })
}

/// Read, parse and add one document.
///
/// `Ok(None)` means the document has no feed date and was skipped.
fn ingest_document(feed: &Feed, doc: &Document, diag: &dyn Diagnostics) -> Result<Option<bool>, FeedError> {
    let bytes = fs::read(&doc.file).map_err(|source| FeedError::Read {
        path: doc.file.clone(),
        source,
    })?;
    // Invalid UTF-8 becomes U+FFFD instead of failing the run
    let source = String::from_utf8_lossy(&bytes);
    let document = dom::parse(&source).map_err(|source| FeedError::Parse {
        path: doc.file.clone(),
        source,
    })?;

    let Some(date) = feed_date(&document) else {
        return Ok(None);
    };

    feed.add(date, &doc.path, document, diag).map(Some)
}

/// `datetime` of the first `<time class="feed">`, empty if the attribute is
/// missing.
fn feed_date<N: TreeNode>(document: &N) -> Option<String> {
    let time = find(document, &is_tag("time").and(has_attr("class", "feed")))?;
    Some(time.attr("datetime").unwrap_or_default().to_string())
}

/// Display form of a docroot for log lines.
pub fn describe_roots(roots: &[PathBuf]) -> String {
    roots
        .iter()
        .map(|root| display_root(root))
        .collect::<Vec<_>>()
        .join(", ")
}

fn display_root(root: &Path) -> String {
    match root.to_str() {
        Some("") | Some(".") => "current directory".to_string(),
        _ => root.display().to_string(),
    }
}
