//! Atom feed aggregation.
//!
//! A [`Feed`] is built in two phases:
//!
//! 1. **Ingest**: any number of threads call [`Feed::add`] concurrently. Each
//!    call extracts the entry content from its document ([`locate`]) and then
//!    inserts it into the shared, date-ordered [`EntryStore`].
//! 2. **Render**: once every producer has finished, [`Feed::render`] writes
//!    the newest [`FEED_LENGTH`] entries as an Atom document ([`atom`]).
//!
//! Rendering while insertions may still happen is not supported; callers
//! join all producers first.

pub mod atom;
pub mod locate;
pub mod store;

pub use locate::{FragmentKind, locate};
pub use store::{Entry, EntryStore};

use crate::dom::{self, Node, TreeNode};
use crate::logger::Diagnostics;
use crate::utils::date::DateTimeUtc;
use std::io::{self, Write};
use std::path::PathBuf;
use thiserror::Error;

/// Maximum number of entries in a rendered feed.
pub const FEED_LENGTH: usize = 10;

/// Atom namespace of the root element.
pub const ATOM_NS: &str = "http://www.w3.org/2005/Atom";

/// Errors raised while building or rendering a feed.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("no <article> or element with class=\"feed\" in {0}")]
    NoContentFragment(String),

    #[error("no <h1> in {0}")]
    NoHeading(String),

    #[error("failed to read {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: dom::ParseError,
    },

    #[error("failed to scan {}", .root.display())]
    Walk {
        root: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid site URL `{url}`")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to write feed")]
    Write(#[from] io::Error),
}

/// Feed metadata plus the entries collected so far.
#[derive(Debug)]
pub struct Feed<N = Node> {
    author: String,
    title: String,
    url: String,
    self_path: Option<String>,
    render_time: Option<DateTimeUtc>,
    entries: EntryStore<N>,
}

impl<N> Feed<N> {
    /// Create an empty feed for the site at `url` (scheme and host).
    pub fn new(author: impl Into<String>, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            title: title.into(),
            url: url.into(),
            self_path: None,
            render_time: None,
            entries: EntryStore::new(),
        }
    }

    /// Path of the feed document itself within the site, for `rel="self"`.
    pub fn with_self_path(mut self, path: impl Into<String>) -> Self {
        self.self_path = Some(path.into());
        self
    }

    /// Fixed feed-level `updated` time; the render time is used otherwise.
    #[cfg(test)]
    pub fn with_render_time(mut self, time: DateTimeUtc) -> Self {
        self.render_time = Some(time);
        self
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn self_path(&self) -> Option<&str> {
        self.self_path.as_deref()
    }

    pub fn render_time(&self) -> Option<DateTimeUtc> {
        self.render_time
    }

    pub fn entries(&self) -> &EntryStore<N> {
        &self.entries
    }
}

impl<N: TreeNode + Default> Feed<N> {
    /// Extract the entry content of `document` and add it to the feed.
    ///
    /// Safe to call from many threads at once. Returns `Ok(false)` when an
    /// entry with the same date and path is already present.
    pub fn add(
        &self,
        date: impl Into<String>,
        path: &str,
        document: N,
        diag: &dyn Diagnostics,
    ) -> Result<bool, FeedError> {
        let content = locate(document, path, diag)?;
        Ok(self.entries.insert(date, path, content))
    }
}

impl<N: TreeNode> Feed<N> {
    /// Write the feed as an Atom document.
    pub fn render<W: Write>(&self, writer: &mut W, diag: &dyn Diagnostics) -> Result<(), FeedError> {
        atom::render(self, writer, diag)
    }
}
