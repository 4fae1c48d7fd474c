//! Date-ordered, path-deduplicated entry storage.
//!
//! Entries are kept newest first by comparing their date strings. Only the
//! two fixed-width formats `YYYY-MM-DD HH:MM:SS` and `YYYY-MM-DD` sort
//! correctly that way; other representations end up in arbitrary places.

use super::locate::{Content, FragmentKind};
use crate::dom::{NodePath, TreeNode};
use parking_lot::{Mutex, MutexGuard};
use std::borrow::Cow;
use std::ops::Deref;

/// One feed item.
#[derive(Debug)]
pub struct Entry<N> {
    date: String,
    path: String,
    fragment: N,
    heading: NodePath,
    kind: FragmentKind,
}

impl<N> Entry<N> {
    /// Publication date as found in the document.
    pub fn date(&self) -> &str {
        &self.date
    }

    /// Location within the site, index documents folded to their directory.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn fragment(&self) -> &N {
        &self.fragment
    }

    pub fn kind(&self) -> &FragmentKind {
        &self.kind
    }
}

impl<N: TreeNode> Entry<N> {
    /// Plain text of the heading.
    pub fn title(&self) -> String {
        self.heading
            .resolve(&self.fragment)
            .map(TreeNode::text)
            .unwrap_or_default()
    }
}

/// Concurrent sorted entry collection.
///
/// Insertion takes a single lock for the position search and splice only;
/// content extraction happens before the call.
#[derive(Debug)]
pub struct EntryStore<N> {
    entries: Mutex<Vec<Entry<N>>>,
}

impl<N> Default for EntryStore<N> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }
}

impl<N> EntryStore<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, keeping dates in descending order.
    ///
    /// Returns `false` without touching the store if an entry with the same
    /// path already sits at the insertion point or among the entries sharing
    /// its date. Equal dates keep their arrival order.
    pub fn insert(&self, date: impl Into<String>, path: &str, content: Content<N>) -> bool {
        let date = date.into();
        let path = normalize_path(path).into_owned();

        let mut entries = self.entries.lock();
        let at = entries.partition_point(|e| e.date >= date);
        let same_date = entries[..at].partition_point(|e| e.date > date);

        let duplicate = entries[same_date..at]
            .iter()
            .chain(entries.get(at))
            .any(|e| e.path == path);
        if duplicate {
            return false;
        }

        entries.insert(
            at,
            Entry {
                date,
                path,
                fragment: content.fragment,
                heading: content.heading,
                kind: content.kind,
            },
        );
        true
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Read access to the entries, newest first.
    ///
    /// Holds the store lock until dropped; insertions block meanwhile.
    pub fn read(&self) -> Entries<'_, N> {
        Entries(self.entries.lock())
    }
}

/// Read-only view of an [`EntryStore`].
pub struct Entries<'a, N>(MutexGuard<'a, Vec<Entry<N>>>);

impl<N> Deref for Entries<'_, N> {
    type Target = [Entry<N>];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Fold `.../index.html` to its directory with a trailing slash.
///
/// `index.html` at the site root becomes `/`.
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    match path.rsplit_once('/') {
        Some((dir, "index.html")) => Cow::Owned(format!("{dir}/")),
        None if path == "index.html" => Cow::Borrowed("/"),
        _ => Cow::Borrowed(path),
    }
}
