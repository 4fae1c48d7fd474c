//! Document discovery.
//!
//! ```text
//! site/                   (docroot)
//! ├── index.html          -> "index.html"
//! ├── about.html          -> "about.html"
//! ├── drafts/             (excluded with -x drafts, never entered)
//! │   └── wip.html
//! └── blog/
//!     ├── index.html      -> "blog/index.html"
//!     └── hello.HTML      -> "blog/hello.HTML"
//! ```

use crate::feed::FeedError;
use jwalk::WalkDir;
use rustc_hash::FxHashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// An HTML file found under a docroot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Location on disk.
    pub file: PathBuf,
    /// Location relative to the docroot, `/`-separated.
    pub path: String,
}

/// Collect every `.html` file below `root`, skipping the `exclude`d
/// subdirectories (relative to `root`) entirely.
pub fn scan(root: &Path, exclude: &[String]) -> Result<Vec<Document>, FeedError> {
    let walk_error = |source: io::Error| FeedError::Walk {
        root: root.to_path_buf(),
        source,
    };

    if !fs::metadata(root).map_err(walk_error)?.is_dir() {
        return Err(walk_error(io::Error::new(
            io::ErrorKind::NotADirectory,
            "docroot is not a directory",
        )));
    }

    let pruned: FxHashSet<PathBuf> = exclude
        .iter()
        .map(|dir| dir.trim_matches('/'))
        .filter(|dir| !dir.is_empty())
        .map(|dir| root.join(dir))
        .collect();

    let walker = WalkDir::new(root)
        .sort(true)
        .skip_hidden(false)
        .process_read_dir(move |_, _, _, children| {
            children.retain(|child| {
                child
                    .as_ref()
                    .map_or(true, |entry| !(entry.file_type().is_dir() && pruned.contains(&entry.path())))
            });
        });

    let mut documents = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| walk_error(io::Error::other(e)))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let file = entry.path();
        if !is_html(&file) {
            continue;
        }
        let path = relative_path(root, &file);
        documents.push(Document { file, path });
    }

    Ok(documents)
}

fn is_html(file: &Path) -> bool {
    file.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("html"))
}

/// `file` relative to `root`, joined with `/` on every platform.
fn relative_path(root: &Path, file: &Path) -> String {
    let rel = file.strip_prefix(root).unwrap_or(file);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
