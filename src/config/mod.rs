//! Feed configuration from `docfeed.toml` and the command line.
//!
//! ```toml
//! [feed]
//! author = "Author Name"
//! title = "Site Name"
//! url = "https://example.com"
//! output = "public/index.atom.xml"   # "-" for stdout (default)
//! self_path = "index.atom.xml"       # default: output path
//! exclude = ["drafts"]
//! docroots = ["public"]              # default: ["."]
//! ```
//!
//! Every field can be overridden on the command line. Relative paths in the
//! file are resolved against the directory holding it; relative paths on the
//! command line against the current directory.

mod error;
mod util;

pub use error::{ConfigDiagnostics, ConfigError};

use util::{check_site_url, find_config_file};

use crate::{cli::Cli, log};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Config file looked up when `--config` is not given.
pub const DEFAULT_CONFIG: &str = "docfeed.toml";

/// Output target value meaning standard output.
const STDOUT: &str = "-";

// ============================================================================
// file schema
// ============================================================================

/// Root of `docfeed.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub feed: FeedSection,
}

/// `[feed]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FeedSection {
    pub author: Option<String>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub output: Option<String>,
    pub self_path: Option<String>,
    pub exclude: Vec<String>,
    pub docroots: Vec<PathBuf>,
}

impl ConfigFile {
    /// Load from file, warning about fields that are not understood.
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        log!("warning"; "unknown fields in {}, ignoring:", path.display());
        for field in fields {
            eprintln!("- {field}");
        }
    }
}

// ============================================================================
// resolved configuration
// ============================================================================

/// Where the rendered feed goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Stdout,
    File(PathBuf),
}

/// Effective settings for one run.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Config file the settings were read from, if any.
    pub config_path: Option<PathBuf>,
    pub author: String,
    pub title: String,
    pub url: String,
    pub output: Output,
    /// Feed path within the site for the `rel="self"` link.
    pub self_path: Option<String>,
    pub exclude: Vec<String>,
    pub docroots: Vec<PathBuf>,
}

impl FeedConfig {
    /// Load configuration for `cli`.
    ///
    /// An explicit `--config` must exist; otherwise `docfeed.toml` is searched
    /// upward from the current directory and may be absent.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let config_path = match &cli.config {
            Some(path) => {
                let path = cwd.join(path);
                if !path.is_file() {
                    return Err(ConfigError::NotFound(path).into());
                }
                Some(path)
            }
            None => find_config_file(Path::new(DEFAULT_CONFIG), &cwd),
        };

        let file = match &config_path {
            Some(path) => ConfigFile::from_path(path)
                .with_context(|| format!("failed to load {}", path.display()))?,
            None => ConfigFile::default(),
        };

        let mut config = Self::resolve(file.feed, config_path.as_deref(), cli);
        config.config_path = config_path;
        config.validate()?;
        Ok(config)
    }

    /// Merge the `[feed]` section with command-line overrides.
    ///
    /// `config_path` anchors the relative paths taken from the file.
    fn resolve(section: FeedSection, config_path: Option<&Path>, cli: &Cli) -> Self {
        let base = config_path.and_then(Path::parent).unwrap_or(Path::new(""));

        let output_raw = cli
            .output
            .clone()
            .map(|o| (o, Path::new("")))
            .or_else(|| section.output.map(|o| (o, base)));
        let output = match &output_raw {
            Some((raw, anchor)) if raw != STDOUT => Output::File(anchor.join(raw)),
            _ => Output::Stdout,
        };

        // Link to the feed as written, not as resolved on disk
        let self_path = cli.self_path.clone().or(section.self_path).or_else(|| {
            output_raw
                .filter(|(raw, _)| raw != STDOUT)
                .map(|(raw, _)| raw)
        });

        let docroots = if !cli.docroots.is_empty() {
            cli.docroots.clone()
        } else if !section.docroots.is_empty() {
            section.docroots.iter().map(|d| base.join(d)).collect()
        } else if config_path.is_some() {
            vec![base.to_path_buf()]
        } else {
            vec![PathBuf::from(".")]
        };

        let exclude = if cli.exclude.is_empty() {
            section.exclude
        } else {
            cli.exclude.clone()
        };

        Self {
            config_path: None,
            author: cli.author.clone().or(section.author).unwrap_or_default(),
            title: cli.title.clone().or(section.title).unwrap_or_default(),
            url: cli.url.clone().or(section.url).unwrap_or_default(),
            output,
            self_path,
            exclude,
            docroots,
        }
    }

    /// Validate settings, collecting all errors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();

        if self.title.trim().is_empty() {
            diag.error_with_hint(
                "feed.title",
                "feed title is required",
                "set `title` under [feed] or pass --title",
            );
        }

        if self.url.is_empty() {
            diag.error_with_hint(
                "feed.url",
                "site URL is required",
                "set `url` under [feed] or pass --url",
            );
        } else if let Err(message) = check_site_url(&self.url) {
            diag.error_with_hint("feed.url", message, "use scheme and host, e.g. https://example.com");
        }

        diag.into_result().map_err(ConfigError::Diagnostics)
    }
}

// ============================================================================
// tests
// ============================================================================
