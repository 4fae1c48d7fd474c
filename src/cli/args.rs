//! Command-line interface definitions.

use clap::{ColorChoice, Parser};
use std::path::PathBuf;

/// Build an Atom feed from the articles of a static site.
///
/// Every HTML document under the docroots that carries a
/// `<time class="feed" datetime="...">` element becomes a feed entry.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: docfeed.toml, searched upward)
    #[arg(short = 'C', long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Feed author name
    #[arg(short, long)]
    pub author: Option<String>,

    /// Feed title
    #[arg(short, long)]
    pub title: Option<String>,

    /// Site URL, scheme and host (e.g. https://example.com)
    #[arg(short, long, value_hint = clap::ValueHint::Url)]
    pub url: Option<String>,

    /// Write the feed to FILE instead of stdout (`-` for stdout)
    #[arg(short, long, value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    pub output: Option<String>,

    /// Path of the feed within the site, for the `rel="self"` link.
    ///
    /// Defaults to the output path when writing to a file.
    #[arg(short, long = "self-path", value_name = "PATH")]
    pub self_path: Option<String>,

    /// Skip a subdirectory of each docroot (repeatable)
    #[arg(short = 'x', long = "exclude", value_name = "DIR")]
    pub exclude: Vec<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Directories to scan for HTML documents (default: .)
    #[arg(value_name = "DOCROOT", value_hint = clap::ValueHint::DirPath)]
    pub docroots: Vec<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_short_flags() {
        let cli = Cli::parse_from([
            "docfeed", "-a", "Author Name", "-t", "Site Name", "-u", "http://example.com", "-o",
            "index.atom.xml", "-x", "drafts", "-x", "tmp", "-v", "public",
        ]);

        assert_eq!(cli.author.as_deref(), Some("Author Name"));
        assert_eq!(cli.title.as_deref(), Some("Site Name"));
        assert_eq!(cli.url.as_deref(), Some("http://example.com"));
        assert_eq!(cli.output.as_deref(), Some("index.atom.xml"));
        assert_eq!(cli.exclude, vec!["drafts", "tmp"]);
        assert!(cli.verbose);
        assert_eq!(cli.docroots, vec![PathBuf::from("public")]);
        assert!(cli.config.is_none());
        assert!(cli.self_path.is_none());
    }

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::parse_from(["docfeed"]);
        assert!(cli.docroots.is_empty());
        assert!(cli.exclude.is_empty());
        assert!(!cli.verbose);
        assert_eq!(cli.color, ColorChoice::Auto);
    }

    #[test]
    fn test_parse_long_flags() {
        let cli = Cli::parse_from([
            "docfeed", "--config", "site.toml", "--self-path", "feed.xml", "--color", "never",
            "--exclude", "private", "a", "b",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("site.toml")));
        assert_eq!(cli.self_path.as_deref(), Some("feed.xml"));
        assert_eq!(cli.color, ColorChoice::Never);
        assert_eq!(cli.docroots.len(), 2);
    }
}
