//! docfeed - build an Atom feed from the articles of a static site.

mod cli;
mod config;
mod dom;
mod feed;
mod ingest;
mod logger;
mod utils;

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use cli::Cli;
use config::{FeedConfig, Output};
use feed::{Feed, FragmentKind};
use logger::{Diagnostics, LogDiagnostics};
use std::{
    fs::{self, File},
    io::{self, BufWriter},
    path::Path,
};

fn main() {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    if let Err(e) = run(&cli) {
        log!("error"; "{:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = FeedConfig::load(cli)?;
    if let Some(path) = &config.config_path {
        debug!("config"; "using {}", path.display());
    }

    let mut feed = Feed::new(&config.author, &config.title, &config.url);
    if let Some(self_path) = &config.self_path {
        feed = feed.with_self_path(self_path);
    }

    let diag = LogDiagnostics;
    debug!("ingest"; "scanning {}", ingest::describe_roots(&config.docroots));
    let summary = ingest::ingest(&feed, &config.docroots, &config.exclude, &diag)?;
    debug!(
        "ingest";
        "{} documents, {} dated, {} entries",
        summary.scanned, summary.dated, summary.added
    );

    list_entries(&feed);
    write_feed(&feed, &config.output, &diag)
}

/// Print which fragment rule matched for every entry (verbose only).
fn list_entries(feed: &Feed) {
    if !logger::is_verbose() {
        return;
    }
    for entry in feed.entries().read().iter() {
        let fragment = match entry.kind() {
            FragmentKind::Article => "<article>".to_string(),
            FragmentKind::Marked(tag) => format!("<{tag} class=\"feed\">"),
        };
        log!("frag"; "{} {} {}", fragment, entry.path(), entry.date());
    }
}

fn write_feed(feed: &Feed, output: &Output, diag: &dyn Diagnostics) -> Result<()> {
    match output {
        Output::Stdout => {
            let mut writer = BufWriter::new(io::stdout().lock());
            feed.render(&mut writer, diag)?;
        }
        Output::File(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            write_file(feed, path, diag)?;
            debug!("atom"; "wrote {}", path.display());
        }
    }
    Ok(())
}

fn write_file(feed: &Feed, path: &Path, diag: &dyn Diagnostics) -> Result<()> {
    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    feed.render(&mut writer, diag)
        .with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::CollectDiagnostics;
    use tempfile::TempDir;

    const POST: &str = r#"<html><body><article>
<time class="feed" datetime="2024-12-03 22:28:00">3 Dec</time>
<h1>Hello</h1>
</article></body></html>"#;

    #[test]
    fn test_write_feed_creates_parent_dirs() {
        let site = TempDir::new().unwrap();
        fs::write(site.path().join("hello.html"), POST).unwrap();

        let feed: Feed = Feed::new("Author", "Site", "https://example.com").with_self_path("feeds/atom.xml");
        let diag = CollectDiagnostics::new();
        ingest::ingest(&feed, &[site.path().to_path_buf()], &[], &diag).unwrap();

        let out = TempDir::new().unwrap();
        let target = out.path().join("feeds/atom.xml");
        write_feed(&feed, &Output::File(target.clone()), &diag).unwrap();

        let xml = fs::read_to_string(&target).unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"));
        assert!(xml.contains(r#"<link href="https://example.com/feeds/atom.xml" rel="self"/>"#));
        assert!(xml.contains("<id>https://example.com/hello.html</id>"));
        assert!(xml.contains("<updated>2024-12-03T22:28:00Z</updated>"));
        assert!(xml.ends_with("</feed>\n"));
    }

    #[test]
    fn test_write_feed_reports_bad_url() {
        let feed: Feed = Feed::new("Author", "Site", "not a url");
        let out = TempDir::new().unwrap();
        let err = write_feed(
            &feed,
            &Output::File(out.path().join("atom.xml")),
            &CollectDiagnostics::new(),
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("not a url"));
    }

    #[test]
    fn test_feed_errors_print_on_one_line() {
        let site = TempDir::new().unwrap();
        fs::write(site.path().join("bad.html"), "<div><time class=\"feed\" datetime=\"2024-01-01\">x</time></div>").unwrap();
        let feed: Feed = Feed::new("Author", "Site", "https://example.com");
        let diag = CollectDiagnostics::new();

        let missing = site.path().join("missing");
        let errors: Vec<anyhow::Error> = vec![
            ingest::ingest(&feed, &[missing], &[], &diag).unwrap_err().into(),
            ingest::ingest(&feed, &[site.path().to_path_buf()], &[], &diag).unwrap_err().into(),
            write_feed(
                &Feed::new("Author", "Site", "not a url"),
                &Output::File(site.path().join("atom.xml")),
                &diag,
            )
            .unwrap_err(),
        ];

        for err in errors {
            let line = format!("{err:#}");
            assert!(!line.is_empty());
            assert!(!line.contains('\n'), "multi-line error: {line:?}");
        }
    }
}
