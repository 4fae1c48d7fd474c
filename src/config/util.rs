//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find config file by searching upward from `start`
///
/// Walks up parent directories until finding `config_name`.
/// An absolute `config_name` is only checked as given.
///
/// # Example
/// ```text
/// /home/user/site/public/blog/   ← start
/// /home/user/site/docfeed.toml   ← found!
/// ```
pub fn find_config_file(config_name: &Path, start: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.is_file().then(|| config_name.to_path_buf());
    }

    start
        .ancestors()
        .map(|dir| dir.join(config_name))
        .find(|candidate| candidate.is_file())
}

/// Site URL must have a scheme and a host; anything else is reported as a
/// message for the diagnostics.
pub fn check_site_url(url: &str) -> Result<(), String> {
    let parsed = url::Url::parse(url).map_err(|e| format!("`{url}` is not a valid URL: {e}"))?;
    if !parsed.has_host() {
        return Err(format!("`{url}` has no host"));
    }
    Ok(())
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_file_upward() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("public/blog/2024");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("docfeed.toml"), "").unwrap();

        let found = find_config_file(Path::new("docfeed.toml"), &nested).unwrap();
        assert_eq!(found, dir.path().join("docfeed.toml"));
    }

    #[test]
    fn test_find_config_file_nearest_wins() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("public");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("docfeed.toml"), "").unwrap();
        fs::write(nested.join("docfeed.toml"), "").unwrap();

        let found = find_config_file(Path::new("docfeed.toml"), &nested).unwrap();
        assert_eq!(found, nested.join("docfeed.toml"));
    }

    #[test]
    fn test_find_config_file_ignores_directories() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("docfeed.toml")).unwrap();
        assert_eq!(
            find_config_file(Path::new("docfeed.toml"), dir.path()),
            None
        );
    }

    #[test]
    fn test_find_config_file_absolute() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("feed.toml");
        assert_eq!(find_config_file(&file, dir.path()), None);

        fs::write(&file, "").unwrap();
        assert_eq!(find_config_file(&file, Path::new("/")), Some(file.clone()));
    }

    #[test]
    fn test_check_site_url() {
        assert!(check_site_url("http://example.com").is_ok());
        assert!(check_site_url("https://example.com:8080/blog/").is_ok());
        assert!(check_site_url("example.com").is_err());
        assert!(check_site_url("mailto:me@example.com").is_err());
        assert!(check_site_url("").is_err());
    }
}
