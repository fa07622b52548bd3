//! Path and URL utilities
//!
//! Resolves user-supplied paths against the working directory and decides
//! whether a string is a usable remote link.

use std::path::{Path, PathBuf};

use url::Url;

use crate::error::{Error, Result};

/// URL schemes accepted as remote links
const LINK_SCHEMES: &[&str] = &["http", "https", "ftp", "rtsp", "mms"];

/// Resolve `path` against `base`, leaving absolute paths untouched
pub fn absolute_path(base: &Path, path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Resolve `path` against the current working directory
pub fn absolute_from_cwd(path: impl AsRef<Path>) -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    Ok(absolute_path(&cwd, path))
}

/// Check whether a string is syntactically a remote link with a host
pub fn is_link(value: &str) -> bool {
    match Url::parse(value.trim()) {
        Ok(url) => {
            LINK_SCHEMES.contains(&url.scheme()) && url.host_str().is_some_and(|h| !h.is_empty())
        }
        Err(_) => false,
    }
}

/// Parse a remote link, rejecting anything [`is_link`] would reject
pub fn parse_link(value: &str) -> Result<Url> {
    let url = Url::parse(value.trim())?;
    if !LINK_SCHEMES.contains(&url.scheme()) || url.host_str().is_none() {
        return Err(Error::Validation(format!("Not a remote link: {value}")));
    }
    Ok(url)
}

/// The path and query of a link with scheme and host removed
///
/// `http://host/a/b.png?x=1` becomes `/a/b.png?x=1`.
pub fn strip_origin(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{query}", url.path()),
        None => url.path().to_string(),
    }
}

/// Last path segment of a link, empty when the path ends with `/`
pub fn link_file_name(url: &Url) -> &str {
    url.path().rsplit('/').next().unwrap_or_default()
}

/// Extension of a file name including the leading dot, empty if none
///
/// Dotfiles such as `.env` have no extension.
pub fn extension_of(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(0) | None => "",
        Some(pos) => &file_name[pos..],
    }
}

/// Check that `path` is an existing regular file with a `.json` extension
pub fn is_json_file(path: &Path) -> bool {
    path.is_file() && path.extension().is_some_and(|ext| ext == "json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_path_joins_relative() {
        let base = Path::new("/work");
        assert_eq!(absolute_path(base, "a/b.txt"), PathBuf::from("/work/a/b.txt"));
        assert_eq!(absolute_path(base, "/etc/hosts"), PathBuf::from("/etc/hosts"));
    }

    #[test]
    fn test_is_link() {
        assert!(is_link("http://example.com"));
        assert!(is_link("https://cdn.example.com/a/b.png?x=1"));
        assert!(is_link("ftp://10.0.0.1/file"));
        assert!(!is_link("example.com/a.png"));
        assert!(!is_link("file:///tmp/a.png"));
        assert!(!is_link("mailto:someone@example.com"));
        assert!(!is_link(""));
    }

    #[test]
    fn test_strip_origin() {
        let url = Url::parse("http://host/a/b.png").unwrap();
        assert_eq!(strip_origin(&url), "/a/b.png");

        let url = Url::parse("https://host:8080/a/b.png?v=2").unwrap();
        assert_eq!(strip_origin(&url), "/a/b.png?v=2");
    }

    #[test]
    fn test_link_file_name() {
        let url = Url::parse("http://host/a/b.png?v=2").unwrap();
        assert_eq!(link_file_name(&url), "b.png");

        let url = Url::parse("http://host/dir/").unwrap();
        assert_eq!(link_file_name(&url), "");
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("photo.jpg"), ".jpg");
        assert_eq!(extension_of("archive.tar.gz"), ".gz");
        assert_eq!(extension_of("README"), "");
        assert_eq!(extension_of(".env"), "");
    }

    #[test]
    fn test_is_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("urls.json");
        let txt = dir.path().join("urls.txt");
        std::fs::write(&json, "[]").unwrap();
        std::fs::write(&txt, "[]").unwrap();

        assert!(is_json_file(&json));
        assert!(!is_json_file(&txt));
        assert!(!is_json_file(dir.path()));
        assert!(!is_json_file(&dir.path().join("missing.json")));
    }
}
