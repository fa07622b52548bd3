//! Local file enumeration
//!
//! Expands a file or directory into the flat list of files to upload.

use std::path::{Component, Path, PathBuf};

use glob::{MatchOptions, Pattern};

use crate::error::{Error, Result};

/// Directory names skipped during a recursive walk
pub const EXCLUDED_DIRS: &[&str] = &["node_modules"];

fn is_excluded(relative: &Path) -> bool {
    relative.components().any(|c| match c {
        Component::Normal(name) => EXCLUDED_DIRS.iter().any(|d| name == *d),
        _ => false,
    })
}

/// List the files under `path`
///
/// A file yields itself, a directory yields every file below it except those
/// inside [`EXCLUDED_DIRS`]. Paths are absolute when `path` is absolute.
pub fn list_files(path: &Path) -> Result<Vec<PathBuf>> {
    if !path.exists() {
        return Err(Error::InvalidPath(format!(
            "The file or directory does not exist: {}",
            path.display()
        )));
    }

    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let pattern = format!("{}/**/*", Pattern::escape(&path.to_string_lossy()));
    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    };

    let mut files = Vec::new();
    for entry in glob::glob_with(&pattern, options)
        .map_err(|e| Error::InvalidPath(format!("{}: {e}", path.display())))?
    {
        let file = entry.map_err(|e| Error::Io(e.into_error()))?;
        if !file.is_file() {
            continue;
        }
        let relative = file.strip_prefix(path).unwrap_or(&file);
        if is_excluded(relative) {
            continue;
        }
        files.push(file);
    }

    tracing::debug!(root = %path.display(), count = files.len(), "enumerated local files");
    Ok(files)
}
