//! Upload manifest
//!
//! The manifest is a JSON array of `{name, url}` objects, indented with four
//! spaces, written to [`MANIFEST_FILE`] in the working directory.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::Result;
use crate::traits::UploadResult;

/// File name of the manifest
pub const MANIFEST_FILE: &str = "uploaded_list.json";

/// Render results as the manifest document
pub fn render_manifest(results: &[UploadResult]) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = Serializer::with_formatter(&mut buf, formatter);
    results.serialize(&mut ser)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write the manifest into `dir`, replacing any previous one
pub fn write_manifest(dir: &Path, results: &[UploadResult]) -> Result<PathBuf> {
    let path = dir.join(MANIFEST_FILE);
    std::fs::write(&path, render_manifest(results)?)?;
    tracing::debug!(path = %path.display(), entries = results.len(), "wrote manifest");
    Ok(path)
}
