//! Destination key naming
//!
//! Keys are `<dir>/<name>`, where the name is either the source's own file
//! name or a random token followed by the upload time and the original
//! extension.

use std::path::Path;

use rand::Rng;
use url::Url;

use crate::path::{extension_of, link_file_name, strip_origin};

/// Alphabet for random names, without easily confused glyphs
pub const RANDOM_ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTWXYZabcdefhijkmnprstwxyz2345678";

/// Length of the random token
pub const RANDOM_LEN: usize = 10;

/// Generate a random token of `len` characters from [`RANDOM_ALPHABET`]
pub fn random_string(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| RANDOM_ALPHABET[rng.gen_range(0..RANDOM_ALPHABET.len())] as char)
        .collect()
}

fn random_name(extension: &str) -> String {
    format!(
        "{}_{}{extension}",
        random_string(RANDOM_LEN),
        jiff::Timestamp::now().as_millisecond()
    )
}

/// Destination key for a local file
pub fn generate_name(path: &Path, dir: &str, random: bool) -> String {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = if random {
        random_name(extension_of(&file_name))
    } else {
        file_name
    };
    format!("{dir}/{name}")
}

/// Destination key for a remote link
///
/// Without a save directory the key mirrors the link's path and query.
pub fn remote_key(url: &Url, dir: Option<&str>, random: bool) -> String {
    match dir.filter(|d| !d.is_empty()) {
        None => strip_origin(url),
        Some(dir) => {
            let file_name = link_file_name(url);
            let name = if random {
                random_name(extension_of(file_name))
            } else {
                file_name.to_string()
            };
            format!("{dir}/{name}")
        }
    }
}
