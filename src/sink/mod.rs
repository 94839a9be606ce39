// src/sink/mod.rs
// =============================================================================
// This module stores the text of each crawled page.
//
// Submodules:
// - file: writes one .txt file per page into the output directory
//
// File names come from slugify(url), so the same URL always maps to the same
// file and the name is safe on every filesystem. Long slugs are shortened and
// tagged with a hash of the full URL so two long URLs never share a file.
//
// Rust concepts:
// - async_trait: persist() does file I/O without blocking the runtime
// - thiserror: error enums that carry the failing path and the io::Error
// =============================================================================

mod file;

use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use thiserror::Error;

pub use file::FileSink;

// Longest slug we produce, in bytes; keeps "<slug>.txt" under the usual
// 255-byte file name limit even with non-ASCII letters
const MAX_SLUG_LEN: usize = 200;

// Hex digits of the URL hash appended to shortened slugs
const HASH_SUFFIX_LEN: usize = 12;

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("could not create output directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[async_trait]
pub trait Sink: Send + Sync {
    /// Creates the output destination if it does not exist yet.
    async fn ensure_destination(&self) -> Result<(), WriteError>;

    /// Stores `text` for `url` and returns where it went.
    async fn persist(&self, url: &str, text: &str) -> Result<PathBuf, WriteError>;
}

// Turns any string into a lowercase, filesystem-safe name
//
// Rules:
// - letters and digits are kept (lowercased)
// - every run of other characters becomes a single '-'
// - no leading or trailing '-'
// - "index" if nothing is left
// - longer than MAX_SLUG_LEN bytes: cut at a char boundary and end with
//   '-' plus a short SHA-256 of the whole input
//
// Examples:
//   "https://example.com/a/b?x=1" -> "https-example-com-a-b-x-1"
//   "rarediseases.info.nih.gov"   -> "rarediseases-info-nih-gov"
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;

    for c in input.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }

    if slug.is_empty() {
        return "index".to_string();
    }
    if slug.len() <= MAX_SLUG_LEN {
        return slug;
    }

    let mut cut = MAX_SLUG_LEN - HASH_SUFFIX_LEN - 1;
    while !slug.is_char_boundary(cut) {
        cut -= 1;
    }
    let head = slug[..cut].trim_end_matches('-');

    let digest = hex::encode(Sha256::digest(input.as_bytes()));
    format!("{}-{}", head, &digest[..HASH_SUFFIX_LEN])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_url() {
        assert_eq!(slugify("https://example.com/a/b?x=1"), "https-example-com-a-b-x-1");
        assert_eq!(slugify("https://Example.com/Docs/"), "https-example-com-docs");
    }

    #[test]
    fn test_slugify_host() {
        assert_eq!(slugify("rarediseases.info.nih.gov"), "rarediseases-info-nih-gov");
    }

    #[test]
    fn test_slugify_is_deterministic() {
        let url = "https://example.com/some/page.html";
        assert_eq!(slugify(url), slugify(url));
    }

    #[test]
    fn test_slugify_distinguishes_paths() {
        assert_ne!(slugify("https://ex.com/a"), slugify("https://ex.com/b"));
        assert_ne!(slugify("https://ex.com/"), slugify("https://ex.com/a"));
    }

    #[test]
    fn test_slugify_empty_falls_back() {
        assert_eq!(slugify("///"), "index");
        assert_eq!(slugify(""), "index");
    }

    #[test]
    fn test_slugify_length_cap() {
        let long = format!("https://ex.com/{}", "a/".repeat(300));
        let slug = slugify(&long);
        assert!(slug.len() <= MAX_SLUG_LEN);
        assert!(!slug.contains("--"));
        assert_eq!(slugify(&long), slug);
    }

    #[test]
    fn test_slugify_long_urls_with_shared_prefix_differ() {
        let base = format!("https://ex.com/{}", "section/".repeat(30));
        let a = slugify(&format!("{}page-one", base));
        let b = slugify(&format!("{}page-two", base));
        assert_ne!(a, b);
        assert!(a.len() <= MAX_SLUG_LEN);
        assert!(b.len() <= MAX_SLUG_LEN);
    }

    #[test]
    fn test_slugify_cap_counts_bytes() {
        // 'ü' is two bytes in UTF-8
        let long = format!("https://ex.com/{}", "über/".repeat(100));
        let slug = slugify(&long);
        assert!(slug.len() <= MAX_SLUG_LEN);
        assert!(slug.starts_with("https-ex-com-über-"));
    }

    #[test]
    fn test_slugify_short_slugs_have_no_hash() {
        let url = format!("https://ex.com/{}", "a".repeat(100));
        assert_eq!(slugify(&url), format!("https-ex-com-{}", "a".repeat(100)));
    }
}
