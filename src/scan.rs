//! Photo directory listing.
//!
//! The filesystem is the only source of truth: every call re-reads the
//! variant folder, nothing is cached.
//!
//! ## Directory Structure
//!
//! ```text
//! static/photos/                   # Photos root
//! ├── desktop/
//! │   ├── A.png
//! │   └── b.jpg
//! ├── mobile/
//! │   └── 01-harbour.webp
//! └── portfolio/                   # Optional, may be absent
//! ```
//!
//! Only regular files directly inside a variant folder are listed (no
//! recursion). Symlinks are followed and broken ones skipped. Names are kept
//! when their extension is one of [`PHOTO_EXTENSIONS`], compared
//! case-insensitively, and the result is sorted case-insensitively.

use crate::types::{Photo, Variant};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub const PHOTO_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "avif"];

/// List the photos of one variant, sorted by filename ignoring case.
///
/// A missing variant folder yields an empty list.
pub fn list_photos(photos_root: &Path, variant: Variant) -> Result<Vec<Photo>, ScanError> {
    let folder = photos_root.join(variant.as_str());
    if !folder.is_dir() {
        return Ok(Vec::new());
    }

    let io_err = |source| ScanError::Io {
        path: folder.clone(),
        source,
    };

    let mut names = Vec::new();
    for entry in fs::read_dir(&folder).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        // Non UTF-8 names cannot be put in a URL reliably
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if is_photo_name(&name) && entry.path().is_file() {
            names.push(name);
        }
    }

    sort_filenames(&mut names);
    Ok(names
        .into_iter()
        .map(|name| Photo::new(variant, name))
        .collect())
}

/// Every variant's photos, in [`Variant::ALL`] order.
pub fn list_all(photos_root: &Path) -> Result<Vec<(Variant, Vec<Photo>)>, ScanError> {
    Variant::ALL
        .into_iter()
        .map(|variant| Ok((variant, list_photos(photos_root, variant)?)))
        .collect()
}

pub fn is_photo_name(name: &str) -> bool {
    let Some((stem, ext)) = name.rsplit_once('.') else {
        return false;
    };
    !stem.is_empty()
        && PHOTO_EXTENSIONS
            .iter()
            .any(|accepted| ext.eq_ignore_ascii_case(accepted))
}

/// Case-insensitive order, exact name as tie-break so output never depends
/// on `read_dir` order.
fn sort_filenames(names: &mut [String]) {
    names.sort_by(|a, b| {
        a.to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b))
    });
}
