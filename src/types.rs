//! Shared types used by the live server and the static generator.
//!
//! The JSON photo list served by `/api/photos` and the manifests written by
//! the static build are the same [`PhotoManifest`] type, so the two shapes
//! cannot drift apart.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Bytes left unescaped in photo URLs: alphanumerics plus `-_.~/`.
const FILENAME_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

/// A named photo set, each stored in its own subdirectory of the photos root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Desktop,
    Mobile,
    Portfolio,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid variant")]
pub struct InvalidVariant;

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::Desktop, Variant::Mobile, Variant::Portfolio];

    /// Variant assumed by legacy two-segment URLs.
    pub const DEFAULT: Variant = Variant::Desktop;

    pub fn as_str(self) -> &'static str {
        match self {
            Variant::Desktop => "desktop",
            Variant::Mobile => "mobile",
            Variant::Portfolio => "portfolio",
        }
    }

    /// Parse a `/media/{subdir}` segment.
    ///
    /// Accepts the canonical names plus the older directory names
    /// (`photos`, `photos_mobile`, `photos_portfolio`) that existing links
    /// still point at.
    pub fn from_media_dir(subdir: &str) -> Result<Self, InvalidVariant> {
        match subdir {
            "photos" => Ok(Variant::Desktop),
            "photos_mobile" => Ok(Variant::Mobile),
            "photos_portfolio" => Ok(Variant::Portfolio),
            other => other.parse(),
        }
    }
}

impl FromStr for Variant {
    type Err = InvalidVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Variant::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or(InvalidVariant)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where generated links point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkScheme {
    /// Absolute routes handled by the live server.
    Served,
    /// Relative paths inside the static output tree.
    Static,
}

/// One image file of a variant, as found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    pub variant: Variant,
    /// On-disk name, case preserved.
    pub filename: String,
}

impl Photo {
    pub fn new(variant: Variant, filename: impl Into<String>) -> Self {
        Self {
            variant,
            filename: filename.into(),
        }
    }

    pub fn encoded_filename(&self) -> String {
        utf8_percent_encode(&self.filename, FILENAME_ESCAPE).to_string()
    }

    /// URL of the image bytes.
    pub fn url(&self, scheme: LinkScheme) -> String {
        match scheme {
            LinkScheme::Served => format!("/photos/{}/{}", self.variant, self.encoded_filename()),
            LinkScheme::Static => {
                format!("assets/photos/{}/{}", self.variant, self.encoded_filename())
            }
        }
    }

    /// URL of the single-image viewer page.
    pub fn view_url(&self, scheme: LinkScheme) -> String {
        match scheme {
            LinkScheme::Served => format!("/view/{}/{}", self.variant, self.encoded_filename()),
            LinkScheme::Static => format!(
                "view/?variant={}&file={}",
                self.variant,
                self.encoded_filename()
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoEntry {
    pub filename: String,
    pub url: String,
    pub view_url: String,
}

/// JSON description of one variant's photo list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoManifest {
    pub variant: Variant,
    pub count: usize,
    pub photos: Vec<PhotoEntry>,
}

impl PhotoManifest {
    pub fn new(variant: Variant, photos: &[Photo], scheme: LinkScheme) -> Self {
        let photos: Vec<PhotoEntry> = photos
            .iter()
            .map(|p| PhotoEntry {
                filename: p.filename.clone(),
                url: p.url(scheme),
                view_url: p.view_url(scheme),
            })
            .collect();
        Self {
            variant,
            count: photos.len(),
            photos,
        }
    }
}
