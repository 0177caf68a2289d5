//! Static site generation.
//!
//! Produces a self-contained tree equivalent to what the live server
//! serves, for hosting without any server-side logic. The JSON API is
//! replaced by one manifest file per variant and the viewer page resolves its
//! photo from query parameters in the browser.
//!
//! ## Output Structure
//!
//! ```text
//! docs/
//! ├── .nojekyll                    # Keeps GitHub Pages from running Jekyll
//! ├── index.html                   # index template + mobile gallery cards
//! ├── view/
//! │   └── index.html               # Copied verbatim
//! └── assets/
//!     ├── css/default.css
//!     ├── js/                      # static/js, copied wholesale
//!     ├── photos/
//!     │   ├── desktop/
//!     │   ├── mobile/
//!     │   └── portfolio/
//!     ├── photos.desktop.json
//!     ├── photos.mobile.json
//!     └── photos.portfolio.json
//! ```
//!
//! ## Templates
//!
//! `index.html` may contain two placeholders:
//!
//! - `{{MOBILE_GALLERY}}`: one card per mobile photo, first two loaded
//!   eagerly, the rest lazily.
//! - `{{WEB3FORMS_KEY}}`: the contact-form key, or `YOUR_ACCESS_KEY_HERE`.
//!
//! A missing template skips that page with a warning; the rest of the build
//! still runs. Every other I/O failure aborts the build.

use crate::config::{ConfigError, SitePaths};
use crate::render::{self, CONTACT_KEY_PLACEHOLDER};
use crate::scan::{self, ScanError};
use crate::types::{LinkScheme, PhotoManifest, Variant};
use maud::html;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

pub const MOBILE_GALLERY_TOKEN: &str = "{{MOBILE_GALLERY}}";
pub const CONTACT_KEY_TOKEN: &str = "{{WEB3FORMS_KEY}}";

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Attach the offending path to an I/O error.
trait IoContext<T> {
    fn at(self, path: &Path) -> Result<T, GenerateError>;
}

impl<T> IoContext<T> for std::io::Result<T> {
    fn at(self, path: &Path) -> Result<T, GenerateError> {
        self.map_err(|source| GenerateError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// What a build wrote, for the CLI summary.
#[derive(Debug, Default, PartialEq)]
pub struct BuildReport {
    pub output_dir: PathBuf,
    pub copied_files: usize,
    /// Photo count per manifest, in [`Variant::ALL`] order.
    pub manifests: Vec<(Variant, usize)>,
    /// Pages written, relative to the output dir.
    pub pages: Vec<PathBuf>,
    /// Steps skipped because their input was missing.
    pub skipped: Vec<String>,
}

pub fn build(
    paths: &SitePaths,
    contact_key: Option<&str>,
) -> Result<BuildReport, GenerateError> {
    let out = &paths.output_dir;
    let assets = out.join("assets");
    let mut report = BuildReport {
        output_dir: out.clone(),
        ..BuildReport::default()
    };

    paths.validate()?;
    clean_output(out)?;
    report.copied_files = copy_assets(paths, &assets)?;

    let listings = scan::list_all(&paths.photos_dir())?;
    for (variant, photos) in &listings {
        write_manifest(&assets, &PhotoManifest::new(*variant, photos, LinkScheme::Static))?;
        report.manifests.push((*variant, photos.len()));
    }
    let mobile = listings
        .iter()
        .find(|(variant, _)| *variant == Variant::Mobile)
        .map(|(_, photos)| photos.as_slice())
        .unwrap_or_default();

    let index_template = paths.templates_dir.join("index.html");
    match read_template(&index_template)? {
        Some(template) => {
            let gallery = render::mobile_gallery(mobile, LinkScheme::Static);
            let html = render_index(&template, &gallery, contact_key);
            let dest = out.join("index.html");
            fs::write(&dest, html).at(&dest)?;
            report.pages.push(PathBuf::from("index.html"));
        }
        None => skip(&mut report, "index.html", &index_template),
    }

    let view_template = paths.templates_dir.join("view").join("index.html");
    match read_template(&view_template)? {
        Some(template) => {
            let view_dir = out.join("view");
            fs::create_dir_all(&view_dir).at(&view_dir)?;
            let dest = view_dir.join("index.html");
            fs::write(&dest, template).at(&dest)?;
            report.pages.push(PathBuf::from("view/index.html"));
        }
        None => skip(&mut report, "view/index.html", &view_template),
    }

    let marker = out.join(".nojekyll");
    fs::write(&marker, "").at(&marker)?;

    Ok(report)
}

/// Remove the output dir if present and recreate the empty asset folders.
fn clean_output(out: &Path) -> Result<(), GenerateError> {
    if out.exists() {
        fs::remove_dir_all(out).at(out)?;
    }
    for sub in ["css", "js", "photos"] {
        let dir = out.join("assets").join(sub);
        fs::create_dir_all(&dir).at(&dir)?;
    }
    Ok(())
}

/// Copy stylesheet, scripts and photos; returns the number of files copied.
fn copy_assets(paths: &SitePaths, assets: &Path) -> Result<usize, GenerateError> {
    let mut copied = 0;

    let css = paths.stylesheet_path();
    if css.is_file() {
        let dest = assets.join("css").join(&paths.stylesheet);
        fs::copy(&css, &dest).at(&dest)?;
        copied += 1;
    }

    for (src, dst) in [
        (paths.scripts_dir(), assets.join("js")),
        (paths.photos_dir(), assets.join("photos")),
    ] {
        if src.is_dir() {
            copied += copy_dir_recursive(&src, &dst)?;
        }
    }
    Ok(copied)
}

/// Merge `src` into `dst`, overwriting files that already exist.
fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<usize, GenerateError> {
    let mut copied = 0;
    for entry in WalkDir::new(src).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        let Ok(rel) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).at(&target)?;
        } else if entry.path().is_file() {
            fs::copy(entry.path(), &target).at(&target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

fn write_manifest(assets: &Path, manifest: &PhotoManifest) -> Result<(), GenerateError> {
    let path = assets.join(format!("photos.{}.json", manifest.variant));
    let json = serde_json::to_string_pretty(manifest)?;
    fs::write(&path, json).at(&path)
}

/// `Ok(None)` when the template does not exist.
fn read_template(path: &Path) -> Result<Option<String>, GenerateError> {
    if !path.is_file() {
        return Ok(None);
    }
    fs::read_to_string(path).at(path).map(Some)
}

fn skip(report: &mut BuildReport, page: &str, template: &Path) {
    log::warn!("skipping {page}: template {} missing", template.display());
    report.skipped.push(format!("{page} (template missing)"));
}

/// Fill both placeholders of the index template.
pub fn render_index(template: &str, gallery: &str, contact_key: Option<&str>) -> String {
    let key = html! { (contact_key.unwrap_or(CONTACT_KEY_PLACEHOLDER)) }.into_string();
    template
        .replace(MOBILE_GALLERY_TOKEN, gallery)
        .replace(CONTACT_KEY_TOKEN, &key)
}
