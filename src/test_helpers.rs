//! Shared fixtures for the unit tests.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let site = setup_site();
//! let photos = list_photos(&site.paths.photos_dir(), Variant::Desktop).unwrap();
//! assert_eq!(photo_names(&photos), vec!["A.png", "b.jpg"]);
//! ```

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::config::{SiteConfig, SitePaths};
use crate::types::{Photo, Variant};

/// Body of every fixture image.
pub const FAKE_IMAGE: &str = "fake image";

pub const DESKTOP_PHOTOS: &[&str] = &["b.jpg", "A.png"];
pub const MOBILE_PHOTOS: &[&str] = &["m3.webp", "m1.jpg", "m2.jpg", "notes.txt"];

pub const INDEX_TEMPLATE: &str = "<html><body>\n<div class=\"mobile-gallery\">\n{{MOBILE_GALLERY}}\n</div>\n<input type=\"hidden\" name=\"access_key\" value=\"{{WEB3FORMS_KEY}}\">\n</body></html>\n";
pub const VIEW_TEMPLATE: &str = "<html><body data-assets-base=\"../assets\"><img id=\"fullsizeImage\"></body></html>\n";

/// A project root in a temp dir. Dropping it removes the tree.
pub struct TestSite {
    pub dir: TempDir,
    pub paths: SitePaths,
}

/// Project root with default layout: stylesheet, one script, desktop and
/// mobile photos (plus a decoy), and both templates.
pub fn setup_site() -> TestSite {
    let dir = TempDir::new().unwrap();
    let paths = SiteConfig::default().resolve_paths(dir.path());

    fs::create_dir_all(paths.scripts_dir()).unwrap();
    fs::write(paths.stylesheet_path(), "body { margin: 0; }\n").unwrap();
    fs::write(paths.scripts_dir().join("script.js"), "console.log('gallery');\n").unwrap();

    write_photos(&paths.photos_dir(), Variant::Desktop, DESKTOP_PHOTOS);
    write_photos(&paths.photos_dir(), Variant::Mobile, MOBILE_PHOTOS);

    write_file(&paths.templates_dir.join("index.html"), INDEX_TEMPLATE);
    write_file(&paths.templates_dir.join("view/index.html"), VIEW_TEMPLATE);

    TestSite { dir, paths }
}

/// Create `photos_root/<variant>/` holding one fake file per name.
pub fn write_photos(photos_root: &Path, variant: Variant, names: &[&str]) {
    let folder = photos_root.join(variant.as_str());
    fs::create_dir_all(&folder).unwrap();
    for name in names {
        fs::write(folder.join(name), FAKE_IMAGE).unwrap();
    }
}

pub fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

pub fn photo_names(photos: &[Photo]) -> Vec<&str> {
    photos.iter().map(|p| p.filename.as_str()).collect()
}

/// Every file under `root` as `(relative path, bytes)`, sorted by path.
pub fn snapshot_tree(root: &Path) -> Vec<(String, Vec<u8>)> {
    let mut files: Vec<(String, Vec<u8>)> = walkdir::WalkDir::new(root)
        .into_iter()
        .map(|e| e.unwrap())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let rel = e.path().strip_prefix(root).unwrap();
            (
                rel.to_string_lossy().replace('\\', "/"),
                fs::read(e.path()).unwrap(),
            )
        })
        .collect();
    files.sort();
    files
}
