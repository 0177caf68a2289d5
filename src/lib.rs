//! # Gallery Site
//!
//! A photo gallery website with two delivery modes over the same content.
//! The filesystem is the data source: every image dropped into a variant
//! folder under `static/photos/` shows up in that variant's gallery.
//!
//! ```text
//! static/photos/desktop/     full-screen slideshow on the landing page
//! static/photos/mobile/      card gallery for phones
//! static/photos/portfolio/   dedicated /portfolio grid (falls back to desktop)
//! ```
//!
//! # Two Delivery Modes
//!
//! ```text
//! serve   static/ + site_src/  →  HTTP server   (pages rendered per request)
//! build   static/ + site_src/  →  docs/         (plain files for static hosting)
//! ```
//!
//! Both modes read the same folders through [`scan`], so a photo listed by the
//! server is also in the generated manifests. The server renders pages with
//! Maud on every request; the generator fills placeholders in the HTML
//! templates under `site_src/` and writes one JSON manifest per variant so the
//! static pages can load their photos client-side.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | `Variant`, `Photo`, and the manifest shapes shared by server and generator |
//! | [`scan`] | Lists the image files of a variant folder, sorted |
//! | [`config`] | `config.toml` loading over stock defaults, path layout, process environment |
//! | [`render`] | Maud markup for the landing, portfolio, view, and debug pages |
//! | [`server`] | Axum router: pages, JSON API, photo files, legacy redirects |
//! | [`generate`] | Static export into the output directory |
//! | [`diagnostics`] | Environment redaction for the development debug page |
//! | [`output`] | CLI output formatting for `check` and `build` |
//!
//! # Design Decisions
//!
//! ## No Index, No Cache
//!
//! Photo lists are re-read from disk on every request. Galleries hold tens of
//! images, not thousands, and a fresh listing means adding a photo never needs
//! a restart or rebuild step for the server.
//!
//! ## Destructive Builds
//!
//! `build` removes the output directory before writing, so the result depends
//! only on the current inputs. [`config::SitePaths::validate`] refuses layouts
//! where the output directory would contain an input directory.

pub mod config;
pub mod diagnostics;
pub mod generate;
pub mod output;
pub mod render;
pub mod scan;
pub mod server;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
