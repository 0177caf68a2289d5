//! CLI output formatting for `check` and `build`.
//!
//! Each command has a `format_*` function returning lines, for testability,
//! and a `print_*` wrapper that writes them to stdout.
//!
//! ## Check
//!
//! ```text
//! desktop (2 photos)
//!     001 A.png
//!     002 b.jpg
//! mobile (0 photos)
//! portfolio (0 photos)
//! ```
//!
//! ## Build
//!
//! ```text
//! Copied 7 asset files
//! Manifests
//!     desktop → assets/photos.desktop.json (2 photos)
//!     mobile → assets/photos.mobile.json (3 photos)
//!     portfolio → assets/photos.portfolio.json (0 photos)
//! Pages
//!     index.html
//! Skipped
//!     view/index.html (template missing)
//! Static site generated in docs
//! ```

use crate::generate::BuildReport;
use crate::types::{Photo, Variant};

fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn photo_count(n: usize) -> String {
    match n {
        1 => "1 photo".to_string(),
        n => format!("{n} photos"),
    }
}

pub fn format_check_output(listings: &[(Variant, Vec<Photo>)]) -> Vec<String> {
    let mut lines = Vec::new();
    for (variant, photos) in listings {
        lines.push(format!("{} ({})", variant, photo_count(photos.len())));
        for (i, photo) in photos.iter().enumerate() {
            lines.push(format!(
                "{}{} {}",
                indent(1),
                format_index(i + 1),
                photo.filename
            ));
        }
    }
    lines
}

pub fn print_check_output(listings: &[(Variant, Vec<Photo>)]) {
    for line in format_check_output(listings) {
        println!("{}", line);
    }
}

pub fn format_build_output(report: &BuildReport) -> Vec<String> {
    let mut lines = vec![format!("Copied {} asset files", report.copied_files)];

    lines.push("Manifests".to_string());
    for (variant, count) in &report.manifests {
        lines.push(format!(
            "{}{variant} → assets/photos.{variant}.json ({})",
            indent(1),
            photo_count(*count)
        ));
    }

    if !report.pages.is_empty() {
        lines.push("Pages".to_string());
        for page in &report.pages {
            lines.push(format!("{}{}", indent(1), page.display()));
        }
    }

    if !report.skipped.is_empty() {
        lines.push("Skipped".to_string());
        for step in &report.skipped {
            lines.push(format!("{}{}", indent(1), step));
        }
    }

    lines.push(format!(
        "Static site generated in {}",
        report.output_dir.display()
    ));
    lines
}

pub fn print_build_output(report: &BuildReport) {
    for line in format_build_output(report) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn check_lists_each_variant_with_positions() {
        let listings = vec![
            (
                Variant::Desktop,
                vec![
                    Photo::new(Variant::Desktop, "A.png"),
                    Photo::new(Variant::Desktop, "b.jpg"),
                ],
            ),
            (Variant::Mobile, vec![Photo::new(Variant::Mobile, "m.jpg")]),
            (Variant::Portfolio, vec![]),
        ];
        assert_eq!(
            format_check_output(&listings),
            vec![
                "desktop (2 photos)",
                "    001 A.png",
                "    002 b.jpg",
                "mobile (1 photo)",
                "    001 m.jpg",
                "portfolio (0 photos)",
            ]
        );
    }

    #[test]
    fn build_summary() {
        let report = BuildReport {
            output_dir: PathBuf::from("docs"),
            copied_files: 7,
            manifests: vec![(Variant::Desktop, 2), (Variant::Mobile, 1)],
            pages: vec![PathBuf::from("index.html")],
            skipped: vec!["view/index.html (template missing)".to_string()],
        };
        assert_eq!(
            format_build_output(&report),
            vec![
                "Copied 7 asset files",
                "Manifests",
                "    desktop → assets/photos.desktop.json (2 photos)",
                "    mobile → assets/photos.mobile.json (1 photo)",
                "Pages",
                "    index.html",
                "Skipped",
                "    view/index.html (template missing)",
                "Static site generated in docs",
            ]
        );
    }

    #[test]
    fn build_summary_omits_empty_sections() {
        let report = BuildReport {
            output_dir: PathBuf::from("out"),
            ..BuildReport::default()
        };
        let lines = format_build_output(&report);
        assert!(!lines.iter().any(|l| l == "Pages" || l == "Skipped"));
        assert_eq!(lines.last().unwrap(), "Static site generated in out");
    }
}
