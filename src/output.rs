//! CLI output formatting for all subcommands.
//!
//! # Output Format
//!
//! ## Index
//!
//! ```text
//! Stations: 120 total, 97 listed
//!
//! Cities (14)
//! 001 Athina (41)
//!     Genres: Pop, News, Rock
//!     Bitrate: 12 at 128-191 kbps, 3 at 256+ kbps
//! 002 Thessaloniki (18)
//!     ...
//!
//! Genres (22)
//! 001 Pop (35)
//!     Cities: Athina, Thessaloniki
//!
//! City × genre pages: 64 (cap 100)
//! ```
//!
//! ## Sitemap
//!
//! ```text
//! sitemap.xml (6 URLs)
//! sitemap-pages.xml (4 URLs)
//! ...
//! Wrote 7 sitemaps → dist
//! ```
//!
//! ## Validate
//!
//! ```text
//! SEO validation failed:
//! Missing canonical in city/athina/index.html
//! Broken internal link /genre/jazz/ referenced in station/a/index.html
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to the terminal. Format
//! functions are pure: no I/O, no side effects.

use crate::facets::Index;
use crate::query::FacetError;
use crate::sitemap::WrittenSitemap;
use crate::types::TopItem;
use crate::validate::Report;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn joined_names(items: &[TopItem]) -> String {
    items
        .iter()
        .map(|i| i.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// Index
// ============================================================================

/// Format the facet summary printed by `index`.
///
/// Lists at most `limit` cities and genres, in index order.
pub fn format_index_summary(index: &Index, limit: usize) -> Vec<String> {
    let mut lines = vec![format!(
        "Stations: {} total, {} listed",
        index.total_stations(),
        index.listed_count()
    )];

    lines.push(String::new());
    lines.push(format!("Cities ({})", index.cities().len()));
    for (pos, city) in index.cities().iter().take(limit).enumerate() {
        lines.push(format!(
            "{} {} ({})",
            format_index(pos + 1),
            city.city_name,
            city.count
        ));
        if !city.top_genres.is_empty() {
            lines.push(format!("{}Genres: {}", indent(1), joined_names(&city.top_genres)));
        }
        lines.push(format!(
            "{}Bitrate: {}",
            indent(1),
            city.bitrate_distribution.summary()
        ));
    }

    lines.push(String::new());
    lines.push(format!("Genres ({})", index.genres().len()));
    for (pos, genre) in index.genres().iter().take(limit).enumerate() {
        lines.push(format!(
            "{} {} ({})",
            format_index(pos + 1),
            genre.genre_name,
            genre.count
        ));
        if !genre.top_cities.is_empty() {
            lines.push(format!("{}Cities: {}", indent(1), joined_names(&genre.top_cities)));
        }
    }

    lines.push(String::new());
    let cap = index.limits().combination_cap;
    match index.city_genre_combos(index.limits()) {
        Ok(combos) => lines.push(format!("City × genre pages: {} (cap {cap})", combos.len())),
        Err(FacetError::CapExceeded { combinations, .. }) => lines.push(format!(
            "City × genre pages: {combinations} exceeds cap {cap}"
        )),
    }
    lines
}

pub fn print_index_summary(index: &Index, limit: usize) {
    for line in format_index_summary(index, limit) {
        println!("{}", line);
    }
}

// ============================================================================
// Sitemap
// ============================================================================

/// Format the list of written sitemap files.
pub fn format_sitemap_output(written: &[WrittenSitemap], dir: &Path) -> Vec<String> {
    let mut lines: Vec<String> = written
        .iter()
        .map(|w| {
            let unit = if w.entries == 1 { "URL" } else { "URLs" };
            format!("{} ({} {unit})", w.file_name, w.entries)
        })
        .collect();
    lines.push(format!(
        "Wrote {} sitemaps → {}",
        written.len(),
        dir.display()
    ));
    lines
}

pub fn print_sitemap_output(written: &[WrittenSitemap], dir: &Path) {
    for line in format_sitemap_output(written, dir) {
        println!("{}", line);
    }
}

// ============================================================================
// Validate
// ============================================================================

/// Format a validation report: a single pass line, or a failure header
/// followed by one line per issue.
pub fn format_validation_report(report: &Report) -> Vec<String> {
    if report.is_clean() {
        return vec!["SEO validation passed.".to_string()];
    }
    std::iter::once("SEO validation failed:".to_string())
        .chain(report.issues.iter().map(|i| i.to_string()))
        .collect()
}

/// Print the report: passes go to stdout, failures to stderr.
pub fn print_validation_report(report: &Report) {
    let lines = format_validation_report(report);
    if report.is_clean() {
        println!("{}", lines.join("\n"));
    } else {
        eprintln!("{}", lines.join("\n"));
    }
}
