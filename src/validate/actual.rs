//! Scan of the built output tree.
//!
//! Collects everything the comparison needs in one walk: the set of files,
//! the station directory count, the city × genre directories, the SEO tags
//! and links of every HTML page, and the `<loc>` entries of every sitemap.
//! HTML pages are read in parallel; results are sorted by path so reports
//! are stable across runs.

use super::ValidateError;
use crate::sitemap::{INDEX_FILE, SitemapFamily};
use rayon::prelude::*;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::Path;
use std::sync::LazyLock;
use walkdir::WalkDir;

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title>(.*?)</title>").unwrap());
static DESCRIPTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta\s+name="description"\s+content="([^"]*)""#).unwrap()
});
static CANONICAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<link\s+rel="canonical"\s+href="([^"]*)""#).unwrap());
static HREF_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"(?i)href="([^"]+)""#).unwrap());
static LOC_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<loc>(.*?)</loc>").unwrap());

/// SEO-relevant content of one HTML page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageScan {
    /// Output-relative path with `/` separators, e.g. `city/athina/index.html`.
    pub path: String,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Non-empty canonical hrefs, in document order.
    pub canonicals: Vec<String>,
    /// Every `href` attribute value, entity-decoded, in document order.
    pub hrefs: Vec<String>,
}

/// What the output tree actually contains.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActualState {
    /// Every file, output-relative with `/` separators.
    pub files: BTreeSet<String>,
    /// Directories directly under `station/`; `None` if it does not exist.
    pub station_dirs: Option<usize>,
    /// `"<city>/<genre>"` for every `city/<city>/genre/<genre>/` directory.
    pub combo_dirs: BTreeSet<String>,
    /// HTML pages sorted by path.
    pub pages: Vec<PageScan>,
    /// Entries that exist in the tree but cannot be read (dangling links,
    /// permission errors), sorted by path. Not part of `files`.
    pub unreadable: Vec<String>,
    /// Sitemap file name → `<loc>` values; `None` if the file is missing.
    pub sitemaps: BTreeMap<String, Option<Vec<String>>>,
}

impl ActualState {
    pub fn has_file(&self, path: &str) -> bool {
        self.files.contains(path)
    }
}

/// Decode the handful of entities that appear in generated attribute values.
pub fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Extract title, description, canonicals and links from an HTML document.
pub fn parse_page(path: &str, html: &str) -> PageScan {
    let capture = |re: &Regex| {
        re.captures(html)
            .and_then(|c| c.get(1))
            .map(|m| decode_entities(m.as_str().trim()))
    };
    PageScan {
        path: path.to_string(),
        title: capture(&TITLE_RE),
        description: capture(&DESCRIPTION_RE),
        canonicals: CANONICAL_RE
            .captures_iter(html)
            .filter_map(|c| c.get(1))
            .map(|m| decode_entities(m.as_str().trim()))
            .filter(|c| !c.is_empty())
            .collect(),
        hrefs: HREF_RE
            .captures_iter(html)
            .filter_map(|c| c.get(1))
            .map(|m| decode_entities(m.as_str()))
            .collect(),
    }
}

/// `<loc>` values of a sitemap document.
pub fn parse_locs(xml: &str) -> Vec<String> {
    LOC_RE
        .captures_iter(xml)
        .filter_map(|c| c.get(1))
        .map(|m| decode_entities(m.as_str().trim()))
        .collect()
}

/// Read a file, mapping "not found" to `None`.
fn read_optional(path: &Path) -> io::Result<Option<String>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

fn count_subdirs(dir: &Path) -> io::Result<Option<usize>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };
    let mut count = 0;
    for entry in entries {
        if entry?.file_type()?.is_dir() {
            count += 1;
        }
    }
    Ok(Some(count))
}

fn relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Walk `dist` and collect the [`ActualState`], reading HTML with up to
/// `workers` threads.
pub fn scan_actual(dist: &Path, workers: usize) -> Result<ActualState, ValidateError> {
    let mut state = ActualState::default();

    for entry in WalkDir::new(dist).min_depth(1) {
        let entry = entry?;
        let rel = relative(dist, entry.path());
        if entry.file_type().is_dir() {
            let parts: Vec<&str> = rel.split('/').collect();
            if let ["city", city, "genre", genre] = parts.as_slice() {
                state.combo_dirs.insert(format!("{city}/{genre}"));
            }
        } else if entry.path_is_symlink() && fs::metadata(entry.path()).is_err() {
            state.unreadable.push(rel);
        } else {
            state.files.insert(rel);
        }
    }

    state.station_dirs = count_subdirs(&dist.join("station"))?;

    let html_files: Vec<String> = state
        .files
        .iter()
        .filter(|f| f.ends_with(".html"))
        .cloned()
        .collect();
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .build()?;
    let scans: Vec<Result<PageScan, String>> = pool.install(|| {
        html_files
            .par_iter()
            .map(|rel| match fs::read(dist.join(rel)) {
                Ok(bytes) => Ok(parse_page(rel, &String::from_utf8_lossy(&bytes))),
                Err(e) => {
                    log::warn!("Could not read {rel}: {e}");
                    Err(rel.clone())
                }
            })
            .collect()
    });
    for scan in scans {
        match scan {
            Ok(page) => state.pages.push(page),
            Err(rel) => {
                state.files.remove(&rel);
                state.unreadable.push(rel);
            }
        }
    }
    state.pages.sort_by(|a, b| a.path.cmp(&b.path));
    state.unreadable.sort();

    let sitemap_files =
        std::iter::once(INDEX_FILE).chain(SitemapFamily::ALL.iter().map(|f| f.file_name()));
    for file in sitemap_files {
        let locs = read_optional(&dist.join(file))?.map(|xml| parse_locs(&xml));
        state.sitemaps.insert(file.to_string(), locs);
    }

    log::debug!(
        "Scanned {}: {} files, {} pages, {} city-genre dirs",
        dist.display(),
        state.files.len(),
        state.pages.len(),
        state.combo_dirs.len()
    );
    Ok(state)
}
