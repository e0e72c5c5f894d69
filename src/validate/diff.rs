//! Comparison of expected and actual state.
//!
//! Pure: takes the two states and the site URL mapping, returns every issue
//! found in a fixed order (station count, per-page SEO checks, duplicate
//! canonicals, sitemaps, letter hubs, city × genre pages, quality hubs).

use super::{ActualState, ExpectedState, Issue, IssueKind};
use crate::config::SiteUrls;
use crate::sitemap::{INDEX_FILE, SitemapFamily};
use crate::types::QualityTier;
use std::collections::{BTreeSet, HashSet};

/// Whether an href is a root-relative link into the site.
fn is_internal(href: &str) -> bool {
    !(href.is_empty()
        || href.starts_with("http")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with('#')
        || !href.starts_with('/'))
}

/// All hrefs on pages under `prefix`, as site paths without slashes at
/// either end.
fn hub_links(actual: &ActualState, site: &SiteUrls, prefix: &str) -> HashSet<String> {
    actual
        .pages
        .iter()
        .filter(|p| p.path.starts_with(prefix))
        .flat_map(|p| p.hrefs.iter())
        .filter(|h| is_internal(h))
        .filter_map(|h| site.site_path(h))
        .map(|path| path.trim_end_matches('/').to_string())
        .collect()
}

/// Whether `url` maps onto a file present in the output tree.
fn resolves(actual: &ActualState, site: &SiteUrls, url: &str) -> bool {
    site.output_file(url).is_some_and(|file| actual.has_file(&file))
}

/// Compare `expected` against `actual` and list every divergence.
pub fn diff(expected: &ExpectedState, actual: &ActualState, site: &SiteUrls) -> Vec<Issue> {
    let mut issues = Vec::new();
    check_station_count(expected, actual, &mut issues);
    check_pages(actual, site, &mut issues);
    check_sitemaps(actual, site, &mut issues);
    check_letter_hubs(expected, actual, site, &mut issues);
    check_combos(expected, actual, &mut issues);
    check_quality_hubs(expected, actual, site, &mut issues);
    issues
}

fn check_station_count(expected: &ExpectedState, actual: &ActualState, issues: &mut Vec<Issue>) {
    let found = match actual.station_dirs {
        Some(n) => n,
        None => {
            issues.push(Issue::new(IssueKind::MissingFile, "Missing station directory"));
            0
        }
    };
    if found != expected.station_count {
        issues.push(Issue::new(
            IssueKind::CountMismatch,
            format!(
                "Station pages count mismatch: expected {}, found {found}",
                expected.station_count
            ),
        ));
    }
}

fn check_pages(actual: &ActualState, site: &SiteUrls, issues: &mut Vec<Issue>) {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut duplicates: BTreeSet<&str> = BTreeSet::new();

    for path in &actual.unreadable {
        issues.push(Issue::new(
            IssueKind::MissingFile,
            format!("Unreadable page {path}"),
        ));
    }

    for page in &actual.pages {
        let file = &page.path;
        if page.title.as_deref().is_none_or(str::is_empty) {
            issues.push(Issue::new(
                IssueKind::ConsistencyViolation,
                format!("Missing title in {file}"),
            ));
        }
        if page.description.as_deref().is_none_or(str::is_empty) {
            issues.push(Issue::new(
                IssueKind::ConsistencyViolation,
                format!("Missing description in {file}"),
            ));
        }
        match page.canonicals.as_slice() {
            [] => issues.push(Issue::new(
                IssueKind::MissingFile,
                format!("Missing canonical in {file}"),
            )),
            [canonical] => {
                if !seen.insert(canonical.as_str()) {
                    duplicates.insert(canonical.as_str());
                }
            }
            many => issues.push(Issue::new(
                IssueKind::ConsistencyViolation,
                format!("Multiple canonicals ({}) in {file}", many.len()),
            )),
        }
        for href in page.hrefs.iter().filter(|h| is_internal(h)) {
            if !resolves(actual, site, href) {
                issues.push(Issue::new(
                    IssueKind::MissingFile,
                    format!("Broken internal link {href} referenced in {file}"),
                ));
            }
        }
    }

    if !duplicates.is_empty() {
        let list: Vec<&str> = duplicates.into_iter().collect();
        issues.push(Issue::new(
            IssueKind::ConsistencyViolation,
            format!("Duplicate canonicals found: {}", list.join(", ")),
        ));
    }
}

fn check_sitemaps(actual: &ActualState, site: &SiteUrls, issues: &mut Vec<Issue>) {
    let files = std::iter::once(INDEX_FILE).chain(SitemapFamily::ALL.iter().map(|f| f.file_name()));
    for file in files {
        let Some(Some(locs)) = actual.sitemaps.get(file) else {
            issues.push(Issue::new(
                IssueKind::MissingFile,
                format!("Missing sitemap {file}"),
            ));
            continue;
        };
        for loc in locs {
            if loc.ends_with(".xml") {
                if !site.site_path(loc).is_some_and(|path| actual.has_file(&path)) {
                    issues.push(Issue::new(
                        IssueKind::MissingFile,
                        format!("Sitemap index references missing file: {loc}"),
                    ));
                }
            } else if !resolves(actual, site, loc) {
                issues.push(Issue::new(
                    IssueKind::MissingFile,
                    format!("Sitemap URL missing in dist: {loc}"),
                ));
            }
        }
    }
}

fn check_letter_hubs(
    expected: &ExpectedState,
    actual: &ActualState,
    site: &SiteUrls,
    issues: &mut Vec<Issue>,
) {
    let families = [
        ("city", &expected.city_letters),
        ("genre", &expected.genre_letters),
    ];
    for (facet, letters) in families {
        for (bucket, slugs) in letters {
            let dir = format!("{facet}/letter/{bucket}/");
            let hub = format!("{dir}index.html");
            if !actual.has_file(&hub) {
                issues.push(Issue::new(
                    IssueKind::MissingFile,
                    format!("Missing letter hub {hub}"),
                ));
                continue;
            }
            let links = hub_links(actual, site, &dir);
            for slug in slugs {
                if !links.contains(&format!("{facet}/{slug}")) {
                    issues.push(Issue::new(
                        IssueKind::ConsistencyViolation,
                        format!("{facet} {slug} not linked from letter hub {hub}"),
                    ));
                }
            }
        }
    }
}

fn check_combos(expected: &ExpectedState, actual: &ActualState, issues: &mut Vec<Issue>) {
    let cap = expected.combination_cap;
    if let Some(n) = expected.combo_overflow {
        issues.push(Issue::new(
            IssueKind::CapExceeded,
            format!("City-genre combinations exceed cap: {n} > {cap}"),
        ));
    }
    let found = actual.combo_dirs.len();
    if found > cap {
        issues.push(Issue::new(
            IssueKind::CapExceeded,
            format!("City-genre pages exceed cap: {found} > {cap}"),
        ));
    }
    if found != expected.combos.len() {
        issues.push(Issue::new(
            IssueKind::CountMismatch,
            format!(
                "City-genre pages count mismatch: expected {}, found {found}",
                expected.combos.len()
            ),
        ));
    }
    for combo in expected.combos.difference(&actual.combo_dirs) {
        issues.push(Issue::new(
            IssueKind::MissingFile,
            format!("Missing city-genre page {}", combo_path(combo)),
        ));
    }
    for combo in actual.combo_dirs.difference(&expected.combos) {
        issues.push(Issue::new(
            IssueKind::ConsistencyViolation,
            format!("Unexpected city-genre page {}", combo_path(combo)),
        ));
    }
}

fn combo_path(combo: &str) -> String {
    match combo.split_once('/') {
        Some((city, genre)) => format!("city/{city}/genre/{genre}/"),
        None => combo.to_string(),
    }
}

fn check_quality_hubs(
    expected: &ExpectedState,
    actual: &ActualState,
    site: &SiteUrls,
    issues: &mut Vec<Issue>,
) {
    for tier in QualityTier::ALL {
        let dir = format!("quality/{tier}/");
        let hub = format!("{dir}index.html");
        if !actual.has_file(&hub) {
            issues.push(Issue::new(
                IssueKind::MissingFile,
                format!("Missing quality hub {hub}"),
            ));
            continue;
        }
        let mut stations: Vec<String> = hub_links(actual, site, &dir)
            .into_iter()
            .filter_map(|link| {
                let slug = link.strip_prefix("station/")?;
                (!slug.is_empty() && !slug.contains('/')).then(|| slug.to_string())
            })
            .collect();
        stations.sort();
        for slug in stations {
            match expected.bitrates.get(&slug) {
                None => issues.push(Issue::new(
                    IssueKind::ConsistencyViolation,
                    format!("Unknown station {slug} linked from quality hub {hub}"),
                )),
                Some(bitrate) if !tier.contains(*bitrate) => {
                    let shown = bitrate.map_or("unknown".to_string(), |b| b.to_string());
                    issues.push(Issue::new(
                        IssueKind::ConsistencyViolation,
                        format!(
                            "Station {slug} with bitrate {shown} does not belong in quality tier {tier}"
                        ),
                    ));
                }
                Some(_) => {}
            }
        }
    }
}
