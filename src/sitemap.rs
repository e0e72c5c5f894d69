//! Sitemap emission.
//!
//! One `urlset` file per page family plus a `sitemapindex` that lists them:
//!
//! ```text
//! dist/
//! ├── sitemap.xml             # index of the six files below
//! ├── sitemap-pages.xml       # /, /top-rated/, /city/, /genre/
//! ├── sitemap-stations.xml    # /station/<slug>/ for every input station
//! ├── sitemap-cities.xml      # /city/<slug>/ and /city/<slug>/page/<n>/
//! ├── sitemap-genres.xml      # /genre/<slug>/ and /genre/<slug>/page/<n>/
//! ├── sitemap-top-rated.xml   # /top-rated/ and /top-rated/page/<n>/
//! └── sitemap-hubs.xml        # hubs, letter hubs, quality tiers, city × genre
//! ```
//!
//! Paths are produced by [`family_paths`] and turned into absolute URLs with
//! [`SiteUrls::build_url`]. Markup is rendered with maud, so URLs are
//! XML-escaped on interpolation.

use crate::config::SiteUrls;
use crate::facets::Index;
use crate::query::FacetError;
use crate::types::QualityTier;
use maud::{Markup, PreEscaped, html};
use std::fs;
use std::path::Path;
use thiserror::Error;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";
const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

/// File name of the sitemap index.
pub const INDEX_FILE: &str = "sitemap.xml";

/// Hub pages that always exist, independent of the data.
pub const FIXED_HUBS: [&str; 5] = [
    "/hubs/",
    "/hubs/top-cities/",
    "/hubs/top-genres/",
    "/hubs/city-genre/",
    "/quality/",
];

/// Top-level listing pages.
pub const FIXED_PAGES: [&str; 4] = ["/", "/top-rated/", "/city/", "/genre/"];

#[derive(Error, Debug)]
pub enum SitemapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Facet(#[from] FacetError),
}

/// A page family with its own sitemap file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SitemapFamily {
    Pages,
    Stations,
    Cities,
    Genres,
    TopRated,
    Hubs,
}

impl SitemapFamily {
    /// Families in the order the index lists them.
    pub const ALL: [SitemapFamily; 6] = [
        SitemapFamily::Pages,
        SitemapFamily::Stations,
        SitemapFamily::Cities,
        SitemapFamily::Genres,
        SitemapFamily::TopRated,
        SitemapFamily::Hubs,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            Self::Pages => "sitemap-pages.xml",
            Self::Stations => "sitemap-stations.xml",
            Self::Cities => "sitemap-cities.xml",
            Self::Genres => "sitemap-genres.xml",
            Self::TopRated => "sitemap-top-rated.xml",
            Self::Hubs => "sitemap-hubs.xml",
        }
    }
}

/// `base` followed by `base/page/<n>/` for n in `2..=pages`.
fn paginated(base: &str, pages: usize) -> impl Iterator<Item = String> + '_ {
    std::iter::once(base.to_string()).chain((2..=pages).map(move |n| format!("{base}page/{n}/")))
}

/// Site paths (leading and trailing slash) of every page in a family.
pub fn family_paths(index: &Index, family: SitemapFamily) -> Result<Vec<String>, FacetError> {
    let paths = match family {
        SitemapFamily::Pages => FIXED_PAGES.iter().map(|p| p.to_string()).collect(),
        SitemapFamily::Stations => index
            .all_stations()
            .iter()
            .map(|s| format!("/station/{}/", s.slug()))
            .collect(),
        SitemapFamily::Cities => index
            .cities()
            .iter()
            .flat_map(|c| {
                let base = format!("/city/{}/", c.city_slug);
                let pages = index.city_page_count(&c.city_slug);
                paginated(&base, pages).collect::<Vec<_>>()
            })
            .collect(),
        SitemapFamily::Genres => index
            .genres()
            .iter()
            .flat_map(|g| {
                let base = format!("/genre/{}/", g.genre_slug);
                let pages = index.genre_page_count(&g.genre_slug);
                paginated(&base, pages).collect::<Vec<_>>()
            })
            .collect(),
        SitemapFamily::TopRated => paginated("/top-rated/", index.top_rated_page_count()).collect(),
        SitemapFamily::Hubs => hub_paths(index)?,
    };
    Ok(paths)
}

fn hub_paths(index: &Index) -> Result<Vec<String>, FacetError> {
    let mut paths: Vec<String> = FIXED_HUBS.iter().map(|p| p.to_string()).collect();
    for bucket in index.letter_hub_buckets() {
        paths.push(format!("/city/letter/{bucket}/"));
        paths.push(format!("/genre/letter/{bucket}/"));
    }
    for tier in QualityTier::ALL {
        let base = format!("/quality/{tier}/");
        paths.extend(paginated(&base, index.quality_page_count(tier)));
    }
    for combo in index.city_genre_combos(index.limits())? {
        paths.push(format!("/city/{}/genre/{}/", combo.city_slug, combo.genre_slug));
    }
    Ok(paths)
}

fn urlset(urls: &[String], lastmod: &str) -> Markup {
    html! {
        (PreEscaped(XML_DECLARATION))
        urlset xmlns=(SITEMAP_NS) {
            @for loc in urls {
                url { loc { (loc) } lastmod { (lastmod) } }
            }
        }
    }
}

fn sitemap_index(locs: &[String], lastmod: &str) -> Markup {
    html! {
        (PreEscaped(XML_DECLARATION))
        sitemapindex xmlns=(SITEMAP_NS) {
            @for loc in locs {
                sitemap { loc { (loc) } lastmod { (lastmod) } }
            }
        }
    }
}

/// Render one family's `urlset` document.
pub fn render_family(
    index: &Index,
    site: &SiteUrls,
    family: SitemapFamily,
    lastmod: &str,
) -> Result<(String, usize), FacetError> {
    let urls: Vec<String> = family_paths(index, family)?
        .iter()
        .map(|p| site.build_url(p))
        .collect();
    Ok((urlset(&urls, lastmod).into_string(), urls.len()))
}

/// Render the `sitemapindex` document listing every family file.
pub fn render_index(site: &SiteUrls, lastmod: &str) -> String {
    let locs: Vec<String> = SitemapFamily::ALL
        .iter()
        .map(|f| site.build_url(f.file_name()))
        .collect();
    sitemap_index(&locs, lastmod).into_string()
}

/// A sitemap file written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenSitemap {
    pub file_name: &'static str,
    /// `<loc>` entries in the file.
    pub entries: usize,
}

/// Write the index and all family sitemaps into `dir`.
pub fn write_sitemaps(
    dir: &Path,
    index: &Index,
    site: &SiteUrls,
    lastmod: &str,
) -> Result<Vec<WrittenSitemap>, SitemapError> {
    // Render everything first so a cap error leaves no partial set behind.
    let mut rendered = Vec::with_capacity(SitemapFamily::ALL.len() + 1);
    rendered.push((INDEX_FILE, render_index(site, lastmod), SitemapFamily::ALL.len()));
    for family in SitemapFamily::ALL {
        let (xml, entries) = render_family(index, site, family, lastmod)?;
        rendered.push((family.file_name(), xml, entries));
    }

    fs::create_dir_all(dir)?;
    let mut written = Vec::with_capacity(rendered.len());
    for (file_name, xml, entries) in rendered {
        fs::write(dir.join(file_name), xml)?;
        log::debug!("Wrote {file_name} ({entries} entries)");
        written.push(WrittenSitemap { file_name, entries });
    }
    Ok(written)
}

/// Current UTC time in sitemap `lastmod` format.
pub fn lastmod_now() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
