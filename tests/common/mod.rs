//! Fixture project for end-to-end tests.
//!
//! Writes a station file and config into a temp root, then renders a complete
//! output tree for it with maud: every page the sitemaps list, each with a
//! title, description and canonical, linking the stations and facets the
//! query layer returns for it. The sitemaps themselves are written with the
//! real emitter.

#![allow(dead_code)]

use maud::{DOCTYPE, html};
use radio_atlas::config::{self, SiteConfig, SiteUrls};
use radio_atlas::facets::Index;
use radio_atlas::query::paginate;
use radio_atlas::sitemap::{self, FIXED_HUBS, SitemapFamily};
use radio_atlas::types::{EnrichedStation, LetterBucket, QualityTier};
use radio_atlas::data;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub const LASTMOD: &str = "2026-01-01T00:00:00Z";

pub const STATIONS_JSON: &str = r#"[
  {"slug": "athens-pop-fm", "name": "Athens Pop FM", "state": "Αθήνα", "genres": ["Pop", "Greek"], "bitrate": 128, "votes": 40, "lastcheckok": 1},
  {"slug": "athens-rock", "name": "Athens Rock", "state": "Αθήνα", "genres": ["Rock", "pop"], "bitrate": 320, "votes": 12, "lastcheckok": 1},
  {"slug": "athens-news", "name": "Athens News", "state": "Αθήνα", "genres": ["News"], "bitrate": 64, "votes": 3, "lastcheckok": 1},
  {"slug": "athens-jazz", "name": "Athens Jazz", "state": "Αθήνα", "genres": ["Jazz"], "bitrate": 192, "votes": 9, "lastcheckok": 1},
  {"slug": "thess-pop", "name": "Thessaloniki Pop", "state": "Θεσσαλονίκη", "genres": ["Pop"], "bitrate": 96, "votes": 22, "lastcheckok": 1},
  {"slug": "thess-80s", "name": "Thessaloniki 80s", "state": "Θεσσαλονίκη", "genres": ["80s", "Pop"], "bitrate": 256, "votes": 7, "lastcheckok": 1},
  {"slug": "patra-laika", "name": "Patra Laika", "state": "Πάτρα", "genres": ["Λαϊκά"], "bitrate": 0, "votes": 15, "lastcheckok": 1},
  {"slug": "heraklion-news", "name": "Heraklion News", "state": "Ηράκλειο", "genres": ["News"], "votes": 1, "lastcheckok": 1},
  {"slug": "nowhere-radio", "name": "Nowhere Radio", "state": "  ", "genres": ["Talk"], "bitrate": 48, "lastcheckok": 1},
  {"slug": "offline-fm", "name": "Offline FM", "state": "Βόλος", "genres": ["Rock"], "bitrate": 128, "votes": 99, "lastcheckok": 0},
  {"slug": "unchecked-fm", "name": "Unchecked FM", "state": "Λάρισα", "genres": null, "bitrate": null}
]"#;

/// `page_size = 2` so cities, genres, top-rated and quality tiers paginate.
pub const CONFIG_TOML: &str = r#"site = "https://example.org"

[facets]
page_size = 2
"#;

/// A temp project root with station data, config, rendered pages and
/// sitemaps.
pub struct Fixture {
    pub dir: TempDir,
    pub config: SiteConfig,
}

impl Fixture {
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn dist(&self) -> std::path::PathBuf {
        self.config.output_dir(self.root())
    }

    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.dist().join(rel)).unwrap()
    }

    pub fn write(&self, rel: &str, content: &str) {
        let path = self.dist().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    /// Render a standalone page with SEO tags into the output tree.
    pub fn write_page(&self, rel_dir: &str, links: &[(String, String)]) {
        let path = format!("/{rel_dir}/");
        let html = render_page(&self.config.urls().unwrap(), &path, "Extra", "Extra page", links);
        self.write(&format!("{rel_dir}/index.html"), &html);
    }

    pub fn validate(&self) -> radio_atlas::validate::Report {
        let config = config::load_config(self.root()).unwrap();
        radio_atlas::validate::run(self.root(), &config).unwrap()
    }
}

/// Project with the stock fixture data and a fully rendered, valid site.
pub fn built_fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    fs::write(root.join("config.toml"), CONFIG_TOML).unwrap();
    let config = config::load_config(root).unwrap();
    let data_path = config.data_path(root);
    fs::create_dir_all(data_path.parent().unwrap()).unwrap();
    fs::write(&data_path, STATIONS_JSON).unwrap();

    let stations = data::load_stations(&data_path).unwrap();
    let index = Index::build(stations, &config.facets);
    let dist = config.output_dir(root);
    let site = config.urls().unwrap();
    render_site(&dist, &index, &site);
    sitemap::write_sitemaps(&dist, &index, &site, LASTMOD).unwrap();
    Fixture { dir, config }
}

fn station_links<'a>(stations: impl IntoIterator<Item = &'a EnrichedStation>) -> Vec<(String, String)> {
    stations
        .into_iter()
        .map(|s| (format!("/station/{}/", s.slug()), s.station.name.clone()))
        .collect()
}

fn page_number(rest: &[&str]) -> usize {
    match rest {
        ["page", n] => n.parse().unwrap_or(1),
        _ => 1,
    }
}

/// Title and outgoing links of the page at `path`.
fn page_content(index: &Index, path: &str) -> (String, Vec<(String, String)>) {
    let size = index.limits().page_size;
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    match segments.as_slice() {
        ["station", slug] => {
            let station = index.station(slug).unwrap();
            let mut links = station_links(index.related(station));
            if index.city_stat(&station.city_slug).is_some() {
                links.push((format!("/city/{}/", station.city_slug), station.city_name.clone()));
            }
            (station.station.name.clone(), links)
        }
        ["city"] => (
            "Cities".into(),
            index
                .cities_alphabetical()
                .into_iter()
                .map(|l| (format!("/city/{}/", l.slug), l.name))
                .collect(),
        ),
        ["genre"] => (
            "Genres".into(),
            index
                .genres_alphabetical()
                .into_iter()
                .map(|l| (format!("/genre/{}/", l.slug), l.name))
                .collect(),
        ),
        ["city", "letter", key] => {
            let bucket = LetterBucket::from_key(key).unwrap();
            let links = index
                .cities_in_letter(bucket)
                .into_iter()
                .map(|l| (format!("/city/{}/", l.slug), l.name))
                .collect();
            (format!("Cities {bucket}"), links)
        }
        ["genre", "letter", key] => {
            let bucket = LetterBucket::from_key(key).unwrap();
            let links = index
                .genres_in_letter(bucket)
                .into_iter()
                .map(|l| (format!("/genre/{}/", l.slug), l.name))
                .collect();
            (format!("Genres {bucket}"), links)
        }
        ["city", city, "genre", genre] => (
            format!("{city} {genre}"),
            station_links(index.city_genre_stations(city, genre)),
        ),
        ["city", city, rest @ ..] => {
            let page = paginate(&index.city_stations(city), page_number(rest), size);
            (format!("{city} {}", page.current_page), station_links(page.items))
        }
        ["genre", genre, rest @ ..] => {
            let page = paginate(&index.genre_stations(genre), page_number(rest), size);
            (format!("{genre} {}", page.current_page), station_links(page.items))
        }
        ["quality", tier] | ["quality", tier, "page", _] => {
            let tier = QualityTier::from_key(tier).unwrap();
            let page = index.quality_page(tier, page_number(&segments[2..]));
            (format!("Quality {tier} {}", page.current_page), station_links(page.items))
        }
        ["top-rated", rest @ ..] => {
            let page = paginate(&index.top_rated(), page_number(rest), size);
            (format!("Top rated {}", page.current_page), station_links(page.items))
        }
        _ => (
            format!("Hub {path}"),
            FIXED_HUBS
                .iter()
                .map(|h| (h.to_string(), h.to_string()))
                .collect(),
        ),
    }
}

pub fn render_page(
    site: &SiteUrls,
    path: &str,
    title: &str,
    description: &str,
    links: &[(String, String)],
) -> String {
    html! {
        (DOCTYPE)
        html lang="el" {
            head {
                meta charset="utf-8";
                title { (title) " | Greek Radio" }
                meta name="description" content=(description);
                link rel="canonical" href=(site.build_url(path));
                link rel="sitemap" href="/sitemap.xml";
            }
            body {
                nav { a href="/" { "Αρχική" } " " a href="https://www.radio-browser.info/" { "Source" } }
                ul {
                    @for (href, label) in links {
                        li { a href=(href) { (label) } }
                    }
                }
            }
        }
    }
    .into_string()
}

/// Render every page listed by the sitemap families into `dist`.
pub fn render_site(dist: &Path, index: &Index, site: &SiteUrls) {
    for family in SitemapFamily::ALL {
        for path in sitemap::family_paths(index, family).unwrap() {
            let (title, links) = page_content(index, &path);
            let description = format!("{title}: Greek radio stations");
            let html = render_page(site, &path, &title, &description, &links);
            let file = dist.join(site.output_file(&path).unwrap());
            fs::create_dir_all(file.parent().unwrap()).unwrap();
            fs::write(file, html).unwrap();
        }
    }
}
