//! Expected facet state, recomputed from the raw station records.
//!
//! Does not go through [`crate::facets::Index`]. Only the slug functions, the
//! bucket and tier definitions, and [`FacetLimits`] are shared with it.

use crate::config::FacetLimits;
use crate::facets::OrderedCounts;
use crate::slug;
use crate::types::{LetterBucket, Station, UNKNOWN_CITY};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// What the output tree should contain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpectedState {
    /// Number of input records; each gets a station page.
    pub station_count: usize,
    /// Letter bucket key → city slugs in that bucket. All 28 keys present.
    pub city_letters: BTreeMap<String, BTreeSet<String>>,
    /// Letter bucket key → genre slugs in that bucket. All 28 keys present.
    pub genre_letters: BTreeMap<String, BTreeSet<String>>,
    /// Allowed intersections as `"<city>/<genre>"`.
    pub combos: BTreeSet<String>,
    /// Size of the intersection set before the cap is applied, when it
    /// exceeds the cap.
    pub combo_overflow: Option<usize>,
    pub combination_cap: usize,
    /// Bitrate of every input station, by slug.
    pub bitrates: HashMap<String, Option<i64>>,
}

fn empty_buckets() -> BTreeMap<String, BTreeSet<String>> {
    LetterBucket::all()
        .into_iter()
        .map(|b| (b.key(), BTreeSet::new()))
        .collect()
}

fn city_slug_of(station: &Station) -> String {
    let state = station.state.as_deref().unwrap_or("").trim();
    slug::slugify(if state.is_empty() { UNKNOWN_CITY } else { state })
}

/// Recompute the expected state from raw station records.
pub fn compute_expected(stations: &[Station], limits: &FacetLimits) -> ExpectedState {
    let mut expected = ExpectedState {
        station_count: stations.len(),
        city_letters: empty_buckets(),
        genre_letters: empty_buckets(),
        combination_cap: limits.combination_cap,
        ..Default::default()
    };

    let mut city_counts = OrderedCounts::default();
    let mut city_genres: HashMap<String, OrderedCounts> = HashMap::new();

    for station in stations {
        expected
            .bitrates
            .entry(station.slug.clone())
            .or_insert(station.bitrate);

        if !station.is_listed() {
            continue;
        }
        let city = city_slug_of(station);
        let genres = station.normalized_genres();

        city_counts.increment(&city);
        let co = city_genres.entry(city.clone()).or_default();
        for genre in &genres {
            co.increment(genre);
            expected
                .genre_letters
                .entry(LetterBucket::of(genre).key())
                .or_default()
                .insert(genre.clone());
        }
        expected
            .city_letters
            .entry(LetterBucket::of(&city).key())
            .or_default()
            .insert(city);
    }

    let mut combos = Vec::new();
    for (city, _) in city_counts.top(limits.top_cities) {
        if let Some(co) = city_genres.get(city) {
            for (genre, _) in co.top(limits.top_genres_per_city) {
                combos.push(format!("{city}/{genre}"));
            }
        }
    }
    if combos.len() > limits.combination_cap {
        expected.combo_overflow = Some(combos.len());
    }
    expected.combos = combos.into_iter().collect();
    expected
}
