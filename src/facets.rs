//! Facet index over the station list.
//!
//! [`Index::build`] runs once per build over the full input and produces an
//! immutable value that every consumer (sitemap emitter, summary output,
//! validator) borrows. There is no incremental update path: when the input
//! file changes, the whole index is rebuilt.
//!
//! ## What gets indexed
//!
//! All stations are kept for slug lookup and total counts. Facets are derived
//! only from *listed* stations (`lastcheckok == 1`):
//!
//! ```text
//! listed station ──► city facet      (exactly one, "unknown" fallback)
//!                ├─► genre facets    (zero or more, deduplicated)
//!                ├─► city × genre and genre × city co-occurrence counts
//!                └─► bitrate bucket of its city and of each of its genres
//! ```
//!
//! ## Ordering
//!
//! Facets are first collected in first-seen order, then sorted by station
//! count descending with a stable sort. Ties therefore keep the order in
//! which the facet first appeared in the input. The same rule applies to
//! every top-N list ([`OrderedCounts::top`]).

use crate::config::FacetLimits;
use crate::slug;
use crate::types::{BitrateDistribution, EnrichedStation, Station, TopItem};
use serde::Serialize;
use std::collections::HashMap;

/// Aggregate over the listed stations of one city.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityStat {
    pub city_slug: String,
    pub city_name: String,
    pub count: usize,
    pub top_genres: Vec<TopItem>,
    pub bitrate_distribution: BitrateDistribution,
}

/// Aggregate over the listed stations of one genre.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreStat {
    pub genre_slug: String,
    pub genre_name: String,
    pub count: usize,
    pub top_cities: Vec<TopItem>,
    pub bitrate_distribution: BitrateDistribution,
}

/// Counter that remembers the order keys were first inserted.
#[derive(Debug, Clone, Default)]
pub struct OrderedCounts {
    entries: Vec<(String, usize)>,
    positions: HashMap<String, usize>,
}

impl OrderedCounts {
    pub fn increment(&mut self, key: &str) {
        match self.positions.get(key) {
            Some(&pos) => self.entries[pos].1 += 1,
            None => {
                self.positions.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), 1));
            }
        }
    }

    pub fn get(&self, key: &str) -> usize {
        self.positions
            .get(key)
            .map(|&pos| self.entries[pos].1)
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Up to `limit` keys by count descending; ties keep insertion order.
    pub fn top(&self, limit: usize) -> Vec<(&str, usize)> {
        let mut ranked: Vec<(&str, usize)> = self
            .entries
            .iter()
            .map(|(k, c)| (k.as_str(), *c))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(limit);
        ranked
    }
}

/// Accumulator for one facet value during the build pass.
#[derive(Debug, Clone)]
pub(crate) struct Facet {
    pub(crate) slug: String,
    pub(crate) name: String,
    /// Indices into `Index::stations`, in listing order.
    pub(crate) members: Vec<usize>,
    /// Co-occurrence counts with the other facet family.
    pub(crate) cross: OrderedCounts,
    pub(crate) distribution: BitrateDistribution,
}

impl Facet {
    fn new(slug: &str, name: String) -> Self {
        Self {
            slug: slug.to_string(),
            name,
            members: Vec::new(),
            cross: OrderedCounts::default(),
            distribution: BitrateDistribution::default(),
        }
    }
}

/// Facets in first-seen order with slug lookup.
#[derive(Debug, Clone, Default)]
pub(crate) struct FacetTable {
    pub(crate) facets: Vec<Facet>,
    positions: HashMap<String, usize>,
}

impl FacetTable {
    fn entry(&mut self, slug: &str, name: impl FnOnce() -> String) -> &mut Facet {
        let pos = match self.positions.get(slug) {
            Some(&pos) => pos,
            None => {
                let pos = self.facets.len();
                self.facets.push(Facet::new(slug, name()));
                self.positions.insert(slug.to_string(), pos);
                pos
            }
        };
        &mut self.facets[pos]
    }

    /// Stable re-sort by member count descending.
    fn sort_by_count(&mut self) {
        self.facets
            .sort_by(|a, b| b.members.len().cmp(&a.members.len()));
        self.positions = self
            .facets
            .iter()
            .enumerate()
            .map(|(i, f)| (f.slug.clone(), i))
            .collect();
    }

    pub(crate) fn get(&self, slug: &str) -> Option<&Facet> {
        self.positions.get(slug).map(|&pos| &self.facets[pos])
    }
}

/// Immutable facet index, built once from the station input.
#[derive(Debug, Clone)]
pub struct Index {
    pub(crate) stations: Vec<EnrichedStation>,
    pub(crate) listed: Vec<usize>,
    by_slug: HashMap<String, usize>,
    pub(crate) cities: FacetTable,
    pub(crate) genres: FacetTable,
    city_stats: Vec<CityStat>,
    genre_stats: Vec<GenreStat>,
    pub(crate) limits: FacetLimits,
}

impl Index {
    /// Enrich every station and derive all facets in a single pass over the
    /// listed subset.
    pub fn build(stations: Vec<Station>, limits: &FacetLimits) -> Self {
        let stations: Vec<EnrichedStation> =
            stations.into_iter().map(EnrichedStation::new).collect();

        let mut by_slug = HashMap::with_capacity(stations.len());
        for (i, s) in stations.iter().enumerate() {
            by_slug.entry(s.slug().to_string()).or_insert(i);
        }

        let listed: Vec<usize> = stations
            .iter()
            .enumerate()
            .filter(|(_, s)| s.station.is_listed())
            .map(|(i, _)| i)
            .collect();

        let mut cities = FacetTable::default();
        let mut genres = FacetTable::default();

        for &i in &listed {
            let station = &stations[i];
            let bucket = station.station.bitrate_bucket();

            let city = cities.entry(&station.city_slug, || station.city_name.clone());
            city.members.push(i);
            city.distribution.add(bucket);
            for genre_slug in &station.normalized_genres {
                city.cross.increment(genre_slug);
            }

            for genre_slug in &station.normalized_genres {
                let genre = genres.entry(genre_slug, || slug::title_from_slug(genre_slug));
                genre.members.push(i);
                genre.distribution.add(bucket);
                genre.cross.increment(&station.city_slug);
            }
        }

        cities.sort_by_count();
        genres.sort_by_count();

        let city_stats: Vec<CityStat> = cities
            .facets
            .iter()
            .map(|f| CityStat {
                city_slug: f.slug.clone(),
                city_name: f.name.clone(),
                count: f.members.len(),
                top_genres: f
                    .cross
                    .top(limits.top_items)
                    .into_iter()
                    .map(|(genre_slug, count)| TopItem {
                        slug: genre_slug.to_string(),
                        name: slug::title_from_slug(genre_slug),
                        count,
                    })
                    .collect(),
                bitrate_distribution: f.distribution,
            })
            .collect();

        let genre_stats: Vec<GenreStat> = genres
            .facets
            .iter()
            .map(|f| GenreStat {
                genre_slug: f.slug.clone(),
                genre_name: f.name.clone(),
                count: f.members.len(),
                top_cities: f
                    .cross
                    .top(limits.top_items)
                    .into_iter()
                    .map(|(city_slug, count)| TopItem {
                        slug: city_slug.to_string(),
                        name: slug::title_from_slug(city_slug),
                        count,
                    })
                    .collect(),
                bitrate_distribution: f.distribution,
            })
            .collect();

        log::debug!(
            "Indexed {} stations ({} listed): {} cities, {} genres",
            stations.len(),
            listed.len(),
            city_stats.len(),
            genre_stats.len()
        );

        Self {
            stations,
            listed,
            by_slug,
            cities,
            genres,
            city_stats,
            genre_stats,
            limits: *limits,
        }
    }

    pub fn limits(&self) -> &FacetLimits {
        &self.limits
    }

    /// Every input station, listed or not.
    pub fn all_stations(&self) -> &[EnrichedStation] {
        &self.stations
    }

    /// Stations with `lastcheckok == 1`, in input order.
    pub fn listed_stations(&self) -> impl Iterator<Item = &EnrichedStation> + '_ {
        self.listed.iter().map(|&i| &self.stations[i])
    }

    pub fn total_stations(&self) -> usize {
        self.stations.len()
    }

    pub fn listed_count(&self) -> usize {
        self.listed.len()
    }

    /// Station by slug, searched over all stations.
    pub fn station(&self, slug: &str) -> Option<&EnrichedStation> {
        self.by_slug.get(slug).map(|&i| &self.stations[i])
    }

    /// Cities by station count descending.
    pub fn cities(&self) -> &[CityStat] {
        &self.city_stats
    }

    /// Genres by station count descending.
    pub fn genres(&self) -> &[GenreStat] {
        &self.genre_stats
    }

    pub fn city_stat(&self, city_slug: &str) -> Option<&CityStat> {
        self.cities
            .positions
            .get(city_slug)
            .map(|&pos| &self.city_stats[pos])
    }

    pub fn genre_stat(&self, genre_slug: &str) -> Option<&GenreStat> {
        self.genres
            .positions
            .get(genre_slug)
            .map(|&pos| &self.genre_stats[pos])
    }

    /// Listed stations of a city, in listing order. Unknown city: empty.
    pub fn city_stations(&self, city_slug: &str) -> Vec<&EnrichedStation> {
        self.members(self.cities.get(city_slug))
    }

    /// Listed stations of a genre, in listing order. Unknown genre: empty.
    pub fn genre_stations(&self, genre_slug: &str) -> Vec<&EnrichedStation> {
        self.members(self.genres.get(genre_slug))
    }

    fn members(&self, facet: Option<&Facet>) -> Vec<&EnrichedStation> {
        facet
            .map(|f| f.members.iter().map(|&i| &self.stations[i]).collect())
            .unwrap_or_default()
    }

    /// Top genres of a city by co-occurrence, ties in first-seen order.
    pub fn top_genres_for_city(&self, city_slug: &str, limit: usize) -> Vec<TopItem> {
        let Some(city) = self.cities.get(city_slug) else {
            return Vec::new();
        };
        city.cross
            .top(limit)
            .into_iter()
            .map(|(genre_slug, count)| TopItem {
                slug: genre_slug.to_string(),
                name: slug::title_from_slug(genre_slug),
                count,
            })
            .collect()
    }

    /// Listed stations by votes descending; ties keep input order.
    pub fn top_rated(&self) -> Vec<&EnrichedStation> {
        let mut ranked: Vec<&EnrichedStation> = self.listed_stations().collect();
        ranked.sort_by(|a, b| b.station.vote_count().cmp(&a.station.vote_count()));
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use crate::types::BitrateBucket;

    #[test]
    fn spec_example_station() {
        let index = build_index(vec![
            station("radio-athina")
                .name("Ράδιο Αθήνα")
                .state("Αθήνα")
                .genres(&["Pop", "pop"])
                .bitrate(128)
                .votes(10)
                .build(),
        ]);
        let s = index.station("radio-athina").unwrap();
        assert_eq!(s.city_slug, "athina");
        assert_eq!(s.normalized_genres, vec!["pop"]);
        let city = index.city_stat("athina").unwrap();
        assert_eq!(city.count, 1);
        assert_eq!(city.bitrate_distribution.get(BitrateBucket::Under192), 1);
        assert_eq!(index.genre_stat("pop").unwrap().count, 1);
    }

    #[test]
    fn same_state_produces_one_city() {
        let index = build_index(vec![
            station("a").state("Θεσσαλονίκη").bitrate(64).build(),
            station("b").state(" Θεσσαλονίκη ").build(),
        ]);
        assert_eq!(index.cities().len(), 1);
        let city = &index.cities()[0];
        assert_eq!(city.city_slug, "thessaloniki");
        assert_eq!(city.city_name, "Θεσσαλονίκη");
        assert_eq!(city.count, 2);
        assert_eq!(city.bitrate_distribution.total(), 2);
        assert_eq!(city.bitrate_distribution.get(BitrateBucket::Unknown), 1);
    }

    #[test]
    fn unlisted_stations_only_reachable_by_slug() {
        let index = build_index(vec![
            station("live").state("Πάτρα").genres(&["rock"]).build(),
            station("dead").state("Βόλος").genres(&["jazz"]).lastcheckok(Some(0)).build(),
            station("never").state("Βόλος").lastcheckok(None).build(),
        ]);
        assert_eq!(index.total_stations(), 3);
        assert_eq!(index.listed_count(), 1);
        assert!(index.station("dead").is_some());
        assert!(index.city_stat("volos").is_none());
        assert!(index.genre_stat("jazz").is_none());
    }

    #[test]
    fn station_without_genres_still_counts_for_city() {
        let index = build_index(vec![station("a").state("Χανιά").build()]);
        assert_eq!(index.city_stat("chania").unwrap().count, 1);
        assert!(index.genres().is_empty());
        assert!(index.city_stat("chania").unwrap().top_genres.is_empty());
    }

    #[test]
    fn missing_state_goes_to_unknown_city() {
        let index = build_index(vec![station("a").build()]);
        let city = &index.cities()[0];
        assert_eq!(city.city_slug, "unknown-city");
        assert_eq!(city.city_name, "Unknown City");
    }

    #[test]
    fn cities_sorted_by_count_ties_first_seen() {
        let index = build_index(vec![
            station("1").state("Βόλος").build(),
            station("2").state("Πάτρα").build(),
            station("3").state("Αθήνα").build(),
            station("4").state("Αθήνα").build(),
        ]);
        let slugs: Vec<&str> = index.cities().iter().map(|c| c.city_slug.as_str()).collect();
        assert_eq!(slugs, vec!["athina", "volos", "patra"]);
        assert_eq!(index.city_stat("patra").unwrap().count, 1);
    }

    #[test]
    fn top_genres_ranked_with_stable_ties() {
        let index = build_index(vec![
            station("1").state("Αθήνα").genres(&["jazz", "pop"]).build(),
            station("2").state("Αθήνα").genres(&["rock", "pop"]).build(),
            station("3").state("Αθήνα").genres(&["news"]).build(),
        ]);
        let top: Vec<(&str, usize)> = index.cities()[0]
            .top_genres
            .iter()
            .map(|t| (t.slug.as_str(), t.count))
            .collect();
        assert_eq!(top, vec![("pop", 2), ("jazz", 1), ("rock", 1), ("news", 1)]);
        assert_eq!(index.cities()[0].top_genres[0].name, "Pop");
    }

    #[test]
    fn top_items_limit_applies() {
        let genres = ["a", "b", "c", "d", "e", "f", "g"];
        let index = build_index(vec![station("1").state("Αθήνα").genres(&genres).build()]);
        assert_eq!(index.cities()[0].top_genres.len(), 5);
        assert_eq!(index.top_genres_for_city("athina", 7).len(), 7);
    }

    #[test]
    fn genre_top_cities_are_titled_from_slug() {
        let index = build_index(vec![
            station("1").state("Ηράκλειο").genres(&["pop"]).build(),
            station("2").state("Ηράκλειο").genres(&["pop"]).build(),
            station("3").state("Λάρισα").genres(&["pop"]).build(),
        ]);
        let pop = index.genre_stat("pop").unwrap();
        assert_eq!(pop.genre_name, "Pop");
        assert_eq!(pop.top_cities[0].slug, "irakleio");
        assert_eq!(pop.top_cities[0].name, "Irakleio");
        assert_eq!(pop.top_cities[1].name, "Larisa");
        assert_eq!(pop.top_cities[0].count, 2);
        assert_eq!(pop.top_cities[1].count, 1);
    }

    #[test]
    fn genre_distribution_follows_station_bitrate() {
        let index = build_index(vec![
            station("1").genres(&["pop", "rock"]).bitrate(320).build(),
            station("2").genres(&["pop"]).bitrate(32).build(),
        ]);
        let pop = index.genre_stat("pop").unwrap();
        assert_eq!(pop.bitrate_distribution.get(BitrateBucket::From256), 1);
        assert_eq!(pop.bitrate_distribution.get(BitrateBucket::Under64), 1);
        let rock = index.genre_stat("rock").unwrap();
        assert_eq!(rock.bitrate_distribution.total(), 1);
    }

    #[test]
    fn member_lists_keep_listing_order() {
        let index = build_index(vec![
            station("x").state("Αθήνα").genres(&["pop"]).build(),
            station("y").state("Πάτρα").genres(&["pop"]).build(),
            station("z").state("Αθήνα").genres(&["pop"]).build(),
        ]);
        assert_eq!(slugs(&index.city_stations("athina")), vec!["x", "z"]);
        assert_eq!(slugs(&index.genre_stations("pop")), vec!["x", "y", "z"]);
        assert!(index.city_stations("nowhere").is_empty());
    }

    #[test]
    fn duplicate_slug_lookup_returns_first() {
        let index = build_index(vec![
            station("dup").name("First").build(),
            station("dup").name("Second").build(),
        ]);
        assert_eq!(index.station("dup").unwrap().station.name, "First");
    }

    #[test]
    fn top_rated_orders_by_votes_with_missing_as_zero() {
        let index = build_index(vec![
            station("a").votes(5).build(),
            station("b").build(),
            station("c").votes(50).build(),
            station("d").votes(5).build(),
            station("e").votes(99).lastcheckok(Some(0)).build(),
        ]);
        assert_eq!(slugs(&index.top_rated()), vec!["c", "a", "d", "b"]);
    }

    #[test]
    fn ordered_counts_top() {
        let mut counts = OrderedCounts::default();
        for key in ["b", "a", "b", "c", "a", "d"] {
            counts.increment(key);
        }
        assert_eq!(counts.get("a"), 2);
        assert_eq!(counts.get("zz"), 0);
        assert_eq!(counts.len(), 4);
        assert_eq!(counts.top(3), vec![("b", 2), ("a", 2), ("c", 1)]);
    }
}
