//! Read-only queries over an [`Index`].
//!
//! Everything here is derived on demand from the immutable index: listing
//! pages, alphabetical neighbours, related stations, letter hubs, quality
//! tiers and the city × genre intersections.
//!
//! ## City × genre cap
//!
//! Intersection pages are the top `top_cities` cities crossed with each
//! city's top `top_genres_per_city` genres. If that set is larger than
//! `combination_cap`, [`Index::city_genre_combos`] returns
//! [`FacetError::CapExceeded`] instead of dropping combinations, so the
//! sitemap and the validator can never disagree on which ones were kept.

use crate::collate;
use crate::config::FacetLimits;
use crate::facets::{FacetTable, Index};
use crate::types::{EnrichedStation, LetterBucket, QualityTier};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FacetError {
    #[error("city-genre combinations exceed cap: {combinations} > {cap}")]
    CapExceeded { combinations: usize, cap: usize },
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based, clamped into `1..=total_pages`.
    pub current_page: usize,
    /// At least 1, even for an empty listing.
    pub total_pages: usize,
}

/// Number of pages for `len` items; never less than 1.
pub fn page_count(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1)).max(1)
}

/// Slice `items` into the requested page, clamping out-of-range requests.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_pages = page_count(items.len(), page_size);
    let current_page = page.clamp(1, total_pages);
    let start = ((current_page - 1) * page_size).min(items.len());
    let end = (start + page_size).min(items.len());
    Page {
        items: items[start..end].to_vec(),
        current_page,
        total_pages,
    }
}

/// A city × genre intersection page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CityGenreCombo {
    pub city_slug: String,
    pub city_name: String,
    pub genre_slug: String,
    pub genre_name: String,
    /// Listed stations in the city tagged with the genre.
    pub count: usize,
}

/// A facet entry as shown on a letter hub or in a "nearby" list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetLink {
    pub slug: String,
    pub name: String,
    pub count: usize,
}

/// Alphabetical (collated) order of a facet table's display names.
fn alphabetical(table: &FacetTable) -> Vec<FacetLink> {
    let mut links: Vec<FacetLink> = table
        .facets
        .iter()
        .map(|f| FacetLink {
            slug: f.slug.clone(),
            name: f.name.clone(),
            count: f.members.len(),
        })
        .collect();
    links.sort_by(|a, b| collate::compare(&a.name, &b.name));
    links
}

/// Up to `limit` neighbours of `slug` in alphabetical order, half before and
/// half after, shifted inward at either end of the list.
fn nearby(table: &FacetTable, slug: &str, limit: usize) -> Vec<FacetLink> {
    let ordered = alphabetical(table);
    let Some(pos) = ordered.iter().position(|l| l.slug == slug) else {
        return Vec::new();
    };
    let window = limit.saturating_add(1);
    let half = limit / 2;
    let mut start = pos.saturating_sub(half);
    let end = start.saturating_add(window).min(ordered.len());
    start = end.saturating_sub(window);
    ordered[start..end]
        .iter()
        .filter(|l| l.slug != slug)
        .take(limit)
        .cloned()
        .collect()
}

impl Index {
    /// Cities in alphabetical order of display name.
    pub fn cities_alphabetical(&self) -> Vec<FacetLink> {
        alphabetical(&self.cities)
    }

    /// Genres in alphabetical order of display name.
    pub fn genres_alphabetical(&self) -> Vec<FacetLink> {
        alphabetical(&self.genres)
    }

    pub fn nearby_cities(&self, city_slug: &str, limit: usize) -> Vec<FacetLink> {
        nearby(&self.cities, city_slug, limit)
    }

    pub fn nearby_genres(&self, genre_slug: &str, limit: usize) -> Vec<FacetLink> {
        nearby(&self.genres, genre_slug, limit)
    }

    /// Related stations for a station page, up to the configured
    /// `related_max`.
    pub fn related(&self, station: &EnrichedStation) -> Vec<&EnrichedStation> {
        self.related_stations(station, self.limits.related_max)
    }

    /// Same-city stations first, then same-genre stations genre by genre.
    ///
    /// Deduplicated by slug, never includes `station`, stops at `max`.
    pub fn related_stations(&self, station: &EnrichedStation, max: usize) -> Vec<&EnrichedStation> {
        let mut related: Vec<&EnrichedStation> = Vec::new();
        let mut used: Vec<&str> = vec![station.slug()];
        if max == 0 {
            return related;
        }

        let candidates = self.city_stations(&station.city_slug).into_iter().chain(
            station
                .normalized_genres
                .iter()
                .flat_map(|g| self.genre_stations(g)),
        );
        for candidate in candidates {
            if used.contains(&candidate.slug()) {
                continue;
            }
            used.push(candidate.slug());
            related.push(candidate);
            if related.len() >= max {
                break;
            }
        }
        related
    }

    /// City × genre intersections for the given limits, in city-rank then
    /// genre-rank order.
    pub fn city_genre_combos(&self, limits: &FacetLimits) -> Result<Vec<CityGenreCombo>, FacetError> {
        let mut combos = Vec::new();
        for city in self.cities().iter().take(limits.top_cities) {
            for genre in self.top_genres_for_city(&city.city_slug, limits.top_genres_per_city) {
                combos.push(CityGenreCombo {
                    city_slug: city.city_slug.clone(),
                    city_name: city.city_name.clone(),
                    genre_slug: genre.slug,
                    genre_name: genre.name,
                    count: genre.count,
                });
            }
        }
        if combos.len() > limits.combination_cap {
            return Err(FacetError::CapExceeded {
                combinations: combos.len(),
                cap: limits.combination_cap,
            });
        }
        Ok(combos)
    }

    /// Listed stations of a city that carry a genre, in listing order.
    pub fn city_genre_stations(&self, city_slug: &str, genre_slug: &str) -> Vec<&EnrichedStation> {
        self.city_stations(city_slug)
            .into_iter()
            .filter(|s| s.normalized_genres.iter().any(|g| g == genre_slug))
            .collect()
    }

    /// Listed stations in `tier`, votes descending, capped at `quality_cap`.
    pub fn stations_by_quality(&self, tier: QualityTier) -> Vec<&EnrichedStation> {
        let mut stations: Vec<&EnrichedStation> = self
            .listed_stations()
            .filter(|s| tier.contains(s.station.bitrate))
            .collect();
        stations.sort_by(|a, b| b.station.vote_count().cmp(&a.station.vote_count()));
        stations.truncate(self.limits.quality_cap);
        stations
    }

    /// One page of a quality tier listing.
    pub fn quality_page(&self, tier: QualityTier, page: usize) -> Page<&EnrichedStation> {
        paginate(&self.stations_by_quality(tier), page, self.limits.page_size)
    }

    /// The 28 hub buckets in display order.
    pub fn letter_hub_buckets(&self) -> Vec<LetterBucket> {
        LetterBucket::all()
    }

    pub fn cities_in_letter(&self, bucket: LetterBucket) -> Vec<FacetLink> {
        self.cities_alphabetical()
            .into_iter()
            .filter(|l| LetterBucket::of(&l.slug) == bucket)
            .collect()
    }

    pub fn genres_in_letter(&self, bucket: LetterBucket) -> Vec<FacetLink> {
        self.genres_alphabetical()
            .into_iter()
            .filter(|l| LetterBucket::of(&l.slug) == bucket)
            .collect()
    }

    /// Page count of a city listing at the configured page size.
    pub fn city_page_count(&self, city_slug: &str) -> usize {
        page_count(self.city_stations(city_slug).len(), self.limits.page_size)
    }

    pub fn genre_page_count(&self, genre_slug: &str) -> usize {
        page_count(self.genre_stations(genre_slug).len(), self.limits.page_size)
    }

    pub fn top_rated_page_count(&self) -> usize {
        page_count(self.listed_count(), self.limits.page_size)
    }

    pub fn quality_page_count(&self, tier: QualityTier) -> usize {
        page_count(self.stations_by_quality(tier).len(), self.limits.page_size)
    }
}
