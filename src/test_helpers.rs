//! Shared test utilities for the radio-atlas test suite.
//!
//! Provides a fluent [`Station`] builder, index construction with stock
//! limits, and small extractors used across module tests.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let index = build_index(vec![
//!     station("radio-1").state("Αθήνα").genres(&["pop"]).bitrate(128).build(),
//!     station("radio-2").state("Πάτρα").lastcheckok(Some(0)).build(),
//! ]);
//! assert_eq!(slugs(&index.city_stations("athina")), vec!["radio-1"]);
//! ```

use crate::config::FacetLimits;
use crate::facets::Index;
use crate::types::{EnrichedStation, Station};

// =========================================================================
// Station builder
// =========================================================================

/// Builder for a listed station (`lastcheckok = 1`) with the given slug.
pub fn station(slug: &str) -> StationBuilder {
    StationBuilder {
        station: Station {
            slug: slug.to_string(),
            name: slug.to_string(),
            lastcheckok: Some(1),
            ..Default::default()
        },
    }
}

pub struct StationBuilder {
    station: Station,
}

impl StationBuilder {
    pub fn name(mut self, name: &str) -> Self {
        self.station.name = name.to_string();
        self
    }

    pub fn state(mut self, state: &str) -> Self {
        self.station.state = Some(state.to_string());
        self
    }

    pub fn genres<S: AsRef<str>>(mut self, genres: &[S]) -> Self {
        self.station.genres = Some(genres.iter().map(|g| g.as_ref().to_string()).collect());
        self
    }

    pub fn bitrate(mut self, bitrate: i64) -> Self {
        self.station.bitrate = Some(bitrate);
        self
    }

    pub fn votes(mut self, votes: i64) -> Self {
        self.station.votes = Some(votes);
        self
    }

    pub fn lastcheckok(mut self, value: Option<i64>) -> Self {
        self.station.lastcheckok = value;
        self
    }

    pub fn build(self) -> Station {
        self.station
    }
}

// =========================================================================
// Index helpers
// =========================================================================

/// Build an index with stock [`FacetLimits`].
pub fn build_index(stations: Vec<Station>) -> Index {
    Index::build(stations, &FacetLimits::default())
}

/// Slugs of a station list, in order.
pub fn slugs<'a>(stations: &[&'a EnrichedStation]) -> Vec<&'a str> {
    stations.iter().map(|s| s.slug()).collect()
}
