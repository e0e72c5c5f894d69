//! # Radio Atlas
//!
//! Facet derivation and build validation for a static directory of Greek
//! internet radio stations. A single JSON file of station records is the data
//! source: stations are grouped into cities, genres, bitrate quality tiers and
//! alphabetical letter hubs, and every listing page of the generated site is
//! one of those facets.
//!
//! # Architecture
//!
//! ```text
//! stations.json ──► Index::build ──► query layer ──► page templates (external)
//!                                         │
//!                                         └──────────► sitemap files
//!
//! stations.json + dist/ ──► validate ──► Report
//! ```
//!
//! The [`facets::Index`] is built once and never mutated; every listing the
//! site needs is a read-only query against it. The validator does not
//! use the index: it recomputes what the output should contain
//! straight from the station records and compares that with what the output
//! tree actually contains.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`slug`] | Greek-to-Latin transliterating slugifier and genre normalization |
//! | [`collate`] | Greek-first, accent- and case-insensitive ordering of display names |
//! | [`types`] | `Station`, bitrate buckets, quality tiers, letter buckets |
//! | [`data`] | Loading the station JSON file |
//! | [`facets`] | The immutable facet [`Index`](facets::Index) |
//! | [`query`] | Pagination, nearby facets, related stations, city × genre combos |
//! | [`sitemap`] | `sitemap.xml` index and per-family `urlset` files |
//! | [`validate`] | Post-build SEO and facet consistency checks |
//! | [`config`] | `config.toml` loading, defaults, validation, URL mapping |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Slugs Are Identity
//!
//! Cities and genres have no ids in the source data. Their slug is the key
//! everywhere: facet lookups, URLs, letter buckets and the validator's
//! comparison all go through [`slug::slugify`], so two spellings that slug
//! the same way are the same facet.
//!
//! ## One Source for Limits
//!
//! The city × genre limits (top cities, top genres per city, combination
//! cap) live in the `[facets]` table of `config.toml`. The sitemap emitter
//! and the validator read the same [`config::FacetLimits`], so they cannot
//! disagree about which intersection pages should exist. Exceeding the cap
//! is an error, never a silent truncation.
//!
//! ## Listed vs. All Stations
//!
//! Only stations whose last health check passed (`lastcheckok == 1`) take
//! part in facets. Every input station still gets a page, so station page
//! counts and `sitemap-stations.xml` cover all records.

pub mod collate;
pub mod config;
pub mod data;
pub mod facets;
pub mod output;
pub mod query;
pub mod sitemap;
pub mod slug;
pub mod types;
pub mod validate;

#[cfg(test)]
pub(crate) mod test_helpers;
