//! Station records and the small value types derived from them.
//!
//! [`Station`] mirrors one entry of the input JSON array. Every field except
//! `slug` and `name` is optional; the defaulting rules live on the accessor
//! methods rather than being repeated at each call site.

use crate::slug;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// City name used when a station has no usable `state`.
pub const UNKNOWN_CITY: &str = "Unknown City";

/// One station record from the input file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Station {
    /// Unique key, precomputed upstream.
    pub slug: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub stationuuid: Option<String>,
    /// Free-text region, used as the city name.
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub countrycode: Option<String>,
    #[serde(default)]
    pub stream_url: Option<String>,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub favicon: Option<String>,
    #[serde(default)]
    pub genres: Option<Vec<String>>,
    #[serde(default)]
    pub language: Option<String>,
    /// kbps; `None` and non-positive values mean unknown.
    #[serde(default)]
    pub bitrate: Option<i64>,
    #[serde(default)]
    pub codec: Option<String>,
    #[serde(default)]
    pub clickcount: Option<i64>,
    /// Only `Some(1)` lists the station.
    #[serde(default)]
    pub lastcheckok: Option<i64>,
    #[serde(default)]
    pub votes: Option<i64>,
    #[serde(default)]
    pub hls: Option<i64>,
    #[serde(default)]
    pub ssl_error: Option<i64>,
    #[serde(default)]
    pub geo_lat: Option<f64>,
    #[serde(default)]
    pub geo_long: Option<f64>,
}

impl Station {
    /// Whether the station passed its last liveness check.
    pub fn is_listed(&self) -> bool {
        self.lastcheckok == Some(1)
    }

    /// Votes for ranking; missing counts as zero.
    pub fn vote_count(&self) -> i64 {
        self.votes.unwrap_or(0)
    }

    /// Trimmed `state`, or [`UNKNOWN_CITY`].
    pub fn city_name(&self) -> String {
        match self.state.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => UNKNOWN_CITY.to_string(),
        }
    }

    /// Deduplicated genre slugs in first-seen order. Empty tags are dropped.
    pub fn normalized_genres(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for genre in self.genres.iter().flatten() {
            if genre.is_empty() {
                continue;
            }
            let slug = slug::normalize_genre(genre);
            if !out.contains(&slug) {
                out.push(slug);
            }
        }
        out
    }

    pub fn quality_tier(&self) -> Option<QualityTier> {
        QualityTier::from_bitrate(self.bitrate)
    }

    pub fn bitrate_bucket(&self) -> BitrateBucket {
        BitrateBucket::from_bitrate(self.bitrate)
    }
}

/// A station with its derived facet keys.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedStation {
    #[serde(flatten)]
    pub station: Station,
    pub city_name: String,
    pub city_slug: String,
    pub normalized_genres: Vec<String>,
}

impl EnrichedStation {
    pub fn new(station: Station) -> Self {
        let city_name = station.city_name();
        let city_slug = slug::slugify(&city_name);
        let normalized_genres = station.normalized_genres();
        Self {
            station,
            city_name,
            city_slug,
            normalized_genres,
        }
    }

    pub fn slug(&self) -> &str {
        &self.station.slug
    }
}

/// Bitrate histogram bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BitrateBucket {
    #[serde(rename = "0-63")]
    Under64,
    #[serde(rename = "64-127")]
    Under128,
    #[serde(rename = "128-191")]
    Under192,
    #[serde(rename = "192-255")]
    Under256,
    #[serde(rename = "256+")]
    From256,
    #[serde(rename = "unknown")]
    Unknown,
}

impl BitrateBucket {
    pub const ALL: [BitrateBucket; 6] = [
        BitrateBucket::Under64,
        BitrateBucket::Under128,
        BitrateBucket::Under192,
        BitrateBucket::Under256,
        BitrateBucket::From256,
        BitrateBucket::Unknown,
    ];

    pub fn from_bitrate(bitrate: Option<i64>) -> Self {
        match bitrate {
            None => Self::Unknown,
            Some(b) if b <= 0 => Self::Unknown,
            Some(b) if b < 64 => Self::Under64,
            Some(b) if b < 128 => Self::Under128,
            Some(b) if b < 192 => Self::Under192,
            Some(b) if b < 256 => Self::Under256,
            Some(_) => Self::From256,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Under64 => "0-63",
            Self::Under128 => "64-127",
            Self::Under192 => "128-191",
            Self::Under256 => "192-255",
            Self::From256 => "256+",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for BitrateBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Station counts per [`BitrateBucket`].
///
/// Serializes as a map keyed by bucket label, all six keys always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BitrateDistribution {
    counts: [usize; 6],
}

impl Serialize for BitrateDistribution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.counts.len()))?;
        for bucket in BitrateBucket::ALL {
            map.serialize_entry(bucket.label(), &self.get(bucket))?;
        }
        map.end()
    }
}

impl BitrateDistribution {
    pub fn add(&mut self, bucket: BitrateBucket) {
        self.counts[bucket as usize] += 1;
    }

    pub fn get(&self, bucket: BitrateBucket) -> usize {
        self.counts[bucket as usize]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Human summary of the known buckets, e.g. `"2 at 128-191 kbps"`.
    pub fn summary(&self) -> String {
        let parts: Vec<String> = BitrateBucket::ALL
            .iter()
            .filter(|b| **b != BitrateBucket::Unknown)
            .filter(|b| self.get(**b) > 0)
            .map(|b| format!("{} at {} kbps", self.get(*b), b))
            .collect();
        if parts.is_empty() {
            "bitrate data is limited.".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// Bitrate-derived quality classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    Low,
    Standard,
    High,
    Hd,
}

impl QualityTier {
    pub const ALL: [QualityTier; 4] = [
        QualityTier::Low,
        QualityTier::Standard,
        QualityTier::High,
        QualityTier::Hd,
    ];

    /// Tier for a bitrate; unknown or non-positive bitrates have none.
    pub fn from_bitrate(bitrate: Option<i64>) -> Option<Self> {
        match bitrate? {
            b if b <= 0 => None,
            b if b < 96 => Some(Self::Low),
            b if b < 160 => Some(Self::Standard),
            b if b < 256 => Some(Self::High),
            _ => Some(Self::Hd),
        }
    }

    /// Inclusive kbps range; `None` as the upper bound means unbounded.
    pub fn range(self) -> (i64, Option<i64>) {
        match self {
            Self::Low => (1, Some(95)),
            Self::Standard => (96, Some(159)),
            Self::High => (160, Some(255)),
            Self::Hd => (256, None),
        }
    }

    pub fn contains(self, bitrate: Option<i64>) -> bool {
        let Some(b) = bitrate else {
            return false;
        };
        let (min, max) = self.range();
        b >= min && max.is_none_or(|max| b <= max)
    }

    /// URL key, as in `/quality/<key>/`.
    pub fn key(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Standard => "standard",
            Self::High => "high",
            Self::Hd => "hd",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.key() == key)
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Alphabetical hub bucket for a slug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LetterBucket {
    Letter(char),
    Digit,
    Other,
}

impl LetterBucket {
    /// The 28 buckets in hub order: `a`..`z`, `0-9`, `other`.
    pub fn all() -> Vec<LetterBucket> {
        ('a'..='z')
            .map(LetterBucket::Letter)
            .chain([LetterBucket::Digit, LetterBucket::Other])
            .collect()
    }

    /// Bucket of a slug's first character.
    pub fn of(slug: &str) -> Self {
        match slug.chars().next() {
            Some(c) if c.is_ascii_lowercase() => Self::Letter(c),
            Some(c) if c.is_ascii_digit() => Self::Digit,
            _ => Self::Other,
        }
    }

    /// URL key, as in `/city/letter/<key>/`.
    pub fn key(self) -> String {
        match self {
            Self::Letter(c) => c.to_string(),
            Self::Digit => "0-9".to_string(),
            Self::Other => "other".to_string(),
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "0-9" => Some(Self::Digit),
            "other" => Some(Self::Other),
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii_lowercase() => Some(Self::Letter(c)),
                    _ => None,
                }
            }
        }
    }
}

impl fmt::Display for LetterBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

/// Ranked entry in a "top N" list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopItem {
    pub slug: String,
    pub name: String,
    pub count: usize,
}
