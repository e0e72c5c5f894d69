//! Project configuration.
//!
//! Handles loading, validating, and merging `config.toml`. The file is
//! optional; stock defaults are used for anything it does not set.
//!
//! ## Config File Location
//!
//! ```text
//! project/
//! ├── config.toml              # Optional overrides
//! ├── src/data/stations.json   # Station input (data_path)
//! └── dist/                    # Built site (output_dir)
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! site = "https://e-radio-greece.github.io"
//! base = "/"
//! data_path = "src/data/stations.json"
//! output_dir = "dist"
//!
//! [facets]
//! top_cities = 20           # Cities considered for city × genre pages
//! top_genres_per_city = 5   # Genres per city for city × genre pages
//! combination_cap = 100     # Hard limit on city × genre pages
//! top_items = 5             # Entries in per-city / per-genre top lists
//! page_size = 50            # Listing page size
//! quality_cap = 100         # Stations per quality tier
//! related_max = 8           # Related stations per station page
//!
//! [validate]
//! max_workers = 8           # Parallel readers (omit for auto = CPU cores)
//! ```
//!
//! The `[facets]` table is read by both the sitemap emitter and the
//! validator, so the pages listed and the pages checked always agree on the
//! city × genre limits.
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error("invalid site URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Project configuration loaded from `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Public origin of the deployed site, without trailing slash.
    pub site: String,
    /// Path prefix the site is served under.
    pub base: String,
    /// Station JSON file, relative to the project root.
    pub data_path: String,
    /// Built site directory, relative to the project root.
    pub output_dir: String,
    /// Facet limits shared by generation and validation.
    pub facets: FacetLimits,
    /// Validator settings.
    pub validate: ValidateConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site: "https://e-radio-greece.github.io".to_string(),
            base: "/".to_string(),
            data_path: "src/data/stations.json".to_string(),
            output_dir: "dist".to_string(),
            facets: FacetLimits::default(),
            validate: ValidateConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.site.starts_with("http://") || self.site.starts_with("https://")) {
            return Err(ConfigError::Validation(
                "site must be an http(s) origin".into(),
            ));
        }
        Url::parse(&self.site)?;
        if !self.base.starts_with('/') {
            return Err(ConfigError::Validation("base must start with '/'".into()));
        }
        let f = &self.facets;
        if f.page_size == 0 {
            return Err(ConfigError::Validation(
                "facets.page_size must be non-zero".into(),
            ));
        }
        if f.combination_cap == 0 {
            return Err(ConfigError::Validation(
                "facets.combination_cap must be non-zero".into(),
            ));
        }
        if f.top_cities == 0 || f.top_genres_per_city == 0 || f.top_items == 0 {
            return Err(ConfigError::Validation(
                "facets top-N limits must be non-zero".into(),
            ));
        }
        Ok(())
    }

    /// Site URL view of this config.
    pub fn urls(&self) -> Result<SiteUrls, ConfigError> {
        Ok(SiteUrls::new(&self.site, &self.base)?)
    }

    pub fn data_path(&self, root: &Path) -> PathBuf {
        root.join(&self.data_path)
    }

    pub fn output_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.output_dir)
    }
}

/// Limits applied when deriving listings from the facet index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FacetLimits {
    pub top_cities: usize,
    pub top_genres_per_city: usize,
    pub combination_cap: usize,
    pub top_items: usize,
    pub page_size: usize,
    pub quality_cap: usize,
    pub related_max: usize,
}

impl Default for FacetLimits {
    fn default() -> Self {
        Self {
            top_cities: 20,
            top_genres_per_city: 5,
            combination_cap: 100,
            top_items: 5,
            page_size: 50,
            quality_cap: 100,
            related_max: 8,
        }
    }
}

/// Validator settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidateConfig {
    /// Maximum number of parallel file readers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_workers: Option<usize>,
}

/// Resolve the effective worker count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)`, at least 1
pub fn effective_workers(config: &ValidateConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_workers
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

/// Absolute URL building and the reverse mapping onto output paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteUrls {
    origin: String,
    /// Parsed origin; relative hrefs are joined onto it.
    root: Url,
    /// Always starts and ends with `/`.
    base: String,
}

impl SiteUrls {
    pub fn new(origin: &str, base: &str) -> Result<Self, url::ParseError> {
        let root = Url::parse(origin)?;
        let trimmed = base.trim_matches('/');
        let base = if trimmed.is_empty() {
            "/".to_string()
        } else {
            format!("/{trimmed}/")
        };
        Ok(Self {
            origin: origin.trim_end_matches('/').to_string(),
            root,
            base,
        })
    }

    /// Absolute URL for a site path: `"/city/athina/"` →
    /// `"https://host/base/city/athina/"`.
    pub fn build_url(&self, path: &str) -> String {
        format!(
            "{}{}{}",
            self.origin,
            self.base,
            path.trim_start_matches('/')
        )
    }

    /// Site-relative path (no leading slash, base stripped) for an absolute
    /// URL or an href resolved against the origin.
    ///
    /// Resolution follows URL rules: dot-segments are removed, query and
    /// fragment dropped. `None` if the value cannot be resolved at all.
    pub fn site_path(&self, url: &str) -> Option<String> {
        let resolved = self.root.join(url).ok()?;
        let path = resolved.path();
        let base_prefix = self.base.trim_end_matches('/');
        let path = match path.strip_prefix(base_prefix) {
            Some(rest) if !base_prefix.is_empty() && (rest.is_empty() || rest.starts_with('/')) => {
                rest
            }
            _ => path,
        };
        Some(path.trim_start_matches('/').to_string())
    }

    /// Output-relative file a URL is served from.
    ///
    /// Paths with a file extension map to themselves; directory-style paths
    /// map to their `index.html`.
    pub fn output_file(&self, url: &str) -> Option<String> {
        let path = self.site_path(url)?;
        let last_segment = path.rsplit('/').next().unwrap_or("");
        if last_segment.contains('.') {
            return Some(path);
        }
        let dir = path.trim_end_matches('/');
        Some(if dir.is_empty() {
            "index.html".to_string()
        } else {
            format!("{dir}/index.html")
        })
    }
}

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SiteConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = root.join("config.toml");
    if !config_path.exists() {
        log::debug!("No config.toml in {}, using defaults", root.display());
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    log::info!("Loaded config from {}", config_path.display());
    Ok(Some(value))
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match load_raw_config(root)? {
        Some(overlay) => merge_toml(base, overlay),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Radio Atlas Configuration
# =========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# Public origin of the deployed site.
site = "https://e-radio-greece.github.io"

# Path prefix the site is served under.
base = "/"

# Station input file, relative to this file.
data_path = "src/data/stations.json"

# Built site directory, relative to this file.
output_dir = "dist"

# ---------------------------------------------------------------------------
# Facet limits (shared by sitemap generation and validation)
# ---------------------------------------------------------------------------
[facets]
# Cities (by station count) that get city x genre pages.
top_cities = 20

# Genres (by co-occurrence) per city that get city x genre pages.
top_genres_per_city = 5

# Exceeding this many city x genre pages is a build error.
combination_cap = 100

# Entries in each city's top genres and each genre's top cities.
top_items = 5

# Stations per listing page.
page_size = 50

# Stations listed per quality tier.
quality_cap = 100

# Related stations shown on a station page.
related_max = 8

# ---------------------------------------------------------------------------
# Validation
# ---------------------------------------------------------------------------
[validate]
# Maximum parallel file readers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_workers = 8
"##
}
