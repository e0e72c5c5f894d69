//! Station file loading.
//!
//! The input is a single JSON array of [`Station`] records, regenerated
//! out-of-band. Schema deviations beyond missing optional fields are a parse
//! error, not something this crate repairs.

use crate::types::Station;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed station data in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Read and parse the station file.
pub fn load_stations(path: &Path) -> Result<Vec<Station>, LoadError> {
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let stations = parse_stations(&content).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Loaded {} stations from {}", stations.len(), path.display());
    Ok(stations)
}

pub fn parse_stations(json: &str) -> Result<Vec<Station>, serde_json::Error> {
    serde_json::from_str(json)
}
