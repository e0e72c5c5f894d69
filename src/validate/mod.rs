//! Post-build SEO validation.
//!
//! Runs after the site has been generated and checks the output tree against
//! facets recomputed straight from the station file. The check is split into
//! three stages so the comparison can be tested without a filesystem:
//!
//! ```text
//! stations.json ──► expected::compute_expected ──► ExpectedState ─┐
//!                                                                 ├─► diff::diff ──► Report
//! dist/         ──► actual::scan_actual        ──► ActualState  ──┘
//! ```
//!
//! ## Failure model
//!
//! Validation is fail-slow: every problem becomes an [`Issue`] and the scan
//! continues. A missing generated file is an issue, not an error, and so is a
//! page that exists but cannot be read. Only problems that make the
//! comparison meaningless (unreadable or malformed station file, unreadable
//! output root, unusable site URL) abort with a [`ValidateError`].

pub mod actual;
pub mod diff;
pub mod expected;

pub use actual::{ActualState, PageScan, scan_actual};
pub use diff::diff;
pub use expected::{ExpectedState, compute_expected};

use crate::config::{self, ConfigError, SiteConfig};
use crate::data::{self, LoadError};
use std::fmt;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ValidateError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to walk output tree: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("failed to start reader pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// Category of a validation finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueKind {
    /// An expected generated artifact is absent.
    MissingFile,
    /// Derived cardinality disagrees with the output tree.
    CountMismatch,
    /// A page carries data that contradicts the recomputed facets.
    ConsistencyViolation,
    /// The city × genre combination limit was breached.
    CapExceeded,
}

/// One validation finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub kind: IssueKind,
    pub message: String,
}

impl Issue {
    pub fn new(kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Accumulated findings of one validation run, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub issues: Vec<Issue>,
}

impl Report {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn count(&self, kind: IssueKind) -> usize {
        self.issues.iter().filter(|i| i.kind == kind).count()
    }
}

/// Validate the output tree under `root` against the station file, both
/// located through `config`.
pub fn run(root: &Path, config: &SiteConfig) -> Result<Report, ValidateError> {
    let site = config.urls()?;
    let data_path = config.data_path(root);
    let output_dir = config.output_dir(root);

    let stations = data::load_stations(&data_path)?;
    let expected = compute_expected(&stations, &config.facets);

    let workers = config::effective_workers(&config.validate);
    let actual = scan_actual(&output_dir, workers)?;

    let issues = diff(&expected, &actual, &site);
    log::info!(
        "Validated {} pages and {} files: {} issues",
        actual.pages.len(),
        actual.files.len(),
        issues.len()
    );
    Ok(Report { issues })
}
