//! Error taxonomy for the batch pipeline.
//!
//! Per-catchment data errors abort only that catchment and end up as failure
//! entries in the run summary; `PlotWrite` is non-fatal to the catchment's
//! numeric results; an extrema-table error is fatal to the whole run.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HypsoError {
    /// The shared extrema table has no row for a required catchment index.
    #[error("extrema table has no row for catchment {index}")]
    MissingData { index: usize },

    /// Per-catchment table file could not be opened.
    #[error("catchment table not found: {path}")]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Table exists but is unusable: missing required columns, unparseable
    /// values, negative areas, or no usable rows.
    #[error("malformed table {path}: {reason}")]
    MalformedTable { path: PathBuf, reason: String },

    /// Minimum elevation equals (or exceeds) maximum; min-max scaling would
    /// divide by zero. Reported, never propagated as NaN.
    #[error("{code}: degenerate elevation range (minimum {minimum}, maximum {maximum})")]
    DegenerateRange {
        code: String,
        minimum: f64,
        maximum: f64,
    },

    /// Fewer than 4 distinct abscissae: the cubic fit is rank-deficient.
    #[error("{code}: only {distinct} distinct samples, a cubic fit needs at least 4")]
    InsufficientData { code: String, distinct: usize },

    /// Chart output failed. Non-fatal: the catchment's numbers stand.
    #[error("failed to write chart {path}: {reason}")]
    PlotWrite { path: PathBuf, reason: String },

    /// A summary lookup for a catchment whose pipeline never completed.
    #[error("no completed result for catchment {code}")]
    MissingResult { code: String },
}

pub type Result<T> = std::result::Result<T, HypsoError>;
