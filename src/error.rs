//! Error types for SPC Oxide
//!
//! Geometry and statistics failures are local to one chart: a host that gets
//! an error back renders an empty placeholder for that chart and carries on.

use thiserror::Error;

use crate::state::Axis;

/// Main error type for SPC Oxide operations
#[derive(Error, Debug)]
pub enum ChartError {
    /// Scale domain contains NaN/Infinity or an unrepresentable date
    #[error("Invalid {axis} domain: {reason}")]
    Domain { axis: Axis, reason: String },

    /// Zoom request computed against a superseded zoom state
    #[error("Stale zoom request: computed at revision {requested}, current is {current}")]
    StaleZoomRequest { requested: u64, current: u64 },

    /// File I/O error
    #[error("Failed to access file: {0}")]
    FileIo(#[from] std::io::Error),

    /// Polars data processing error
    #[error("Data processing error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unsupported file format
    #[error("Unsupported file format: {extension}")]
    UnsupportedFormat { extension: String },

    /// Column not found in data
    #[error("Column '{column}' not found in dataset")]
    ColumnNotFound { column: String },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for SPC Oxide operations
pub type Result<T> = std::result::Result<T, ChartError>;

impl ChartError {
    /// Shorthand for a domain error on `axis`
    pub fn domain(axis: Axis, reason: impl Into<String>) -> Self {
        ChartError::Domain {
            axis,
            reason: reason.into(),
        }
    }

    /// Get a user-friendly error message suitable for a chart placeholder
    pub fn user_message(&self) -> String {
        match self {
            ChartError::Domain { axis, reason } => {
                format!("Cannot draw the {} axis: {}", axis, reason)
            }
            ChartError::StaleZoomRequest { .. } => {
                "Zoom was superseded by a newer change".to_string()
            }
            ChartError::FileIo(e) => format!("File error: {}", e),
            ChartError::Polars(e) => format!("Data error: {}", e),
            ChartError::Config(msg) => format!("Config error: {}", msg),
            ChartError::UnsupportedFormat { extension } => {
                format!("Unsupported file format: '.{}'", extension)
            }
            ChartError::ColumnNotFound { column } => {
                format!("Column '{}' not found", column)
            }
            ChartError::Json(e) => format!("JSON error: {}", e),
        }
    }

    /// Get a short title for the error
    pub fn title(&self) -> &'static str {
        match self {
            ChartError::Domain { .. } => "Invalid Domain",
            ChartError::StaleZoomRequest { .. } => "Stale Zoom",
            ChartError::FileIo(_) => "File Error",
            ChartError::Polars(_) => "Data Error",
            ChartError::Config(_) => "Configuration Error",
            ChartError::UnsupportedFormat { .. } => "Unsupported Format",
            ChartError::ColumnNotFound { .. } => "Column Not Found",
            ChartError::Json(_) => "JSON Error",
        }
    }
}
