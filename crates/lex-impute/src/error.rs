//! Custom error types for the imputation pipeline.
//!
//! This module provides the error hierarchy using `thiserror`. Every failure
//! that can abort a cleaning run is represented here with enough context
//! (path, column, strategy) to be diagnosed from the log alone.
//!
//! Errors are serializable so the CLI can emit them as JSON alongside the
//! run summary.

use serde::Serialize;
use serde::ser::SerializeStruct;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the imputation pipeline.
#[derive(Error, Debug)]
pub enum ImputeError {
    /// Strategy configuration could not be opened or parsed.
    #[error("failed to read config file '{path}': {reason}")]
    ConfigRead { path: PathBuf, reason: String },

    /// A configured strategy identifier is not one of the supported strategies.
    #[error("invalid strategy '{strategy}' for column '{column}'")]
    InvalidStrategy { column: String, strategy: String },

    /// The strategy cannot be applied to a column of this data type.
    #[error("strategy '{strategy}' cannot be applied to column '{column}' of type {dtype}")]
    UnsupportedColumnType {
        column: String,
        strategy: String,
        dtype: String,
    },

    /// Not enough known values to fit the requested interpolation.
    #[error(
        "strategy '{strategy}' needs at least {required} known values in column '{column}', found {found}"
    )]
    InsufficientData {
        column: String,
        strategy: String,
        required: usize,
        found: usize,
    },

    /// A strategy failed on a column for a reason other than its type or size.
    #[error("failed to impute column '{column}': {reason}")]
    ImputationFailed { column: String, reason: String },

    /// Input dataset could not be loaded.
    #[error("failed to read dataset '{path}': {reason}")]
    DatasetRead { path: PathBuf, reason: String },

    /// Cleaned dataset could not be written.
    #[error("failed to write cleaned dataset '{path}': {reason}")]
    Persist { path: PathBuf, reason: String },

    /// Invalid run configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ImputeError>,
    },
}

impl ImputeError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ImputeError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get a stable error code, used in the CLI failure message and JSON output.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigRead { .. } => "CONFIG_READ",
            Self::InvalidStrategy { .. } => "INVALID_STRATEGY",
            Self::UnsupportedColumnType { .. } => "UNSUPPORTED_COLUMN_TYPE",
            Self::InsufficientData { .. } => "INSUFFICIENT_DATA",
            Self::ImputationFailed { .. } => "IMPUTATION_FAILED",
            Self::DatasetRead { .. } => "DATASET_READ",
            Self::Persist { .. } => "PERSIST",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Polars(_) => "POLARS_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Process exit code for this failure category.
    ///
    /// `2` configuration, `3` strategy application, `4` dataset read,
    /// `5` persistence, `1` anything else.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::ConfigRead { .. } | Self::InvalidConfig(_) => 2,
            Self::InvalidStrategy { .. }
            | Self::UnsupportedColumnType { .. }
            | Self::InsufficientData { .. }
            | Self::ImputationFailed { .. } => 3,
            Self::DatasetRead { .. } => 4,
            Self::Persist { .. } => 5,
            Self::WithContext { source, .. } => source.exit_code(),
            _ => 1,
        }
    }

    /// Name of the column the error is about, if any.
    pub fn column(&self) -> Option<&str> {
        match self {
            Self::InvalidStrategy { column, .. }
            | Self::UnsupportedColumnType { column, .. }
            | Self::InsufficientData { column, .. }
            | Self::ImputationFailed { column, .. } => Some(column.as_str()),
            Self::WithContext { source, .. } => source.column(),
            _ => None,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for ImputeError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("ImputeError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for imputation operations.
pub type Result<T> = std::result::Result<T, ImputeError>;

/// Extension trait for adding context to Polars results.
pub trait ResultExt<T> {
    /// Wrap the error as [`ImputeError::Polars`] with context.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| ImputeError::Polars(e).with_context(context))
    }
}
