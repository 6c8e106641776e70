//! Configuration types for the imputation pipeline.
//!
//! This module provides the closed set of imputation strategies and the
//! run configuration (input/output locations, temporal columns) built with
//! the builder pattern.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Curve-fitting method used by the interpolation strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationMethod {
    /// Value of the nearest known point (ties go to the lower point)
    Nearest,
    /// Straight lines over row position, ignoring row labels
    Linear,
    /// First-order spline over row labels
    Slinear,
    /// Second-order interpolating spline over row labels
    Quadratic,
    /// Third-order interpolating spline over row labels
    Cubic,
}

impl InterpolationMethod {
    /// All methods, in configuration-name order.
    pub const ALL: [InterpolationMethod; 5] = [
        Self::Nearest,
        Self::Linear,
        Self::Slinear,
        Self::Quadratic,
        Self::Cubic,
    ];

    /// Identifier as written in the strategy configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nearest => "nearest",
            Self::Linear => "linear",
            Self::Slinear => "slinear",
            Self::Quadratic => "quadratic",
            Self::Cubic => "cubic",
        }
    }

    /// Minimum number of known values needed to fit the method.
    pub fn min_points(&self) -> usize {
        match self {
            Self::Nearest | Self::Linear => 1,
            Self::Slinear => 2,
            Self::Quadratic => 3,
            Self::Cubic => 4,
        }
    }

    /// Spline degree for the B-spline based methods.
    pub(crate) fn spline_degree(&self) -> Option<usize> {
        match self {
            Self::Quadratic => Some(2),
            Self::Cubic => Some(3),
            Self::Nearest | Self::Linear | Self::Slinear => None,
        }
    }
}

/// Strategy for resolving missing values in one column.
///
/// Parsed case-insensitively from the `strategy` key of a configuration
/// section. Any identifier outside this set is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Fill with the arithmetic mean of non-missing values
    Mean,
    /// Fill with the median of non-missing values
    Median,
    /// Fill with the most frequent non-missing value
    Mode,
    /// Fill with literal zero
    Zero,
    /// Drop every row where the column is missing
    Remove,
    /// Propagate the last valid value forward
    Ffill,
    /// Propagate the next valid value backward
    Bfill,
    /// Interpolate with the given curve-fitting method
    Interpolate(InterpolationMethod),
}

impl Strategy {
    /// Identifier as written in the strategy configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::Median => "median",
            Self::Mode => "mode",
            Self::Zero => "zero",
            Self::Remove => "remove",
            Self::Ffill => "ffill",
            Self::Bfill => "bfill",
            Self::Interpolate(method) => method.as_str(),
        }
    }

    /// Whether the strategy only makes sense on numeric columns.
    pub fn requires_numeric(&self) -> bool {
        matches!(
            self,
            Self::Mean | Self::Median | Self::Zero | Self::Interpolate(_)
        )
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier that does not name a known strategy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown strategy '{0}'")]
pub struct UnknownStrategy(pub String);

impl FromStr for Strategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        let strategy = match normalized.as_str() {
            "mean" => Self::Mean,
            "median" => Self::Median,
            "mode" => Self::Mode,
            "zero" => Self::Zero,
            "remove" => Self::Remove,
            "ffill" => Self::Ffill,
            "bfill" => Self::Bfill,
            other => InterpolationMethod::ALL
                .into_iter()
                .find(|method| method.as_str() == other)
                .map(Self::Interpolate)
                .ok_or_else(|| UnknownStrategy(s.trim().to_string()))?,
        };
        Ok(strategy)
    }
}

/// Configuration for one cleaning run.
///
/// Use [`RunConfig::builder()`] to create a new configuration with the
/// fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use lex_impute::config::RunConfig;
///
/// let config = RunConfig::builder()
///     .input_path("data/data.csv")
///     .strategy_path("parameter_config.ini")
///     .output_path("data/cleaned_data.csv")
///     .date_columns(["Date"])
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Delimited input file with a header row.
    /// Default: "data/data.csv"
    pub input_path: PathBuf,

    /// Sectioned key-value file mapping columns to strategies.
    /// Default: "parameter_config.ini"
    pub strategy_path: PathBuf,

    /// Where the cleaned dataset is written.
    /// Default: "data/cleaned_data.csv"
    pub output_path: PathBuf,

    /// Columns parsed as dates after loading.
    /// Default: ["Date"]
    pub date_columns: Vec<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("data/data.csv"),
            strategy_path: PathBuf::from("parameter_config.ini"),
            output_path: PathBuf::from("data/cleaned_data.csv"),
            date_columns: vec!["Date".to_string()],
        }
    }
}

impl RunConfig {
    /// Create a new configuration builder.
    pub fn builder() -> RunConfigBuilder {
        RunConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        for (field, path) in [
            ("input_path", &self.input_path),
            ("strategy_path", &self.strategy_path),
            ("output_path", &self.output_path),
        ] {
            if path.as_os_str().is_empty() {
                return Err(ConfigValidationError::EmptyPath(field.to_string()));
            }
        }

        if self.output_path == self.input_path {
            return Err(ConfigValidationError::OutputOverwritesInput(
                self.output_path.clone(),
            ));
        }

        if self.date_columns.iter().any(|c| c.trim().is_empty()) {
            return Err(ConfigValidationError::BlankDateColumn);
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Path for '{0}' must not be empty")]
    EmptyPath(String),

    #[error("Output path '{0}' would overwrite the input dataset")]
    OutputOverwritesInput(PathBuf),

    #[error("Date column names must not be blank")]
    BlankDateColumn,
}

impl From<ConfigValidationError> for crate::error::ImputeError {
    fn from(err: ConfigValidationError) -> Self {
        crate::error::ImputeError::InvalidConfig(err.to_string())
    }
}

/// Builder for [`RunConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct RunConfigBuilder {
    input_path: Option<PathBuf>,
    strategy_path: Option<PathBuf>,
    output_path: Option<PathBuf>,
    date_columns: Option<Vec<String>>,
}

impl RunConfigBuilder {
    /// Set the dataset to clean.
    pub fn input_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_path = Some(path.into());
        self
    }

    /// Set the strategy configuration file.
    pub fn strategy_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.strategy_path = Some(path.into());
        self
    }

    /// Set where the cleaned dataset is written.
    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    /// Set the columns parsed as dates. Pass an empty list to parse none.
    pub fn date_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.date_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `RunConfig` or an error if validation fails.
    pub fn build(self) -> Result<RunConfig, ConfigValidationError> {
        let defaults = RunConfig::default();
        let config = RunConfig {
            input_path: self.input_path.unwrap_or(defaults.input_path),
            strategy_path: self.strategy_path.unwrap_or(defaults.strategy_path),
            output_path: self.output_path.unwrap_or(defaults.output_path),
            date_columns: self.date_columns.unwrap_or(defaults.date_columns),
        };

        config.validate()?;
        Ok(config)
    }
}
