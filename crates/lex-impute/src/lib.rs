//! Missing-Value Imputation Library
//!
//! A small, configuration-driven cleaning tool for tabular datasets, built on
//! Polars.
//!
//! # Overview
//!
//! Each column of a dataset can be assigned one strategy for its missing
//! values in a sectioned configuration file:
//!
//! - **Statistical**: `mean`, `median`, `mode`, `zero`
//! - **Row removal**: `remove` drops every row missing a value in the column
//! - **Propagation**: `ffill`, `bfill`
//! - **Interpolation**: `nearest`, `linear`, `slinear`, `quadratic`, `cubic`
//!
//! Strategies are applied column by column in dataset order. Columns without
//! a configured strategy pass through unchanged.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use lex_impute::{CleaningPipeline, RunConfig};
//!
//! let config = RunConfig::builder()
//!     .input_path("data/data.csv")
//!     .strategy_path("parameter_config.ini")
//!     .output_path("data/cleaned_data.csv")
//!     .build()?;
//!
//! let summary = CleaningPipeline::new(config).run()?;
//! println!("Filled {} values", summary.imputation.values_filled());
//! ```
//!
//! # Working on a DataFrame directly
//!
//! ```rust,ignore
//! use lex_impute::{ImputationEngine, StrategyConfig};
//!
//! let strategies: StrategyConfig = "[Price]\nstrategy = cubic\n".parse()?;
//! let imputed = ImputationEngine::new(strategies).impute(df)?;
//! println!("{}", imputed.data);
//! ```

pub mod config;
pub mod dataset;
pub mod error;
pub mod imputers;
pub mod pipeline;
pub mod profiler;
pub mod strategy_config;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use config::{
    ConfigValidationError, InterpolationMethod, RunConfig, RunConfigBuilder, Strategy,
    UnknownStrategy,
};
pub use dataset::{load_dataset, write_dataset};
pub use error::{ImputeError, Result as ImputeResult, ResultExt};
pub use imputers::{PropagationImputer, RowRemover, StatisticalImputer};
pub use pipeline::{CleaningPipeline, CleaningPipelineBuilder, ImputationEngine, Imputed};
pub use profiler::DataProfiler;
pub use strategy_config::{StrategyConfig, read_config};
pub use types::{ColumnMissingProfile, ColumnOutcome, ImputationSummary, RunSummary};
pub use utils::{DtypeCategory, get_dtype_category, is_numeric_dtype, missing_count};
