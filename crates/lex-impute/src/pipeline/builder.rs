//! Cleaning run orchestration.
//!
//! This module provides the `CleaningPipeline` struct and its builder, which
//! tie together loading, profiling, strategy resolution, imputation and
//! persistence.

use crate::config::RunConfig;
use crate::dataset::{load_dataset, write_dataset};
use crate::error::Result;
use crate::pipeline::{ImputationEngine, Imputed};
use crate::profiler::DataProfiler;
use crate::strategy_config::{StrategyConfig, read_config};
use crate::types::{ColumnMissingProfile, RunSummary};
use std::time::Instant;
use tracing::{debug, error, info};

/// One end-to-end cleaning run.
///
/// Use [`CleaningPipeline::builder()`] to supply a configuration, or
/// [`CleaningPipeline::new`] for an already validated one.
///
/// # Example
///
/// ```rust,ignore
/// use lex_impute::{CleaningPipeline, RunConfig};
///
/// let summary = CleaningPipeline::builder()
///     .config(RunConfig::default())
///     .build()?
///     .run()?;
///
/// println!("{} values filled", summary.imputation.values_filled());
/// ```
#[derive(Debug, Clone)]
pub struct CleaningPipeline {
    config: RunConfig,
    strategies: Option<StrategyConfig>,
}

static_assertions::assert_impl_all!(CleaningPipeline: Send);

impl CleaningPipeline {
    pub fn new(config: RunConfig) -> Self {
        Self {
            config,
            strategies: None,
        }
    }

    /// Create a new pipeline builder.
    pub fn builder() -> CleaningPipelineBuilder {
        CleaningPipelineBuilder::default()
    }

    /// Load, impute and persist the dataset.
    ///
    /// The output file is only written once every configured column has been
    /// processed. Any failure is logged before it is returned.
    pub fn run(&self) -> Result<RunSummary> {
        match self.run_internal() {
            Ok(summary) => {
                info!(
                    "Data cleaning process completed successfully and output saved as {}",
                    self.config.output_path.display()
                );
                Ok(summary)
            }
            Err(e) => {
                error!("Data cleaning process failed: {}", e);
                Err(e)
            }
        }
    }

    /// Load the dataset and report missing values per column without
    /// imputing or writing anything.
    pub fn inspect(&self) -> Result<Vec<ColumnMissingProfile>> {
        load_dataset(&self.config.input_path, &self.config.date_columns)
            .and_then(|df| DataProfiler::missing_profile(&df))
            .inspect_err(|e| error!("Missing value inspection failed: {}", e))
    }

    fn run_internal(&self) -> Result<RunSummary> {
        let start_time = Instant::now();

        info!("Step 1: Loading dataset...");
        let df = load_dataset(&self.config.input_path, &self.config.date_columns)?;
        let columns = df.width();

        info!("Step 2: Profiling missing values...");
        let columns_with_missing = DataProfiler::find_columns_with_missing_data(&df)?;
        debug!("Columns with missing data: {:?}", columns_with_missing);

        info!("Step 3: Reading strategy configuration...");
        let strategies = match &self.strategies {
            Some(strategies) => strategies.clone(),
            None => read_config(&self.config.strategy_path)?,
        };

        info!("Step 4: Imputing missing values...");
        let Imputed { mut data, summary } = ImputationEngine::new(strategies).impute(df)?;

        info!("Step 5: Saving cleaned dataset...");
        write_dataset(&mut data, &self.config.output_path)?;

        Ok(RunSummary {
            input_path: self.config.input_path.clone(),
            output_path: self.config.output_path.clone(),
            columns,
            columns_with_missing,
            imputation: summary,
            duration_ms: start_time.elapsed().as_millis() as u64,
        })
    }
}

/// Builder for [`CleaningPipeline`].
#[derive(Debug, Default)]
pub struct CleaningPipelineBuilder {
    config: Option<RunConfig>,
    strategies: Option<StrategyConfig>,
}

impl CleaningPipelineBuilder {
    /// Set the run configuration. Defaults to [`RunConfig::default`].
    pub fn config(mut self, config: RunConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Use these strategies instead of reading the configured strategy file.
    pub fn strategies(mut self, strategies: StrategyConfig) -> Self {
        self.strategies = Some(strategies);
        self
    }

    /// Validate the configuration and build the pipeline.
    pub fn build(self) -> Result<CleaningPipeline> {
        let config = self.config.unwrap_or_default();
        config.validate()?;
        Ok(CleaningPipeline {
            config,
            strategies: self.strategies,
        })
    }
}
