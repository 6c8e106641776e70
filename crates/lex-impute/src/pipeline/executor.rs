//! Imputation engine.
//!
//! Walks the dataset's columns in order and applies the configured strategy
//! to each one. Strategies run sequentially against the current state of the
//! frame, so a `remove` on an earlier column changes what later columns see.

use crate::config::{InterpolationMethod, Strategy};
use crate::error::{ImputeError, Result, ResultExt};
use crate::imputers::{
    InterpolationError, PropagationImputer, RowRemover, StatisticalImputer, interpolate,
};
use crate::strategy_config::StrategyConfig;
use crate::types::{ColumnOutcome, ImputationSummary};
use crate::utils::{DtypeCategory, get_dtype_category, normalize_missing, numeric_values};
use polars::prelude::*;
use tracing::{debug, error, info, warn};

/// Output of an imputation pass.
#[derive(Debug, Clone)]
pub struct Imputed {
    pub data: DataFrame,
    pub summary: ImputationSummary,
}

/// Applies per-column strategies from a [`StrategyConfig`].
#[derive(Debug, Clone)]
pub struct ImputationEngine {
    strategies: StrategyConfig,
}

static_assertions::assert_impl_all!(ImputationEngine: Send, Sync);

impl ImputationEngine {
    pub fn new(strategies: StrategyConfig) -> Self {
        Self { strategies }
    }

    /// Resolve the strategy for every configured column of `df`, in dataset
    /// order, without touching the data.
    ///
    /// # Errors
    ///
    /// Returns [`ImputeError::InvalidStrategy`] for the first column whose
    /// identifier is not recognized.
    pub fn plan(&self, df: &DataFrame) -> Result<Vec<(String, Strategy)>> {
        df.get_column_names()
            .iter()
            .filter_map(|name| {
                self.strategies
                    .get(name)
                    .map(|raw| resolve_strategy(name, raw).map(|s| (name.to_string(), s)))
            })
            .collect()
    }

    /// Apply every configured strategy to `df`.
    ///
    /// Columns without a configured strategy are left alone, as are
    /// configured columns that have no missing values. The first failure
    /// aborts the pass; nothing is returned for a partially processed frame.
    pub fn impute(&self, mut df: DataFrame) -> Result<Imputed> {
        let rows_before = df.height();
        let mut labels: Vec<f64> = (0..rows_before).map(|row| row as f64).collect();
        let mut outcomes = Vec::new();

        let columns: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();

        for column in &columns {
            let Some(raw) = self.strategies.get(column) else {
                debug!("{}: no strategy configured, skipping", column);
                continue;
            };

            match self.impute_column(&mut df, &mut labels, column, raw) {
                Ok(outcome) => {
                    info!("{}: cleaned using strategy {}", column, outcome.strategy);
                    outcomes.push(outcome);
                }
                Err(e) => {
                    error!("inputting missing data for {}: {}", column, e);
                    return Err(e);
                }
            }
        }

        let summary = ImputationSummary {
            rows_before,
            rows_after: df.height(),
            columns: outcomes,
        };
        debug!(
            "Imputation filled {} values and removed {} rows",
            summary.values_filled(),
            summary.rows_removed()
        );

        Ok(Imputed { data: df, summary })
    }

    fn impute_column(
        &self,
        df: &mut DataFrame,
        labels: &mut Vec<f64>,
        column: &str,
        raw: &str,
    ) -> Result<ColumnOutcome> {
        let strategy = resolve_strategy(column, raw)?;
        let mut series = normalize_missing(df.column(column)?.as_materialized_series())?;

        // A column with no values at all is read as text; treat it as numeric
        let untyped = strategy.requires_numeric()
            && !series.is_empty()
            && series.null_count() == series.len()
            && !matches!(
                get_dtype_category(series.dtype()),
                DtypeCategory::Numeric | DtypeCategory::Temporal
            );
        if untyped {
            debug!("{}: every value is missing, reading it as Float64", column);
            series = series.cast(&DataType::Float64)?;
        }

        if strategy.requires_numeric()
            && get_dtype_category(series.dtype()) != DtypeCategory::Numeric
        {
            return Err(ImputeError::UnsupportedColumnType {
                column: column.to_string(),
                strategy: strategy.to_string(),
                dtype: series.dtype().to_string(),
            });
        }

        let mut outcome = ColumnOutcome {
            column: column.to_string(),
            strategy: strategy.to_string(),
            missing_before: series.null_count(),
            filled: 0,
            rows_removed: 0,
        };
        if outcome.missing_before == 0 {
            return Ok(outcome);
        }

        let replacement = match strategy {
            Strategy::Mean => StatisticalImputer::apply_mean(&series)?,
            Strategy::Median => StatisticalImputer::apply_median(&series)?,
            Strategy::Mode => StatisticalImputer::apply_mode(&series)?,
            Strategy::Zero => Some(StatisticalImputer::apply_zero(&series)?),
            Strategy::Ffill => Some(PropagationImputer::forward_fill(&series)?),
            Strategy::Bfill => Some(PropagationImputer::backward_fill(&series)?),
            Strategy::Interpolate(method) => {
                Some(interpolate_series(&series, labels, column, method)?)
            }
            Strategy::Remove => {
                outcome.rows_removed = RowRemover::remove_missing(df, &series, labels)?;
                return Ok(outcome);
            }
        };

        match replacement {
            Some(filled) => {
                outcome.filled = outcome.missing_before.saturating_sub(filled.null_count());
                ResultExt::context(
                    df.replace(column, filled),
                    format!("replacing column '{}'", column),
                )?;
            }
            None => {
                warn!(
                    "{}: every value is missing, strategy {} left the column unchanged",
                    column, strategy
                );
            }
        }

        Ok(outcome)
    }
}

fn resolve_strategy(column: &str, raw: &str) -> Result<Strategy> {
    raw.parse::<Strategy>()
        .map_err(|unknown| ImputeError::InvalidStrategy {
            column: column.to_string(),
            strategy: unknown.0,
        })
}

fn interpolate_series(
    series: &Series,
    labels: &[f64],
    column: &str,
    method: InterpolationMethod,
) -> Result<Series> {
    let values = numeric_values(series)?;
    let filled = interpolate(&values, labels, method).map_err(|e| match e {
        InterpolationError::InsufficientData { required, found } => {
            ImputeError::InsufficientData {
                column: column.to_string(),
                strategy: method.as_str().to_string(),
                required,
                found,
            }
        }
        other => ImputeError::ImputationFailed {
            column: column.to_string(),
            reason: other.to_string(),
        },
    })?;
    Ok(Series::new(series.name().clone(), filled))
}
