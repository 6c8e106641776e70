use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Missing-value profile of one dataset column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMissingProfile {
    pub name: String,
    pub dtype: String,
    pub missing_count: usize,
    pub missing_percentage: f64,
}

/// What the engine did to one configured column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnOutcome {
    pub column: String,
    pub strategy: String,
    /// Missing values in the column when the engine reached it.
    pub missing_before: usize,
    /// Missing values replaced by the strategy.
    pub filled: usize,
    /// Rows dropped from the whole dataset (only `remove`).
    pub rows_removed: usize,
}

impl ColumnOutcome {
    /// Missing values left in the column after the strategy ran.
    pub fn missing_after(&self) -> usize {
        self.missing_before
            .saturating_sub(self.filled)
            .saturating_sub(self.rows_removed)
    }
}

/// Summary of one imputation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImputationSummary {
    pub rows_before: usize,
    pub rows_after: usize,
    /// One entry per processed column, in dataset order.
    pub columns: Vec<ColumnOutcome>,
}

impl ImputationSummary {
    pub fn rows_removed(&self) -> usize {
        self.rows_before.saturating_sub(self.rows_after)
    }

    pub fn values_filled(&self) -> usize {
        self.columns.iter().map(|c| c.filled).sum()
    }
}

/// Result of a full cleaning run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub columns: usize,
    /// Columns that had missing values before imputation.
    pub columns_with_missing: Vec<String>,
    pub imputation: ImputationSummary,
    pub duration_ms: u64,
}
