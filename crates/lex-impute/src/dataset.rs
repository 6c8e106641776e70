//! Dataset loading and persistence.
//!
//! Reads the input CSV, strips surrounding whitespace from column names and
//! turns the requested date columns into temporal columns. Writes the cleaned
//! frame back out as CSV with a header row and no index column.

use crate::error::{ImputeError, Result};
use crate::utils::{DtypeCategory, get_dtype_category};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Cell contents read as missing, in addition to the empty field.
const NULL_MARKERS: &[&str] = &[
    "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "NULL", "null", "None", "<NA>", "#N/A",
    "#NA", "#N/A N/A", "1.#IND", "-1.#IND", "1.#QNAN", "-1.#QNAN",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y", "%Y%m%d"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Days from 0001-01-01 to 1970-01-01.
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Load a CSV dataset and parse `date_columns` as dates.
///
/// # Errors
///
/// Returns [`ImputeError::DatasetRead`] if the file cannot be read or parsed,
/// or if a requested date column does not exist.
pub fn load_dataset(path: impl AsRef<Path>, date_columns: &[String]) -> Result<DataFrame> {
    let path = path.as_ref();
    let read_error = |reason: String| ImputeError::DatasetRead {
        path: PathBuf::from(path),
        reason,
    };

    let mut df = read_csv(path).map_err(|e| read_error(e.to_string()))?;
    strip_column_names(&mut df).map_err(|e| read_error(e.to_string()))?;

    for name in date_columns {
        let name = name.trim();
        if df.get_column_index(name).is_none() {
            return Err(read_error(format!("date column '{}' not found", name)));
        }
        parse_date_column(&mut df, name).map_err(|e| read_error(e.to_string()))?;
    }

    info!(
        "Dataset loaded from {}: {} rows x {} columns",
        path.display(),
        df.height(),
        df.width()
    );
    Ok(df)
}

fn read_csv(path: &Path) -> PolarsResult<DataFrame> {
    let null_values = NullValues::AllColumns(NULL_MARKERS.iter().map(|s| (*s).into()).collect());

    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .with_parse_options(
            CsvParseOptions::default()
                .with_quote_char(Some(b'"'))
                .with_null_values(Some(null_values)),
        )
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
}

/// Strip leading and trailing whitespace from every column name.
///
/// Fails without renaming anything if two names strip to the same value.
pub fn strip_column_names(df: &mut DataFrame) -> PolarsResult<()> {
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();

    for (i, name) in names.iter().enumerate() {
        if let Some(other) = names[..i].iter().find(|n| n.trim() == name.trim()) {
            warn!(
                "Columns '{}' and '{}' both strip to '{}'",
                other,
                name,
                name.trim()
            );
            return Err(PolarsError::Duplicate(
                format!(
                    "columns '{}' and '{}' both strip to '{}'",
                    other,
                    name,
                    name.trim()
                )
                .into(),
            ));
        }
    }

    let renames = names
        .iter()
        .filter(|name| name.trim() != name.as_str())
        .map(|name| (name.clone(), name.trim().to_string()));

    for (old, new) in renames {
        debug!("Renaming column '{}' to '{}'", old, new);
        df.rename(&old, new.into())?;
    }
    Ok(())
}

/// Parsed representation of a text column holding dates.
#[derive(Debug, Clone, PartialEq)]
enum Temporal {
    /// Days since the Unix epoch.
    Dates(Vec<Option<i32>>),
    /// Milliseconds since the Unix epoch.
    Datetimes(Vec<Option<i64>>),
}

/// Replace a text column with its parsed date or datetime values.
///
/// Columns that are already temporal are left alone. Text that does not parse
/// consistently is kept as text with a warning.
fn parse_date_column(df: &mut DataFrame, name: &str) -> PolarsResult<()> {
    let parsed = {
        let series = df.column(name)?.as_materialized_series();
        match get_dtype_category(series.dtype()) {
            DtypeCategory::Temporal => return Ok(()),
            DtypeCategory::Text => {}
            _ => {
                warn!(
                    "Column '{}' has type {} and cannot be parsed as dates",
                    name,
                    series.dtype()
                );
                return Ok(());
            }
        }
        let values: Vec<Option<&str>> = series.str()?.into_iter().collect();
        parse_temporal(&values)
    };

    let series = match parsed {
        Some(Temporal::Dates(days)) => Series::new(name.into(), days).cast(&DataType::Date)?,
        Some(Temporal::Datetimes(millis)) => Series::new(name.into(), millis)
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?,
        None => {
            warn!(
                "Column '{}' could not be parsed as dates, keeping it as text",
                name
            );
            return Ok(());
        }
    };

    df.replace(name, series)?;
    debug!("Parsed column '{}' as dates", name);
    Ok(())
}

/// Parse every present value as a date, falling back to datetimes. Returns
/// `None` if some value parses as neither.
fn parse_temporal(values: &[Option<&str>]) -> Option<Temporal> {
    let dates: Option<Vec<Option<i32>>> = values
        .iter()
        .map(|v| match present(v) {
            Some(text) => parse_date(text).map(|d| Some(d.num_days_from_ce() - EPOCH_DAYS_FROM_CE)),
            None => Some(None),
        })
        .collect();
    if let Some(days) = dates {
        return Some(Temporal::Dates(days));
    }

    let datetimes: Option<Vec<Option<i64>>> = values
        .iter()
        .map(|v| match present(v) {
            Some(text) => parse_datetime(text).map(|dt| Some(dt.and_utc().timestamp_millis())),
            None => Some(None),
        })
        .collect();
    datetimes.map(Temporal::Datetimes)
}

fn present<'a>(value: &Option<&'a str>) -> Option<&'a str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}

fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.naive_utc())
        })
        .or_else(|| parse_date(text).and_then(|d| d.and_hms_opt(0, 0, 0)))
}

/// Write `df` as CSV with a header row, creating parent directories.
///
/// # Errors
///
/// Returns [`ImputeError::Persist`] if the file cannot be created or written.
pub fn write_dataset(df: &mut DataFrame, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let persist_error = |reason: String| ImputeError::Persist {
        path: PathBuf::from(path),
        reason,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| persist_error(e.to_string()))?;
    }

    let mut file = File::create(path).map_err(|e| persist_error(e.to_string()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .with_quote_char(b'"')
        .finish(df)
        .map_err(|e| persist_error(e.to_string()))?;

    info!("Dataset saved: {}", path.display());
    Ok(())
}
