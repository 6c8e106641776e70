//! Strategy configuration loader.
//!
//! Reads a sectioned key-value file (INI dialect) where every section names a
//! dataset column and carries a `strategy` key:
//!
//! ```ini
//! [DEFAULT]
//! strategy = median
//!
//! [Price]
//! strategy = mean
//!
//! [ Volume ]
//! strategy: ZERO
//! ```
//!
//! Section names are trimmed, keys are case-insensitive, and a `[DEFAULT]`
//! section supplies fallback options to every other section. Strategy values
//! are kept as written; they are validated by the imputation engine so the
//! error can name the column.

use crate::error::{ImputeError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{error, info};

/// Name of the section holding fallback options.
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// Key that selects the strategy inside a section.
pub const STRATEGY_KEY: &str = "strategy";

static SECTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[(?P<header>.+)\]\s*$").expect("Invalid regex: section header"));

static OPTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<key>[^=:\s][^=:]*?)\s*[=:]\s*(?P<value>.*)$").expect("Invalid regex: option")
});

/// Mapping from column name to the configured strategy identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StrategyConfig {
    /// Column name -> raw strategy identifier.
    strategies: HashMap<String, String>,
    /// Section names in file order.
    order: Vec<String>,
}

impl StrategyConfig {
    /// Load a strategy configuration from a file.
    ///
    /// # Errors
    ///
    /// Returns [`ImputeError::ConfigRead`] when the file cannot be opened or
    /// is malformed. The failure is logged with the offending path.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let result = std::fs::read_to_string(path)
            .map_err(|e| config_error(path, e.to_string()))
            .and_then(|text| Self::parse(&text, path));

        match result {
            Ok(config) => {
                info!("Read config file {} successfully.", path.display());
                Ok(config)
            }
            Err(e) => {
                error!("Error reading config file {}: {}", path.display(), e);
                Err(e)
            }
        }
    }

    /// Parse configuration text. `origin` is only used in error messages.
    pub fn parse(text: &str, origin: impl AsRef<Path>) -> Result<Self> {
        let origin = origin.as_ref();
        let sections = parse_sections(text).map_err(|reason| config_error(origin, reason))?;

        let defaults = sections
            .iter()
            .find(|s| s.name == DEFAULT_SECTION)
            .map(|s| s.options.clone())
            .unwrap_or_default();

        let mut config = StrategyConfig::default();
        for section in sections.into_iter().filter(|s| s.name != DEFAULT_SECTION) {
            let strategy = section
                .options
                .get(STRATEGY_KEY)
                .or_else(|| defaults.get(STRATEGY_KEY))
                .cloned()
                .ok_or_else(|| {
                    config_error(
                        origin,
                        format!("section '{}' has no '{}' key", section.name, STRATEGY_KEY),
                    )
                })?;

            config.order.push(section.name.clone());
            config.strategies.insert(section.name, strategy);
        }

        Ok(config)
    }

    /// Build a configuration directly from `(column, strategy)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut config = StrategyConfig::default();
        for (column, strategy) in pairs {
            let column = column.into().trim().to_string();
            if config
                .strategies
                .insert(column.clone(), strategy.into())
                .is_none()
            {
                config.order.push(column);
            }
        }
        config
    }

    /// Strategy identifier configured for `column`, matched after trimming.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.strategies.get(column.trim()).map(String::as_str)
    }

    /// Whether `column` has a configured strategy.
    pub fn contains(&self, column: &str) -> bool {
        self.strategies.contains_key(column.trim())
    }

    /// Configured column names in file order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

impl FromStr for StrategyConfig {
    type Err = ImputeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s, "<inline>")
    }
}

/// Load a strategy configuration, logging the outcome.
pub fn read_config(path: impl AsRef<Path>) -> Result<StrategyConfig> {
    StrategyConfig::from_path(path)
}

fn config_error(path: &Path, reason: impl Into<String>) -> ImputeError {
    ImputeError::ConfigRead {
        path: PathBuf::from(path),
        reason: reason.into(),
    }
}

struct Section {
    name: String,
    options: HashMap<String, String>,
}

/// Split INI text into sections. Errors carry a line-numbered reason.
fn parse_sections(text: &str) -> std::result::Result<Vec<Section>, String> {
    let mut sections: Vec<Section> = Vec::new();
    // Key and indentation of the option that a deeper-indented line continues.
    let mut last_key: Option<(String, usize)> = None;

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            last_key = None;
            continue;
        }
        if trimmed.starts_with('#') || trimmed.starts_with(';') {
            continue;
        }

        let indent = raw.len() - raw.trim_start().len();
        if let (Some((key, key_indent)), Some(section)) = (last_key.as_ref(), sections.last_mut())
            && indent > *key_indent
            && let Some(value) = section.options.get_mut(key)
        {
            if !value.is_empty() {
                value.push('\n');
            }
            value.push_str(trimmed);
            continue;
        }

        if let Some(caps) = SECTION_RE.captures(trimmed) {
            let name = caps["header"].trim().to_string();
            if name.is_empty() {
                return Err(format!("line {}: empty section name", line_no));
            }
            if sections.iter().any(|s| s.name == name) {
                return Err(format!("line {}: section '{}' already exists", line_no, name));
            }
            sections.push(Section {
                name,
                options: HashMap::new(),
            });
            last_key = None;
            continue;
        }

        if let Some(caps) = OPTION_RE.captures(trimmed) {
            let Some(section) = sections.last_mut() else {
                return Err(format!(
                    "line {}: option '{}' appears before any section header",
                    line_no,
                    caps["key"].trim()
                ));
            };
            let key = caps["key"].trim().to_lowercase();
            if section.options.contains_key(&key) {
                return Err(format!(
                    "line {}: option '{}' in section '{}' already exists",
                    line_no, key, section.name
                ));
            }
            section
                .options
                .insert(key.clone(), caps["value"].trim().to_string());
            last_key = Some((key, indent));
            continue;
        }

        return Err(format!("line {}: cannot parse '{}'", line_no, trimmed));
    }

    Ok(sections)
}
