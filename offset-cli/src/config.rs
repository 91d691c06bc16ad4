//! Optional TOML file with default inputs.
//!
//! ## File format
//!
//! Every key is optional. Unknown keys are rejected so typos surface early.
//!
//! ```toml
//! # Perpetuity defaults
//! return_rate = 5.0
//! inflation_rate = 3.0
//! tax_rate = 20.0
//!
//! # Projection defaults
//! roi = 7.0
//! projection_tax_rate = 15.0
//! years = 10
//! apply_bill_inflation = false
//!
//! log_level = "info"
//! ```
//!
//! Command-line flags override the file; the file overrides the built-in
//! defaults below.

use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

/// Projection horizon used when neither the command line nor the file sets one.
pub const DEFAULT_YEARS: u32 = 10;

/// Longest projection horizon the front end accepts.
pub const MAX_YEARS: u32 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("config key '{key}' must be between {min} and {max}, got {value}")]
    OutOfRange {
        key: &'static str,
        value: Decimal,
        min: Decimal,
        max: Decimal,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub return_rate: Option<Decimal>,
    pub inflation_rate: Decimal,
    pub tax_rate: Decimal,
    pub roi: Option<Decimal>,
    pub projection_tax_rate: Decimal,
    pub years: u32,
    pub apply_bill_inflation: bool,
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            return_rate: None,
            inflation_rate: Decimal::ZERO,
            tax_rate: Decimal::ZERO,
            roi: None,
            projection_tax_rate: Decimal::ZERO,
            years: DEFAULT_YEARS,
            apply_bill_inflation: false,
            log_level: None,
        }
    }
}

impl Config {
    /// Parses and validates configuration text.
    pub fn from_toml_str(
        text: &str,
        path: &Path,
    ) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reads the file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text, path)?;
        tracing::debug!(path = %path.display(), ?config, "config loaded");
        Ok(config)
    }

    /// Loads `path` when given, otherwise falls back to the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Applies the same bounds as the command-line parsers.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let hundred = Decimal::ONE_HUNDRED;
        check_range("inflation_rate", self.inflation_rate, Decimal::ZERO, hundred)?;
        check_range("tax_rate", self.tax_rate, Decimal::ZERO, hundred)?;
        check_range(
            "projection_tax_rate",
            self.projection_tax_rate,
            Decimal::ZERO,
            hundred,
        )?;
        if let Some(rate) = self.return_rate {
            check_range("return_rate", rate, Decimal::ZERO, Decimal::MAX)?;
        }
        if let Some(roi) = self.roi {
            check_range("roi", roi, Decimal::ZERO, Decimal::MAX)?;
        }
        check_range(
            "years",
            Decimal::from(self.years),
            Decimal::ONE,
            Decimal::from(MAX_YEARS),
        )?;
        Ok(())
    }
}

fn check_range(
    key: &'static str,
    value: Decimal,
    min: Decimal,
    max: Decimal,
) -> Result<(), ConfigError> {
    if value < min || value > max {
        return Err(ConfigError::OutOfRange {
            key,
            value,
            min,
            max,
        });
    }
    Ok(())
}
