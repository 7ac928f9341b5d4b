//! Currency exchange-rate sources
//!
//! The registry reads one rate per currency while it is being loaded and never
//! again. Rates are expressed as units of the currency per one U.S. dollar.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use serde::{Serialize, Deserialize};
use thiserror::Error;
use gauge_core::ConvertError;

/// Base currency every rate is quoted against
pub const BASE_CURRENCY: &str = "USD";

const BUNDLED_RATES: &str = include_str!("../data/rates.json");

/// Supplies exchange rates during registry population
pub trait RateSource: Send + Sync {
    /// Units of `code` per one U.S. dollar
    fn rate(&self, code: &str) -> Result<f64, ConvertError>;
}

/// Errors reading a rate table
#[derive(Debug, Error)]
pub enum RatesError {
    #[error("failed to read rate table: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed rate table: {0}")]
    Json(#[from] serde_json::Error),

    #[error("rate table is quoted against {0}, expected USD")]
    WrongBase(String),
}

/// On-disk shape of a rate table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateTable {
    pub base: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_of: Option<String>,
    pub rates: HashMap<String, f64>,
}

/// An in-memory rate table
#[derive(Debug, Clone, Default)]
pub struct StaticRates {
    rates: HashMap<String, f64>,
    as_of: Option<String>,
}

impl StaticRates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add one rate
    pub fn with_rate(mut self, code: &str, rate: f64) -> Self {
        self.rates.insert(code.to_uppercase(), rate);
        self
    }

    /// The snapshot compiled into the crate
    pub fn bundled() -> Result<Self, RatesError> {
        Self::from_json(BUNDLED_RATES)
    }

    pub fn from_json(json: &str) -> Result<Self, RatesError> {
        let table: RateTable = serde_json::from_str(json)?;
        Self::from_table(table)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RatesError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn from_table(table: RateTable) -> Result<Self, RatesError> {
        if !table.base.eq_ignore_ascii_case(BASE_CURRENCY) {
            return Err(RatesError::WrongBase(table.base));
        }
        Ok(StaticRates {
            rates: table
                .rates
                .into_iter()
                .map(|(code, rate)| (code.to_uppercase(), rate))
                .collect(),
            as_of: table.as_of,
        })
    }

    /// Date the rates were captured, if the table recorded one
    pub fn as_of(&self) -> Option<&str> {
        self.as_of.as_deref()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl RateSource for StaticRates {
    fn rate(&self, code: &str) -> Result<f64, ConvertError> {
        if code.eq_ignore_ascii_case(BASE_CURRENCY) {
            return Ok(1.0);
        }
        self.rates
            .get(&code.to_uppercase())
            .copied()
            .ok_or_else(|| ConvertError::rate_unavailable(code, "no rate in table"))
    }
}

/// Fetch a rate and reject values the registry cannot use
pub fn checked_rate(source: &dyn RateSource, code: &str) -> Result<f64, ConvertError> {
    let rate = source.rate(code)?;
    if !rate.is_finite() {
        return Err(ConvertError::rate_unavailable(code, "rate is not finite"));
    }
    if rate <= 0.0 {
        return Err(ConvertError::rate_unavailable(code, format!("rate {} is not positive", rate)));
    }
    Ok(rate)
}
