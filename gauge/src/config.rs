//! Runtime configuration

use std::env;
use std::path::PathBuf;
use serde::{Deserialize, Serialize};
use tracing::info;
use gauge_units::StaticRates;
use crate::GaugeError;

pub const ENV_RATES_PATH: &str = "GAUGE_RATES_PATH";
pub const ENV_DEFAULT_PLACES: &str = "GAUGE_DEFAULT_PLACES";
pub const ENV_LOG: &str = "RUST_LOG";

const DEFAULT_LOG_FILTER: &str = "info";

/// Largest precision accepted from configuration
pub const MAX_PLACES: u32 = 15;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GaugeConfig {
    /// Rate table to load instead of the bundled snapshot
    pub rates_path: Option<PathBuf>,
    /// Precision for categories that do not declare their own
    pub default_places: Option<u32>,
    /// `tracing` filter directive
    pub log_filter: Option<String>,
}

impl GaugeConfig {
    /// Read `GAUGE_RATES_PATH`, `GAUGE_DEFAULT_PLACES` and `RUST_LOG`
    pub fn from_env() -> Result<Self, GaugeError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, GaugeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let default_places = match non_empty(ENV_DEFAULT_PLACES) {
            Some(raw) => Some(parse_places(&raw)?),
            None => None,
        };

        Ok(GaugeConfig {
            rates_path: non_empty(ENV_RATES_PATH).map(PathBuf::from),
            default_places,
            log_filter: non_empty(ENV_LOG),
        })
    }

    pub fn with_rates_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.rates_path = Some(path.into());
        self
    }

    pub fn with_default_places(mut self, places: u32) -> Self {
        self.default_places = Some(places);
        self
    }

    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }

    /// The configured rate table, or the bundled snapshot
    pub fn rate_source(&self) -> Result<StaticRates, GaugeError> {
        let rates = match &self.rates_path {
            Some(path) => {
                let rates = StaticRates::from_path(path)?;
                info!(path = %path.display(), rates = rates.len(), as_of = ?rates.as_of(), "loaded rate table");
                rates
            }
            None => StaticRates::bundled()?,
        };
        Ok(rates)
    }
}

fn parse_places(raw: &str) -> Result<u32, GaugeError> {
    let invalid = || GaugeError::InvalidSetting {
        name: ENV_DEFAULT_PLACES,
        value: raw.to_string(),
    };
    let places: u32 = raw.trim().parse().map_err(|_| invalid())?;
    if places > MAX_PLACES {
        return Err(invalid());
    }
    Ok(places)
}
