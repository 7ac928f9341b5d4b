//! Gauge - unit conversion engine
//!
//! Ties the measurement registry to the function plugins that expose it.
//!
//! ```no_run
//! use gauge::Gauge;
//! use gauge_core::Value;
//!
//! let gauge = Gauge::with_bundled_rates().unwrap();
//! let args = [Value::from("Length"), Value::from("inch"), Value::from("centimeter"), Value::from(1.0)];
//! let cm = gauge.call("convert", &args);
//! assert_eq!(cm.as_number(), Some(2.54));
//! ```

mod config;
mod functions;
mod helpers;

pub use config::{GaugeConfig, ENV_DEFAULT_PLACES, ENV_LOG, ENV_RATES_PATH, MAX_PLACES};
pub use functions::measurement_table;

use std::sync::{Arc, OnceLock};
use gauge_core::{ConvertError, Value};
use gauge_plugin::{EvalContext, PluginRegistry};
use gauge_units::{MeasurementRegistry, RateSource, RatesError, StaticRates};
use thiserror::Error;
use tracing::info;

/// Errors building a [`Gauge`]
#[derive(Debug, Error)]
pub enum GaugeError {
    #[error(transparent)]
    Rates(#[from] RatesError),

    #[error(transparent)]
    Convert(#[from] ConvertError),

    #[error("invalid value '{value}' for {name}")]
    InvalidSetting { name: &'static str, value: String },
}

/// Register the unit functions
pub fn load_units_library(registry: PluginRegistry) -> PluginRegistry {
    registry
        .with_function(functions::Convert)
        .with_function(functions::ListCategories)
        .with_function(functions::ListUnits)
        .with_function(functions::Describe)
}

/// Registry containing every built-in function
pub fn standard_registry() -> PluginRegistry {
    load_units_library(PluginRegistry::new())
}

/// Main Gauge engine
pub struct Gauge {
    measurements: Arc<MeasurementRegistry>,
    registry: Arc<PluginRegistry>,
}

impl Gauge {
    /// Engine over a loaded registry with the standard functions
    pub fn new(measurements: MeasurementRegistry) -> Self {
        Self::with_registry(measurements, standard_registry())
    }

    pub fn with_registry(measurements: MeasurementRegistry, registry: PluginRegistry) -> Self {
        Self {
            measurements: Arc::new(measurements),
            registry: Arc::new(registry),
        }
    }

    /// Load the catalog using the given rates
    pub fn with_rates(rates: &dyn RateSource) -> Result<Self, GaugeError> {
        Ok(Self::new(MeasurementRegistry::loaded(rates)?))
    }

    pub fn with_bundled_rates() -> Result<Self, GaugeError> {
        Self::with_rates(&StaticRates::bundled()?)
    }

    pub fn from_config(config: &GaugeConfig) -> Result<Self, GaugeError> {
        let rates = config.rate_source()?;
        let mut measurements = MeasurementRegistry::loaded(&rates)?;
        if let Some(places) = config.default_places {
            measurements.override_default_places(places);
            info!(places, "default precision overridden");
        }
        Ok(Self::new(measurements))
    }

    pub fn measurements(&self) -> &MeasurementRegistry {
        &self.measurements
    }

    pub fn context(&self) -> EvalContext {
        EvalContext::new(self.measurements.clone())
    }

    /// Convert with the category's own precision
    pub fn convert(&self, category: &str, from: &str, to: &str, value: f64) -> Result<f64, ConvertError> {
        self.measurements.convert(category, from, to, value)
    }

    /// Call a function by name
    pub fn call(&self, name: &str, args: &[Value]) -> Value {
        self.registry.call_function(name, args, &self.context())
    }

    pub fn help(&self, name: Option<&str>) -> Value {
        self.registry.help(name)
    }

    pub fn list_functions(&self, category: Option<&str>) -> Value {
        self.registry.list_functions(category)
    }

    pub fn functions(&self) -> &PluginRegistry {
        &self.registry
    }
}

static INSTANCE: OnceLock<Gauge> = OnceLock::new();

/// Process-wide engine configured from the environment.
///
/// Built on first use. A failed build is returned to the caller and retried
/// on the next call.
pub fn instance() -> Result<&'static Gauge, GaugeError> {
    if let Some(gauge) = INSTANCE.get() {
        return Ok(gauge);
    }
    let gauge = Gauge::from_config(&GaugeConfig::from_env()?)?;
    Ok(INSTANCE.get_or_init(|| gauge))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gauge_core::codes;
    use gauge_units::catalog::{MEASURE_CURRENCY, MEASURE_LENGTH, MEASURE_TEMPERATURE};

    fn test_gauge() -> Gauge {
        Gauge::with_bundled_rates().unwrap()
    }

    #[test]
    fn test_load_units_library() {
        let registry = standard_registry();
        assert!(registry.get_function("convert").is_some());
        assert!(registry.get_function("list_categories").is_some());
        assert!(registry.get_function("list_units").is_some());
        assert!(registry.get_function("describe").is_some());
    }

    #[test]
    fn test_call_convert() {
        let gauge = test_gauge();
        let args = [Value::from("Weight"), Value::from("kg"), Value::from("lb"), Value::from(1.0)];
        assert_eq!(gauge.call("convert", &args).as_number(), Some(2.2));
    }

    #[test]
    fn test_call_arg_count() {
        let gauge = test_gauge();
        let result = gauge.call("convert", &[Value::from("Weight")]);
        assert_eq!(result.as_error().unwrap().code, codes::ARG_COUNT);
    }

    #[test]
    fn test_unknown_function() {
        let result = test_gauge().call("convrt", &[]);
        let err = result.as_error().unwrap();
        assert_eq!(err.code, codes::UNDEFINED_FUNC);
        assert!(err.suggestion.as_deref().unwrap_or("").contains("convert"));
    }

    #[test]
    fn test_direct_convert() {
        let gauge = test_gauge();
        assert_eq!(gauge.convert(MEASURE_TEMPERATURE, "fahrenheit", "celsius", 212.0).unwrap(), 100.0);
        assert!(matches!(
            gauge.convert(MEASURE_LENGTH, "parsec", "meter", 1.0),
            Err(ConvertError::UnknownUnit { .. })
        ));
    }

    #[test]
    fn test_help_and_listing() {
        let gauge = test_gauge();
        assert!(!gauge.help(Some("convert")).is_error());
        assert_eq!(gauge.list_functions(Some("units")).as_list().unwrap().len(), 4);
    }

    #[test]
    fn test_from_config_default_places() {
        let config = GaugeConfig::default().with_default_places(4);
        let gauge = Gauge::from_config(&config).unwrap();
        assert_eq!(gauge.convert(MEASURE_LENGTH, "mile", "kilometer", 1.0).unwrap(), 1.6093);
        assert_eq!(gauge.measurements().get_measurement(MEASURE_TEMPERATURE).unwrap().decimal_places(), 1);
    }

    #[test]
    fn test_from_config_rates_file() {
        let path = std::env::temp_dir().join(format!("gauge-config-rates-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{"base":"USD","rates":{"EUR":0.5,"GBP":0.8,"INR":80,"AUD":1.5,"CAD":1.3,"SGD":1.3,"JPY":150,"CNY":7,"RUB":90}}"#,
        )
        .unwrap();
        let gauge = Gauge::from_config(&GaugeConfig::default().with_rates_path(&path)).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(gauge.convert(MEASURE_CURRENCY, "USD", "EUR", 10.0).unwrap(), 5.0);
    }

    #[test]
    fn test_from_config_incomplete_rates() {
        let path = std::env::temp_dir().join(format!("gauge-config-partial-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"base":"USD","rates":{"EUR":0.5}}"#).unwrap();
        let result = Gauge::from_config(&GaugeConfig::default().with_rates_path(&path));
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(GaugeError::Convert(ConvertError::RateUnavailable { .. }))));
    }

    #[test]
    fn test_shared_instance() {
        let first = instance().unwrap();
        let second = instance().unwrap();
        assert!(std::ptr::eq(first, second));
        assert_eq!(first.measurements().len(), 11);
    }

    #[test]
    fn test_instance_shared_across_threads() {
        let handles: Vec<_> = (0..8)
            .map(|_| std::thread::spawn(|| instance().unwrap() as *const Gauge as usize))
            .collect();
        let addresses: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(addresses.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(addresses[0], instance().unwrap() as *const Gauge as usize);
    }
}
