//! Registry of every measurement category

use std::collections::{BTreeMap, HashMap};
use gauge_core::ConvertError;
use tracing::{debug, info, warn};
use crate::catalog::{self, CATEGORY_ALIASES};
use crate::rates::RateSource;
use crate::{Measurement, DEFAULT_DECIMAL_PLACES};

/// All measurement categories, keyed by name.
///
/// Build one with [`MeasurementRegistry::loaded`] or call
/// [`load`](MeasurementRegistry::load) on an empty registry. After loading,
/// the registry is read-only and can be shared freely across threads.
#[derive(Debug, Clone, Default)]
pub struct MeasurementRegistry {
    measurements: BTreeMap<String, Measurement>,
    aliases: HashMap<String, String>,
    loaded: bool,
}

impl MeasurementRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry populated from the built-in catalog
    pub fn loaded(rates: &dyn RateSource) -> Result<Self, ConvertError> {
        let mut registry = Self::new();
        registry.load(rates)?;
        Ok(registry)
    }

    /// Populate from the built-in catalog.
    ///
    /// Every call rebuilds the full catalog and replaces the current contents
    /// only once the rebuild succeeded. On error the registry is unchanged.
    pub fn load(&mut self, rates: &dyn RateSource) -> Result<(), ConvertError> {
        let mut fresh = Self::new();
        let measurements = catalog::build(rates).inspect_err(|e| {
            warn!(error = %e, "catalog population failed, registry left unchanged");
        })?;

        for measurement in measurements {
            debug!(
                category = measurement.name(),
                units = measurement.len(),
                places = measurement.decimal_places(),
                "registered category"
            );
            fresh.register(measurement)?;
        }
        for (alias, name) in CATEGORY_ALIASES {
            fresh.add_alias(alias, name)?;
        }
        fresh.loaded = true;

        if self.loaded {
            info!(categories = fresh.len(), "registry reloaded");
        } else {
            info!(categories = fresh.len(), "registry loaded");
        }
        *self = fresh;
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Add a category under its own name.
    ///
    /// The category must hold exactly one reference unit.
    pub fn register(&mut self, measurement: Measurement) -> Result<(), ConvertError> {
        let name = measurement.name().to_string();
        if self.measurements.contains_key(&name) || self.aliases.contains_key(&name) {
            return Err(ConvertError::DuplicateCategory(name));
        }
        let references = measurement.units().filter(|u| u.is_reference()).count();
        if references != 1 {
            return Err(ConvertError::invalid_value(
                &name,
                references as f64,
                format!("category needs exactly one reference unit, found {}", references),
            ));
        }
        self.measurements.insert(name, measurement);
        Ok(())
    }

    /// Register an alternative name for an existing category
    pub fn add_alias(&mut self, alias: &str, category: &str) -> Result<(), ConvertError> {
        if self.measurements.contains_key(alias) || self.aliases.contains_key(alias) {
            return Err(ConvertError::DuplicateCategory(alias.to_string()));
        }
        if !self.measurements.contains_key(category) {
            return Err(ConvertError::UnknownCategory(category.to_string()));
        }
        self.aliases.insert(alias.to_string(), category.to_string());
        Ok(())
    }

    /// Get a category by name or alias
    pub fn get_measurement(&self, name: &str) -> Result<&Measurement, ConvertError> {
        if let Some(m) = self.measurements.get(name) {
            return Ok(m);
        }
        self.aliases
            .get(name)
            .and_then(|canonical| self.measurements.get(canonical))
            .ok_or_else(|| ConvertError::UnknownCategory(name.to_string()))
    }

    /// Canonical category names in lexicographic order
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.measurements.keys().map(|s| s.as_str())
    }

    /// Categories in lexicographic order
    pub fn measurements(&self) -> impl Iterator<Item = &Measurement> {
        self.measurements.values()
    }

    /// Every name a category can be looked up by
    pub fn lookup_names(&self) -> impl Iterator<Item = &str> {
        self.entries().chain(self.aliases.keys().map(|s| s.as_str()))
    }

    /// Convert `value` between two units of one category
    pub fn convert(&self, category: &str, from: &str, to: &str, value: f64) -> Result<f64, ConvertError> {
        self.get_measurement(category)?.convert(from, to, value)
    }

    pub fn len(&self) -> usize {
        self.measurements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }

    /// Change the precision of every category still on the default.
    ///
    /// Categories declaring their own precision keep it. A later `load`
    /// restores the catalog values.
    pub fn override_default_places(&mut self, places: u32) {
        for m in self.measurements.values_mut() {
            if m.decimal_places() == DEFAULT_DECIMAL_PLACES {
                m.set_decimal_places(places);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::*;
    use crate::{StaticRates, Unit};

    fn registry() -> MeasurementRegistry {
        MeasurementRegistry::loaded(&StaticRates::bundled().unwrap()).unwrap()
    }

    #[test]
    fn test_entries_sorted() {
        let r = registry();
        let entries: Vec<&str> = r.entries().collect();
        assert_eq!(entries, vec![
            "Angle", "Area", "Currency", "Gas Mileage", "Length", "Power",
            "Pressure", "Speed", "Temperature", "Volume", "Weight",
        ]);
    }

    #[test]
    fn test_known_fixed_points() {
        let r = registry();
        assert_eq!(r.convert(MEASURE_LENGTH, "inch", "centimeter", 1.0).unwrap(), 2.54);
        assert_eq!(r.convert(MEASURE_TEMPERATURE, "celsius", "fahrenheit", 0.0).unwrap(), 32.0);
        assert_eq!(r.convert(MEASURE_TEMPERATURE, "fahrenheit", "celsius", 212.0).unwrap(), 100.0);
        assert_eq!(r.convert(MEASURE_WEIGHT, "kilogram", "pound", 1.0).unwrap(), 2.2);
    }

    #[test]
    fn test_temperature_scales() {
        let r = registry();
        assert_eq!(r.convert(MEASURE_TEMPERATURE, "celsius", "kelvin", 0.0).unwrap(), 273.2);
        assert_eq!(r.convert(MEASURE_TEMPERATURE, "kelvin", "fahrenheit", 0.0).unwrap(), -459.7);
        assert_eq!(r.convert(MEASURE_TEMPERATURE, "fahrenheit", "celsius", -40.0).unwrap(), -40.0);
    }

    #[test]
    fn test_reciprocal_mileage() {
        let r = registry();
        assert_eq!(
            r.convert(MEASURE_MILEAGE, "kilometers per liter", "liters per 100 km", 10.0).unwrap(),
            10.0
        );
        assert_eq!(
            r.convert(MEASURE_MILEAGE, "liters per 100 km", "miles per gallon", 5.0).unwrap(),
            47.04
        );
        assert_eq!(
            r.convert(MEASURE_MILEAGE, "miles per gallon", "kilometers per liter", 30.0).unwrap(),
            12.75
        );
        let err = r
            .convert(MEASURE_MILEAGE, "liters per 100 km", "kilometers per liter", 0.0)
            .unwrap_err();
        assert!(matches!(err, ConvertError::InvalidValue { .. }));
    }

    #[test]
    fn test_unknown_identifiers() {
        let r = registry();
        assert!(matches!(
            r.convert(MEASURE_LENGTH, "parsec", "meter", 1.0),
            Err(ConvertError::UnknownUnit { .. })
        ));
        assert_eq!(
            r.get_measurement("Volume2").unwrap_err(),
            ConvertError::UnknownCategory("Volume2".into())
        );
    }

    #[test]
    fn test_precision_per_category() {
        let r = registry();
        // 1 kW = 1.34102208... hp
        assert_eq!(r.convert(MEASURE_POWER, "kilowatt", "horsepower", 1.0).unwrap(), 1.341);
        // 100 F = 37.777... C
        assert_eq!(r.convert(MEASURE_TEMPERATURE, "fahrenheit", "celsius", 100.0).unwrap(), 37.8);
        // 1 mile = 1.609344 km
        assert_eq!(r.convert(MEASURE_LENGTH, "mile", "kilometer", 1.0).unwrap(), 1.61);
    }

    #[test]
    fn test_round_trip_every_unit() {
        let r = registry();
        for m in r.measurements() {
            for unit in m.units() {
                for v in [1.0, 12.345, 250.0, -3.5] {
                    let expected = gauge_core::round_half_up(v, m.decimal_places());
                    assert_eq!(m.convert(&unit.name, &unit.name, v).unwrap(), expected,
                        "{} / {}", m.name(), unit.name);
                }
            }
        }
    }

    #[test]
    fn test_identity_via_reference() {
        let r = registry();
        for m in r.measurements() {
            let reference = m.reference_unit().unwrap().name.clone();
            let tolerance = 10f64.powi(-(m.decimal_places() as i32)) * 1.01;
            for from in m.units() {
                for to in m.units() {
                    let direct = m.convert(&from.name, &to.name, 8.0).unwrap();
                    let via = m.convert_unrounded(&from.name, &reference, 8.0).unwrap();
                    let indirect = m.convert(&reference, &to.name, via).unwrap();
                    assert!((direct - indirect).abs() <= tolerance,
                        "{}: {} -> {} direct {} indirect {}", m.name(), from.name, to.name, direct, indirect);
                }
            }
        }
    }

    #[test]
    fn test_category_alias() {
        let r = registry();
        assert_eq!(r.get_measurement("Angle Measurements").unwrap().name(), MEASURE_ANGLE);
        assert_eq!(r.convert("Angle", "gradians", "degrees", 100.0).unwrap(), 90.0);
        assert!(!r.entries().any(|e| e == "Angle Measurements"));
    }

    #[test]
    fn test_short_names_resolve() {
        let r = registry();
        assert_eq!(r.convert(MEASURE_SPEED, "km/h", "m/s", 36.0).unwrap(), 10.0);
        assert_eq!(r.convert(MEASURE_CURRENCY, "USD", "USD", 3.0).unwrap(), 3.0);
        assert_eq!(r.convert(MEASURE_AREA, "sq km", "hectare", 1.0).unwrap(), 100.0);
    }

    #[test]
    fn test_load_is_idempotent() {
        let rates = StaticRates::bundled().unwrap();
        let mut r = MeasurementRegistry::new();
        assert!(!r.is_loaded());
        r.load(&rates).unwrap();
        r.load(&rates).unwrap();
        assert!(r.is_loaded());
        assert_eq!(r.len(), 11);
        assert_eq!(r.get_measurement(MEASURE_LENGTH).unwrap().len(), 6);
    }

    #[test]
    fn test_failed_reload_keeps_previous_contents() {
        let mut r = registry();
        let before = r.convert(MEASURE_CURRENCY, "USD", "EUR", 100.0).unwrap();

        let broken = StaticRates::new().with_rate("EUR", 2.0);
        let err = r.load(&broken).unwrap_err();
        assert!(matches!(err, ConvertError::RateUnavailable { .. }));
        assert_eq!(r.convert(MEASURE_CURRENCY, "USD", "EUR", 100.0).unwrap(), before);
    }

    #[test]
    fn test_failed_first_load_stays_empty() {
        let mut r = MeasurementRegistry::new();
        assert!(r.load(&StaticRates::new()).is_err());
        assert!(r.is_empty());
        assert!(!r.is_loaded());
    }

    #[test]
    fn test_duplicate_category() {
        let mut r = registry();
        let mut extra = Measurement::new(MEASURE_LENGTH);
        extra.add_unit(Unit::reference("furlong")).unwrap();
        assert!(matches!(r.register(extra), Err(ConvertError::DuplicateCategory(_))));
        assert_eq!(r.get_measurement(MEASURE_LENGTH).unwrap().len(), 6);
    }

    #[test]
    fn test_override_default_places() {
        let mut r = registry();
        r.override_default_places(4);
        assert_eq!(r.get_measurement(MEASURE_LENGTH).unwrap().decimal_places(), 4);
        assert_eq!(r.get_measurement(MEASURE_TEMPERATURE).unwrap().decimal_places(), 1);
        assert_eq!(r.get_measurement(MEASURE_POWER).unwrap().decimal_places(), 3);
        assert_eq!(r.convert(MEASURE_LENGTH, "inch", "centimeter", 1.0).unwrap(), 2.54);
        assert_eq!(r.convert(MEASURE_LENGTH, "mile", "kilometer", 1.0).unwrap(), 1.6093);
    }

    #[test]
    fn test_loaded_categories_hold_declared_units() {
        let declared: Vec<(&str, Vec<&str>)> = vec![
            (MEASURE_ANGLE, vec!["degrees", "radians", "gradians"]),
            (MEASURE_AREA, vec![
                "square meter", "hectare", "square km", "square inch",
                "square foot", "square yard", "square mile", "acre",
            ]),
            (MEASURE_CURRENCY, vec![
                "U.S. Dollars", "Euros", "British Pounds", "Indian Rupee", "Australian Dollars",
                "Canadian Dollars", "Singapore Dollars", "Japanese Yen", "Chinese Yuan", "Russian Ruble",
            ]),
            (MEASURE_MILEAGE, vec!["liters per 100 km", "kilometers per liter", "miles per gallon"]),
            (MEASURE_LENGTH, vec!["centimeter", "meter", "kilometer", "inch", "foot", "mile"]),
            (MEASURE_POWER, vec![
                "watt", "horsepower", "calories per second", "BTU per second", "kilowatt", "megawatt",
            ]),
            (MEASURE_PRESSURE, vec!["pascal", "atmosphere", "bar", "psi", "torr"]),
            (MEASURE_SPEED, vec!["kilometers per hour", "meters per second", "miles per hour", "knots"]),
            (MEASURE_TEMPERATURE, vec!["celsius", "fahrenheit", "kelvin"]),
            (MEASURE_VOLUME, vec!["liter", "mililiter", "gallon", "quart", "pint", "cup", "ounce"]),
            (MEASURE_WEIGHT, vec!["gram", "kilogram", "pound", "ounce"]),
        ];

        let r = registry();
        let loaded: Vec<(&str, Vec<&str>)> = r
            .measurements()
            .map(|m| (m.name(), m.unit_names().collect()))
            .collect();
        assert_eq!(loaded, declared);
    }

    #[test]
    fn test_loaded_currency_codes() {
        let r = registry();
        let currency = r.get_measurement(MEASURE_CURRENCY).unwrap();
        assert_eq!(currency.aliases_of(UNIT_CURRENCY_USD), vec!["USD"]);
        for (name, code) in CURRENCIES {
            assert_eq!(currency.aliases_of(name), vec![code], "{} should be reachable as {}", name, code);
            assert_eq!(currency.unit(code).unwrap().name, name);
        }
    }

    #[test]
    fn test_register_requires_reference_unit() {
        let mut r = registry();
        let err = r.register(Measurement::new("Empty")).unwrap_err();
        assert!(matches!(err, ConvertError::InvalidValue { ref unit, .. } if unit == "Empty"));

        let mut unanchored = Measurement::new("Distance");
        unanchored.add_unit(Unit::linear("meter", 0.01).unwrap()).unwrap();
        assert!(r.register(unanchored).is_err());
        assert!(r.get_measurement("Empty").is_err());
        assert!(r.get_measurement("Distance").is_err());

        let mut anchored = Measurement::new("Distance");
        anchored.add_unit(Unit::reference("furlong")).unwrap();
        r.register(anchored).unwrap();
        assert_eq!(r.get_measurement("Distance").unwrap().reference_unit().map(|u| u.name.as_str()), Some("furlong"));
    }

    #[test]
    fn test_shared_across_threads() {
        let r = std::sync::Arc::new(registry());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let r = r.clone();
                std::thread::spawn(move || r.convert(MEASURE_LENGTH, "meter", "centimeter", i as f64).unwrap())
            })
            .collect();
        let results: Vec<f64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(results, vec![0.0, 100.0, 200.0, 300.0]);
    }
}
