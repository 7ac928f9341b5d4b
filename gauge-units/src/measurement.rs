//! A measurement category: units sharing one reference unit

use std::collections::HashMap;
use indexmap::IndexMap;
use gauge_core::{ConvertError, round_half_up};
use crate::Unit;

/// Decimal places used when a measurement does not set its own
pub const DEFAULT_DECIMAL_PLACES: u32 = 2;

/// A named group of mutually convertible units.
///
/// Units keep the order they were added in, so the reference unit (added
/// first by the catalog) lists first.
#[derive(Debug, Clone)]
pub struct Measurement {
    name: String,
    units: IndexMap<String, Unit>,
    aliases: HashMap<String, String>,
    decimal_places: u32,
}

impl Measurement {
    pub fn new(name: &str) -> Self {
        Measurement {
            name: name.to_string(),
            units: IndexMap::new(),
            aliases: HashMap::new(),
            decimal_places: DEFAULT_DECIMAL_PLACES,
        }
    }

    pub fn with_decimal_places(mut self, places: u32) -> Self {
        self.decimal_places = places;
        self
    }

    pub fn set_decimal_places(&mut self, places: u32) {
        self.decimal_places = places;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn decimal_places(&self) -> u32 {
        self.decimal_places
    }

    /// Register a unit under its name.
    ///
    /// A measurement has a single reference unit; a second identity unit is
    /// rejected with `InvalidValue`.
    pub fn add_unit(&mut self, unit: Unit) -> Result<(), ConvertError> {
        if self.contains(&unit.name) {
            return Err(self.duplicate(&unit.name));
        }
        if unit.is_reference() {
            if let Some(existing) = self.reference_unit() {
                return Err(ConvertError::invalid_value(
                    &unit.name,
                    unit.factor(),
                    format!("{} already has reference unit '{}'", self.name, existing.name),
                ));
            }
        }
        self.units.insert(unit.name.clone(), unit);
        Ok(())
    }

    /// Register an alternative spelling for an existing unit
    pub fn add_alias(&mut self, alias: &str, unit: &str) -> Result<(), ConvertError> {
        if self.contains(alias) {
            return Err(self.duplicate(alias));
        }
        if !self.units.contains_key(unit) {
            return Err(self.unknown(unit));
        }
        self.aliases.insert(alias.to_string(), unit.to_string());
        Ok(())
    }

    /// True if `name` is a unit name or an alias in this measurement
    pub fn contains(&self, name: &str) -> bool {
        self.units.contains_key(name) || self.aliases.contains_key(name)
    }

    /// Get a unit by name or alias
    pub fn unit(&self, name: &str) -> Result<&Unit, ConvertError> {
        if let Some(unit) = self.units.get(name) {
            return Ok(unit);
        }
        self.aliases
            .get(name)
            .and_then(|canonical| self.units.get(canonical))
            .ok_or_else(|| self.unknown(name))
    }

    /// Units in registration order
    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.units.values()
    }

    pub fn unit_names(&self) -> impl Iterator<Item = &str> {
        self.units.keys().map(|s| s.as_str())
    }

    /// Aliases that resolve to `unit`, sorted
    pub fn aliases_of(&self, unit: &str) -> Vec<&str> {
        let mut found: Vec<&str> = self
            .aliases
            .iter()
            .filter(|(_, target)| target.as_str() == unit)
            .map(|(alias, _)| alias.as_str())
            .collect();
        found.sort_unstable();
        found
    }

    /// Every name a unit can be looked up by: canonical names then aliases
    pub fn lookup_names(&self) -> impl Iterator<Item = &str> {
        self.unit_names().chain(self.aliases.keys().map(|s| s.as_str()))
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// The unit every other unit is defined against
    pub fn reference_unit(&self) -> Option<&Unit> {
        self.units.values().find(|u| u.is_reference())
    }

    /// Convert `value` from one unit to another, rounded to this
    /// measurement's decimal places
    pub fn convert(&self, from: &str, to: &str, value: f64) -> Result<f64, ConvertError> {
        let result = self.convert_unrounded(from, to, value)?;
        Ok(round_half_up(result, self.decimal_places))
    }

    /// Convert without the final rounding step
    pub fn convert_unrounded(&self, from: &str, to: &str, value: f64) -> Result<f64, ConvertError> {
        if !value.is_finite() {
            return Err(ConvertError::invalid_value(from, value, "value is not finite"));
        }
        let from_unit = self.unit(from)?;
        let to_unit = self.unit(to)?;

        if from_unit.name == to_unit.name {
            return Ok(value);
        }

        let reference = from_unit.to_reference(value)?;
        to_unit.from_reference(reference)
    }

    fn duplicate(&self, unit: &str) -> ConvertError {
        ConvertError::DuplicateUnit {
            measurement: self.name.clone(),
            unit: unit.to_string(),
        }
    }

    fn unknown(&self, unit: &str) -> ConvertError {
        ConvertError::UnknownUnit {
            measurement: self.name.clone(),
            unit: unit.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn length() -> Measurement {
        let mut m = Measurement::new("Length");
        m.add_unit(Unit::reference("centimeter")).unwrap();
        m.add_unit(Unit::linear("meter", 0.01).unwrap()).unwrap();
        m.add_unit(Unit::linear("inch", 1.0 / 2.54).unwrap()).unwrap();
        m.add_alias("in", "inch").unwrap();
        m
    }

    #[test]
    fn test_convert_through_reference() {
        let m = length();
        assert_eq!(m.convert("inch", "centimeter", 1.0).unwrap(), 2.54);
        assert_eq!(m.convert("meter", "inch", 1.0).unwrap(), 39.37);
    }

    #[test]
    fn test_alias_lookup() {
        let m = length();
        assert_eq!(m.convert("in", "centimeter", 2.0).unwrap(), 5.08);
        assert_eq!(m.unit("in").unwrap().name, "inch");
        assert_eq!(m.aliases_of("inch"), vec!["in"]);
    }

    #[test]
    fn test_same_unit_is_identity() {
        let m = length();
        assert_eq!(m.convert("inch", "inch", 3.14159).unwrap(), 3.14);
        assert_eq!(m.convert("inch", "in", 1.0).unwrap(), 1.0);
    }

    #[test]
    fn test_unknown_unit() {
        let m = length();
        let err = m.convert("parsec", "meter", 1.0).unwrap_err();
        assert_eq!(
            err,
            ConvertError::UnknownUnit { measurement: "Length".into(), unit: "parsec".into() }
        );
        assert!(m.convert("meter", "parsec", 1.0).is_err());
    }

    #[test]
    fn test_non_finite_input() {
        let m = length();
        assert!(matches!(
            m.convert("meter", "inch", f64::NAN),
            Err(ConvertError::InvalidValue { .. })
        ));
        assert!(m.convert("meter", "inch", f64::INFINITY).is_err());
    }

    #[test]
    fn test_duplicate_unit_leaves_set_unchanged() {
        let mut m = length();
        let err = m.add_unit(Unit::linear("meter", 0.5).unwrap()).unwrap_err();
        assert!(matches!(err, ConvertError::DuplicateUnit { .. }));
        assert_eq!(m.len(), 3);
        assert_eq!(m.unit("meter").unwrap().factor(), 0.01);
    }

    #[test]
    fn test_alias_cannot_shadow_unit() {
        let mut m = length();
        assert!(m.add_alias("meter", "inch").is_err());
        assert!(m.add_unit(Unit::linear("in", 2.0).unwrap()).is_err());
        assert!(matches!(m.add_alias("yd", "yard"), Err(ConvertError::UnknownUnit { .. })));
    }

    #[test]
    fn test_precision() {
        let mut m = length();
        assert_eq!(m.decimal_places(), DEFAULT_DECIMAL_PLACES);
        m.set_decimal_places(4);
        assert_eq!(m.convert("meter", "inch", 1.0).unwrap(), 39.3701);
        let m = length().with_decimal_places(0);
        assert_eq!(m.convert("meter", "inch", 1.0).unwrap(), 39.0);
    }

    #[test]
    fn test_second_reference_rejected() {
        let mut m = length();
        let err = m.add_unit(Unit::reference("millimeter")).unwrap_err();
        assert!(matches!(err, ConvertError::InvalidValue { ref unit, .. } if unit == "millimeter"));
        assert!(m.add_unit(Unit::linear("decimeter", 1.0).unwrap()).is_err());
        assert_eq!(m.len(), 3);
        assert_eq!(m.units().filter(|u| u.is_reference()).count(), 1);
    }

    #[test]
    fn test_reference_may_come_later() {
        let mut m = Measurement::new("Length");
        m.add_unit(Unit::linear("meter", 0.01).unwrap()).unwrap();
        assert!(m.reference_unit().is_none());
        m.add_unit(Unit::reference("centimeter")).unwrap();
        assert_eq!(m.reference_unit().map(|u| u.name.as_str()), Some("centimeter"));
    }

    #[test]
    fn test_reference_unit_and_order() {
        let m = length();
        assert_eq!(m.reference_unit().map(|u| u.name.as_str()), Some("centimeter"));
        let names: Vec<&str> = m.unit_names().collect();
        assert_eq!(names, vec!["centimeter", "meter", "inch"]);
    }
}
