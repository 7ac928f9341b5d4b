//! Argument extraction for the built-in functions

use gauge_core::{ConvertError, ErrorReport, Value, rank_similar};
use gauge_units::MeasurementRegistry;
use crate::config::MAX_PLACES;

/// Extract a number; numeric text is accepted since tool callers often send strings
pub fn extract_number(value: &Value, func: &str, arg: &str) -> Result<f64, ErrorReport> {
    match value {
        Value::Error(e) => Err(e.clone()),
        other => other
            .to_number()
            .ok_or_else(|| ErrorReport::arg_type(func, arg, "Number", other.type_name())),
    }
}

/// Extract a Text string from a Value
pub fn extract_text<'a>(value: &'a Value, func: &str, arg: &str) -> Result<&'a str, ErrorReport> {
    match value {
        Value::Text(s) => Ok(s),
        Value::Error(e) => Err(e.clone()),
        other => Err(ErrorReport::arg_type(func, arg, "Text", other.type_name())),
    }
}

/// Extract an optional non-negative integer (missing or null gives None)
pub fn extract_optional_places(args: &[Value], index: usize, func: &str) -> Result<Option<u32>, ErrorReport> {
    match args.get(index) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => {
            let n = extract_number(v, func, "places")?;
            if n < 0.0 || n.fract() != 0.0 || n > f64::from(MAX_PLACES) {
                let expected = format!("integer 0-{}", MAX_PLACES);
                return Err(ErrorReport::arg_type(func, "places", &expected, &n.to_string()));
            }
            Ok(Some(n as u32))
        }
    }
}

/// Turn a registry error into a report, adding "did you mean" alternatives
/// for unknown names
pub fn report(err: ConvertError, registry: &MeasurementRegistry) -> ErrorReport {
    let alternatives = match &err {
        ConvertError::UnknownCategory(name) => rank_similar(name, registry.lookup_names()),
        ConvertError::UnknownUnit { measurement, unit } => registry
            .get_measurement(measurement)
            .map(|m| rank_similar(unit, m.lookup_names()))
            .unwrap_or_default(),
        _ => Vec::new(),
    };
    ErrorReport::from(err).with_alternatives(&alternatives)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gauge_core::codes;
    use gauge_units::StaticRates;

    #[test]
    fn test_extract_number() {
        assert_eq!(extract_number(&Value::Number(42.0), "f", "a").unwrap(), 42.0);
        assert_eq!(extract_number(&Value::from("1.5"), "f", "a").unwrap(), 1.5);
        let err = extract_number(&Value::Bool(true), "f", "a").unwrap_err();
        assert_eq!(err.code, codes::ARG_TYPE);
    }

    #[test]
    fn test_extract_text() {
        assert_eq!(extract_text(&Value::from("meter"), "f", "a").unwrap(), "meter");
        assert!(extract_text(&Value::Number(1.0), "f", "a").is_err());
    }

    #[test]
    fn test_extract_places() {
        let args = [Value::Null, Value::Number(3.0), Value::Number(2.5), Value::Number(-1.0)];
        assert_eq!(extract_optional_places(&args, 0, "f").unwrap(), None);
        assert_eq!(extract_optional_places(&args, 1, "f").unwrap(), Some(3));
        assert!(extract_optional_places(&args, 2, "f").is_err());
        assert!(extract_optional_places(&args, 3, "f").is_err());
        assert_eq!(extract_optional_places(&args, 9, "f").unwrap(), None);
    }

    #[test]
    fn test_extract_places_bounded_by_max() {
        let args = [Value::from(f64::from(MAX_PLACES)), Value::from(f64::from(MAX_PLACES + 1))];
        assert_eq!(extract_optional_places(&args, 0, "f").unwrap(), Some(MAX_PLACES));
        let err = extract_optional_places(&args, 1, "f").unwrap_err();
        assert_eq!(err.code, codes::ARG_TYPE);
    }

    #[test]
    fn test_report_suggests_units() {
        let registry = MeasurementRegistry::loaded(&StaticRates::bundled().unwrap()).unwrap();
        let err = ConvertError::UnknownUnit { measurement: "Length".into(), unit: "meters".into() };
        let report = report(err, &registry);
        assert_eq!(report.code, codes::UNKNOWN_UNIT);
        assert!(report.suggestion.unwrap().contains("meter"));
    }

    #[test]
    fn test_report_suggests_categories() {
        let registry = MeasurementRegistry::loaded(&StaticRates::bundled().unwrap()).unwrap();
        let report = report(ConvertError::UnknownCategory("Volume2".into()), &registry);
        assert!(report.suggestion.unwrap().contains("Volume"));
    }
}
