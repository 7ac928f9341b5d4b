//! Unit representation with its conversion rule

use std::fmt;
use serde::{Serialize, Deserialize};
use gauge_core::ConvertError;

/// How a unit relates to its measurement's reference unit.
///
/// Every rule is written as "value in this unit, given a reference value r".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Conversion {
    /// value = r * factor
    Linear { factor: f64 },
    /// value = r * scale + offset (temperature scales)
    Affine { scale: f64, offset: f64 },
    /// value = constant / r (fuel economy expressed the other way round)
    Reciprocal { constant: f64 },
}

impl Conversion {
    /// The rule every reference unit uses
    pub const IDENTITY: Conversion = Conversion::Linear { factor: 1.0 };

    fn validate(&self, unit: &str) -> Result<(), ConvertError> {
        let (param, ok) = match *self {
            Conversion::Linear { factor } => (factor, factor.is_finite() && factor > 0.0),
            Conversion::Affine { scale, offset } => {
                (scale, scale.is_finite() && scale != 0.0 && offset.is_finite())
            }
            Conversion::Reciprocal { constant } => {
                (constant, constant.is_finite() && constant > 0.0)
            }
        };
        if ok {
            Ok(())
        } else {
            Err(ConvertError::invalid_value(unit, param, format!("unusable {} rule", self.kind())))
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Conversion::Linear { .. } => "linear",
            Conversion::Affine { .. } => "affine",
            Conversion::Reciprocal { .. } => "reciprocal",
        }
    }
}

/// One named unit inside a measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    /// The unit name (e.g., "centimeter", "miles per gallon")
    pub name: String,
    pub conversion: Conversion,
}

impl Unit {
    /// The reference unit of a measurement
    pub fn reference(name: &str) -> Self {
        Unit {
            name: name.to_string(),
            conversion: Conversion::IDENTITY,
        }
    }

    /// A linear unit: `factor` of this unit make one reference unit
    pub fn linear(name: &str, factor: f64) -> Result<Self, ConvertError> {
        Self::with_conversion(name, Conversion::Linear { factor })
    }

    /// An affine unit (temperature scales)
    pub fn affine(name: &str, scale: f64, offset: f64) -> Result<Self, ConvertError> {
        Self::with_conversion(name, Conversion::Affine { scale, offset })
    }

    /// A reciprocal unit (km/L or mpg against L/100km)
    pub fn reciprocal(name: &str, constant: f64) -> Result<Self, ConvertError> {
        Self::with_conversion(name, Conversion::Reciprocal { constant })
    }

    pub fn with_conversion(name: &str, conversion: Conversion) -> Result<Self, ConvertError> {
        conversion.validate(name)?;
        Ok(Unit {
            name: name.to_string(),
            conversion,
        })
    }

    /// The stored factor: linear factor, affine scale or reciprocal constant
    pub fn factor(&self) -> f64 {
        match self.conversion {
            Conversion::Linear { factor } => factor,
            Conversion::Affine { scale, .. } => scale,
            Conversion::Reciprocal { constant } => constant,
        }
    }

    /// Check if this is a reference unit (identity mapping)
    pub fn is_reference(&self) -> bool {
        self.conversion == Conversion::IDENTITY
    }

    /// Convert a value expressed in this unit into the reference unit
    pub fn to_reference(&self, value: f64) -> Result<f64, ConvertError> {
        let result = match self.conversion {
            Conversion::Linear { factor } => value / factor,
            Conversion::Affine { scale, offset } => (value - offset) / scale,
            Conversion::Reciprocal { constant } => {
                if value == 0.0 {
                    return Err(ConvertError::invalid_value(&self.name, value, "division by zero"));
                }
                constant / value
            }
        };
        self.finite(value, result)
    }

    /// Convert a reference-unit value into this unit
    pub fn from_reference(&self, reference: f64) -> Result<f64, ConvertError> {
        let result = match self.conversion {
            Conversion::Linear { factor } => reference * factor,
            Conversion::Affine { scale, offset } => reference * scale + offset,
            Conversion::Reciprocal { constant } => {
                if reference == 0.0 {
                    return Err(ConvertError::invalid_value(&self.name, reference, "division by zero"));
                }
                constant / reference
            }
        };
        self.finite(reference, result)
    }

    fn finite(&self, input: f64, result: f64) -> Result<f64, ConvertError> {
        if result.is_finite() {
            Ok(result)
        } else {
            Err(ConvertError::invalid_value(&self.name, input, "result is not finite"))
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
