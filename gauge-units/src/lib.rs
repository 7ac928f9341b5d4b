//! Gauge Units - Measurement categories and unit conversion
//!
//! Each category converts between its units by going through one reference
//! unit. Most units are linear multiples of the reference; temperature
//! scales are affine and fuel-economy units are reciprocal.
//!
//! Categories:
//! - Length (centimeter reference)
//! - Weight (gram)
//! - Temperature (celsius, 1 decimal place)
//! - Volume (liter)
//! - Gas Mileage (liters per 100 km)
//! - Area (square meter)
//! - Power (watt, 3 decimal places)
//! - Pressure (pascal)
//! - Speed (kilometers per hour)
//! - Angle (degrees)
//! - Currency (U.S. Dollars, rates from a [`RateSource`])

mod unit;
mod measurement;
mod registry;
pub mod catalog;
pub mod rates;

pub use unit::{Unit, Conversion};
pub use measurement::{Measurement, DEFAULT_DECIMAL_PLACES};
pub use registry::MeasurementRegistry;
pub use rates::{RateSource, RateTable, RatesError, StaticRates};
