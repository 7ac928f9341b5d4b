//! Evaluation Context

use gauge_units::MeasurementRegistry;
use std::sync::Arc;

/// Evaluation context passed to plugins
#[derive(Debug, Clone)]
pub struct EvalContext {
    pub measurements: Arc<MeasurementRegistry>,
    /// Overrides every category's own decimal places when set
    pub decimal_places: Option<u32>,
}

impl EvalContext {
    pub fn new(measurements: Arc<MeasurementRegistry>) -> Self {
        Self {
            measurements,
            decimal_places: None,
        }
    }

    pub fn with_decimal_places(mut self, places: u32) -> Self {
        self.decimal_places = Some(places);
        self
    }
}
