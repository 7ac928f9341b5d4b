//! Gauge Core - Fundamental types
//!
//! This crate provides the core types used throughout Gauge:
//! - `ConvertError`: what every conversion operation can fail with
//! - `ErrorReport`: structured errors for tool consumers
//! - `Value`: runtime values exchanged with function plugins
//! - decimal rounding and name-similarity helpers

mod error;
mod round;
mod similar;
mod value;

pub use error::{codes, ConvertError, ErrorReport, Severity};
pub use round::round_half_up;
pub use similar::rank_similar;
pub use value::Value;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::codes;
    pub use crate::{ConvertError, ErrorReport, Severity, Value};
}
