//! Conversion errors and their structured, serializable report form
//!
//! `ConvertError` is what the registry returns. `ErrorReport` is what crosses
//! the plugin and MCP boundary: a machine-readable code, a message and an
//! optional suggestion for the caller.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard error codes (machine-readable)
pub mod codes {
    pub const UNKNOWN_CATEGORY: &str = "UNKNOWN_CATEGORY";
    pub const UNKNOWN_UNIT: &str = "UNKNOWN_UNIT";
    pub const DUPLICATE_UNIT: &str = "DUPLICATE_UNIT";
    pub const DUPLICATE_CATEGORY: &str = "DUPLICATE_CATEGORY";
    pub const INVALID_VALUE: &str = "INVALID_VALUE";
    pub const RATE_UNAVAILABLE: &str = "RATE_UNAVAILABLE";
    pub const UNDEFINED_FUNC: &str = "UNDEFINED_FUNC";
    pub const ARG_COUNT: &str = "ARG_COUNT";
    pub const ARG_TYPE: &str = "ARG_TYPE";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const INTERNAL: &str = "INTERNAL";
}

/// Error returned by every registry, measurement and unit operation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConvertError {
    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("unknown unit '{unit}' in {measurement}")]
    UnknownUnit { measurement: String, unit: String },

    #[error("unit '{unit}' is already registered in {measurement}")]
    DuplicateUnit { measurement: String, unit: String },

    #[error("category '{0}' is already registered")]
    DuplicateCategory(String),

    #[error("invalid value {value} for {unit}: {reason}")]
    InvalidValue { unit: String, value: f64, reason: String },

    #[error("exchange rate for {code} unavailable: {reason}")]
    RateUnavailable { code: String, reason: String },
}

impl ConvertError {
    pub fn invalid_value(unit: &str, value: f64, reason: impl Into<String>) -> Self {
        ConvertError::InvalidValue {
            unit: unit.to_string(),
            value,
            reason: reason.into(),
        }
    }

    pub fn rate_unavailable(code: &str, reason: impl Into<String>) -> Self {
        ConvertError::RateUnavailable {
            code: code.to_string(),
            reason: reason.into(),
        }
    }

    /// Machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            ConvertError::UnknownCategory(_) => codes::UNKNOWN_CATEGORY,
            ConvertError::UnknownUnit { .. } => codes::UNKNOWN_UNIT,
            ConvertError::DuplicateUnit { .. } => codes::DUPLICATE_UNIT,
            ConvertError::DuplicateCategory(_) => codes::DUPLICATE_CATEGORY,
            ConvertError::InvalidValue { .. } => codes::INVALID_VALUE,
            ConvertError::RateUnavailable { .. } => codes::RATE_UNAVAILABLE,
        }
    }

    /// Population failures abort `load`; everything else is a caller error
    pub fn is_population_error(&self) -> bool {
        matches!(
            self,
            ConvertError::DuplicateUnit { .. }
                | ConvertError::DuplicateCategory(_)
                | ConvertError::RateUnavailable { .. }
        )
    }
}

/// Severity level of a reported error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The request failed, the server keeps going
    Error,
    /// The registry could not be built
    Fatal,
}

/// Structured error for tool consumers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,

    pub severity: Severity,
}

impl ErrorReport {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            suggestion: None,
            severity: Severity::Error,
        }
    }

    /// Builder: add suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Builder: set severity
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Builder: suggest the closest known names, if any
    pub fn with_alternatives(self, alternatives: &[String]) -> Self {
        if alternatives.is_empty() {
            return self;
        }
        let shown: Vec<&str> = alternatives.iter().take(5).map(|s| s.as_str()).collect();
        self.with_suggestion(format!("Did you mean: {}?", shown.join(", ")))
    }

    // ========== Common Constructors ==========

    pub fn undefined_func(name: &str) -> Self {
        Self::new(codes::UNDEFINED_FUNC, format!("Unknown function: {}", name))
            .with_suggestion("Use list_functions to see what is available")
    }

    pub fn arg_count(func: &str, expected: usize, got: usize) -> Self {
        Self::new(
            codes::ARG_COUNT,
            format!("{}() expects {} arguments, got {}", func, expected, got),
        )
        .with_suggestion(format!("Use help('{}') for usage", func))
    }

    pub fn arg_type(func: &str, arg: &str, expected: &str, got: &str) -> Self {
        Self::new(
            codes::ARG_TYPE,
            format!("{}() argument '{}': expected {}, got {}", func, arg, expected, got),
        )
    }

    pub fn internal(details: impl Into<String>) -> Self {
        Self::new(codes::INTERNAL, format!("Internal error: {}", details.into()))
            .with_severity(Severity::Fatal)
    }
}

impl std::fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " (suggestion: {})", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for ErrorReport {}

impl From<ConvertError> for ErrorReport {
    fn from(err: ConvertError) -> Self {
        let report = Self::new(err.code(), err.to_string());
        match err {
            ConvertError::UnknownCategory(_) => {
                report.with_suggestion("Use list_categories to see registered categories")
            }
            ConvertError::UnknownUnit { measurement, .. } => report
                .with_suggestion(format!("Use list_units('{}') to see its units", measurement)),
            ConvertError::InvalidValue { .. } => {
                report.with_suggestion("Pass a finite value the unit can represent")
            }
            ConvertError::DuplicateUnit { .. }
            | ConvertError::DuplicateCategory(_)
            | ConvertError::RateUnavailable { .. } => report.with_severity(Severity::Fatal),
        }
    }
}
