//! Gauge Plugin System
//!
//! Functions exposed to tool callers implement [`FunctionPlugin`] and are
//! collected in a [`PluginRegistry`]. Each call receives an [`EvalContext`]
//! holding the loaded measurement registry.

mod traits;
mod registry;
mod context;

pub use traits::{FunctionPlugin, FunctionMeta, ArgMeta};
pub use registry::PluginRegistry;
pub use context::EvalContext;

/// Re-export core types for plugin authors
pub mod prelude {
    pub use crate::{FunctionPlugin, FunctionMeta, ArgMeta, PluginRegistry, EvalContext};
    pub use gauge_core::prelude::*;
}
