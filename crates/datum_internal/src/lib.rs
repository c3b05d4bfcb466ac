//! # Datum Internal Library
//!
//! Re-exports the core Datum crates for convenience.

/// Layer 1: Provider registry and resolution engine.
pub use datum_registry;

/// Ambient infrastructure: tracing subscriber setup.
pub use datum_core;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use datum_core::{TracingFormat, TracingSetup};
    pub use datum_registry::prelude::*;
}
