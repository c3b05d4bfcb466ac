//! Ambient infrastructure shared by Datum binaries.
//!
//! - [`TracingSetup`] - Installs the `tracing` subscriber that receives the
//!   registry's diagnostics

mod tracing_setup;

pub use tracing_setup::{TracingConfig, TracingFormat, TracingSetup};
