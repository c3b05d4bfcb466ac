//! The provider registry at the heart of Datum (Layer 1).
//!
//! `datum_registry` resolves identifiers to values by evaluating registered
//! computations ("providers"):
//!
//! - [`identifier`] - Atomic and compound identifiers, scopes
//! - [`provider`] - Provider values and registration options
//! - [`container`] - Registration, queries, composition and input data
//! - [`resolve`] - The resolution context handed to provider bodies
//! - [`value`] - Static values and value helpers
//! - [`host`] - Templates and host-type forwarding
//! - [`error`] - Resolution errors
//!
//! # Resolution model
//!
//! Providers sharing an identifier override each other: the highest priority
//! wins, and among equal priorities the most recent registration wins. A
//! body can reach the provider it overrides with
//! [`take_super`](resolve::Resolver::take_super), and identifiers taken from
//! inside a scoped provider fall back to lookups within that scope.
//!
//! # Example
//!
//! ```
//! use datum_registry::prelude::*;
//! use serde_json::json;
//!
//! let mut base = Container::new();
//! base.provider("value", |_| Ok(json!("original")));
//!
//! let mut extension = Container::new();
//! extension.provider("value", |ctx| {
//!     let inner = ctx.take_super()?;
//!     Ok(json!(format!("{} [extended]", inner.as_str().unwrap_or_default())))
//! });
//!
//! let combined = base.add(&extension);
//! assert_eq!(combined.take("value").unwrap(), json!("original [extended]"));
//! assert_eq!(base.take("value").unwrap(), json!("original"));
//! ```

/// Resolution errors.
pub mod error;

/// Templates and host-type forwarding.
pub mod host;

/// Atomic and compound identifiers.
pub mod identifier;

/// Provider values and registration options.
pub mod provider;

/// The resolution context handed to provider bodies.
pub mod resolve;

/// Provider storage and composition.
pub mod container;

/// Static values and value helpers.
pub mod value;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::container::{Container, ContainerConfig, FilledOptions};
    pub use crate::error::{BoxError, ResolveError, ResolveResult};
    pub use crate::host::{DataProvider, Template};
    pub use crate::identifier::{Identifier, Scope, Segment};
    pub use crate::provider::{Provider, ProviderFn, ProviderOptions};
    pub use crate::resolve::{Resolver, TakeOptions};
    pub use crate::value::{StaticValue, is_filled};
}
