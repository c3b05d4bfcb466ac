//! A hierarchical provider registry for computing data on demand.
//!
//! Values are produced by named providers that can override one another,
//! delegate to the provider they replaced and resolve sibling identifiers
//! within their own scope. See [`datum_registry`] for the resolution model.
//!
//! ```
//! use datum::prelude::*;
//! use serde_json::json;
//!
//! let mut container = Container::new();
//! container.provider("answer", |_| Ok(json!(42)));
//! assert_eq!(container.take("answer").unwrap(), json!(42));
//! ```

pub use datum_internal::*;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use datum_internal::prelude::*;
}
