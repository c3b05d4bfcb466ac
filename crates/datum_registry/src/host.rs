//! Binding containers to host types.
//!
//! A host type keeps one shared [`Template`] (built once, read-mostly) and
//! gives each instance its own [`Container`] seeded from it. Implementing
//! [`DataProvider`] forwards the registry operations to that container and
//! makes the instance reachable from provider bodies through
//! [`Resolver::host`](crate::resolve::Resolver::host).
//!
//! ```text
//! static TEMPLATE: LazyLock<Template>   (shared, never mutated after build)
//!        │ instance()
//!        ▼
//! Invoice { container: Container }      (per instance, give/add freely)
//! ```
//!
//! # Example
//!
//! ```
//! use std::sync::LazyLock;
//! use datum_registry::container::Container;
//! use datum_registry::host::{DataProvider, Template};
//! use serde_json::json;
//!
//! struct Greeter {
//!     greeting: &'static str,
//!     container: Container,
//! }
//!
//! static GREETER: LazyLock<Template> = LazyLock::new(|| {
//!     Template::build(|c| {
//!         c.provider("message", |ctx| {
//!             let greeter = ctx.host::<Greeter>().expect("bound to a Greeter");
//!             let name = ctx.given("name").and_then(|v| v.as_str()).unwrap_or("world");
//!             Ok(json!(format!("{}, {name}!", greeter.greeting)))
//!         });
//!     })
//! });
//!
//! impl DataProvider for Greeter {
//!     fn container(&self) -> &Container {
//!         &self.container
//!     }
//! }
//!
//! let greeter = Greeter {
//!     greeting: "Hello",
//!     container: GREETER.instance_with([("name", "Billy")]),
//! };
//! assert_eq!(greeter.take("message").unwrap(), json!("Hello, Billy!"));
//! ```

use crate::container::{Container, ContainerConfig};
use crate::error::ResolveResult;
use crate::identifier::Identifier;
use crate::resolve::{Resolver, TakeOptions};
use core::any::Any;
use serde_json::Value;

/// A shared container from which per-instance containers are seeded.
#[derive(Debug, Clone, Default)]
pub struct Template {
    container: Container,
}

impl Template {
    /// Wraps an already populated container.
    #[must_use]
    pub fn new(container: Container) -> Self {
        Self { container }
    }

    /// Builds a template by populating an empty container.
    #[must_use]
    pub fn build(populate: impl FnOnce(&mut Container)) -> Self {
        Self::build_with_config(ContainerConfig::default(), populate)
    }

    /// Builds a template with a custom configuration.
    #[must_use]
    pub fn build_with_config(
        config: ContainerConfig,
        populate: impl FnOnce(&mut Container),
    ) -> Self {
        let mut container = Container::with_config(config);
        populate(&mut container);
        Self { container }
    }

    /// The template's container.
    #[must_use]
    pub fn container(&self) -> &Container {
        &self.container
    }

    /// Returns a new template with `other` added (see [`Container::add`]).
    #[must_use]
    pub fn extend(&self, other: &Container) -> Self {
        Self::new(self.container.add(other))
    }

    /// Seeds an instance container.
    #[must_use]
    pub fn instance(&self) -> Container {
        self.container.copy()
    }

    /// Seeds an instance container with input data.
    #[must_use]
    pub fn instance_with<I, K, V>(&self, data: I) -> Container
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Identifier>,
        V: Into<Value>,
    {
        self.container.give(data)
    }
}

/// Registry operations forwarded to a host's own container.
///
/// Every take runs with `self` as the host, so bodies can call back into the
/// host type through [`Resolver::host`](crate::resolve::Resolver::host).
pub trait DataProvider: Any + Sized {
    /// The instance container.
    fn container(&self) -> &Container;

    /// See [`Container::take`].
    ///
    /// # Errors
    ///
    /// See [`Container::take`].
    fn take(&self, id: impl Into<Identifier>) -> ResolveResult {
        self.container().take_with_host(id, self)
    }

    /// See [`Container::take_with`].
    ///
    /// # Errors
    ///
    /// See [`Container::take`].
    fn take_with(&self, id: impl Into<Identifier>, options: TakeOptions) -> ResolveResult {
        Resolver::with_host(self.container(), self).take_with(id, options)
    }

    /// See [`Container::try_take`].
    ///
    /// # Errors
    ///
    /// See [`Container::try_take`].
    fn try_take(&self, id: impl Into<Identifier>) -> ResolveResult<Option<Value>> {
        Resolver::with_host(self.container(), self).try_take(id)
    }

    /// See [`Container::has_provider`].
    fn has_provider(&self, id: impl Into<Identifier>) -> bool {
        self.container().has_provider(id)
    }

    /// See [`Container::given`].
    fn given(&self, key: impl Into<Identifier>) -> Option<&Value> {
        self.container().given(key)
    }

    /// See [`Container::got`].
    fn got(&self, key: impl Into<Identifier>) -> bool {
        self.container().got(key)
    }
}
