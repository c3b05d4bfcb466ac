//! Registered computations.
//!
//! A [`Provider`] binds an [`Identifier`] to a body: a closure that receives a
//! [`Resolver`] and produces a value. Providers are immutable once built and
//! cheap to clone (the body is shared).

use crate::error::ResolveResult;
use crate::identifier::{Identifier, Scope};
use crate::resolve::Resolver;
use std::sync::Arc;

/// The body of a provider.
pub type ProviderFn = Arc<dyn Fn(&mut Resolver<'_>) -> ResolveResult + Send + Sync>;

/// Registration options for a provider.
///
/// # Example
///
/// ```
/// use datum_registry::provider::ProviderOptions;
///
/// let options = ProviderOptions::new()
///     .with_priority(2)
///     .requires("array")
///     .with_force_build(true);
///
/// assert_eq!(options.priority, Some(2));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderOptions {
    /// Priority; `None` uses the container's default priority.
    pub priority: Option<i64>,
    /// Inputs the body expects to find in the container's data.
    ///
    /// Informational only; resolution never checks them.
    pub requires: Vec<Identifier>,
    /// Whether hosts should build output for this provider even when empty.
    pub force_build: bool,
}

impl ProviderOptions {
    /// Creates default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the priority.
    #[must_use]
    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Declares a required input.
    #[must_use]
    pub fn requires(mut self, input: impl Into<Identifier>) -> Self {
        self.requires.push(input.into());
        self
    }

    /// Sets the force-build flag.
    #[must_use]
    pub fn with_force_build(mut self, force_build: bool) -> Self {
        self.force_build = force_build;
        self
    }
}

/// A registered computation.
#[derive(Clone)]
pub struct Provider {
    identifier: Option<Identifier>,
    options: ProviderOptions,
    body: ProviderFn,
}

impl Provider {
    /// Creates a provider for `identifier`.
    pub fn new<F>(identifier: impl Into<Identifier>, options: ProviderOptions, body: F) -> Self
    where
        F: Fn(&mut Resolver<'_>) -> ResolveResult + Send + Sync + 'static,
    {
        Self {
            identifier: Some(identifier.into()),
            options,
            body: Arc::new(body),
        }
    }

    /// Creates a fallback provider (no identifier).
    pub fn fallback<F>(body: F) -> Self
    where
        F: Fn(&mut Resolver<'_>) -> ResolveResult + Send + Sync + 'static,
    {
        Self {
            identifier: None,
            options: ProviderOptions::default(),
            body: Arc::new(body),
        }
    }

    /// Returns a copy of this provider registered under `identifier`.
    #[must_use]
    pub(crate) fn with_identifier(&self, identifier: Identifier) -> Self {
        Self {
            identifier: Some(identifier),
            options: self.options.clone(),
            body: Arc::clone(&self.body),
        }
    }

    /// The provider's identifier, `None` for the fallback provider.
    #[must_use]
    pub fn identifier(&self) -> Option<&Identifier> {
        self.identifier.as_ref()
    }

    /// Registration options.
    #[must_use]
    pub fn options(&self) -> &ProviderOptions {
        &self.options
    }

    /// Explicit priority, if any.
    #[must_use]
    pub fn priority(&self) -> Option<i64> {
        self.options.priority
    }

    /// Declared required inputs.
    #[must_use]
    pub fn requirements(&self) -> &[Identifier] {
        &self.options.requires
    }

    /// Whether the provider was registered with `force_build`.
    #[must_use]
    pub fn force_build(&self) -> bool {
        self.options.force_build
    }

    /// Returns `true` for the fallback provider.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.identifier.is_none()
    }

    /// The scope of the provider's identifier (empty for atoms and fallbacks).
    #[must_use]
    pub fn scope(&self) -> Scope {
        self.identifier
            .as_ref()
            .map(Identifier::scope)
            .unwrap_or_default()
    }

    pub(crate) fn body(&self) -> &ProviderFn {
        &self.body
    }
}

impl core::fmt::Debug for Provider {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Provider")
            .field("identifier", &self.identifier)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
