//! Provider storage, queries and resolution entry points.
//!
//! A [`Container`] owns:
//!
//! - the provider list (registration order retained, looked up most-recent-first)
//! - the static-value map ([`provides`](Container::provides))
//! - an optional fallback provider ([`provider_missing`](Container::provider_missing))
//! - caller-supplied input data ([`give`](Container::give))
//!
//! Resolution state (the frame stack) is not stored here. Every top-level
//! [`take`](Container::take) creates its own [`Resolver`], so a container can
//! be shared freely, for example as a read-mostly template behind a
//! `LazyLock` (see [`host`](crate::host)).
//!
//! # Example
//!
//! ```
//! use datum_registry::container::Container;
//! use serde_json::json;
//!
//! let mut container = Container::new();
//! container
//!     .provider(["identification", "firstname"], |_| Ok(json!("Billy")))
//!     .provider(["identification", "lastname"], |_| Ok(json!("Bragg")))
//!     .provider(["identification", "fullname"], |ctx| {
//!         let first = ctx.scoped_take("firstname")?;
//!         let last = ctx.scoped_take("lastname")?;
//!         Ok(json!(format!("{} {}", first.as_str().unwrap_or_default(), last.as_str().unwrap_or_default())))
//!     });
//!
//! assert_eq!(
//!     container.take(["identification", "fullname"]).unwrap(),
//!     json!("Billy Bragg")
//! );
//! ```

mod compose;

use crate::error::ResolveResult;
use crate::identifier::{Identifier, Segment};
use crate::provider::{Provider, ProviderOptions};
use crate::resolve::{Resolver, TakeOptions};
use crate::value::{StaticValue, is_filled};
use core::any::Any;
use core::cmp::Reverse;
use indexmap::{IndexMap, IndexSet};
use serde_json::Value;

/// Construction-time configuration of a [`Container`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerConfig {
    /// Priority of providers registered without an explicit one.
    pub default_priority: i64,
}

impl ContainerConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default priority.
    #[must_use]
    pub fn with_default_priority(mut self, priority: i64) -> Self {
        self.default_priority = priority;
        self
    }
}

/// Options for [`Container::has_filled_providers_with_scope`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilledOptions {
    /// Also try the identifier itself before the scoped providers.
    pub include_current: bool,
}

impl FilledOptions {
    /// Sets `include_current`.
    #[must_use]
    pub fn with_include_current(mut self, include_current: bool) -> Self {
        self.include_current = include_current;
        self
    }
}

/// Registry of providers, static values, a fallback and input data.
#[derive(Clone, Default)]
pub struct Container {
    config: ContainerConfig,
    /// Registration order; lookups walk it backwards.
    providers: Vec<Provider>,
    statics: IndexMap<Identifier, StaticValue>,
    fallback: Option<Provider>,
    data: IndexMap<Identifier, Value>,
}

impl core::fmt::Debug for Container {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Container")
            .field("config", &self.config)
            .field("providers", &self.providers)
            .field("statics", &self.statics)
            .field("has_fallback", &self.fallback.is_some())
            .field("data", &self.data)
            .finish()
    }
}

impl Container {
    /// Creates an empty container with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty container with the given configuration.
    #[must_use]
    pub fn with_config(config: ContainerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// The container's configuration.
    #[must_use]
    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// Priority used for providers registered without one.
    #[must_use]
    pub fn default_priority(&self) -> i64 {
        self.config.default_priority
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Registration
    // ─────────────────────────────────────────────────────────────────────────

    /// Registers a provider with default options.
    ///
    /// The newest registration wins over older ones of equal priority.
    pub fn provider<F>(&mut self, identifier: impl Into<Identifier>, body: F) -> &mut Self
    where
        F: Fn(&mut Resolver<'_>) -> ResolveResult + Send + Sync + 'static,
    {
        self.provider_with(identifier, ProviderOptions::default(), body)
    }

    /// Registers a provider with explicit options.
    pub fn provider_with<F>(
        &mut self,
        identifier: impl Into<Identifier>,
        options: ProviderOptions,
        body: F,
    ) -> &mut Self
    where
        F: Fn(&mut Resolver<'_>) -> ResolveResult + Send + Sync + 'static,
    {
        self.register(Provider::new(identifier, options, body))
    }

    /// Registers an already built provider.
    ///
    /// A provider without an identifier becomes the fallback provider.
    pub fn register(&mut self, provider: Provider) -> &mut Self {
        if provider.is_fallback() {
            self.fallback = Some(provider);
        } else {
            self.providers.push(provider);
        }
        self
    }

    /// Merges static values into the container; later writes win.
    ///
    /// Static values are returned by [`take`](Self::take) before any provider
    /// lookup happens.
    pub fn provides<I, K, V>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Identifier>,
        V: Into<StaticValue>,
    {
        self.statics
            .extend(values.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Returns the cumulative static-value map.
    #[must_use]
    pub fn static_values(&self) -> &IndexMap<Identifier, StaticValue> {
        &self.statics
    }

    /// Sets the fallback provider, replacing any previous one.
    ///
    /// The fallback runs when nothing else matches a take; it can read the
    /// requested identifier through [`Resolver::missing_provider`].
    pub fn provider_missing<F>(&mut self, body: F) -> &mut Self
    where
        F: Fn(&mut Resolver<'_>) -> ResolveResult + Send + Sync + 'static,
    {
        self.fallback = Some(Provider::fallback(body));
        self
    }

    /// The fallback provider, if one is registered.
    #[must_use]
    pub fn fallback_provider(&self) -> Option<&Provider> {
        self.fallback.as_ref()
    }

    /// Returns `true` if a fallback provider is registered.
    #[must_use]
    pub fn has_fallback_provider(&self) -> bool {
        self.fallback.is_some()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// Iterates over registered providers, most recent first.
    pub fn providers(&self) -> impl DoubleEndedIterator<Item = &Provider> + '_ {
        self.providers.iter().rev()
    }

    /// Returns the `skip`-th provider for `id`, ordered by descending
    /// effective priority and, within a priority, most recent first.
    #[must_use]
    pub fn matching_provider(&self, id: &Identifier, skip: usize) -> Option<&Provider> {
        let default = self.default_priority();
        let mut matching: Vec<&Provider> = self
            .providers()
            .filter(|provider| provider.identifier() == Some(id))
            .collect();

        // Stable: equal priorities keep most-recent-first order.
        matching.sort_by_key(|provider| Reverse(provider.priority().unwrap_or(default)));
        matching.into_iter().nth(skip)
    }

    /// Returns `true` if `id` is a static key or has a matching provider.
    #[must_use]
    pub fn has_provider(&self, id: impl Into<Identifier>) -> bool {
        let id = id.into();
        self.statics.contains_key(&id) || self.matching_provider(&id, 0).is_some()
    }

    /// De-duplicated static keys followed by provider identifiers (most
    /// recent first).
    #[must_use]
    pub fn provider_identifiers(&self) -> Vec<Identifier> {
        let mut identifiers: IndexSet<&Identifier> = self.statics.keys().collect();
        identifiers.extend(self.providers().filter_map(Provider::identifier));
        identifiers.into_iter().cloned().collect()
    }

    /// All path identifiers strictly longer than `prefix` that start with it.
    ///
    /// An atomic prefix is treated as a one-element path.
    #[must_use]
    pub fn providers_with_scope(&self, prefix: impl Into<Identifier>) -> Vec<Identifier> {
        let prefix = prefix.into();
        self.provider_identifiers()
            .into_iter()
            .filter(|id| id.has_scope_prefix(prefix.segments()))
            .collect()
    }

    /// Returns `true` if [`providers_with_scope`](Self::providers_with_scope)
    /// is non-empty.
    #[must_use]
    pub fn has_providers_with_scope(&self, prefix: impl Into<Identifier>) -> bool {
        !self.providers_with_scope(prefix).is_empty()
    }

    /// Returns `true` if any provider under `current`'s scope produces a
    /// filled value (see [`is_filled`]).
    ///
    /// Candidates are tried shortest identifier first; those ending in a
    /// [`Segment::Private`] are skipped. With
    /// [`include_current`](FilledOptions::include_current), `current` itself is
    /// tried first: any non-null value decides the answer on its own, and only
    /// a null or missing value moves on to the scoped providers.
    ///
    /// # Errors
    ///
    /// Propagates errors raised by the providers that are evaluated.
    pub fn has_filled_providers_with_scope(
        &self,
        current: impl Into<Identifier>,
        options: FilledOptions,
    ) -> ResolveResult<bool> {
        let current = current.into();

        if options.include_current {
            match self.try_take(current.clone())? {
                Some(Value::Null) | None => {}
                Some(value) => return Ok(is_filled(&value)),
            }
        }

        let mut candidates = self.providers_with_scope(current);
        candidates.sort_by_key(Identifier::len);

        for id in candidates {
            if id.last().is_some_and(Segment::is_private) {
                continue;
            }
            if self.try_take(id)?.is_some_and(|value| is_filled(&value)) {
                return Ok(true);
            }
        }

        Ok(false)
    }

    /// Returns `true` if the top provider for `id` (as a path) was registered
    /// with `force_build`.
    #[must_use]
    pub fn force_build(&self, id: impl Into<Identifier>) -> bool {
        let path = Identifier::from(id.into().segments());
        self.matching_provider(&path, 0)
            .is_some_and(Provider::force_build)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Resolution
    // ─────────────────────────────────────────────────────────────────────────

    /// Resolves `id`.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::ProviderMissing`](crate::error::ResolveError::ProviderMissing)
    ///   if nothing resolves `id`
    /// - any error raised by the evaluated provider bodies
    pub fn take(&self, id: impl Into<Identifier>) -> ResolveResult {
        Resolver::new(self).take(id)
    }

    /// Resolves `id` with explicit [`TakeOptions`].
    ///
    /// # Errors
    ///
    /// See [`take`](Self::take).
    pub fn take_with(&self, id: impl Into<Identifier>, options: TakeOptions) -> ResolveResult {
        Resolver::new(self).take_with(id, options)
    }

    /// Resolves `id` with `host` reachable from provider bodies through
    /// [`Resolver::host`].
    ///
    /// # Errors
    ///
    /// See [`take`](Self::take).
    pub fn take_with_host<H: Any>(&self, id: impl Into<Identifier>, host: &H) -> ResolveResult {
        Resolver::with_host(self, host).take(id)
    }

    /// Like [`take`](Self::take), but returns `Ok(None)` instead of failing
    /// when neither a provider for `id` nor a fallback exists.
    ///
    /// # Errors
    ///
    /// Errors from an existing provider's body still propagate.
    pub fn try_take(&self, id: impl Into<Identifier>) -> ResolveResult<Option<Value>> {
        Resolver::new(self).try_take(id)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Data
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns a copy of this container with `data` merged into its input data.
    #[must_use]
    pub fn give<I, K, V>(&self, data: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Identifier>,
        V: Into<Value>,
    {
        let mut copy = self.copy();
        copy.give_in_place(data);
        copy
    }

    /// Merges `data` into this container's input data; later writes win.
    pub fn give_in_place<I, K, V>(&mut self, data: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Identifier>,
        V: Into<Value>,
    {
        self.data
            .extend(data.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Returns the supplied value for `key`, or `None` (logged) if absent.
    pub fn given(&self, key: impl Into<Identifier>) -> Option<&Value> {
        let key = key.into();
        let value = self.data.get(&key);
        if value.is_none() {
            tracing::debug!(key = %key, "expected missing data");
        }
        value
    }

    /// Returns `true` if a value was supplied for `key`.
    #[must_use]
    pub fn got(&self, key: impl Into<Identifier>) -> bool {
        self.data.contains_key(&key.into())
    }

    /// All supplied input data.
    #[must_use]
    pub fn data(&self) -> &IndexMap<Identifier, Value> {
        &self.data
    }

    pub(crate) fn static_value(&self, id: &Identifier) -> Option<&StaticValue> {
        self.statics.get(id)
    }
}
