//! Resolution context handed to provider bodies.
//!
//! A [`Resolver`] is created for every top-level take. It borrows the
//! [`Container`] (and optionally a host object) and owns the stack of
//! in-flight frames, one per provider currently being evaluated:
//!
//! ```text
//! take(:a)
//! └── frame [a, skip 0]            scope: []
//!     └── take(["prefix", "c"])
//!         └── frame [[prefix, c]]  scope: [prefix]
//!             └── take(:d)         → retried as ["prefix", "d"]
//! ```
//!
//! # Lookup order
//!
//! [`take`](Resolver::take) tries, first match wins:
//!
//! 1. the static value for the identifier (only when no skip is requested)
//! 2. the matching provider at the requested skip offset
//! 3. the same lookup prefixed with the executing frame's scope
//! 4. the fallback provider
//!
//! and fails with [`ResolveError::ProviderMissing`] otherwise.
//!
//! # Cycles
//!
//! Re-entering a provider that is already in flight with the same skip
//! offset (or the fallback for the same missing identifier) fails with
//! [`ResolveError::Cycle`] instead of recursing until the stack overflows.

use crate::container::Container;
use crate::error::{ResolveError, ResolveResult};
use crate::identifier::{Identifier, Scope};
use crate::provider::Provider;
use core::any::Any;
use serde_json::Value;

/// Options for [`Resolver::take_with`] and [`Container::take_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TakeOptions {
    /// Ordinal offset into same-identifier providers; also bypasses static
    /// values when set.
    pub skip: Option<usize>,
}

impl TakeOptions {
    /// Creates default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the skip offset.
    #[must_use]
    pub fn with_skip(mut self, skip: usize) -> Self {
        self.skip = Some(skip);
        self
    }
}

/// One in-flight provider evaluation.
#[derive(Debug, Clone)]
struct Frame<'c> {
    provider: &'c Provider,
    skip: usize,
    /// Set for fallback frames: the identifier nothing else resolved.
    missing: Option<Identifier>,
}

impl Frame<'_> {
    fn is_reentry_of(&self, other: &Frame<'_>) -> bool {
        self.skip == other.skip
            && self.provider.identifier() == other.provider.identifier()
            && self.missing == other.missing
    }

    fn label(&self) -> Identifier {
        self.provider
            .identifier()
            .or(self.missing.as_ref())
            .cloned()
            .unwrap_or_else(|| Identifier::Path(Vec::new()))
    }
}

/// Resolution context passed to every provider body.
pub struct Resolver<'c> {
    container: &'c Container,
    host: Option<&'c dyn Any>,
    frames: Vec<Frame<'c>>,
}

impl core::fmt::Debug for Resolver<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Resolver")
            .field("frames", &self.frames)
            .field("has_host", &self.host.is_some())
            .finish_non_exhaustive()
    }
}

impl<'c> Resolver<'c> {
    /// Creates a resolver with an empty frame stack.
    #[must_use]
    pub fn new(container: &'c Container) -> Self {
        Self {
            container,
            host: None,
            frames: Vec::new(),
        }
    }

    /// Creates a resolver whose bodies can reach `host` via [`host`](Self::host).
    #[must_use]
    pub fn with_host(container: &'c Container, host: &'c dyn Any) -> Self {
        Self {
            container,
            host: Some(host),
            frames: Vec::new(),
        }
    }

    /// The container being resolved against.
    #[must_use]
    pub fn container(&self) -> &'c Container {
        self.container
    }

    /// The host object, if one was supplied and it is an `H`.
    #[must_use]
    pub fn host<H: Any>(&self) -> Option<&'c H> {
        self.host.and_then(|host| host.downcast_ref::<H>())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Resolution
    // ─────────────────────────────────────────────────────────────────────────

    /// Resolves `id`.
    ///
    /// Called from inside a provider body, an identifier without a provider
    /// of its own is retried within the body's scope.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::ProviderMissing`] if nothing resolves `id`
    /// - [`ResolveError::Cycle`] on re-entrant resolution
    /// - any error raised by an evaluated body
    pub fn take(&mut self, id: impl Into<Identifier>) -> ResolveResult {
        self.take_with(id, TakeOptions::default())
    }

    /// Resolves `id` with explicit [`TakeOptions`].
    ///
    /// # Errors
    ///
    /// See [`take`](Self::take).
    pub fn take_with(&mut self, id: impl Into<Identifier>, options: TakeOptions) -> ResolveResult {
        let id = id.into();
        let container = self.container;
        tracing::debug!(identifier = %id, skip = ?options.skip, depth = self.frames.len(), "take");

        if options.skip.is_none()
            && let Some(value) = container.static_value(&id)
        {
            return Ok(value.resolve());
        }

        let skip = options.skip.unwrap_or(0);
        if let Some(provider) = container.matching_provider(&id, skip) {
            return self.evaluate(provider, skip, None);
        }

        let scope = self.scope();
        if !scope.is_empty() {
            let scoped = Identifier::scoped(&scope, &id);
            if let Some(provider) = container.matching_provider(&scoped, skip) {
                return self.evaluate(provider, skip, None);
            }
        }

        if let Some(fallback) = container.fallback_provider() {
            return self.evaluate(fallback, skip, Some(id));
        }

        Err(ResolveError::ProviderMissing(id))
    }

    /// Like [`take`](Self::take), but returns `Ok(None)` when neither a
    /// provider for `id` nor a fallback exists.
    ///
    /// Only the direct identifier is checked; a provider reachable solely
    /// through the current scope counts as missing here.
    ///
    /// # Errors
    ///
    /// Errors from an existing provider's body still propagate.
    pub fn try_take(&mut self, id: impl Into<Identifier>) -> ResolveResult<Option<Value>> {
        self.try_take_with(id, TakeOptions::default())
    }

    /// [`try_take`](Self::try_take) with explicit [`TakeOptions`].
    ///
    /// # Errors
    ///
    /// See [`try_take`](Self::try_take).
    pub fn try_take_with(
        &mut self,
        id: impl Into<Identifier>,
        options: TakeOptions,
    ) -> ResolveResult<Option<Value>> {
        let id = id.into();
        if self.container.has_provider(&id) || self.container.has_fallback_provider() {
            return self.take_with(id, options).map(Some);
        }
        tracing::debug!(identifier = %id, "try for missing provider");
        Ok(None)
    }

    /// Resolves `scope() ++ id`.
    ///
    /// # Errors
    ///
    /// See [`take`](Self::take).
    pub fn scoped_take(&mut self, id: impl Into<Identifier>) -> ResolveResult {
        let scoped = Identifier::scoped(&self.scope(), &id.into());
        self.take(scoped)
    }

    /// Evaluates the next-older override of the executing provider.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::OutsideProvider`] if no identified provider is executing
    /// - [`ResolveError::ProviderMissing`] if there is no older provider
    /// - any error raised by the evaluated body
    pub fn take_super(&mut self) -> ResolveResult {
        let (provider, skip) = match self.frames.last() {
            Some(frame) => (frame.provider, frame.skip + 1),
            None => return Err(ResolveError::OutsideProvider),
        };
        let id = provider.identifier().ok_or(ResolveError::OutsideProvider)?;

        match self.container.matching_provider(id, skip) {
            Some(provider) => self.evaluate(provider, skip, None),
            None => Err(ResolveError::ProviderMissing(id.clone())),
        }
    }

    fn evaluate(
        &mut self,
        provider: &'c Provider,
        skip: usize,
        missing: Option<Identifier>,
    ) -> ResolveResult {
        let frame = Frame {
            provider,
            skip,
            missing,
        };

        if self.frames.iter().any(|active| active.is_reentry_of(&frame)) {
            let identifier = frame.label();
            let mut path: Vec<Identifier> = self.frames.iter().map(Frame::label).collect();
            path.push(identifier.clone());
            tracing::warn!(identifier = %identifier, depth = self.frames.len(), "circular provider resolution");
            return Err(ResolveError::Cycle { identifier, path });
        }

        tracing::trace!(provider = ?provider.identifier(), skip, "enter provider");
        self.frames.push(frame);
        let result = (provider.body())(self);
        self.frames.pop();
        tracing::trace!(provider = ?provider.identifier(), ok = result.is_ok(), "exit provider");

        result
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Data
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the supplied value for `key`, or `None` (logged) if absent.
    pub fn given(&self, key: impl Into<Identifier>) -> Option<&'c Value> {
        self.container.given(key)
    }

    /// Returns `true` if a value was supplied for `key`.
    #[must_use]
    pub fn got(&self, key: impl Into<Identifier>) -> bool {
        self.container.got(key)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Introspection
    // ─────────────────────────────────────────────────────────────────────────

    /// Providers of the in-flight frames, outermost first.
    #[must_use]
    pub fn provider_stack(&self) -> Vec<&'c Provider> {
        self.frames.iter().map(|frame| frame.provider).collect()
    }

    /// The provider whose body is executing.
    #[must_use]
    pub fn current_provider(&self) -> Option<&'c Provider> {
        self.frames.last().map(|frame| frame.provider)
    }

    /// Identifier of the executing provider (`None` for the fallback).
    #[must_use]
    pub fn provider_id(&self) -> Option<&'c Identifier> {
        self.current_provider().and_then(Provider::identifier)
    }

    /// Scope of every in-flight frame, outermost first.
    #[must_use]
    pub fn scopes(&self) -> Vec<Scope> {
        self.frames.iter().map(|frame| frame.provider.scope()).collect()
    }

    /// Scope of the executing provider, empty outside of a body.
    #[must_use]
    pub fn scope(&self) -> Scope {
        self.current_provider()
            .map(Provider::scope)
            .unwrap_or_default()
    }

    /// Skip offset the executing provider was selected with.
    #[must_use]
    pub fn current_skip(&self) -> usize {
        self.frames.last().map_or(0, |frame| frame.skip)
    }

    /// The identifier being resolved by the executing fallback body.
    ///
    /// `None` unless the innermost frame is the fallback provider.
    #[must_use]
    pub fn missing_provider(&self) -> Option<&Identifier> {
        self.frames.last().and_then(|frame| frame.missing.as_ref())
    }
}
