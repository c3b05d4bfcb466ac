//! Copy-on-write composition of containers.
//!
//! The `*_in_place` forms mutate the receiver and return it for chaining.
//! The plain forms work on a [`copy`](Container::copy) and leave the receiver
//! untouched.

use super::Container;
use crate::identifier::Identifier;

impl Container {
    /// Adds `other`'s providers, static values, fallback and data.
    ///
    /// `other`'s providers keep their relative registration order and end up
    /// newer than every provider already registered here. On key collisions
    /// `other`'s static values and data win; its fallback, if set, replaces
    /// ours.
    pub fn add_in_place(&mut self, other: &Container) -> &mut Self {
        tracing::trace!(
            providers = other.providers.len(),
            statics = other.statics.len(),
            "adding container"
        );

        self.providers.extend(other.providers.iter().cloned());
        self.statics.extend(
            other
                .statics
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );
        self.merge_fallback_and_data(other);
        self
    }

    /// Returns a copy of this container with `other` added.
    #[must_use]
    pub fn add(&self, other: &Container) -> Container {
        let mut copy = self.copy();
        copy.add_in_place(other);
        copy
    }

    /// Like [`add_in_place`](Self::add_in_place), but every provider
    /// identifier and static key of `other` is turned into a path prefixed
    /// with `scope`'s segments.
    ///
    /// The fallback and data are merged without prefixing. An empty scope
    /// still converts atoms into one-element paths.
    pub fn add_scoped_in_place(
        &mut self,
        other: &Container,
        scope: impl Into<Identifier>,
    ) -> &mut Self {
        let scope = scope.into();
        let prefix = scope.segments();
        tracing::trace!(scope = %scope, providers = other.providers.len(), "adding scoped container");

        self.providers.extend(other.providers.iter().filter_map(|provider| {
            provider
                .identifier()
                .map(|id| provider.with_identifier(id.prefixed(prefix)))
        }));
        self.statics.extend(
            other
                .statics
                .iter()
                .map(|(key, value)| (key.prefixed(prefix), value.clone())),
        );
        self.merge_fallback_and_data(other);
        self
    }

    /// Returns a copy of this container with `other` added under `scope`.
    #[must_use]
    pub fn add_scoped(&self, other: &Container, scope: impl Into<Identifier>) -> Container {
        let mut copy = self.copy();
        copy.add_scoped_in_place(other, scope);
        copy
    }

    /// Returns an independent container holding everything this one holds.
    ///
    /// The configuration is carried over.
    #[must_use]
    pub fn copy(&self) -> Container {
        let mut copy = Container::with_config(self.config.clone());
        copy.add_in_place(self);
        copy
    }

    fn merge_fallback_and_data(&mut self, other: &Container) {
        if let Some(fallback) = &other.fallback {
            self.fallback = Some(fallback.clone());
        }
        self.data
            .extend(other.data.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
}
