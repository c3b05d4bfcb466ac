//! Error types for provider resolution.

use crate::identifier::Identifier;
use serde_json::Value;

/// Boxed error raised by a provider body.
pub type BoxError = Box<dyn core::error::Error + Send + Sync>;

/// Result of a resolution operation.
pub type ResolveResult<T = Value> = Result<T, ResolveError>;

/// Errors that can occur while resolving an identifier.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// No static value, provider, scoped provider or fallback matched.
    #[error("tried to take data from missing provider: {0}")]
    ProviderMissing(Identifier),

    /// A provider re-entered its own resolution.
    #[error("circular provider resolution for {identifier}: {}", format_path(.path))]
    Cycle {
        /// The identifier whose resolution was re-entered.
        identifier: Identifier,
        /// Identifiers of the in-flight frames, outermost first, ending with
        /// the re-entered one.
        path: Vec<Identifier>,
    },

    /// `take_super` was called where no identified provider is executing.
    #[error("take_super called outside of a provider body")]
    OutsideProvider,

    /// A provider body failed.
    #[error("{0}")]
    Provider(#[source] BoxError),
}

impl ResolveError {
    /// Wraps an error raised by a provider body.
    pub fn provider(error: impl Into<BoxError>) -> Self {
        Self::Provider(error.into())
    }

    /// Returns the missing identifier of a [`ProviderMissing`](Self::ProviderMissing) error.
    #[must_use]
    pub fn provider_id(&self) -> Option<&Identifier> {
        match self {
            Self::ProviderMissing(id) => Some(id),
            _ => None,
        }
    }

    /// Returns `true` for [`ProviderMissing`](Self::ProviderMissing).
    #[must_use]
    pub fn is_provider_missing(&self) -> bool {
        matches!(self, Self::ProviderMissing(_))
    }
}

fn format_path(path: &[Identifier]) -> String {
    path.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}
