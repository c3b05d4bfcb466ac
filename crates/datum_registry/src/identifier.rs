//! Provider identifiers and scopes.
//!
//! An [`Identifier`] names a provider, a static value or a piece of supplied
//! data. It is either a single [`Segment`] (an atom) or an ordered sequence of
//! segments (a path). Paths carry a *scope*: every segment but the last.
//!
//! ```text
//! Identifier::Atom("total")                 scope: []
//! Identifier::Path(["customer", "name"])    scope: ["customer"]
//! Identifier::Path(["a", "b", "c"])         scope: ["a", "b"]
//! ```
//!
//! Equality is structural. An atom never equals a one-element path holding
//! the same segment, and a [`Segment::Private`] never equals a
//! [`Segment::Name`] with the same text.
//!
//! # Example
//!
//! ```
//! use datum_registry::identifier::{Identifier, Segment};
//!
//! let id = Identifier::from(["customer", "name"]);
//! assert_eq!(id.scope(), vec![Segment::from("customer")]);
//! assert_ne!(Identifier::from("name"), Identifier::from(["name"]));
//! ```

use core::fmt;
use serde::Serialize;

/// The scope of a compound identifier: its segments minus the last one.
pub type Scope = Vec<Segment>;

/// A single atomic token of an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum Segment {
    /// A named token.
    Name(String),
    /// A numeric token.
    Index(i64),
    /// A reserved private token.
    ///
    /// Providers whose last segment is private are ignored by
    /// [`Container::has_filled_providers_with_scope`](crate::container::Container::has_filled_providers_with_scope).
    Private(String),
}

impl Segment {
    /// Creates a [`Segment::Private`] token.
    #[must_use]
    pub fn private(name: impl Into<String>) -> Self {
        Self::Private(name.into())
    }

    /// Returns `true` for [`Segment::Private`] tokens.
    #[must_use]
    pub fn is_private(&self) -> bool {
        matches!(self, Self::Private(_))
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Index(index) => write!(f, "{index}"),
            Self::Private(name) => write!(f, ":{name}"),
        }
    }
}

impl From<&str> for Segment {
    fn from(name: &str) -> Self {
        Self::Name(name.to_owned())
    }
}

impl From<String> for Segment {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<&String> for Segment {
    fn from(name: &String) -> Self {
        Self::Name(name.clone())
    }
}

impl From<i64> for Segment {
    fn from(index: i64) -> Self {
        Self::Index(index)
    }
}

impl From<i32> for Segment {
    fn from(index: i32) -> Self {
        Self::Index(i64::from(index))
    }
}

impl From<&Segment> for Segment {
    fn from(segment: &Segment) -> Self {
        segment.clone()
    }
}

/// Names a provider, static value or piece of supplied data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Identifier {
    /// A single token.
    Atom(Segment),
    /// An ordered sequence of tokens.
    Path(Vec<Segment>),
}

impl Identifier {
    /// Builds `scope ++ flatten(id)`.
    ///
    /// This is the identifier a scoped take looks up.
    #[must_use]
    pub fn scoped(scope: &[Segment], id: &Identifier) -> Self {
        let mut segments = scope.to_vec();
        segments.extend(id.segments().iter().cloned());
        Self::Path(segments)
    }

    /// Returns the identifier's segments: the atom itself, or the path.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        match self {
            Self::Atom(segment) => core::slice::from_ref(segment),
            Self::Path(segments) => segments,
        }
    }

    /// Returns the path with its last segment removed.
    ///
    /// Atoms have an empty scope.
    #[must_use]
    pub fn scope(&self) -> Scope {
        match self {
            Self::Atom(_) => Vec::new(),
            Self::Path(segments) => match segments.split_last() {
                Some((_, scope)) => scope.to_vec(),
                None => Vec::new(),
            },
        }
    }

    /// Returns the last segment, if any.
    #[must_use]
    pub fn last(&self) -> Option<&Segment> {
        self.segments().last()
    }

    /// Returns `true` for [`Identifier::Path`].
    #[must_use]
    pub fn is_path(&self) -> bool {
        matches!(self, Self::Path(_))
    }

    /// Number of segments (1 for atoms).
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments().len()
    }

    /// Returns `true` for the empty path.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments().is_empty()
    }

    /// Returns `true` if this is a path strictly longer than `prefix` that
    /// starts with `prefix`'s segments.
    #[must_use]
    pub fn has_scope_prefix(&self, prefix: &[Segment]) -> bool {
        match self {
            Self::Atom(_) => false,
            Self::Path(segments) => {
                segments.len() > prefix.len() && segments.starts_with(prefix)
            }
        }
    }

    /// Converts the identifier into a path, prefixed with `scope`.
    #[must_use]
    pub fn prefixed(&self, scope: &[Segment]) -> Self {
        Self::scoped(scope, self)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Atom(segment) => segment.fmt(f),
            Self::Path(segments) => {
                f.write_str("[")?;
                for (i, segment) in segments.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    segment.fmt(f)?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<Segment> for Identifier {
    fn from(segment: Segment) -> Self {
        Self::Atom(segment)
    }
}

impl From<&str> for Identifier {
    fn from(name: &str) -> Self {
        Self::Atom(name.into())
    }
}

impl From<String> for Identifier {
    fn from(name: String) -> Self {
        Self::Atom(name.into())
    }
}

impl From<i64> for Identifier {
    fn from(index: i64) -> Self {
        Self::Atom(index.into())
    }
}

impl From<i32> for Identifier {
    fn from(index: i32) -> Self {
        Self::Atom(index.into())
    }
}

impl From<&Identifier> for Identifier {
    fn from(id: &Identifier) -> Self {
        id.clone()
    }
}

impl<S: Into<Segment>, const N: usize> From<[S; N]> for Identifier {
    fn from(segments: [S; N]) -> Self {
        Self::Path(segments.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<Segment>> From<Vec<S>> for Identifier {
    fn from(segments: Vec<S>) -> Self {
        Self::Path(segments.into_iter().map(Into::into).collect())
    }
}

impl From<&[Segment]> for Identifier {
    fn from(segments: &[Segment]) -> Self {
        Self::Path(segments.to_vec())
    }
}
