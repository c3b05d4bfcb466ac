//! Static values and value helpers.
//!
//! Providers produce dynamic [`serde_json::Value`]s. A [`StaticValue`] binds
//! an identifier directly to a value, or to a zero-argument computation that
//! is invoked on every take.

use serde_json::Value;
use std::sync::Arc;

/// Zero-argument computation stored as a static value.
pub type ComputeFn = Arc<dyn Fn() -> Value + Send + Sync>;

/// A value registered through [`Container::provides`](crate::container::Container::provides).
#[derive(Clone)]
pub enum StaticValue {
    /// A plain value, returned as-is.
    Value(Value),
    /// A computation, invoked on every take.
    Computed(ComputeFn),
}

impl StaticValue {
    /// Wraps a computation.
    pub fn computed<F>(compute: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        Self::Computed(Arc::new(compute))
    }

    /// Returns the stored value, invoking the computation if there is one.
    #[must_use]
    pub fn resolve(&self) -> Value {
        match self {
            Self::Value(value) => value.clone(),
            Self::Computed(compute) => compute(),
        }
    }
}

impl core::fmt::Debug for StaticValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl From<Value> for StaticValue {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

/// Returns `false` for `null` and for empty strings, arrays and objects.
#[must_use]
pub fn is_filled(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Bool(_) | Value::Number(_) => true,
    }
}
