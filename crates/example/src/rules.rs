//! Tax rules layered on top of the invoice template.

use datum_registry::prelude::*;
use serde_json::json;

/// Halves whatever tax rate the providers underneath produce.
///
/// Adding this container to an invoice overrides `tax_rate`; the override
/// reads the replaced rate with `take_super`, so rules can be stacked.
#[must_use]
pub fn reduced_tax() -> Container {
    let mut c = Container::new();
    c.provider("tax_rate", |ctx| {
        let rate = ctx.take_super()?.as_i64().unwrap_or(0);
        tracing::debug!(rate, "reducing tax rate");
        Ok(json!(rate / 2))
    });
    c
}
