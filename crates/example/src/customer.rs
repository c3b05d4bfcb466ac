//! Customer providers, added to the invoice template under `customer`.

use datum_registry::prelude::*;
use serde_json::json;

/// Providers for the customer block.
///
/// Identifiers are atoms here; the template adds them under `customer`, so
/// `name` becomes `[customer, name]` and scoped takes resolve within it.
pub(crate) fn providers() -> Container {
    let mut c = Container::new();
    c.provider("name", |ctx| {
        Ok(ctx.given("customer_name").cloned().unwrap_or_default())
    })
    .provider("country", |ctx| {
        Ok(ctx
            .given("country")
            .cloned()
            .unwrap_or_else(|| json!("GB")))
    })
    .provider("address_line", |ctx| {
        let name = ctx.scoped_take("name")?;
        let country = ctx.scoped_take("country")?;
        Ok(json!(format!(
            "{} ({})",
            name.as_str().unwrap_or("unknown customer"),
            country.as_str().unwrap_or_default()
        )))
    });
    c
}
