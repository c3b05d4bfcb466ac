//! The invoice host type and its shared template.

use crate::customer;
use crate::rules::reduced_tax;
use datum_registry::prelude::*;
use serde_json::{Value, json};
use std::sync::LazyLock;

/// Errors raised by invoice providers.
#[derive(Debug, thiserror::Error)]
pub enum InvoiceError {
    /// A line item lacks a numeric quantity or unit price.
    #[error("line {0} is missing a quantity or unit price")]
    MalformedLine(usize),
}

/// One line item. Prices are in cents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// What was sold.
    pub description: String,
    /// Number of units.
    pub quantity: i64,
    /// Price of one unit, in cents.
    pub unit_price: i64,
}

impl Line {
    /// Creates a line item.
    #[must_use]
    pub fn new(description: impl Into<String>, quantity: i64, unit_price: i64) -> Self {
        Self {
            description: description.into(),
            quantity,
            unit_price,
        }
    }

    fn to_value(&self) -> Value {
        json!({
            "description": self.description,
            "quantity": self.quantity,
            "unit_price": self.unit_price,
        })
    }
}

/// The template every [`Invoice`] is seeded from.
pub static INVOICE: LazyLock<Template> = LazyLock::new(|| Template::build(populate));

fn populate(c: &mut Container) {
    c.provider_with(
        "line_totals",
        ProviderOptions::new().requires("lines"),
        line_totals,
    )
    .provider("subtotal", |ctx| {
        let totals = ctx.take("line_totals")?;
        let sum: i64 = totals
            .as_array()
            .map(|totals| totals.iter().filter_map(Value::as_i64).sum())
            .unwrap_or(0);
        Ok(json!(sum))
    })
    .provider("tax_rate", |_| Ok(json!(20)))
    .provider("tax", |ctx| {
        let subtotal = cents(&ctx.take("subtotal")?);
        let rate = cents(&ctx.take("tax_rate")?);
        Ok(json!(subtotal * rate / 100))
    })
    .provider("total", |ctx| {
        let subtotal = cents(&ctx.take("subtotal")?);
        let tax = cents(&ctx.take("tax")?);
        Ok(json!(subtotal + tax))
    })
    .provider("number", |ctx| {
        Ok(ctx
            .host::<Invoice>()
            .map_or(Value::Null, |invoice| json!(invoice.number)))
    })
    .provider("summary", |ctx| {
        let number = ctx.take("number")?;
        let customer = ctx.take(["customer", "address_line"])?;
        let total = cents(&ctx.take("total")?);
        Ok(json!(format!(
            "Invoice {} for {}: {}",
            number.as_str().unwrap_or("(draft)"),
            customer.as_str().unwrap_or_default(),
            format_cents(total)
        )))
    })
    .provider_missing(|ctx| {
        let field = ctx
            .missing_provider()
            .map(ToString::to_string)
            .unwrap_or_default();
        Ok(json!(format!("<{field} not on this invoice>")))
    })
    .add_scoped_in_place(&customer::providers(), "customer");
}

fn line_totals(ctx: &mut Resolver<'_>) -> ResolveResult {
    let Some(lines) = ctx.given("lines").and_then(Value::as_array) else {
        return Ok(json!([]));
    };

    let mut totals = Vec::with_capacity(lines.len());
    for (index, line) in lines.iter().enumerate() {
        let quantity = line["quantity"].as_i64();
        let unit_price = line["unit_price"].as_i64();
        match (quantity, unit_price) {
            (Some(quantity), Some(unit_price)) => totals.push(json!(quantity * unit_price)),
            _ => return Err(ResolveError::provider(InvoiceError::MalformedLine(index))),
        }
    }
    Ok(Value::Array(totals))
}

fn cents(value: &Value) -> i64 {
    value.as_i64().unwrap_or(0)
}

fn format_cents(cents: i64) -> String {
    format!("{}.{:02}", cents / 100, (cents % 100).abs())
}

/// An invoice whose figures are resolved on demand.
#[derive(Debug)]
pub struct Invoice {
    number: String,
    container: Container,
}

impl Invoice {
    /// Creates an invoice for `customer_name` with the given line items.
    #[must_use]
    pub fn new(number: impl Into<String>, customer_name: &str, lines: &[Line]) -> Self {
        let lines: Vec<Value> = lines.iter().map(Line::to_value).collect();
        Self {
            number: number.into(),
            container: INVOICE.instance_with([
                ("customer_name", json!(customer_name)),
                ("lines", Value::Array(lines)),
            ]),
        }
    }

    /// Sets the customer's country.
    #[must_use]
    pub fn with_country(mut self, country: &str) -> Self {
        self.container.give_in_place([("country", country)]);
        self
    }

    /// Applies the reduced tax rule on top of the standard rate.
    #[must_use]
    pub fn with_reduced_tax(mut self) -> Self {
        self.container.add_in_place(&reduced_tax());
        self
    }

    /// The invoice number.
    #[must_use]
    pub fn number(&self) -> &str {
        &self.number
    }
}

impl DataProvider for Invoice {
    fn container(&self) -> &Container {
        &self.container
    }
}
