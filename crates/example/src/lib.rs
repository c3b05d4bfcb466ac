//! Example invoice host built with Datum.
//!
//! An [`Invoice`] owns a container seeded from the shared [`INVOICE`]
//! template. Every figure on the invoice is a provider; nothing is computed
//! until it is taken.
//!
//! # Architecture
//!
//! ```text
//! INVOICE template
//! ├── line_totals, subtotal, tax_rate, tax, total, summary
//! ├── [customer, *]    scoped customer providers (customer::providers)
//! └── fallback         renders unknown fields
//!
//! Invoice::with_reduced_tax()
//! └── tax_rate         overrides the template's rate through take_super
//! ```

mod customer;
mod invoice;
mod rules;

pub use invoice::{INVOICE, Invoice, InvoiceError, Line};
pub use rules::reduced_tax;
