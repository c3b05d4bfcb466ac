//! Example invoice CLI.
//!
//! Builds an invoice from the command line and prints every resolved field.
//!
//! # Usage
//!
//! ```bash
//! invoice <customer> [country] [--reduced]
//! ```
//!
//! # Example
//!
//! ```bash
//! RUST_LOG=datum_registry=debug invoice "Billy Bragg" NL --reduced
//! ```

use datum_core::{TracingFormat, TracingSetup};
use datum_registry::prelude::*;
use example::{Invoice, Line};
use tracing::Level;

const FIELDS: [&str; 8] = [
    "number",
    "line_totals",
    "subtotal",
    "tax_rate",
    "tax",
    "total",
    "summary",
    "due_date",
];

#[expect(clippy::print_stdout, clippy::print_stderr, reason = "CLI output")]
fn main() {
    let mut setup = TracingSetup::new()
        .with_level(Level::INFO)
        .with_format(TracingFormat::Compact);
    if let Ok(filter) = std::env::var("RUST_LOG") {
        setup = setup.with_env_filter(filter);
    }
    setup.init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let reduced = args.iter().any(|arg| arg == "--reduced");
    let positional: Vec<&String> = args.iter().filter(|arg| !arg.starts_with("--")).collect();

    let Some(customer) = positional.first() else {
        eprintln!("Usage: <customer> [country] [--reduced]");
        eprintln!("Example: \"Billy Bragg\" NL --reduced");
        std::process::exit(1);
    };

    let mut invoice = Invoice::new(
        "INV-0001",
        customer,
        &[
            Line::new("Guitar strings", 3, 450),
            Line::new("Capo", 1, 1200),
            Line::new("Plectrums", 10, 35),
        ],
    );
    if let Some(country) = positional.get(1) {
        invoice = invoice.with_country(country);
    }
    if reduced {
        invoice = invoice.with_reduced_tax();
    }
    tracing::info!(number = invoice.number(), reduced, "invoice ready");

    for field in FIELDS {
        match invoice.take(field) {
            Ok(value) => println!("{field:>12}: {value}"),
            Err(e) => {
                eprintln!("Error resolving {field}: {e}");
                std::process::exit(1);
            }
        }
    }

    match invoice.take(["customer", "address_line"]) {
        Ok(value) => println!("{:>12}: {value}", "customer"),
        Err(e) => eprintln!("Error resolving customer: {e}"),
    }
}
