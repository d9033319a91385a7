//! Single-page PDF invoices from a YAML billing file.
//!
//! The billing file is expanded as a template with date helpers
//! ([`template`]), parsed and validated ([`config`]), and drawn onto an
//! A4 page ([`bill`]) through the `pdf-core` canvas.

pub mod bill;
pub mod billing;
pub mod config;
pub mod dates;
pub mod error;
pub mod sheet;
pub mod template;

pub use bill::{output_file_name, render, write_invoice};
pub use billing::{format_money, Totals};
pub use config::BillingConfig;
pub use dates::parse_billing_date;
pub use error::{InvoiceError, Result};
