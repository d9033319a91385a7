use std::io;

use pdf_core::PdfError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InvoiceError {
    #[error("failed to read {path}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("error parsing template '{file}'")]
    Template {
        file: String,
        #[source]
        source: tera::Error,
    },

    #[error("invalid billing config '{file}'")]
    Yaml {
        file: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("no billable items configured")]
    NoBillables,

    #[error("unknown font family '{0}'")]
    UnknownFont(String),

    #[error("tax rate must be a non-negative number, got {0}")]
    InvalidTaxRate(f64),

    #[error("billable '{item}' has an invalid {field}: {value}")]
    InvalidAmount {
        item: String,
        field: &'static str,
        value: f64,
    },

    #[error("amount {0} is out of range")]
    AmountOutOfRange(f64),

    #[error("invalid billing date '{0}' (expected YYYY-MM-DD, YYYY-MM, YYYY/MM/DD or RFC 3339)")]
    InvalidDate(String),

    #[error("output directory {0} does not exist")]
    MissingOutputDir(String),

    #[error(transparent)]
    Pdf(#[from] PdfError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, InvoiceError>;
