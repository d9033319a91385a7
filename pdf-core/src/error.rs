use std::io;

use crate::images::ImageError;

/// Errors raised while building a document.
#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A drawing operation was issued between pages.
    #[error("{0} called with no open page")]
    NoOpenPage(&'static str),

    #[error("unknown image id {0}")]
    UnknownImage(usize),

    #[error(transparent)]
    Image(#[from] ImageError),
}

pub type Result<T> = std::result::Result<T, PdfError>;
