use thiserror::Error;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Failed to parse PDF: {0}")]
    Parse(#[from] lopdf::Error),

    #[error("PDF has no document catalog")]
    MissingCatalog,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
