use thiserror::Error;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("PDF object error: {0}")]
    Object(#[from] lopdf::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
