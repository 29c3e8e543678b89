//! PDF form-template access: widget discovery and value filling.
//!
//! The PDF object graph itself comes from [`lopdf`]; this crate only
//! walks pages and their annotations and mutates widget state. The
//! template file is never modified; the filled document is saved to a
//! separate path.

mod error;
pub mod fill;
pub mod walk;

#[cfg(test)]
pub(crate) mod testform;

use std::path::Path;

use lopdf::Document;
use tracing::info;

pub use error::PdfError;
pub use fill::{FillReport, fill, write_document};
pub use walk::{Widget, collect_widgets, list_fields};

/// Load a template PDF from disk.
pub fn load_template(path: &Path) -> Result<Document, PdfError> {
    info!(path = %path.display(), "loading template PDF");
    Ok(Document::load(path)?)
}
