use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("failed to open PDF: {0}")]
    Open(String),
    #[error("failed to extract text: {0}")]
    Extraction(String),
}

/// Trait for PDF text extraction backends.
///
/// Implementors only open documents; the page loop, separator markers and
/// result shaping live in [`crate::extractor`].
pub trait PdfBackend: Send + Sync {
    /// Open an in-memory PDF.
    fn open(&self, bytes: &[u8]) -> Result<Box<dyn PdfDocument>, BackendError>;
}

/// An opened document. Dropping it releases the underlying handle.
pub trait PdfDocument {
    fn page_count(&self) -> Result<usize, BackendError>;

    /// Plain-text rendering of the page at `index` (0-based), exactly as the
    /// backend produces it.
    fn page_text(&self, index: usize) -> Result<String, BackendError>;
}
