use serde::Serialize;
use thiserror::Error;

pub mod backend;
pub mod config_file;
pub mod extractor;
#[cfg(feature = "test-support")]
pub mod fixtures;
pub mod mock;

// Re-export for convenience
pub use backend::{BackendError, PdfBackend, PdfDocument};
pub use extractor::{ExtractOptions, extract, extract_text, page_marker};

/// Text pulled out of a document, before it is shaped into a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    /// Concatenated page blocks, trimmed once as a whole.
    pub text: String,
    /// Number of pages in the document, including pages without text.
    pub pages: usize,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("cannot open empty stream")]
    EmptyInput,
    #[error("input is {size} bytes, exceeding the limit of {limit} bytes")]
    InputTooLarge { size: u64, limit: u64 },
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// The JSON payload written for every invocation.
///
/// Only constructible through [`ExtractionResult::success`],
/// [`ExtractionResult::failure`] or `From<Result<..>>`, so a failed result
/// always carries empty text and zero pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionResult {
    success: bool,
    text: String,
    pages: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ExtractionResult {
    pub fn success(extracted: ExtractedText) -> Self {
        Self {
            success: true,
            text: extracted.text,
            pages: extracted.pages,
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            text: String::new(),
            pages: 0,
            error: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn pages(&self) -> usize {
        self.pages
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Serialize as a single JSON line. Non-ASCII text is kept as-is.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Process exit code: 0 on success, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        if self.success { 0 } else { 1 }
    }
}

impl From<Result<ExtractedText, ExtractionError>> for ExtractionResult {
    fn from(result: Result<ExtractedText, ExtractionError>) -> Self {
        match result {
            Ok(extracted) => Self::success(extracted),
            Err(err) => Self::failure(err.to_string()),
        }
    }
}
