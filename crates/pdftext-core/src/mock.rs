//! Mock PDF backend for testing.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::backend::{BackendError, PdfBackend, PdfDocument};

/// What a [`MockBackend`] document returns for one page.
#[derive(Clone, Debug)]
pub enum MockPage {
    /// Page text, returned verbatim.
    Text(String),
    /// Simulate a failure while rendering this page.
    Error(String),
}

/// A hand-rolled mock implementing [`PdfBackend`] for tests.
///
/// Every call to [`open`](PdfBackend::open) hands out a document over the same
/// page list, ignoring the input bytes. Opens are counted, and so are the
/// documents that have not been dropped yet.
pub struct MockBackend {
    pages: Vec<MockPage>,
    open_error: Option<String>,
    open_count: AtomicUsize,
    live: Arc<AtomicUsize>,
}

impl MockBackend {
    pub fn new(pages: Vec<MockPage>) -> Self {
        Self {
            pages,
            open_error: None,
            open_count: AtomicUsize::new(0),
            live: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A backend that refuses to open anything.
    pub fn failing_open(message: impl Into<String>) -> Self {
        Self {
            open_error: Some(message.into()),
            ..Self::new(Vec::new())
        }
    }

    /// Number of times `open` has been called.
    pub fn open_count(&self) -> usize {
        self.open_count.load(Ordering::SeqCst)
    }

    /// Documents opened but not yet dropped.
    pub fn live_documents(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

impl PdfBackend for MockBackend {
    fn open(&self, _bytes: &[u8]) -> Result<Box<dyn PdfDocument>, BackendError> {
        self.open_count.fetch_add(1, Ordering::SeqCst);
        if let Some(ref message) = self.open_error {
            return Err(BackendError::Open(message.clone()));
        }
        self.live.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockDocument {
            pages: self.pages.clone(),
            live: Arc::clone(&self.live),
        }))
    }
}

struct MockDocument {
    pages: Vec<MockPage>,
    live: Arc<AtomicUsize>,
}

impl PdfDocument for MockDocument {
    fn page_count(&self) -> Result<usize, BackendError> {
        Ok(self.pages.len())
    }

    fn page_text(&self, index: usize) -> Result<String, BackendError> {
        match self.pages.get(index) {
            Some(MockPage::Text(text)) => Ok(text.clone()),
            Some(MockPage::Error(message)) => Err(BackendError::Extraction(message.clone())),
            None => Err(BackendError::Extraction(format!(
                "page {index} out of range"
            ))),
        }
    }
}

impl Drop for MockDocument {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}
