use crate::{ExtractedText, ExtractionError, ExtractionResult, PdfBackend};

/// Limits applied before a document is handed to the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Reject inputs larger than this many bytes. `None` accepts any size.
    pub max_input_bytes: Option<u64>,
}

/// Separator line written before each page that has text. `page_number` is 1-based.
pub fn page_marker(page_number: usize) -> String {
    format!("\n--- Page {page_number} ---\n")
}

/// Extract the text of every page, in order.
///
/// Pages whose text is empty get no marker but still count towards
/// [`ExtractedText::pages`]. A failure on any page discards everything
/// gathered so far. The document is closed before this returns.
pub fn extract_text(
    bytes: &[u8],
    backend: &dyn PdfBackend,
    options: &ExtractOptions,
) -> Result<ExtractedText, ExtractionError> {
    if bytes.is_empty() {
        return Err(ExtractionError::EmptyInput);
    }
    let size = bytes.len() as u64;
    if let Some(limit) = options.max_input_bytes {
        if size > limit {
            return Err(ExtractionError::InputTooLarge { size, limit });
        }
    }

    let document = backend.open(bytes)?;
    let pages = document.page_count()?;
    tracing::debug!(bytes = size, pages, "opened document");

    let mut full_text = String::new();
    for index in 0..pages {
        let page_text = document.page_text(index)?;
        tracing::trace!(page = index + 1, bytes = page_text.len(), "page extracted");
        if !page_text.is_empty() {
            full_text.push_str(&page_marker(index + 1));
            full_text.push_str(&page_text);
        }
    }
    drop(document);

    Ok(ExtractedText {
        text: full_text.trim().to_string(),
        pages,
    })
}

/// Infallible wrapper around [`extract_text`]: every failure becomes an
/// error-shaped [`ExtractionResult`].
pub fn extract(
    bytes: &[u8],
    backend: &dyn PdfBackend,
    options: &ExtractOptions,
) -> ExtractionResult {
    let result = extract_text(bytes, backend, options);
    if let Err(ref err) = result {
        tracing::warn!(error = %err, "extraction failed");
    }
    result.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockBackend, MockPage};
    use crate::BackendError;

    fn pages(texts: &[&str]) -> MockBackend {
        MockBackend::new(texts.iter().map(|t| MockPage::Text(t.to_string())).collect())
    }

    #[test]
    fn test_single_page() {
        let backend = pages(&["Hello"]);
        let out = extract_text(b"%PDF", &backend, &ExtractOptions::default()).unwrap();
        assert_eq!(out.text, "--- Page 1 ---\nHello");
        assert_eq!(out.pages, 1);
    }

    #[test]
    fn test_markers_in_ascending_order() {
        let backend = pages(&["one\n", "two\n", "three\n"]);
        let out = extract_text(b"%PDF", &backend, &ExtractOptions::default()).unwrap();
        assert_eq!(
            out.text,
            "--- Page 1 ---\none\n\n--- Page 2 ---\ntwo\n\n--- Page 3 ---\nthree"
        );
        assert_eq!(out.pages, 3);
    }

    #[test]
    fn test_blank_page_counted_without_marker() {
        let backend = pages(&["first", "", "third"]);
        let out = extract_text(b"%PDF", &backend, &ExtractOptions::default()).unwrap();
        assert_eq!(out.pages, 3);
        assert!(!out.text.contains("--- Page 2 ---"));
        assert_eq!(out.text, "--- Page 1 ---\nfirst\n--- Page 3 ---\nthird");
    }

    #[test]
    fn test_whitespace_only_page_still_gets_marker() {
        // Only the overall result is trimmed, never the individual pages.
        let backend = pages(&["a", "  \n", "b"]);
        let out = extract_text(b"%PDF", &backend, &ExtractOptions::default()).unwrap();
        assert_eq!(
            out.text,
            "--- Page 1 ---\na\n--- Page 2 ---\n  \n\n--- Page 3 ---\nb"
        );
    }

    #[test]
    fn test_document_without_pages() {
        let backend = pages(&[]);
        let out = extract_text(b"%PDF", &backend, &ExtractOptions::default()).unwrap();
        assert_eq!(out.text, "");
        assert_eq!(out.pages, 0);
    }

    #[test]
    fn test_all_pages_blank() {
        let backend = pages(&["", ""]);
        let out = extract_text(b"%PDF", &backend, &ExtractOptions::default()).unwrap();
        assert_eq!(out.text, "");
        assert_eq!(out.pages, 2);
    }

    #[test]
    fn test_empty_input_never_reaches_backend() {
        let backend = pages(&["Hello"]);
        let err = extract_text(b"", &backend, &ExtractOptions::default()).unwrap_err();
        assert_eq!(err, ExtractionError::EmptyInput);
        assert_eq!(backend.open_count(), 0);
    }

    #[test]
    fn test_input_limit() {
        let backend = pages(&["Hello"]);
        let options = ExtractOptions {
            max_input_bytes: Some(4),
        };
        let err = extract_text(b"%PDF-1.4", &backend, &options).unwrap_err();
        assert_eq!(err, ExtractionError::InputTooLarge { size: 8, limit: 4 });
        assert_eq!(backend.open_count(), 0);

        let out = extract_text(b"%PDF", &backend, &options).unwrap();
        assert_eq!(out.pages, 1);
    }

    #[test]
    fn test_open_failure() {
        let backend = MockBackend::failing_open("no objects found");
        let result = extract(b"garbage", &backend, &ExtractOptions::default());
        assert!(!result.is_success());
        assert_eq!(result.error(), Some("failed to open PDF: no objects found"));
        assert_eq!(result.pages(), 0);
    }

    #[test]
    fn test_page_failure_discards_earlier_pages() {
        let backend = MockBackend::new(vec![
            MockPage::Text("kept?".into()),
            MockPage::Error("broken content stream".into()),
            MockPage::Text("never read".into()),
        ]);
        let err = extract_text(b"%PDF", &backend, &ExtractOptions::default()).unwrap_err();
        assert_eq!(
            err,
            ExtractionError::Backend(BackendError::Extraction("broken content stream".into()))
        );

        let result = extract(b"%PDF", &backend, &ExtractOptions::default());
        assert_eq!(result.text(), "");
        assert_eq!(result.pages(), 0);
    }

    #[test]
    fn test_document_closed_on_both_paths() {
        let backend = pages(&["Hello"]);
        extract(b"%PDF", &backend, &ExtractOptions::default());
        assert_eq!(backend.open_count(), 1);
        assert_eq!(backend.live_documents(), 0);

        let failing = MockBackend::new(vec![MockPage::Error("x".into())]);
        extract(b"%PDF", &failing, &ExtractOptions::default());
        assert_eq!(failing.live_documents(), 0);
    }

    #[test]
    fn test_idempotent() {
        let backend = pages(&["Grüße", "", "日本語"]);
        let a = extract(b"%PDF", &backend, &ExtractOptions::default());
        let b = extract(b"%PDF", &backend, &ExtractOptions::default());
        assert_eq!(a.to_json().unwrap(), b.to_json().unwrap());
    }

    #[test]
    fn test_page_marker_format() {
        assert_eq!(page_marker(1), "\n--- Page 1 ---\n");
        assert_eq!(page_marker(12), "\n--- Page 12 ---\n");
    }
}
