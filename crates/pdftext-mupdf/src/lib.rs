use mupdf::{Document, TextPageFlags};

use pdftext_core::{BackendError, PdfBackend, PdfDocument};

/// MIME type handed to MuPDF so it never sniffs the input as another format.
const PDF_MIME: &str = "application/pdf";

/// PyMuPDF's defaults for plain `get_text()`: ligatures and whitespace kept
/// as-is, characters outside the page's mediabox dropped.
const TEXT_FLAGS: TextPageFlags = TextPageFlags::PRESERVE_LIGATURES
    .union(TextPageFlags::PRESERVE_WHITESPACE)
    .union(TextPageFlags::CLIP);

/// MuPDF-based implementation of [`PdfBackend`].
///
/// This crate is the sole AGPL island: it isolates the mupdf dependency
/// (which is AGPL-3.0) so that the rest of the workspace does not
/// transitively depend on it.
///
/// Header/footer exclusion is off by default, so page text is exactly what
/// MuPDF lays out. When enabled, text blocks lying entirely in the top
/// `header` fraction of the page, or starting in the bottom `footer`
/// fraction, are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct MupdfBackend {
    /// Fraction of page height from bottom to exclude as footer (0.0–1.0).
    /// `None` disables footer exclusion.
    footer_exclusion_ratio: Option<f32>,
    /// Fraction of page height from top to exclude as header (0.0–1.0).
    /// `None` disables header exclusion.
    header_exclusion_ratio: Option<f32>,
}

impl MupdfBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the footer exclusion ratio. Pass `0.0` to disable.
    pub fn with_footer_exclusion(mut self, ratio: f32) -> Self {
        self.footer_exclusion_ratio = if ratio > 0.0 { Some(ratio) } else { None };
        self
    }

    /// Set the header exclusion ratio. Pass `0.0` to disable.
    pub fn with_header_exclusion(mut self, ratio: f32) -> Self {
        self.header_exclusion_ratio = if ratio > 0.0 { Some(ratio) } else { None };
        self
    }
}

impl PdfBackend for MupdfBackend {
    fn open(&self, bytes: &[u8]) -> Result<Box<dyn PdfDocument>, BackendError> {
        let document =
            Document::from_bytes(bytes, PDF_MIME).map_err(|e| BackendError::Open(e.to_string()))?;
        Ok(Box::new(MupdfDocument {
            document,
            footer_exclusion_ratio: self.footer_exclusion_ratio,
            header_exclusion_ratio: self.header_exclusion_ratio,
        }))
    }
}

/// An open MuPDF document. MuPDF frees it on drop.
struct MupdfDocument {
    document: Document,
    footer_exclusion_ratio: Option<f32>,
    header_exclusion_ratio: Option<f32>,
}

impl PdfDocument for MupdfDocument {
    fn page_count(&self) -> Result<usize, BackendError> {
        let count = self
            .document
            .page_count()
            .map_err(|e| BackendError::Open(e.to_string()))?;
        usize::try_from(count)
            .map_err(|_| BackendError::Open(format!("invalid page count {count}")))
    }

    fn page_text(&self, index: usize) -> Result<String, BackendError> {
        let page_no = i32::try_from(index)
            .map_err(|_| BackendError::Extraction(format!("page index {index} out of range")))?;
        let page = self
            .document
            .load_page(page_no)
            .map_err(|e| BackendError::Extraction(e.to_string()))?;
        let text_page = page
            .to_text_page(TEXT_FLAGS)
            .map_err(|e| BackendError::Extraction(e.to_string()))?;

        let page_bounds = page
            .bounds()
            .map_err(|e| BackendError::Extraction(e.to_string()))?;
        let page_height = page_bounds.y1 - page_bounds.y0;

        let header_threshold = self
            .header_exclusion_ratio
            .map(|r| page_bounds.y0 + page_height * r);
        let footer_threshold = self
            .footer_exclusion_ratio
            .map(|r| page_bounds.y1 - page_height * r);

        // Block/line iteration reproduces PyMuPDF's plain get_text() layout:
        // one output line per text line, each terminated by '\n'.
        let mut page_text = String::new();
        let mut skipped_blocks = 0usize;
        for block in text_page.blocks() {
            let block_bounds = block.bounds();

            // Skip blocks entirely within the header region
            if let Some(threshold) = header_threshold {
                if block_bounds.y1 <= threshold {
                    skipped_blocks += 1;
                    continue;
                }
            }

            // Skip blocks whose top edge is in the footer region
            if let Some(threshold) = footer_threshold {
                if block_bounds.y0 >= threshold {
                    skipped_blocks += 1;
                    continue;
                }
            }

            for line in block.lines() {
                page_text.extend(line.chars().map(|c| c.char().unwrap_or('\u{FFFD}')));
                page_text.push('\n');
            }
        }
        if skipped_blocks > 0 {
            tracing::trace!(page = index + 1, skipped_blocks, "excluded header/footer blocks");
        }

        Ok(page_text)
    }
}
