use std::time::Instant;

use lopdf::Document;

use crate::error::{AppError, AppResult};
use crate::models::{DocumentFormat, DocumentText};
use crate::services::extractor::ExtractedText;

pub struct PdfProcessor;

impl PdfProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Extracts the text of every page in document order.
    pub fn extract_text(&self, content: &[u8]) -> AppResult<ExtractedText> {
        let start = Instant::now();

        tracing::debug!("Starting PDF text extraction ({} bytes)", content.len());

        let doc = Document::load_mem(content).map_err(|e| {
            tracing::warn!("PDF structure could not be loaded: {}", e);
            AppError::extraction(DocumentFormat::Pdf, format!("failed to load PDF: {}", e))
        })?;

        let pages = doc.get_pages();
        let mut page_texts = Vec::with_capacity(pages.len());

        for page_number in pages.keys() {
            let text = doc.extract_text(&[*page_number]).map_err(|e| {
                tracing::warn!("Text extraction failed on page {}: {}", page_number, e);
                AppError::extraction(
                    DocumentFormat::Pdf,
                    format!("failed to read page {}: {}", page_number, e),
                )
            })?;

            if text.is_empty() {
                tracing::debug!("Page {} yielded no text", page_number);
            }
            page_texts.push(text);
        }

        let text = join_pages(page_texts);
        let processing_time = start.elapsed().as_millis() as u64;

        tracing::info!(
            "PDF extraction completed in {}ms: {} pages, {} characters",
            processing_time,
            pages.len(),
            text.chars().count()
        );

        Ok(ExtractedText {
            text: DocumentText::new(text),
            format: DocumentFormat::Pdf,
            units: pages.len(),
        })
    }
}

impl Default for PdfProcessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Page texts are appended back to back; no separator is inserted.
pub fn join_pages<I>(pages: I) -> String
where
    I: IntoIterator<Item = String>,
{
    pages.into_iter().collect()
}
