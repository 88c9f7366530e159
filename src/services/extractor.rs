use crate::error::AppResult;
use crate::models::{DocumentFormat, DocumentText, UploadedFile};
use crate::services::docx_processor::DocxProcessor;
use crate::services::pdf_processor::PdfProcessor;

#[derive(Debug)]
pub struct ExtractedText {
    pub text: DocumentText,
    pub format: DocumentFormat,
    /// Pages for PDF input, paragraphs for Word input.
    pub units: usize,
}

/// Dispatches an upload to the processor for its format.
#[derive(Default)]
pub struct TextExtractor {
    pdf: PdfProcessor,
    docx: DocxProcessor,
}

impl TextExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extract(&self, format: DocumentFormat, content: &[u8]) -> AppResult<ExtractedText> {
        match format {
            DocumentFormat::Pdf => self.pdf.extract_text(content),
            DocumentFormat::Docx => self.docx.extract_text(content),
        }
    }

    /// Detects the format of an upload and extracts its text.
    pub fn extract_file(&self, file: &UploadedFile) -> AppResult<ExtractedText> {
        let format = DocumentFormat::detect(file)?;
        self.extract(format, &file.content)
    }
}
