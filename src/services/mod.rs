pub mod analyzer;
pub mod completion;
pub mod docx_processor;
pub mod extractor;
pub mod pdf_processor;
pub mod prompt;
pub mod report_renderer;

pub use analyzer::{AnalysisOutcome, AssumptionAnalyzer, PreparedAnalysis};
pub use completion::{CompletionClient, CompletionError, CompletionSettings, OpenAiClient};
pub use docx_processor::DocxProcessor;
pub use extractor::{ExtractedText, TextExtractor};
pub use pdf_processor::PdfProcessor;
