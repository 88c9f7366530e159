use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use crate::error::AppResult;
use crate::models::{AnalysisMode, AnalysisRequest, DocumentSummary, DocumentType, UploadedFile};
use crate::services::completion::CompletionClient;
use crate::services::extractor::TextExtractor;
use crate::services::prompt::build_prompt;

/// Documents with fewer trimmed characters than this get a warning.
pub const SHORT_DOCUMENT_THRESHOLD: usize = 300;
pub const SHORT_DOCUMENT_ADVISORY: &str = "Document seems very short. Results may be limited.";

#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub report: String,
    pub advisory: Option<String>,
    pub document: DocumentSummary,
    pub model: String,
}

/// An upload whose text is extracted and whose prompt is built, awaiting the
/// model call. The advisory is decided here so it survives a failed call.
#[derive(Debug)]
pub struct PreparedAnalysis {
    pub advisory: Option<String>,
    pub document: DocumentSummary,
    prompt: String,
    started: Instant,
}

/// Runs extraction, prompt construction and the model call for one upload.
pub struct AssumptionAnalyzer {
    extractor: Arc<TextExtractor>,
    client: Arc<dyn CompletionClient>,
}

impl AssumptionAnalyzer {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self {
            extractor: Arc::new(TextExtractor::new()),
            client,
        }
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }

    pub async fn analyze(
        &self,
        file: UploadedFile,
        doc_type: DocumentType,
        mode: AnalysisMode,
    ) -> AppResult<AnalysisOutcome> {
        let prepared = self.prepare(file, doc_type, mode).await?;
        self.complete(prepared).await
    }

    /// Extracts the upload's text off the async runtime and builds the prompt.
    pub async fn prepare(
        &self,
        file: UploadedFile,
        doc_type: DocumentType,
        mode: AnalysisMode,
    ) -> AppResult<PreparedAnalysis> {
        let started = Instant::now();
        let file_name = file.name.clone();

        info!(
            file_name = %file_name,
            file_size = file.size,
            doc_type = %doc_type,
            mode = %mode,
            "Starting assumption analysis"
        );

        let extractor = Arc::clone(&self.extractor);
        let extracted = tokio::task::spawn_blocking(move || extractor.extract_file(&file)).await??;

        let characters = extracted.text.trimmed_len();
        let advisory = short_document_advisory(characters);
        if advisory.is_some() {
            warn!(file_name = %file_name, characters, "Extracted text is very short");
        }

        let document = DocumentSummary {
            file_name,
            format: extracted.format,
            characters,
            units: extracted.units,
        };
        let request = AnalysisRequest::new(extracted.text, doc_type, mode);

        Ok(PreparedAnalysis {
            advisory,
            document,
            prompt: build_prompt(&request),
            started,
        })
    }

    /// Sends the prepared prompt to the model.
    pub async fn complete(&self, prepared: PreparedAnalysis) -> AppResult<AnalysisOutcome> {
        let report = self.client.complete(&prepared.prompt).await?;

        info!(
            file_name = %prepared.document.file_name,
            format = %prepared.document.format,
            characters = prepared.document.characters,
            report_chars = report.chars().count(),
            processing_time_ms = prepared.started.elapsed().as_millis() as u64,
            "Assumption analysis completed"
        );

        Ok(AnalysisOutcome {
            report,
            advisory: prepared.advisory,
            document: prepared.document,
            model: self.client.model().to_string(),
        })
    }
}

pub fn short_document_advisory(trimmed_chars: usize) -> Option<String> {
    (trimmed_chars < SHORT_DOCUMENT_THRESHOLD).then(|| SHORT_DOCUMENT_ADVISORY.to_string())
}
