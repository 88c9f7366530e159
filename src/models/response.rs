use serde::{Deserialize, Serialize};

use super::request::{AnalysisMode, DocumentFormat, DocumentType};

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub success: bool,
    pub data: AnalysisData,
    pub processing_time_ms: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalysisData {
    pub report: String,
    pub advisory: Option<String>,
    pub document: DocumentSummary,
    pub model: String,
    pub mode: AnalysisMode,
    pub doc_type: DocumentType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub file_name: String,
    pub format: DocumentFormat,
    pub characters: usize,
    /// Pages for PDF input, paragraphs for Word input.
    pub units: usize,
}

impl AnalysisResponse {
    pub fn new(data: AnalysisData, processing_time_ms: u64) -> Self {
        Self {
            success: true,
            data,
            processing_time_ms,
        }
    }
}
