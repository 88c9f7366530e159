use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const GENERIC_MIME: &str = "application/octet-stream";

/// A file received from the upload form, held for a single request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub size: usize,
    pub content: Bytes,
    pub mime_type: Option<String>,
}

impl UploadedFile {
    pub fn new(name: String, content: impl Into<Bytes>) -> Self {
        let content = content.into();
        let size = content.len();
        Self {
            name,
            size,
            content,
            mime_type: None,
        }
    }

    pub fn with_mime_type(mut self, mime_type: String) -> Self {
        self.mime_type = Some(mime_type);
        self
    }

    /// Declared media type without parameters, lowercased.
    fn declared_type(&self) -> Option<String> {
        self.mime_type
            .as_deref()
            .map(|mt| mt.split(';').next().unwrap_or("").trim().to_ascii_lowercase())
            .filter(|mt| !mt.is_empty())
    }
}

/// The closed set of formats the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    pub const ALL: [DocumentFormat; 2] = [DocumentFormat::Pdf, DocumentFormat::Docx];

    /// Resolves the format from the declared media type. The file extension is only
    /// consulted when the browser sent no type or a generic binary one.
    pub fn detect(file: &UploadedFile) -> AppResult<Self> {
        match file.declared_type().as_deref() {
            Some(PDF_MIME) => Ok(DocumentFormat::Pdf),
            Some(DOCX_MIME) => Ok(DocumentFormat::Docx),
            None | Some(GENERIC_MIME) => Self::from_extension(&file.name).ok_or_else(|| {
                AppError::UnsupportedFormat {
                    media_type: file
                        .mime_type
                        .clone()
                        .unwrap_or_else(|| format!("unknown ({})", file.name)),
                }
            }),
            Some(other) => Err(AppError::UnsupportedFormat {
                media_type: other.to_string(),
            }),
        }
    }

    fn from_extension(name: &str) -> Option<Self> {
        let lower = name.to_lowercase();
        if lower.ends_with(".pdf") {
            Some(DocumentFormat::Pdf)
        } else if lower.ends_with(".docx") {
            Some(DocumentFormat::Docx)
        } else {
            None
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => PDF_MIME,
            DocumentFormat::Docx => DOCX_MIME,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Docx => "docx",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::Pdf => write!(f, "PDF"),
            DocumentFormat::Docx => write!(f, "Word document"),
        }
    }
}

/// Category label interpolated into the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DocumentType {
    #[default]
    #[serde(rename = "Strategy Document")]
    StrategyDocument,
    #[serde(rename = "Business Proposal")]
    BusinessProposal,
    #[serde(rename = "Project Plan")]
    ProjectPlan,
    #[serde(rename = "Other")]
    Other,
}

impl DocumentType {
    pub const ALL: [DocumentType; 4] = [
        DocumentType::StrategyDocument,
        DocumentType::BusinessProposal,
        DocumentType::ProjectPlan,
        DocumentType::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DocumentType::StrategyDocument => "Strategy Document",
            DocumentType::BusinessProposal => "Business Proposal",
            DocumentType::ProjectPlan => "Project Plan",
            DocumentType::Other => "Other",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DocumentType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        DocumentType::ALL
            .into_iter()
            .find(|t| t.label() == s)
            .ok_or_else(|| AppError::validation(format!("Unknown document type: {}", s)))
    }
}

/// Selects between the two prompt templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AnalysisMode {
    #[default]
    #[serde(rename = "Analysis Only")]
    AnalysisOnly,
    #[serde(rename = "Analysis + Recommendations")]
    WithRecommendations,
}

impl AnalysisMode {
    pub const ALL: [AnalysisMode; 2] =
        [AnalysisMode::AnalysisOnly, AnalysisMode::WithRecommendations];

    pub fn label(&self) -> &'static str {
        match self {
            AnalysisMode::AnalysisOnly => "Analysis Only",
            AnalysisMode::WithRecommendations => "Analysis + Recommendations",
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AnalysisMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        AnalysisMode::ALL
            .into_iter()
            .find(|m| m.label() == s)
            .ok_or_else(|| AppError::validation(format!("Unknown analysis mode: {}", s)))
    }
}

/// Plain text pulled out of an uploaded document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentText(String);

impl DocumentText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Character count after trimming surrounding whitespace.
    pub fn trimmed_len(&self) -> usize {
        self.0.trim().chars().count()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Everything the prompt builder needs for one run.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    text: DocumentText,
    doc_type: DocumentType,
    mode: AnalysisMode,
}

impl AnalysisRequest {
    pub fn new(text: DocumentText, doc_type: DocumentType, mode: AnalysisMode) -> Self {
        Self { text, doc_type, mode }
    }

    pub fn text(&self) -> &DocumentText {
        &self.text
    }

    pub fn doc_type(&self) -> DocumentType {
        self.doc_type
    }

    pub fn mode(&self) -> AnalysisMode {
        self.mode
    }
}
