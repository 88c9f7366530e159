use std::time::Instant;

use docx_rs::{read_docx, Break, BreakType, DocumentChild, Paragraph, ParagraphChild, RunChild};

use crate::error::{AppError, AppResult};
use crate::models::{DocumentFormat, DocumentText};
use crate::services::extractor::ExtractedText;

pub struct DocxProcessor;

impl DocxProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Joins the text of every body paragraph with a newline. Empty paragraphs
    /// become empty lines.
    pub fn extract_text(&self, content: &[u8]) -> AppResult<ExtractedText> {
        let start = Instant::now();

        tracing::debug!("Starting Word text extraction ({} bytes)", content.len());

        let docx = read_docx(content).map_err(|e| {
            tracing::warn!("Word document could not be read: {}", e);
            AppError::extraction(DocumentFormat::Docx, format!("failed to read document: {}", e))
        })?;

        let paragraphs: Vec<String> = docx
            .document
            .children
            .iter()
            .filter_map(|child| match child {
                DocumentChild::Paragraph(paragraph) => Some(paragraph_text(paragraph)),
                _ => None,
            })
            .collect();

        let units = paragraphs.len();
        let text = paragraphs.join("\n");
        let processing_time = start.elapsed().as_millis() as u64;

        tracing::info!(
            "Word extraction completed in {}ms: {} paragraphs, {} characters",
            processing_time,
            units,
            text.chars().count()
        );

        Ok(ExtractedText {
            text: DocumentText::new(text),
            format: DocumentFormat::Docx,
            units,
        })
    }
}

impl Default for DocxProcessor {
    fn default() -> Self {
        Self::new()
    }
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut text = String::new();
    collect_children(&paragraph.children, &mut text);
    text
}

fn collect_children(children: &[ParagraphChild], text: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for run_child in &run.children {
                    match run_child {
                        RunChild::Text(t) => text.push_str(&t.text),
                        RunChild::Tab(_) => text.push('\t'),
                        // Soft line break; page and column breaks carry no text.
                        RunChild::Break(br) if *br == Break::new(BreakType::TextWrapping) => {
                            text.push('\n')
                        }
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => collect_children(&link.children, text),
            _ => {}
        }
    }
}
