//! Instruction templates sent to the model.
//!
//! Both templates ask for the same assumption sections; they differ only in
//! whether section 4 requests risk-reduction actions. The document text and
//! type label are interpolated verbatim. The requested structure is guidance
//! for the model and is not checked on the way back.

use crate::models::{AnalysisMode, AnalysisRequest, DocumentType};

/// Header of the section only the recommendations template asks for.
pub const RECOMMENDATIONS_SECTION: &str = "Recommended Risk-Reduction Actions";

/// Composes the full prompt for a request.
pub fn build_prompt(request: &AnalysisRequest) -> String {
    let text = request.text().as_str();
    match request.mode() {
        AnalysisMode::AnalysisOnly => analysis_only_prompt(text, request.doc_type()),
        AnalysisMode::WithRecommendations => recommendations_prompt(text, request.doc_type()),
    }
}

fn analysis_only_prompt(document_text: &str, doc_type: DocumentType) -> String {
    format!(
        r#"
You are a senior management consultant specializing in decision quality and risk assessment.

Your objective is NOT to summarize the document.
Your objective is to evaluate the quality of assumptions underlying the decision-making.

Analyze the following {doc_type} and produce the following sections:

1. Explicit Assumptions
2. Implicit / Hidden Assumptions
3. High-Risk Assumptions
   - Classify each as Low / Medium / High risk
   - Explain why in one sentence
4. Missing Validations or Evidence
5. Decision-Critical Questions

Guidelines:
- Do NOT summarize.
- Do NOT provide recommendations or rewrites.
- Be concise, structured, and practical.
- Use bullet points.

Document:
{document_text}
"#,
        doc_type = doc_type.label(),
        document_text = document_text,
    )
}

fn recommendations_prompt(document_text: &str, doc_type: DocumentType) -> String {
    format!(
        r#"
You are a senior management consultant specializing in decision quality and risk assessment.

Your objective is NOT to summarize the document.
Your objective is to evaluate assumptions and recommend actions that reduce decision risk.

Analyze the following {doc_type} and produce the following sections:

1. Explicit Assumptions
2. Implicit / Hidden Assumptions
3. High-Risk Assumptions
   - Classify each as Low / Medium / High risk
   - Explain why in one sentence

4. {section}
   - For each High-Risk assumption:
     - What should be changed or added
     - Where in the document it should be addressed
     - What evidence or validation is needed

5. Decision-Critical Questions

Guidelines:
- Do NOT summarize.
- Do NOT rewrite the full document.
- Be concise, structured, and practical.
- Use bullet points.

Document:
{document_text}
"#,
        doc_type = doc_type.label(),
        section = RECOMMENDATIONS_SECTION,
        document_text = document_text,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DocumentText;

    fn request(text: &str, mode: AnalysisMode) -> AnalysisRequest {
        AnalysisRequest::new(DocumentText::new(text), DocumentType::ProjectPlan, mode)
    }

    #[test]
    fn document_text_is_the_last_thing_in_the_prompt() {
        let prompt = build_prompt(&request("Launch in Q3.", AnalysisMode::AnalysisOnly));
        assert!(prompt.trim_end().ends_with("Document:\nLaunch in Q3."));
    }

    #[test]
    fn braces_in_document_text_are_kept_verbatim() {
        let prompt = build_prompt(&request(
            "cost = {fixed} + {variable}",
            AnalysisMode::WithRecommendations,
        ));
        assert!(prompt.contains("cost = {fixed} + {variable}"));
    }

    #[test]
    fn both_templates_forbid_summaries() {
        for mode in AnalysisMode::ALL {
            let prompt = build_prompt(&request("text", mode));
            assert!(prompt.contains("Your objective is NOT to summarize the document."));
            assert!(prompt.contains("- Do NOT summarize."));
            assert!(prompt.contains("Analyze the following Project Plan"));
        }
    }
}
