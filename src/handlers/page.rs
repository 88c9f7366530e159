use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::Html,
};
use tracing::{error, info};

use crate::error::AppError;
use crate::handlers::form::read_analysis_form;
use crate::handlers::AppState;
use crate::models::{AnalysisMode, DocumentType};
use crate::services::analyzer::AnalysisOutcome;
use crate::services::report_renderer::{escape_html, render_markdown};

pub const PAGE_TITLE: &str = "AI Assumption Validator";
pub const REPORT_HEADING: &str = "Assumption Analysis Report";

/// What the single page shows: the form, plus the result of the last run if any.
#[derive(Debug, Default)]
pub struct PageView {
    pub doc_type: DocumentType,
    pub mode: AnalysisMode,
    pub error: Option<String>,
    pub advisory: Option<String>,
    pub report: Option<String>,
    pub file_name: Option<String>,
}

impl PageView {
    pub fn idle() -> Self {
        Self::default()
    }

    fn completed(doc_type: DocumentType, mode: AnalysisMode, outcome: AnalysisOutcome) -> Self {
        Self {
            doc_type,
            mode,
            error: None,
            advisory: outcome.advisory,
            report: Some(outcome.report),
            file_name: Some(outcome.document.file_name),
        }
    }
}

pub async fn index_handler() -> Html<String> {
    Html(render_page(&PageView::idle()))
}

/// Form target: runs the pipeline and re-renders the page with the outcome.
pub async fn analyze_page_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> (StatusCode, Html<String>) {
    let _permit = match state.limiter.try_acquire("/analyze") {
        Ok(permit) => permit,
        Err(e) => return failed(PageView::idle(), e),
    };

    let mut form = match read_analysis_form(&mut multipart, &state).await {
        Ok(form) => form,
        Err(e) => {
            error!(error = %e, "Failed to read upload form");
            return failed(PageView::idle(), e);
        }
    };

    let view = PageView {
        doc_type: form.doc_type,
        mode: form.mode,
        ..PageView::idle()
    };

    let file = match form.require_file() {
        Ok(file) => file,
        Err(e) => {
            info!("Analyze pressed without a document");
            return failed(view, e);
        }
    };

    let prepared = match state.analyzer.prepare(file, view.doc_type, view.mode).await {
        Ok(prepared) => prepared,
        Err(e) => {
            error!(error_code = e.error_code(), error = %e, "Analysis failed");
            return failed(view, e);
        }
    };

    // The short-document warning stays on screen even if the model call fails.
    let advisory = prepared.advisory.clone();

    match state.analyzer.complete(prepared).await {
        Ok(outcome) => (
            StatusCode::OK,
            Html(render_page(&PageView::completed(view.doc_type, view.mode, outcome))),
        ),
        Err(e) => {
            error!(error_code = e.error_code(), error = %e, "Model call failed");
            failed(PageView { advisory, ..view }, e)
        }
    }
}

fn failed(view: PageView, err: AppError) -> (StatusCode, Html<String>) {
    let view = PageView {
        error: Some(err.to_string()),
        ..view
    };
    (err.status_code(), Html(render_page(&view)))
}

pub fn render_page(view: &PageView) -> String {
    let mode_options: String = AnalysisMode::ALL
        .iter()
        .map(|mode| {
            format!(
                r#"<label class="radio"><input type="radio" name="mode" value="{value}"{checked}> {value}</label>"#,
                value = escape_html(mode.label()),
                checked = if *mode == view.mode { " checked" } else { "" },
            )
        })
        .collect();

    let doc_type_options: String = DocumentType::ALL
        .iter()
        .map(|doc_type| {
            format!(
                r#"<option value="{value}"{selected}>{value}</option>"#,
                value = escape_html(doc_type.label()),
                selected = if *doc_type == view.doc_type { " selected" } else { "" },
            )
        })
        .collect();

    let mut result = String::new();
    if let Some(advisory) = &view.advisory {
        result.push_str(&format!(
            r#"<div class="alert warning" role="status">{}</div>"#,
            escape_html(advisory)
        ));
    }
    if let Some(error) = &view.error {
        result.push_str(&format!(
            r#"<div class="alert error" role="alert">{}</div>"#,
            escape_html(error)
        ));
    }
    if let Some(report) = &view.report {
        let source = view
            .file_name
            .as_deref()
            .map(|name| format!(r#"<p class="source">{}</p>"#, escape_html(name)))
            .unwrap_or_default();
        result.push_str(&format!(
            r#"<section class="report"><h2>📌 {heading}</h2>{source}<div class="report-body">{body}</div></section>"#,
            heading = REPORT_HEADING,
            source = source,
            body = render_markdown(report),
        ));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>
body {{ font-family: system-ui, sans-serif; margin: 0 auto; max-width: 64rem; padding: 2rem; color: #1f2933; }}
.caption {{ color: #616e7c; margin-top: -0.5rem; }}
fieldset {{ border: none; padding: 0; margin: 1rem 0; }}
.radio {{ margin-right: 1.5rem; }}
select, input[type=file] {{ display: block; margin-top: 0.4rem; }}
button {{ padding: 0.6rem 1.2rem; font-size: 1rem; cursor: pointer; }}
.alert {{ padding: 0.8rem 1rem; border-radius: 0.4rem; margin: 1rem 0; }}
.alert.error {{ background: #fde8e8; color: #9b1c1c; }}
.alert.warning {{ background: #fdf6b2; color: #723b13; }}
.source {{ color: #616e7c; }}
#progress {{ display: none; color: #616e7c; }}
</style>
</head>
<body>
<h1>🧠 {title}</h1>
<p class="caption">Identify hidden assumptions and decision risks in business documents.</p>
<form method="post" action="/analyze" enctype="multipart/form-data" onsubmit="document.getElementById('progress').style.display='block';">
<fieldset><legend>Select Analysis Mode</legend>{mode_options}</fieldset>
<fieldset><label>Select Document Type<select name="doc_type">{doc_type_options}</select></label></fieldset>
<fieldset><label>Upload Document (Word or PDF)<input type="file" name="file" accept=".docx,.pdf"></label></fieldset>
<button type="submit">🔍 Analyze Document</button>
<p id="progress">Analyzing assumptions and risks...</p>
</form>
{result}
</body>
</html>
"#,
        title = PAGE_TITLE,
        mode_options = mode_options,
        doc_type_options = doc_type_options,
        result = result,
    )
}
