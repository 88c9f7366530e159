use axum::{
    extract::{Multipart, State},
    response::Json,
};
use std::time::Instant;
use tracing::{info, error};

use crate::error::AppResult;
use crate::handlers::form::read_analysis_form;
use crate::handlers::AppState;
use crate::models::{AnalysisData, AnalysisResponse};

pub async fn analyze_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<AnalysisResponse>> {
    let start = Instant::now();
    let request_id = uuid::Uuid::new_v4().to_string()[..8].to_string();

    info!(request_id = %request_id, "Starting analysis request");

    let mut form = read_analysis_form(&mut multipart, &state).await?;
    let file = form.require_file()?;

    info!(
        request_id = %request_id,
        file_name = %file.name,
        file_size = file.size,
        doc_type = %form.doc_type,
        mode = %form.mode,
        "File extracted from multipart form"
    );

    let outcome = match state.analyzer.analyze(file, form.doc_type, form.mode).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!(request_id = %request_id, error = %e, "Analysis failed");
            return Err(e);
        }
    };

    let total_time = start.elapsed().as_millis() as u64;

    info!(
        request_id = %request_id,
        total_time_ms = total_time,
        "Request completed successfully"
    );

    Ok(Json(AnalysisResponse::new(
        AnalysisData {
            report: outcome.report,
            advisory: outcome.advisory,
            document: outcome.document,
            model: outcome.model,
            mode: form.mode,
            doc_type: form.doc_type,
        },
        total_time,
    )))
}
