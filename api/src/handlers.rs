use crate::analyze_request::AnalyzeRequest;
use crate::analyze_response::AnalyzeResponse;
use crate::page::{render_page, PageView};
use crate::routes::AppState;
use crate::ui_state::{FormState, FAILURE_ALERT};
use aid_matcher::MatchReport;
use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Form, State},
    http::StatusCode,
    response::Html,
    Json,
};
use serde_json::Value;
use uuid::Uuid;

/// Run one analysis, logging the outcome under a fresh request id.
async fn run_analysis(state: &AppState, request: &AnalyzeRequest) -> Result<Value> {
    let request_id = Uuid::new_v4();
    log::info!(
        "[{}] analysis requested (text: {}, image: {})",
        request_id,
        request.text().is_some(),
        request.image().is_some()
    );

    match state
        .analysis
        .analyze(request.user_input.as_deref(), request.image_base64.as_deref())
        .await
    {
        Ok(data) => {
            log::info!("[{}] analysis succeeded", request_id);
            Ok(data)
        }
        Err(e) => {
            log::error!("[{}] AI Analysis Error: {:#}", request_id, e);
            Err(e)
        }
    }
}

/// `POST /api/analyze`
///
/// The body is parsed here rather than by an extractor so that an oversized
/// or malformed body takes the same failure path as every other error.
pub async fn analyze(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> (StatusCode, Json<AnalyzeResponse>) {
    let parsed = body
        .context("could not read request body")
        .and_then(|body| serde_json::from_slice(&body).context("invalid request body"));
    let request: AnalyzeRequest = match parsed {
        Ok(request) => request,
        Err(e) => {
            log::error!("AI Analysis Error: {:#}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(AnalyzeResponse::failure()));
        }
    };

    match run_analysis(&state, &request).await {
        Ok(data) => (StatusCode::OK, Json(AnalyzeResponse::success(data))),
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, Json(AnalyzeResponse::failure())),
    }
}

/// `GET /`
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let request = AnalyzeRequest::default();
    Html(render_page(&PageView {
        request: &request,
        state: &FormState::Idle,
        maps_api_key: state.maps_api_key.as_deref(),
    }))
}

/// `POST /`: the form submission flow.
pub async fn submit(State(state): State<AppState>, Form(request): Form<AnalyzeRequest>) -> Html<String> {
    let form_state = match FormState::Idle.submit(!request.is_empty()) {
        Ok(submitting) => {
            // A reply without a readable match list renders as no matches.
            let outcome = run_analysis(&state, &request).await.map(|data| {
                MatchReport::from_value(&data).unwrap_or_else(|e| {
                    log::debug!("model reply has no match list: {}", e);
                    MatchReport::default()
                })
            });
            if let Err(e) = &outcome {
                log::debug!("rendering failure for: {:#}", e);
            }
            submitting
                .resolve(outcome)
                .unwrap_or_else(|_| FormState::Error(FAILURE_ALERT.to_string()))
        }
        Err(e) => {
            log::debug!("submission rejected: {}", e);
            FormState::Idle
        }
    };

    Html(render_page(&PageView {
        request: &request,
        state: &form_state,
        maps_api_key: state.maps_api_key.as_deref(),
    }))
}
