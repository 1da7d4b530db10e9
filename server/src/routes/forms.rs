//! Form submission routes.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::post,
    Json, Router,
};
use formwright_engine::{SubmissionPayload, SubmitResponse};

use crate::error::Result;
use crate::handlers::handle_submit;
use crate::AppState;

/// Create form routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/forms/{id}", post(submit_handler))
}

/// POST /forms/{id} - Store a filled-in form.
async fn submit_handler(
    State(state): State<AppState>,
    Path(form_id): Path<String>,
    payload: std::result::Result<Json<SubmissionPayload>, JsonRejection>,
) -> Result<Json<SubmitResponse>> {
    let Json(payload) = payload?;
    let response = handle_submit(&state.storage, form_id, payload).await?;
    Ok(Json(response))
}
