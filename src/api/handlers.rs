//! Request handlers

use axum::{body::Bytes, extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

use crate::error::{AppError, Result};
use crate::styling::{
    DirectOutput, MatchOutfitRequest, MatchOutput, PromptRequest, StylingAdvice, StylingRequest,
};
use crate::AppState;

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

pub async fn hello() -> Json<Value> {
    Json(json!({ "message": "hello from /hello route" }))
}

/// Parse a styling request; only a missing or blank body falls back to defaults
fn parse_styling_request(body: &[u8]) -> Result<StylingRequest> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(StylingRequest::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::InvalidRequest(format!("Invalid styling request: {}", e)))
}

/// Run every style variant over the selected closet images
pub async fn styling_advice(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<StylingAdvice>> {
    let request = parse_styling_request(&body)?;
    let (season, indices) = request.resolve(&state.settings.styling);

    info!(season = %season, indices = ?indices, "Styling advice requested");

    let advice = state.pipeline.run(&season, &indices).await?;
    if advice.all_failed() {
        let summary = advice
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.variant, e.error))
            .collect::<Vec<_>>()
            .join("; ");
        return Err(AppError::GenerationFailed(summary));
    }

    Ok(Json(advice))
}

pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PromptRequest>,
) -> Result<Json<DirectOutput>> {
    Ok(Json(state.direct.chat(&request.prompt).await?))
}

pub async fn generate_image(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PromptRequest>,
) -> Result<Json<DirectOutput>> {
    Ok(Json(state.direct.generate_image(&request.prompt).await?))
}

/// Pick the candidate outfit that best complements a reference outfit
pub async fn match_outfit(
    State(state): State<Arc<AppState>>,
    Json(request): Json<MatchOutfitRequest>,
) -> Result<Json<MatchOutput>> {
    Ok(Json(state.direct.match_outfit(&request).await?))
}
