use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use super::form::TtsForm;
use super::HealthResponse;
use crate::api::routes::AppState;
use crate::error::AppError;
use crate::tts::Voice;

const AUDIO_CONTENT_TYPE: &str = "audio/mpeg";

pub async fn list_voices(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Voice>>, AppError> {
    // Querying the offline engine runs a subprocess.
    let voices = tokio::task::spawn_blocking(move || state.tts.list_voices())
        .await
        .map_err(|e| AppError::Internal(format!("Voice listing failed: {}", e)))?;
    Ok(Json(voices))
}

pub async fn list_languages(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<String>>, AppError> {
    let languages = tokio::task::spawn_blocking(move || state.tts.list_languages())
        .await
        .map_err(|e| AppError::Internal(format!("Language listing failed: {}", e)))?;
    Ok(Json(languages))
}

pub async fn text_to_speech(
    State(state): State<Arc<AppState>>,
    TtsForm(request): TtsForm,
) -> Result<Response, AppError> {
    let audio = state
        .tts
        .synthesize(&request.text, request.voice_id.as_deref())
        .await?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, AUDIO_CONTENT_TYPE)],
        audio,
    )
        .into_response())
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
