//! Exercise HTTP Handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use std::sync::Arc;

use crate::application::GenerateAudioCommand;
use crate::infrastructure::http::dto::{
    ApiResponse, ExerciseAudioResponse, GenerateExerciseAudioRequest,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 生成练习音频
///
/// POST /api/exercise/audio
pub async fn generate_exercise_audio(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GenerateExerciseAudioRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<ExerciseAudioResponse>>, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let mut cmd = GenerateAudioCommand::new(req.record);
    if let Some(engine) = req.engine {
        cmd = cmd.with_engine(engine);
    }

    let artifact = state.generate_audio_handler.handle(cmd).await?;
    let file_name = artifact.file_name().unwrap_or_default();

    Ok(Json(ApiResponse::success(ExerciseAudioResponse {
        path: artifact.path.display().to_string(),
        url: state.audio_url(&file_name),
        engine: artifact.engine,
        segment_count: artifact.segment_count,
        failed_segments: artifact.failed_segments,
        dropped_segments: artifact.dropped_segments,
        cached: artifact.cached,
    })))
}
