//! Public learning-path endpoints
//!
//! The tree is re-assembled from the flat tables on every request; nothing
//! is cached between requests.

use axum::{
    extract::{Path, State},
    Json,
};
use npulse_common::db::fetch_learning_path;
use npulse_common::hierarchy::{LessonAttachment, Record, TrackNode};
use serde_json::json;

use super::{reading_time_value, ApiError};
use crate::{db, AppState};

/// GET /api/learning-path
///
/// Returns every track with its courses, modules, lessons, course-level
/// lessons (`courseLessons`) and track-level lessons (`trackLessons`).
pub async fn get_learning_path(
    State(state): State<AppState>,
) -> Result<Json<Vec<TrackNode>>, ApiError> {
    let assembly = fetch_learning_path(&*state.records).await?;
    Ok(Json(assembly.tracks))
}

/// GET /api/lessons/:id
///
/// Lesson row plus its attachment level and estimated reading time.
pub async fn get_lesson(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Record>, ApiError> {
    let mut lesson = db::get_lesson(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Lesson {}", id)))?;

    let content = lesson.get("content").and_then(|c| c.as_str()).unwrap_or_default();
    let reading_time = reading_time_value(content);
    let attachment = LessonAttachment::classify(&lesson);

    lesson.insert("attachment".to_string(), json!(attachment));
    lesson.insert("reading_time".to_string(), reading_time);

    Ok(Json(lesson))
}
