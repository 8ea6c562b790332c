//! Admin editing of the learning path
//!
//! Create, rename and delete tracks, courses, modules and lessons. Lessons
//! are created at exactly one level (module, course or track).

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use npulse_common::db::{fetch_learning_path, LearningTable};
use npulse_common::hierarchy::{AssemblyStats, LessonAttachment};
use serde::{Deserialize, Serialize};

use super::{ApiError, ApiJson};
use crate::{db, AppState};

/// Body for creating or updating a track
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrackRequest {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
}

/// Body for creating or updating a course
///
/// Only `track_id` names the parent; a `course_id` here is rejected rather
/// than silently read as the track.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CourseRequest {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    pub track_id: Option<String>,
}

/// Body for creating or updating a module
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleRequest {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    pub course_id: Option<String>,
}

/// Body for creating or updating a lesson
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LessonRequest {
    #[serde(default)]
    pub name: String,
    pub content: Option<String>,
    pub module_id: Option<String>,
    pub course_id: Option<String>,
    pub track_id: Option<String>,
}

impl LessonRequest {
    /// Resolve the requested parent; exactly one foreign key must be given
    pub fn attachment(&self) -> Result<LessonAttachment, ApiError> {
        let given = |v: &Option<String>| v.as_deref().filter(|s| !s.is_empty()).map(str::to_string);

        match (given(&self.module_id), given(&self.course_id), given(&self.track_id)) {
            (Some(id), None, None) => Ok(LessonAttachment::Module(id)),
            (None, Some(id), None) => Ok(LessonAttachment::Course(id)),
            (None, None, Some(id)) => Ok(LessonAttachment::Track(id)),
            (None, None, None) => Err(ApiError::BadRequest(
                "Lesson needs one of module_id, course_id or track_id".to_string(),
            )),
            _ => Err(ApiError::BadRequest(
                "Lesson takes only one of module_id, course_id or track_id".to_string(),
            )),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: String,
}

/// Per-track counts for the admin overview
#[derive(Debug, Serialize)]
pub struct TrackSummary {
    pub id: Option<String>,
    pub name: Option<String>,
    pub courses: usize,
    pub modules: usize,
    pub lessons: usize,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub tracks: Vec<TrackSummary>,
    pub stats: AssemblyStats,
}

fn require_name(name: &str) -> Result<&str, ApiError> {
    let name = name.trim();
    if name.is_empty() {
        Err(ApiError::BadRequest("Name is required".to_string()))
    } else {
        Ok(name)
    }
}

fn require_parent<'a>(parent: &'a Option<String>, field: &str) -> Result<&'a str, ApiError> {
    parent
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::BadRequest(format!("{} is required", field)))
}

async fn update(
    state: &AppState,
    table: LearningTable,
    id: &str,
    name: &str,
    detail: Option<&str>,
) -> Result<StatusCode, ApiError> {
    let name = require_name(name)?;
    db::update_row(&state.db, table, id, name, detail).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete(state: &AppState, table: LearningTable, id: &str) -> Result<StatusCode, ApiError> {
    db::delete_row(&state.db, table, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/admin/summary
pub async fn get_summary(State(state): State<AppState>) -> Result<Json<SummaryResponse>, ApiError> {
    let assembly = fetch_learning_path(&*state.records).await?;

    let tracks = assembly
        .tracks
        .iter()
        .map(|track| TrackSummary {
            id: track.id(),
            name: track.record.get("name").and_then(|n| n.as_str()).map(str::to_string),
            courses: track.courses.len(),
            modules: track.module_count(),
            lessons: track.lesson_count(),
        })
        .collect();

    Ok(Json(SummaryResponse {
        tracks,
        stats: assembly.stats,
    }))
}

// --- Tracks ---

/// POST /api/admin/tracks
pub async fn create_track(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<TrackRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let name = require_name(&request.name)?;
    let id = db::insert_track(&state.db, name, request.description.as_deref()).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// PUT /api/admin/tracks/:id
pub async fn update_track(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<TrackRequest>,
) -> Result<StatusCode, ApiError> {
    update(&state, LearningTable::Tracks, &id, &request.name, request.description.as_deref()).await
}

/// DELETE /api/admin/tracks/:id
pub async fn delete_track(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    delete(&state, LearningTable::Tracks, &id).await
}

// --- Courses ---

/// POST /api/admin/courses
pub async fn create_course(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CourseRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let name = require_name(&request.name)?;
    let track_id = require_parent(&request.track_id, "track_id")?;
    let id = db::insert_course(&state.db, name, request.description.as_deref(), track_id).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// PUT /api/admin/courses/:id
pub async fn update_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<CourseRequest>,
) -> Result<StatusCode, ApiError> {
    update(&state, LearningTable::Courses, &id, &request.name, request.description.as_deref()).await
}

/// DELETE /api/admin/courses/:id
pub async fn delete_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    delete(&state, LearningTable::Courses, &id).await
}

// --- Modules ---

/// POST /api/admin/modules
pub async fn create_module(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ModuleRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let name = require_name(&request.name)?;
    let course_id = require_parent(&request.course_id, "course_id")?;
    let id = db::insert_module(&state.db, name, request.description.as_deref(), course_id).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// PUT /api/admin/modules/:id
pub async fn update_module(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<ModuleRequest>,
) -> Result<StatusCode, ApiError> {
    update(&state, LearningTable::Modules, &id, &request.name, request.description.as_deref()).await
}

/// DELETE /api/admin/modules/:id
pub async fn delete_module(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    delete(&state, LearningTable::Modules, &id).await
}

// --- Lessons ---

/// POST /api/admin/lessons
pub async fn create_lesson(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LessonRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let name = require_name(&request.name)?;
    let attachment = request.attachment()?;
    let id = db::insert_lesson(&state.db, name, request.content.as_deref(), &attachment).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// PUT /api/admin/lessons/:id
///
/// Renames and rewrites content; the attachment level is fixed at creation.
pub async fn update_lesson(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<LessonRequest>,
) -> Result<StatusCode, ApiError> {
    update(&state, LearningTable::Lessons, &id, &request.name, request.content.as_deref()).await
}

/// DELETE /api/admin/lessons/:id
pub async fn delete_lesson(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    delete(&state, LearningTable::Lessons, &id).await
}
