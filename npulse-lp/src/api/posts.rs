//! Blog posts: public listing, article detail, search and admin editing

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use npulse_common::hierarchy::Record;
use serde::Deserialize;
use serde_json::Value;

use super::admin::CreatedResponse;
use super::{reading_time_value, ApiError, ApiJson};
use crate::db::posts::{self, PostFields};
use crate::AppState;

/// Category value meaning "no filter"
const ALL_CATEGORIES: &str = "all";

#[derive(Debug, Deserialize)]
pub struct PostListQuery {
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Body for creating or replacing a post
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PostRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub slug: String,
    pub description: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
}

impl PostRequest {
    /// Validate and borrow as database fields
    ///
    /// Title and slug are trimmed and required; empty optional fields are
    /// stored as NULL.
    pub fn fields(&self) -> Result<PostFields<'_>, ApiError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ApiError::BadRequest("Title is required".to_string()));
        }

        let slug = self.slug.trim();
        if slug.is_empty() {
            return Err(ApiError::BadRequest("Slug is required".to_string()));
        }
        if slug.contains('/') || slug.contains(char::is_whitespace) {
            return Err(ApiError::BadRequest(format!("Invalid slug: {}", slug)));
        }

        fn optional(v: &Option<String>) -> Option<&str> {
            v.as_deref().map(str::trim).filter(|s| !s.is_empty())
        }

        Ok(PostFields {
            title,
            slug,
            description: optional(&self.description),
            content: self.content.as_deref().filter(|s| !s.is_empty()),
            author: optional(&self.author),
            image: optional(&self.image),
            category: optional(&self.category),
        })
    }
}

/// GET /api/posts?category=
///
/// Newest first. A missing, empty or `all` category lists everything.
pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<PostListQuery>,
) -> Result<Json<Vec<Record>>, ApiError> {
    let category = query
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty() && *c != ALL_CATEGORIES);

    Ok(Json(posts::list_posts(&state.db, category).await?))
}

/// GET /api/posts/:slug
///
/// Post row plus `reading_time` and up to three `related` posts from the
/// same category.
pub async fn get_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Record>, ApiError> {
    let mut post = posts::get_post_by_slug(&state.db, &slug)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Post {}", slug)))?;

    let related = match post.get("category").and_then(Value::as_str) {
        Some(category) => posts::related_posts(&state.db, &slug, category).await?,
        None => Vec::new(),
    };

    let content = post.get("content").and_then(Value::as_str).unwrap_or_default();
    let reading_time = reading_time_value(content);

    post.insert("reading_time".to_string(), reading_time);
    post.insert(
        "related".to_string(),
        Value::Array(related.into_iter().map(Value::Object).collect()),
    );

    Ok(Json(post))
}

/// GET /api/search?q=
pub async fn search_posts(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Record>>, ApiError> {
    Ok(Json(posts::search_posts(&state.db, &query.q).await?))
}

/// POST /api/admin/posts
pub async fn create_post(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<PostRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let fields = request.fields()?;
    let id = posts::insert_post(&state.db, &fields).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// PUT /api/admin/posts/:id
pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<PostRequest>,
) -> Result<StatusCode, ApiError> {
    let fields = request.fields()?;
    posts::update_post(&state.db, &id, &fields).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/admin/posts/:id
pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    posts::delete_post(&state.db, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
