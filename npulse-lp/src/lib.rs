//! npulse-lp library - Learning path service
//!
//! Serves the assembled learning-path tree, lesson details, blog posts,
//! admin editing and newsletter signup.

use std::sync::Arc;

use axum::Router;
use npulse_common::db::{RecordSource, SqliteRecordSource};
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod db;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Flat table reader feeding the hierarchy assembler
    pub records: Arc<dyn RecordSource>,
}

impl AppState {
    /// Create new application state reading records from the same pool
    pub fn new(db: SqlitePool) -> Self {
        let records = Arc::new(SqliteRecordSource::new(db.clone()));
        Self { db, records }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post, put};

    // Public learning-path and blog routes
    let public = Router::new()
        .route("/api/learning-path", get(api::get_learning_path))
        .route("/api/lessons/:id", get(api::get_lesson))
        .route("/api/posts", get(api::list_posts))
        .route("/api/posts/:slug", get(api::get_post))
        .route("/api/search", get(api::search_posts))
        .route("/api/newsletter", post(api::subscribe_newsletter))
        .merge(api::health_routes());

    // Admin editing routes
    let admin = Router::new()
        .route("/api/admin/summary", get(api::get_summary))
        .route("/api/admin/tracks", post(api::create_track))
        .route("/api/admin/tracks/:id", put(api::update_track).delete(api::delete_track))
        .route("/api/admin/courses", post(api::create_course))
        .route("/api/admin/courses/:id", put(api::update_course).delete(api::delete_course))
        .route("/api/admin/modules", post(api::create_module))
        .route("/api/admin/modules/:id", put(api::update_module).delete(api::delete_module))
        .route("/api/admin/lessons", post(api::create_lesson))
        .route("/api/admin/lessons/:id", put(api::update_lesson).delete(api::delete_lesson))
        .route("/api/admin/posts", post(api::create_post))
        .route("/api/admin/posts/:id", put(api::update_post).delete(api::delete_post));

    Router::new()
        .merge(public)
        .merge(admin)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
