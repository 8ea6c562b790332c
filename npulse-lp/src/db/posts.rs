//! Blog post queries
//!
//! Lists come back newest first; ties on `created_at` fall back to insertion
//! order, newest first.

use npulse_common::db::row_to_record;
use npulse_common::hierarchy::Record;
use npulse_common::{time, uuid_utils, Error, Result};
use sqlx::SqlitePool;
use tracing::info;

/// Search results returned per query
pub const SEARCH_LIMIT: i64 = 5;

/// Related posts shown under an article
pub const RELATED_LIMIT: i64 = 3;

/// Shortest query that triggers a search
pub const MIN_SEARCH_CHARS: usize = 3;

/// Editable post fields
#[derive(Debug, Clone, Copy, Default)]
pub struct PostFields<'a> {
    pub title: &'a str,
    pub slug: &'a str,
    pub description: Option<&'a str>,
    pub content: Option<&'a str>,
    pub author: Option<&'a str>,
    pub image: Option<&'a str>,
    pub category: Option<&'a str>,
}

fn slug_conflict(err: sqlx::Error, slug: &str) -> Error {
    match err {
        sqlx::Error::Database(e) if e.is_unique_violation() => {
            Error::Conflict(format!("A post with slug '{}' already exists", slug))
        }
        e => e.into(),
    }
}

/// Escape LIKE wildcards and wrap for a substring match
fn like_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// All posts, optionally restricted to one category
pub async fn list_posts(pool: &SqlitePool, category: Option<&str>) -> Result<Vec<Record>> {
    let rows = match category {
        Some(category) => {
            sqlx::query(
                "SELECT * FROM posts WHERE category = ? ORDER BY created_at DESC, rowid DESC",
            )
            .bind(category)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query("SELECT * FROM posts ORDER BY created_at DESC, rowid DESC")
                .fetch_all(pool)
                .await?
        }
    };

    Ok(rows.iter().map(row_to_record).collect())
}

pub async fn get_post_by_slug(pool: &SqlitePool, slug: &str) -> Result<Option<Record>> {
    let row = sqlx::query("SELECT * FROM posts WHERE slug = ?")
        .bind(slug)
        .fetch_optional(pool)
        .await?;

    Ok(row.as_ref().map(row_to_record))
}

/// Case-insensitive substring search over title, description and content
///
/// Queries shorter than [`MIN_SEARCH_CHARS`] return nothing.
pub async fn search_posts(pool: &SqlitePool, query: &str) -> Result<Vec<Record>> {
    let query = query.trim();
    if query.chars().count() < MIN_SEARCH_CHARS {
        return Ok(Vec::new());
    }

    let pattern = like_pattern(query);
    let rows = sqlx::query(
        r#"
        SELECT * FROM posts
        WHERE title LIKE ? ESCAPE '\'
           OR description LIKE ? ESCAPE '\'
           OR content LIKE ? ESCAPE '\'
        ORDER BY created_at DESC, rowid DESC
        LIMIT ?
        "#,
    )
    .bind(&pattern)
    .bind(&pattern)
    .bind(&pattern)
    .bind(SEARCH_LIMIT)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(row_to_record).collect())
}

/// Newest posts sharing a category, excluding the post itself
pub async fn related_posts(pool: &SqlitePool, slug: &str, category: &str) -> Result<Vec<Record>> {
    let rows = sqlx::query(
        r#"
        SELECT * FROM posts
        WHERE category = ? AND slug != ?
        ORDER BY created_at DESC, rowid DESC
        LIMIT ?
        "#,
    )
    .bind(category)
    .bind(slug)
    .bind(RELATED_LIMIT)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(row_to_record).collect())
}

/// Insert a post, returning its new id
///
/// A slug already in use yields `Error::Conflict`.
pub async fn insert_post(pool: &SqlitePool, post: &PostFields<'_>) -> Result<String> {
    let id = uuid_utils::generate_id();
    sqlx::query(
        r#"
        INSERT INTO posts (id, title, slug, description, content, author, image, category, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(post.title)
    .bind(post.slug)
    .bind(post.description)
    .bind(post.content)
    .bind(post.author)
    .bind(post.image)
    .bind(post.category)
    .bind(time::now_rfc3339())
    .execute(pool)
    .await
    .map_err(|e| slug_conflict(e, post.slug))?;

    info!("Created post {} ({})", id, post.slug);
    Ok(id)
}

/// Replace every editable field of a post; `created_at` is kept
pub async fn update_post(pool: &SqlitePool, id: &str, post: &PostFields<'_>) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE posts
        SET title = ?, slug = ?, description = ?, content = ?, author = ?, image = ?, category = ?
        WHERE id = ?
        "#,
    )
    .bind(post.title)
    .bind(post.slug)
    .bind(post.description)
    .bind(post.content)
    .bind(post.author)
    .bind(post.image)
    .bind(post.category)
    .bind(id)
    .execute(pool)
    .await
    .map_err(|e| slug_conflict(e, post.slug))?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Post {}", id)));
    }

    info!("Updated post {}", id);
    Ok(())
}

pub async fn delete_post(pool: &SqlitePool, id: &str) -> Result<()> {
    let result = sqlx::query("DELETE FROM posts WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Post {}", id)));
    }

    info!("Deleted post {}", id);
    Ok(())
}
