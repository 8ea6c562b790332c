//! Database writes and single-row lookups for npulse-lp
//!
//! Reads of whole tables go through `npulse_common::db::RecordSource`.
//! Table names here always come from `LearningTable`, never from requests.

pub mod posts;

use npulse_common::db::{row_to_record, LearningTable};
use npulse_common::hierarchy::{LessonAttachment, Record};
use npulse_common::{uuid_utils, Error, Result};
use sqlx::SqlitePool;
use tracing::info;

/// Column holding the free-text body of a row
fn detail_column(table: LearningTable) -> &'static str {
    match table {
        LearningTable::Lessons => "content",
        _ => "description",
    }
}

/// Singular label for messages
fn label(table: LearningTable) -> &'static str {
    match table {
        LearningTable::Tracks => "Track",
        LearningTable::Courses => "Course",
        LearningTable::Modules => "Module",
        LearningTable::Lessons => "Lesson",
    }
}

/// Check whether a row with this id exists
pub async fn row_exists(pool: &SqlitePool, table: LearningTable, id: &str) -> Result<bool> {
    let sql = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?)", table.table_name());
    let exists: bool = sqlx::query_scalar(&sql).bind(id).fetch_one(pool).await?;
    Ok(exists)
}

async fn require_parent(pool: &SqlitePool, table: LearningTable, id: &str) -> Result<()> {
    if row_exists(pool, table, id).await? {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!("{} not found: {}", label(table), id)))
    }
}

/// Insert a track, returning its new id
pub async fn insert_track(pool: &SqlitePool, name: &str, description: Option<&str>) -> Result<String> {
    let id = uuid_utils::generate_id();
    sqlx::query("INSERT INTO tracks (id, name, description) VALUES (?, ?, ?)")
        .bind(&id)
        .bind(name)
        .bind(description)
        .execute(pool)
        .await?;

    info!("Created track {} ({})", id, name);
    Ok(id)
}

/// Insert a course under an existing track
pub async fn insert_course(
    pool: &SqlitePool,
    name: &str,
    description: Option<&str>,
    track_id: &str,
) -> Result<String> {
    require_parent(pool, LearningTable::Tracks, track_id).await?;

    let id = uuid_utils::generate_id();
    sqlx::query("INSERT INTO courses (id, name, description, track_id) VALUES (?, ?, ?, ?)")
        .bind(&id)
        .bind(name)
        .bind(description)
        .bind(track_id)
        .execute(pool)
        .await?;

    info!("Created course {} ({}) in track {}", id, name, track_id);
    Ok(id)
}

/// Insert a module under an existing course
pub async fn insert_module(
    pool: &SqlitePool,
    name: &str,
    description: Option<&str>,
    course_id: &str,
) -> Result<String> {
    require_parent(pool, LearningTable::Courses, course_id).await?;

    let id = uuid_utils::generate_id();
    sqlx::query("INSERT INTO modules (id, name, description, course_id) VALUES (?, ?, ?, ?)")
        .bind(&id)
        .bind(name)
        .bind(description)
        .bind(course_id)
        .execute(pool)
        .await?;

    info!("Created module {} ({}) in course {}", id, name, course_id);
    Ok(id)
}

/// Insert a lesson at the level given by its attachment
///
/// Only the one foreign key matching the attachment is written; the other
/// two stay NULL.
pub async fn insert_lesson(
    pool: &SqlitePool,
    name: &str,
    content: Option<&str>,
    attachment: &LessonAttachment,
) -> Result<String> {
    let (parent_table, parent_id) = match attachment {
        LessonAttachment::Module(id) => (LearningTable::Modules, id.as_str()),
        LessonAttachment::Course(id) => (LearningTable::Courses, id.as_str()),
        LessonAttachment::Track(id) => (LearningTable::Tracks, id.as_str()),
        LessonAttachment::Unattached => {
            return Err(Error::InvalidInput(
                "Lesson needs one of module_id, course_id or track_id".to_string(),
            ))
        }
    };
    require_parent(pool, parent_table, parent_id).await?;

    let column_value = |table: LearningTable| (table == parent_table).then_some(parent_id);
    let module_id = column_value(LearningTable::Modules);
    let course_id = column_value(LearningTable::Courses);
    let track_id = column_value(LearningTable::Tracks);

    let id = uuid_utils::generate_id();
    sqlx::query(
        "INSERT INTO lessons (id, name, content, module_id, course_id, track_id) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(name)
    .bind(content)
    .bind(module_id)
    .bind(course_id)
    .bind(track_id)
    .execute(pool)
    .await?;

    info!("Created lesson {} ({}) attached to {:?}", id, name, attachment);
    Ok(id)
}

/// Update a row's name and its description (or lesson content)
pub async fn update_row(
    pool: &SqlitePool,
    table: LearningTable,
    id: &str,
    name: &str,
    detail: Option<&str>,
) -> Result<()> {
    let sql = format!(
        "UPDATE {} SET name = ?, {} = ? WHERE id = ?",
        table.table_name(),
        detail_column(table)
    );
    let result = sqlx::query(&sql)
        .bind(name)
        .bind(detail)
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("{} {}", label(table), id)));
    }

    info!("Updated {} {}", table, id);
    Ok(())
}

/// Delete a row; children go with it through ON DELETE CASCADE
pub async fn delete_row(pool: &SqlitePool, table: LearningTable, id: &str) -> Result<()> {
    let sql = format!("DELETE FROM {} WHERE id = ?", table.table_name());
    let result = sqlx::query(&sql).bind(id).execute(pool).await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("{} {}", label(table), id)));
    }

    info!("Deleted {} {}", table, id);
    Ok(())
}

/// Fetch one lesson row as a record
pub async fn get_lesson(pool: &SqlitePool, id: &str) -> Result<Option<Record>> {
    let row = sqlx::query("SELECT * FROM lessons WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.as_ref().map(row_to_record))
}

/// Add a newsletter subscriber
///
/// Returns `Error::Conflict` when the address is already subscribed.
pub async fn subscribe_newsletter(pool: &SqlitePool, email: &str, subscribed_at: &str) -> Result<()> {
    let result = sqlx::query(
        "INSERT INTO newsletter_subscribers (email, subscribed_at, status) VALUES (?, ?, 'active')",
    )
    .bind(email)
    .bind(subscribed_at)
    .execute(pool)
    .await;

    match result {
        Ok(_) => {
            info!("New newsletter subscriber: {}", email);
            Ok(())
        }
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            Err(Error::Conflict(format!("{} is already subscribed", email)))
        }
        Err(e) => Err(e.into()),
    }
}
