//! Flat table fetching for the learning path
//!
//! The hierarchy assembler works on plain records. This module is the
//! collaborator that produces them: one `fetch_all` per learning table.

use async_trait::async_trait;
use serde_json::{json, Value};
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Row, SqlitePool, ValueRef};
use std::fmt;
use tracing::debug;

use crate::hierarchy::{assemble_with_stats, Assembly, Record};
use crate::Result;

/// The four learning-path tables
///
/// Only these names are ever interpolated into SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LearningTable {
    Tracks,
    Courses,
    Modules,
    Lessons,
}

impl LearningTable {
    /// All tables, parents before children
    pub const ALL: [LearningTable; 4] = [
        LearningTable::Tracks,
        LearningTable::Courses,
        LearningTable::Modules,
        LearningTable::Lessons,
    ];

    /// SQL table name
    pub fn table_name(self) -> &'static str {
        match self {
            LearningTable::Tracks => "tracks",
            LearningTable::Courses => "courses",
            LearningTable::Modules => "modules",
            LearningTable::Lessons => "lessons",
        }
    }
}

impl fmt::Display for LearningTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

/// Source of flat learning-path rows
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Fetch every row of a table, in a stable order
    async fn fetch_all(&self, table: LearningTable) -> Result<Vec<Record>>;
}

/// [`RecordSource`] backed by the SQLite database
#[derive(Debug, Clone)]
pub struct SqliteRecordSource {
    pool: SqlitePool,
}

impl SqliteRecordSource {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordSource for SqliteRecordSource {
    async fn fetch_all(&self, table: LearningTable) -> Result<Vec<Record>> {
        // rowid order keeps insertion order across fetches
        let sql = format!("SELECT * FROM {} ORDER BY rowid", table.table_name());
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        debug!("Fetched {} rows from {}", rows.len(), table);

        Ok(rows.iter().map(row_to_record).collect())
    }
}

/// Convert a SQLite row into a column-name keyed record
pub fn row_to_record(row: &SqliteRow) -> Record {
    row.columns()
        .iter()
        .enumerate()
        .map(|(i, column)| (column.name().to_string(), column_value(row, i)))
        .collect()
}

fn column_value(row: &SqliteRow, index: usize) -> Value {
    row.try_get_raw(index)
        .ok()
        .and_then(|raw| {
            if raw.is_null() {
                Some(Value::Null)
            } else {
                // Try common types
                row.try_get::<String, _>(index)
                    .ok()
                    .map(Value::String)
                    .or_else(|| row.try_get::<i64, _>(index).ok().map(|v| json!(v)))
                    .or_else(|| row.try_get::<f64, _>(index).ok().map(|v| json!(v)))
            }
        })
        .unwrap_or(Value::Null)
}

/// Fetch the four learning tables and assemble them into a tree
pub async fn fetch_learning_path<S>(source: &S) -> Result<Assembly>
where
    S: RecordSource + ?Sized,
{
    let tracks = source.fetch_all(LearningTable::Tracks).await?;
    let courses = source.fetch_all(LearningTable::Courses).await?;
    let modules = source.fetch_all(LearningTable::Modules).await?;
    let lessons = source.fetch_all(LearningTable::Lessons).await?;

    Ok(assemble_with_stats(&tracks, &courses, &modules, &lessons))
}
