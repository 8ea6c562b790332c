//! Flat record model and lesson attachment classification

use serde::Serialize;
use serde_json::{Map, Value};

/// One flat row as returned by a table fetch, keyed by column name
pub type Record = Map<String, Value>;

/// Primary key column shared by all four tables
pub const ID: &str = "id";
/// Foreign key from courses and lessons to tracks
pub const TRACK_ID: &str = "track_id";
/// Foreign key from modules and lessons to courses
pub const COURSE_ID: &str = "course_id";
/// Foreign key from lessons to modules
pub const MODULE_ID: &str = "module_id";

/// Read an id-like field from a record
///
/// Returns `Some` for a non-empty string or a number (numbers are keyed by
/// their decimal text so integer and text ids compare alike). Missing, null,
/// empty-string, boolean and compound values are treated as absent.
///
/// # Examples
///
/// ```
/// use npulse_common::hierarchy::record_key;
/// use serde_json::json;
///
/// let row = json!({"id": 7, "track_id": "", "course_id": null, "module_id": "m1"});
/// let row = row.as_object().unwrap();
///
/// assert_eq!(record_key(row, "id").as_deref(), Some("7"));
/// assert_eq!(record_key(row, "track_id"), None);
/// assert_eq!(record_key(row, "course_id"), None);
/// assert_eq!(record_key(row, "module_id").as_deref(), Some("m1"));
/// assert_eq!(record_key(row, "missing"), None);
/// ```
pub fn record_key(record: &Record, field: &str) -> Option<String> {
    match record.get(field)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Where a lesson hangs in the learning-path tree
///
/// A lesson row carries three nullable foreign keys. They are resolved once,
/// by precedence module > course > track, so no lesson can be placed at two
/// levels.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "level", content = "parent_id", rename_all = "snake_case")]
pub enum LessonAttachment {
    /// Under a module's `lessons`
    Module(String),
    /// Directly under a course's `courseLessons`
    Course(String),
    /// Directly under a track's `trackLessons`
    Track(String),
    /// No usable foreign key; never placed
    Unattached,
}

impl LessonAttachment {
    /// Classify a lesson record by its populated foreign key
    ///
    /// # Examples
    ///
    /// ```
    /// use npulse_common::hierarchy::LessonAttachment;
    /// use serde_json::json;
    ///
    /// let lesson = json!({"id": "l1", "module_id": "m1", "track_id": "t1"});
    /// assert_eq!(
    ///     LessonAttachment::classify(lesson.as_object().unwrap()),
    ///     LessonAttachment::Module("m1".to_string())
    /// );
    /// ```
    pub fn classify(lesson: &Record) -> Self {
        if let Some(id) = record_key(lesson, MODULE_ID) {
            Self::Module(id)
        } else if let Some(id) = record_key(lesson, COURSE_ID) {
            Self::Course(id)
        } else if let Some(id) = record_key(lesson, TRACK_ID) {
            Self::Track(id)
        } else {
            Self::Unattached
        }
    }

    /// Parent id, if attached
    pub fn parent_id(&self) -> Option<&str> {
        match self {
            Self::Module(id) | Self::Course(id) | Self::Track(id) => Some(id),
            Self::Unattached => None,
        }
    }

    /// Column name holding the parent id, if attached
    pub fn column(&self) -> Option<&'static str> {
        match self {
            Self::Module(_) => Some(MODULE_ID),
            Self::Course(_) => Some(COURSE_ID),
            Self::Track(_) => Some(TRACK_ID),
            Self::Unattached => None,
        }
    }
}
