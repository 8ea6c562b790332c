//! Learning-path hierarchy assembly
//!
//! The four learning-path tables (tracks, courses, modules, lessons) are
//! fetched flat. This module nests them into one tree per track:
//!
//! ```text
//! Track
//! ├── courses: Course
//! │   ├── modules: Module
//! │   │   └── lessons: Lesson      (module_id set)
//! │   └── courseLessons: Lesson    (course_id set, no module_id)
//! └── trackLessons: Lesson         (track_id set, no module_id or course_id)
//! ```
//!
//! Every consumer (public learning-path route, admin summary) goes through
//! [`assemble`] so the placement rules live in exactly one place.

mod assemble;
mod record;

pub use assemble::{assemble, assemble_with_stats, Assembly, AssemblyStats, CourseNode, ModuleNode, TrackNode};
pub use record::{record_key, LessonAttachment, Record, COURSE_ID, ID, MODULE_ID, TRACK_ID};
