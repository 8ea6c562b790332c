//! Flat-to-tree assembly of the learning path

use std::collections::HashMap;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use tracing::debug;

use super::record::{record_key, LessonAttachment, Record, COURSE_ID, ID, TRACK_ID};

/// Module node: the module row plus its lessons
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleNode {
    pub record: Record,
    pub lessons: Vec<Record>,
}

/// Course node: the course row, its modules and its course-level lessons
#[derive(Debug, Clone, PartialEq)]
pub struct CourseNode {
    pub record: Record,
    pub modules: Vec<ModuleNode>,
    pub course_lessons: Vec<Record>,
}

/// Track node: the track row, its courses and its track-level lessons
#[derive(Debug, Clone, PartialEq)]
pub struct TrackNode {
    pub record: Record,
    pub courses: Vec<CourseNode>,
    pub track_lessons: Vec<Record>,
}

impl ModuleNode {
    pub fn id(&self) -> Option<String> {
        record_key(&self.record, ID)
    }
}

impl CourseNode {
    pub fn id(&self) -> Option<String> {
        record_key(&self.record, ID)
    }

    /// Lessons under this course, both course-level and inside its modules
    pub fn lesson_count(&self) -> usize {
        self.course_lessons.len() + self.modules.iter().map(|m| m.lessons.len()).sum::<usize>()
    }
}

impl TrackNode {
    pub fn id(&self) -> Option<String> {
        record_key(&self.record, ID)
    }

    /// Modules across all courses of this track
    pub fn module_count(&self) -> usize {
        self.courses.iter().map(|c| c.modules.len()).sum()
    }

    /// Lessons placed anywhere beneath this track
    pub fn lesson_count(&self) -> usize {
        self.track_lessons.len() + self.courses.iter().map(CourseNode::lesson_count).sum::<usize>()
    }
}

/// Counts of what one assembly pass placed and dropped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AssemblyStats {
    pub tracks: usize,
    pub courses: usize,
    pub modules: usize,
    pub lessons: usize,
    /// Courses whose track_id matched no track
    pub dropped_courses: usize,
    /// Modules whose course_id matched no placed course
    pub dropped_modules: usize,
    /// Lessons whose parent matched no placed node
    pub dropped_lessons: usize,
    /// Lessons with no usable foreign key at all
    pub unattached_lessons: usize,
}

/// Result of [`assemble_with_stats`]
#[derive(Debug, Clone, PartialEq)]
pub struct Assembly {
    pub tracks: Vec<TrackNode>,
    pub stats: AssemblyStats,
}

/// Children grouped by parent id, in input order
///
/// Entries are taken out as parents claim them, so a parent id that occurs
/// twice only receives its children once. Whatever remains afterwards had no
/// parent.
struct ChildIndex<'a> {
    groups: HashMap<String, Vec<&'a Record>>,
}

impl<'a> ChildIndex<'a> {
    fn new() -> Self {
        Self { groups: HashMap::new() }
    }

    fn by_field(rows: &'a [Record], field: &str) -> (Self, usize) {
        let mut index = Self::new();
        let mut keyless = 0;
        for row in rows {
            match record_key(row, field) {
                Some(parent) => index.push(parent, row),
                None => keyless += 1,
            }
        }
        (index, keyless)
    }

    fn push(&mut self, parent: String, row: &'a Record) {
        self.groups.entry(parent).or_default().push(row);
    }

    fn claim(&mut self, parent: Option<&str>) -> Vec<&'a Record> {
        parent
            .and_then(|id| self.groups.remove(id))
            .unwrap_or_default()
    }

    fn remaining(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}

/// Nest the four flat learning-path collections into one tree per track
///
/// Lessons are placed by [`LessonAttachment::classify`]: module lessons go
/// under their module, course-level lessons under their course's
/// `course_lessons`, track-level lessons under their track's
/// `track_lessons`. Children keep the order of their input collection.
/// Rows whose parent is missing are dropped; this never fails.
///
/// # Examples
///
/// ```
/// use npulse_common::hierarchy::{assemble, Record};
/// use serde_json::json;
///
/// fn rows(v: serde_json::Value) -> Vec<Record> {
///     v.as_array().unwrap().iter().map(|r| r.as_object().unwrap().clone()).collect()
/// }
///
/// let tracks = rows(json!([{"id": "t1", "name": "CS"}]));
/// let courses = rows(json!([{"id": "c1", "track_id": "t1", "name": "Algo"}]));
/// let modules = rows(json!([{"id": "m1", "course_id": "c1", "name": "Sorting"}]));
/// let lessons = rows(json!([
///     {"id": "l1", "module_id": "m1", "name": "Quicksort"},
///     {"id": "l2", "course_id": "c1", "name": "Intro"},
///     {"id": "l3", "track_id": "t1", "name": "Overview"}
/// ]));
///
/// let tree = assemble(&tracks, &courses, &modules, &lessons);
/// assert_eq!(tree.len(), 1);
/// assert_eq!(tree[0].track_lessons[0]["id"], "l3");
/// assert_eq!(tree[0].courses[0].course_lessons[0]["id"], "l2");
/// assert_eq!(tree[0].courses[0].modules[0].lessons[0]["id"], "l1");
/// ```
pub fn assemble(
    tracks: &[Record],
    courses: &[Record],
    modules: &[Record],
    lessons: &[Record],
) -> Vec<TrackNode> {
    assemble_with_stats(tracks, courses, modules, lessons).tracks
}

/// [`assemble`], also reporting how many rows were placed and dropped
pub fn assemble_with_stats(
    tracks: &[Record],
    courses: &[Record],
    modules: &[Record],
    lessons: &[Record],
) -> Assembly {
    let (mut courses_by_track, keyless_courses) = ChildIndex::by_field(courses, TRACK_ID);
    let (mut modules_by_course, keyless_modules) = ChildIndex::by_field(modules, COURSE_ID);

    let mut module_lessons = ChildIndex::new();
    let mut course_lessons = ChildIndex::new();
    let mut track_lessons = ChildIndex::new();
    let mut unattached = 0;

    for lesson in lessons {
        match LessonAttachment::classify(lesson) {
            LessonAttachment::Module(id) => module_lessons.push(id, lesson),
            LessonAttachment::Course(id) => course_lessons.push(id, lesson),
            LessonAttachment::Track(id) => track_lessons.push(id, lesson),
            LessonAttachment::Unattached => unattached += 1,
        }
    }

    let mut stats = AssemblyStats {
        unattached_lessons: unattached,
        ..AssemblyStats::default()
    };

    let nested: Vec<TrackNode> = tracks
        .iter()
        .map(|track| {
            let track_id = record_key(track, ID);

            let courses = courses_by_track
                .claim(track_id.as_deref())
                .into_iter()
                .map(|course| {
                    let course_id = record_key(course, ID);

                    let modules = modules_by_course
                        .claim(course_id.as_deref())
                        .into_iter()
                        .map(|module| {
                            let module_id = record_key(module, ID);
                            let lessons = cloned(module_lessons.claim(module_id.as_deref()));
                            stats.lessons += lessons.len();
                            ModuleNode {
                                record: module.clone(),
                                lessons,
                            }
                        })
                        .collect::<Vec<_>>();
                    stats.modules += modules.len();

                    let own_lessons = cloned(course_lessons.claim(course_id.as_deref()));
                    stats.lessons += own_lessons.len();

                    CourseNode {
                        record: course.clone(),
                        modules,
                        course_lessons: own_lessons,
                    }
                })
                .collect::<Vec<_>>();
            stats.courses += courses.len();

            let own_lessons = cloned(track_lessons.claim(track_id.as_deref()));
            stats.lessons += own_lessons.len();

            TrackNode {
                record: track.clone(),
                courses,
                track_lessons: own_lessons,
            }
        })
        .collect();

    stats.tracks = nested.len();
    stats.dropped_courses = courses_by_track.remaining() + keyless_courses;
    stats.dropped_modules = modules_by_course.remaining() + keyless_modules;
    stats.dropped_lessons =
        module_lessons.remaining() + course_lessons.remaining() + track_lessons.remaining();

    debug!(
        "Assembled learning path: {} tracks, {} courses, {} modules, {} lessons \
         (dropped {} courses, {} modules, {} lessons; {} unattached lessons)",
        stats.tracks,
        stats.courses,
        stats.modules,
        stats.lessons,
        stats.dropped_courses,
        stats.dropped_modules,
        stats.dropped_lessons,
        stats.unattached_lessons
    );

    Assembly {
        tracks: nested,
        stats,
    }
}

fn cloned(rows: Vec<&Record>) -> Vec<Record> {
    rows.into_iter().cloned().collect()
}

/// Write a node's own columns, skipping any that collide with child keys
fn serialize_fields<M: SerializeMap>(
    map: &mut M,
    record: &Record,
    child_keys: &[&str],
) -> Result<(), M::Error> {
    for (key, value) in record {
        if !child_keys.contains(&key.as_str()) {
            map.serialize_entry(key, value)?;
        }
    }
    Ok(())
}

impl Serialize for ModuleNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        serialize_fields(&mut map, &self.record, &["lessons"])?;
        map.serialize_entry("lessons", &self.lessons)?;
        map.end()
    }
}

impl Serialize for CourseNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        serialize_fields(&mut map, &self.record, &["modules", "courseLessons"])?;
        map.serialize_entry("modules", &self.modules)?;
        map.serialize_entry("courseLessons", &self.course_lessons)?;
        map.end()
    }
}

impl Serialize for TrackNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        serialize_fields(&mut map, &self.record, &["courses", "trackLessons"])?;
        map.serialize_entry("courses", &self.courses)?;
        map.serialize_entry("trackLessons", &self.track_lessons)?;
        map.end()
    }
}
