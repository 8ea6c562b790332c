//! Placement tests for the learning-path hierarchy assembler
//!
//! Tests cover:
//! - Single placement per lesson (module > course > track precedence)
//! - Track-level, course-level and module lessons
//! - Dangling foreign keys and orphan rows
//! - Ordering, idempotence and snapshot independence

use npulse_common::hierarchy::{assemble, Record, TrackNode};
use serde_json::{json, Value};

fn rows(value: Value) -> Vec<Record> {
    value
        .as_array()
        .expect("rows must be an array")
        .iter()
        .map(|r| r.as_object().cloned().expect("row must be an object"))
        .collect()
}

fn ids(records: &[Record]) -> Vec<&str> {
    records
        .iter()
        .map(|r| r["id"].as_str().expect("test ids are strings"))
        .collect()
}

fn lesson_id(lesson: &Record) -> String {
    lesson["id"].as_str().unwrap_or_default().to_string()
}

/// Every (level, parent id, lesson id) placement in a tree
fn placements(tree: &[TrackNode]) -> Vec<(&'static str, String, String)> {
    let mut out = Vec::new();
    for track in tree {
        let track_id = track.id().unwrap_or_default();
        for lesson in &track.track_lessons {
            out.push(("track", track_id.clone(), lesson_id(lesson)));
        }
        for course in &track.courses {
            let course_id = course.id().unwrap_or_default();
            for lesson in &course.course_lessons {
                out.push(("course", course_id.clone(), lesson_id(lesson)));
            }
            for module in &course.modules {
                let module_id = module.id().unwrap_or_default();
                for lesson in &module.lessons {
                    out.push(("module", module_id.clone(), lesson_id(lesson)));
                }
            }
        }
    }
    out
}

fn scenario() -> (Vec<Record>, Vec<Record>, Vec<Record>, Vec<Record>) {
    (
        rows(json!([{"id": "t1", "name": "CS"}])),
        rows(json!([{"id": "c1", "track_id": "t1", "name": "Algo"}])),
        rows(json!([{"id": "m1", "course_id": "c1", "name": "Sorting"}])),
        rows(json!([
            {"id": "l1", "module_id": "m1", "name": "Quicksort"},
            {"id": "l2", "course_id": "c1", "name": "Intro"},
            {"id": "l3", "track_id": "t1", "name": "Overview"}
        ])),
    )
}

#[test]
fn test_reference_scenario() {
    let (tracks, courses, modules, lessons) = scenario();
    let tree = assemble(&tracks, &courses, &modules, &lessons);

    assert_eq!(tree.len(), 1);
    let track = &tree[0];
    assert_eq!(track.record["name"], "CS");
    assert_eq!(ids(&track.track_lessons), vec!["l3"]);

    assert_eq!(track.courses.len(), 1);
    let course = &track.courses[0];
    assert_eq!(course.record["name"], "Algo");
    assert_eq!(ids(&course.course_lessons), vec!["l2"]);

    assert_eq!(course.modules.len(), 1);
    let module = &course.modules[0];
    assert_eq!(module.record["name"], "Sorting");
    assert_eq!(ids(&module.lessons), vec!["l1"]);
}

#[test]
fn test_empty_input() {
    let tree = assemble(&[], &[], &[], &[]);
    assert!(tree.is_empty());
}

#[test]
fn test_module_lesson_with_all_keys_placed_once() {
    let (tracks, courses, modules, _) = scenario();
    let lessons = rows(json!([
        {"id": "l1", "module_id": "m1", "course_id": "c1", "track_id": "t1"}
    ]));

    let tree = assemble(&tracks, &courses, &modules, &lessons);
    let placed = placements(&tree);

    assert_eq!(placed, vec![("module", "m1".to_string(), "l1".to_string())]);
}

#[test]
fn test_module_and_track_keys_not_double_counted() {
    let (tracks, courses, modules, _) = scenario();
    let lessons = rows(json!([{"id": "l1", "module_id": "m1", "track_id": "t1"}]));

    let tree = assemble(&tracks, &courses, &modules, &lessons);

    assert!(tree[0].track_lessons.is_empty());
    assert!(tree[0].courses[0].course_lessons.is_empty());
    assert_eq!(ids(&tree[0].courses[0].modules[0].lessons), vec!["l1"]);
}

#[test]
fn test_course_and_track_keys_go_to_course() {
    let (tracks, courses, modules, _) = scenario();
    let lessons = rows(json!([{"id": "l2", "course_id": "c1", "track_id": "t1"}]));

    let tree = assemble(&tracks, &courses, &modules, &lessons);

    assert!(tree[0].track_lessons.is_empty());
    assert_eq!(ids(&tree[0].courses[0].course_lessons), vec!["l2"]);
    assert!(tree[0].courses[0].modules[0].lessons.is_empty());
}

#[test]
fn test_track_only_lesson() {
    let (tracks, courses, modules, _) = scenario();
    let lessons = rows(json!([{"id": "l3", "track_id": "t1", "module_id": null, "course_id": ""}]));

    let tree = assemble(&tracks, &courses, &modules, &lessons);
    let placed = placements(&tree);

    assert_eq!(placed, vec![("track", "t1".to_string(), "l3".to_string())]);
}

#[test]
fn test_module_lesson_with_missing_module_is_dropped_not_promoted() {
    let (tracks, courses, modules, _) = scenario();
    let lessons = rows(json!([{"id": "l9", "module_id": "ghost", "course_id": "c1", "track_id": "t1"}]));

    let tree = assemble(&tracks, &courses, &modules, &lessons);

    assert!(placements(&tree).is_empty());
}

#[test]
fn test_unattached_lesson_omitted() {
    let (tracks, courses, modules, _) = scenario();
    let lessons = rows(json!([{"id": "l0", "name": "Loose"}, {"id": "l00", "module_id": null}]));

    let tree = assemble(&tracks, &courses, &modules, &lessons);

    assert!(placements(&tree).is_empty());
}

#[test]
fn test_orphan_course_excluded() {
    let tracks = rows(json!([{"id": "t1"}, {"id": "t2"}]));
    let courses = rows(json!([
        {"id": "c1", "track_id": "t1"},
        {"id": "c-orphan", "track_id": "nope"}
    ]));
    let modules = rows(json!([{"id": "m-under-orphan", "course_id": "c-orphan"}]));
    let lessons = rows(json!([
        {"id": "l1", "course_id": "c-orphan"},
        {"id": "l2", "module_id": "m-under-orphan"}
    ]));

    let tree = assemble(&tracks, &courses, &modules, &lessons);
    let serialized = serde_json::to_string(&tree).unwrap();

    assert_eq!(ids(&tree.iter().map(|t| t.record.clone()).collect::<Vec<_>>()), vec!["t1", "t2"]);
    assert_eq!(tree[0].courses.len(), 1);
    assert!(tree[1].courses.is_empty());
    assert!(!serialized.contains("c-orphan"));
    assert!(!serialized.contains("m-under-orphan"));
}

#[test]
fn test_children_keep_input_order() {
    let tracks = rows(json!([{"id": "t2"}, {"id": "t1"}]));
    let courses = rows(json!([
        {"id": "c3", "track_id": "t1"},
        {"id": "c1", "track_id": "t1"},
        {"id": "c2", "track_id": "t1"}
    ]));
    let lessons = rows(json!([
        {"id": "z", "track_id": "t1"},
        {"id": "a", "track_id": "t1"},
        {"id": "m", "track_id": "t1"}
    ]));

    let tree = assemble(&tracks, &courses, &[], &lessons);

    assert_eq!(tree[0].record["id"], "t2");
    assert_eq!(tree[1].record["id"], "t1");
    let course_ids: Vec<Record> = tree[1].courses.iter().map(|c| c.record.clone()).collect();
    assert_eq!(ids(&course_ids), vec!["c3", "c1", "c2"]);
    assert_eq!(ids(&tree[1].track_lessons), vec!["z", "a", "m"]);
}

#[test]
fn test_integer_ids_match_integer_foreign_keys() {
    let tracks = rows(json!([{"id": 1, "name": "CS"}]));
    let courses = rows(json!([{"id": 10, "track_id": 1}]));
    let modules = rows(json!([{"id": 100, "course_id": 10}]));
    let lessons = rows(json!([{"id": 1000, "module_id": 100}]));

    let tree = assemble(&tracks, &courses, &modules, &lessons);

    assert_eq!(tree[0].courses[0].modules[0].lessons[0]["id"], 1000);
}

#[test]
fn test_duplicate_parent_ids_claim_children_once() {
    let tracks = rows(json!([{"id": "t1", "name": "first"}, {"id": "t1", "name": "second"}]));
    let lessons = rows(json!([{"id": "l1", "track_id": "t1"}]));

    let tree = assemble(&tracks, &[], &[], &lessons);

    assert_eq!(tree.len(), 2);
    assert_eq!(ids(&tree[0].track_lessons), vec!["l1"]);
    assert!(tree[1].track_lessons.is_empty());
}

#[test]
fn test_track_without_id_has_no_children() {
    let tracks = rows(json!([{"name": "nameless"}]));
    let courses = rows(json!([{"id": "c1"}]));
    let lessons = rows(json!([{"id": "l1"}]));

    let tree = assemble(&tracks, &courses, &[], &lessons);

    assert_eq!(tree.len(), 1);
    assert!(tree[0].courses.is_empty());
    assert!(tree[0].track_lessons.is_empty());
}

#[test]
fn test_idempotent() {
    let (tracks, courses, modules, lessons) = scenario();

    let first = assemble(&tracks, &courses, &modules, &lessons);
    let second = assemble(&tracks, &courses, &modules, &lessons);

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_value(&first).unwrap(),
        serde_json::to_value(&second).unwrap()
    );
}

#[test]
fn test_tree_independent_of_later_input_mutation() {
    let (tracks, courses, modules, mut lessons) = scenario();
    let tree = assemble(&tracks, &courses, &modules, &lessons);

    lessons[0].insert("name".to_string(), json!("Mergesort"));
    lessons.clear();

    assert_eq!(tree[0].courses[0].modules[0].lessons[0]["name"], "Quicksort");
}

#[test]
fn test_every_lesson_placed_at_most_once() {
    let tracks = rows(json!([{"id": "t1"}, {"id": "t2"}]));
    let courses = rows(json!([{"id": "c1", "track_id": "t1"}, {"id": "c2", "track_id": "t2"}]));
    let modules = rows(json!([{"id": "m1", "course_id": "c1"}, {"id": "m2", "course_id": "c2"}]));

    // Every combination of the three foreign keys, each pointing somewhere real
    let mut lesson_values = Vec::new();
    for mask in 0..8u8 {
        let mut lesson = json!({"id": format!("l{}", mask)});
        if mask & 1 != 0 {
            lesson["module_id"] = json!("m2");
        }
        if mask & 2 != 0 {
            lesson["course_id"] = json!("c1");
        }
        if mask & 4 != 0 {
            lesson["track_id"] = json!("t2");
        }
        lesson_values.push(lesson);
    }
    let lessons = rows(Value::Array(lesson_values));

    let tree = assemble(&tracks, &courses, &modules, &lessons);
    let placed = placements(&tree);

    let mut seen: Vec<&String> = placed.iter().map(|(_, _, id)| id).collect();
    let total = seen.len();
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), total, "a lesson was placed twice: {:?}", placed);

    // mask 0 is unattached; the other seven are each placed once
    assert_eq!(total, 7);
    for (level, parent, id) in &placed {
        let mask: u8 = id[1..].parse().unwrap();
        let expected = if mask & 1 != 0 {
            ("module", "m2")
        } else if mask & 2 != 0 {
            ("course", "c1")
        } else {
            ("track", "t2")
        };
        assert_eq!((*level, parent.as_str()), expected, "lesson {}", id);
    }
}
