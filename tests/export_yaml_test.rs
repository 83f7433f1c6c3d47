// ABOUTME: Integration tests for the planner and HIIT YAML dialects
// ABOUTME: Parses the rendered documents back to check steps, repeats, caps, routing and schedules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use pierre_core::models::{
    BlockBuilder, BlockType, ExerciseBuilder, RestMode, Workout, WorkoutBuilder, WorkoutSettings,
};
use pierre_workout_mapper::export::{export, hiit_yaml, planner_yaml, ExportFormat};
use serde_yaml::Value;

fn parse(yaml: &str) -> Value {
    serde_yaml::from_str(yaml).unwrap()
}

fn steps<'a>(doc: &'a Value, title: &str) -> &'a Vec<Value> {
    doc["workouts"][title]["steps"].as_sequence().unwrap()
}

fn rest_gated_workout(rest_mode: RestMode) -> Workout {
    let squat = ExerciseBuilder::new("Back Squat")
        .sets(3)
        .reps(8)
        .build()
        .unwrap();
    let press = ExerciseBuilder::new("Overhead Press")
        .sets(2)
        .reps(10)
        .rest_seconds(60)
        .build()
        .unwrap();
    let block = BlockBuilder::new(BlockType::Straight)
        .rounds(3)
        .exercise(squat)
        .exercise(press)
        .build()
        .unwrap();
    WorkoutBuilder::new("Strength Day")
        .settings(WorkoutSettings {
            rest_mode,
            default_rest_seconds: Some(90),
            warmup_seconds: None,
        })
        .block(block)
        .build()
        .unwrap()
}

fn rest_values(steps: &[Value]) -> Vec<&str> {
    steps
        .iter()
        .flat_map(|step| only_entry(step).1.as_sequence().unwrap())
        .filter_map(|step| {
            let (key, value) = only_entry(step);
            (key == "rest").then(|| value.as_str().unwrap())
        })
        .collect()
}

fn only_entry(step: &Value) -> (&str, &Value) {
    let mapping = step.as_mapping().unwrap();
    assert_eq!(mapping.len(), 1);
    let (key, value) = mapping.iter().next().unwrap();
    (key.as_str().unwrap(), value)
}

#[test]
fn test_planner_superset_repeat_with_pass_rest() {
    common::init_test_logging();
    let yaml = planner_yaml::encode(&common::superset_workout(), &common::fixed_options()).unwrap();
    let doc = parse(&yaml);

    assert_eq!(doc["settings"]["deleteSameNameWorkout"], Value::Bool(true));
    assert_eq!(doc["workouts"]["Push Pull"]["sport"].as_str(), Some("strength"));

    let top = steps(&doc, "Push Pull");
    assert_eq!(top.len(), 1);
    let (key, inner) = only_entry(&top[0]);
    assert_eq!(key, "repeat(3)");

    let inner = inner.as_sequence().unwrap();
    let entries: Vec<(&str, &str)> = inner
        .iter()
        .map(|step| {
            let (key, value) = only_entry(step);
            (key, value.as_str().unwrap())
        })
        .collect();
    assert_eq!(
        entries,
        [
            ("Bench Press [category: BENCH_PRESS]", "8 reps"),
            ("Barbell Row [category: ROW]", "8 reps"),
            ("rest", "30s"),
        ]
    );
}

#[test]
fn test_planner_schedule_uses_fixed_start() {
    let yaml = planner_yaml::encode(&common::superset_workout(), &common::fixed_options()).unwrap();
    let doc = parse(&yaml);
    assert_eq!(doc["schedulePlan"]["start_from"].as_str(), Some("2025-11-05"));
    assert_eq!(
        doc["schedulePlan"]["workouts"][0].as_str(),
        Some("Push Pull")
    );
}

#[test]
fn test_planner_unknown_category_has_no_suffix() {
    let block = BlockBuilder::new(BlockType::Straight)
        .exercise(common::reps_exercise("Throwdown", 4))
        .build()
        .unwrap();
    let workout = common::workout_with("Odd", block);
    let doc = parse(&planner_yaml::encode(&workout, &common::fixed_options()).unwrap());
    let (key, value) = only_entry(&steps(&doc, "Odd")[0]);
    assert_eq!(key, "Throwdown");
    assert_eq!(value.as_str(), Some("4 reps"));
}

#[test]
fn test_hiit_cap_wraps_every_lap() {
    let yaml = hiit_yaml::encode(&common::for_time_workout(), &common::fixed_options()).unwrap();
    let doc = parse(&yaml);
    assert_eq!(doc["workouts"]["Chipper"]["sport"].as_str(), Some("hiit"));

    let top = steps(&doc, "Chipper");
    assert_eq!(top.len(), 1);
    let (key, laps) = only_entry(&top[0]);
    assert_eq!(key, "repeatUntilTime(35min)");

    let notes: Vec<&str> = laps
        .as_sequence()
        .unwrap()
        .iter()
        .map(|lap| only_entry(lap).1.as_str().unwrap())
        .collect();
    assert_eq!(notes, ["lap | Wall Ball (50 reps)", "lap | Burpees (30 reps)"]);
}

#[test]
fn test_hiit_without_cap_is_flat() {
    let block = BlockBuilder::new(BlockType::TimedRound)
        .structure_opt(Some("AMRAP".to_owned()))
        .exercise(common::reps_exercise("Thruster", 10))
        .exercise(common::timed_exercise("Row", 60))
        .build()
        .unwrap();
    let workout = common::workout_with("Open Ended", block);
    let doc = parse(&hiit_yaml::encode(&workout, &common::fixed_options()).unwrap());
    let top = steps(&doc, "Open Ended");
    assert_eq!(top.len(), 2);
    assert_eq!(only_entry(&top[1]).1.as_str(), Some("lap | Row (60s)"));
}

#[test]
fn test_planner_request_for_hiit_is_routed() {
    let output = export(
        &common::for_time_workout(),
        ExportFormat::PlannerYaml,
        &common::fixed_options(),
    )
    .unwrap();
    assert_eq!(output.format, ExportFormat::HiitYaml);
    assert_eq!(output.file_extension, "yaml");
    assert_eq!(output.warnings.len(), 1);
    assert!(output.warnings[0].contains("Chipper"));
    assert!(output
        .body
        .as_text()
        .unwrap()
        .contains("repeatUntilTime(35min)"));
}

#[test]
fn test_strength_workout_is_not_routed() {
    let output = export(
        &common::superset_workout(),
        ExportFormat::PlannerYaml,
        &common::fixed_options(),
    )
    .unwrap();
    assert_eq!(output.format, ExportFormat::PlannerYaml);
    assert!(output.warnings.is_empty());
    assert_eq!(output.content_type, "application/x-yaml");
}

#[test]
fn test_format_names_and_aliases() {
    assert_eq!(ExportFormat::parse("ZWO").unwrap(), ExportFormat::IntervalXml);
    assert_eq!(ExportFormat::parse(" garmin ").unwrap(), ExportFormat::PlannerYaml);
    let err = ExportFormat::parse("tcx").unwrap_err();
    assert!(err.message.contains("planner-yaml"));
}

#[test]
fn test_planner_straight_sets_repeat_once() {
    let yaml =
        planner_yaml::encode(&rest_gated_workout(RestMode::Timed), &common::fixed_options())
            .unwrap();
    let doc = parse(&yaml);
    let top = steps(&doc, "Strength Day");

    let keys: Vec<&str> = top.iter().map(|step| only_entry(step).0).collect();
    assert_eq!(keys, ["repeat(3)", "repeat(2)"]);
    let (_, squat_set) = only_entry(&top[0]);
    let squat_set = squat_set.as_sequence().unwrap();
    assert_eq!(squat_set.len(), 2);
    assert!(!only_entry(&squat_set[0]).0.starts_with("repeat"));
    assert_eq!(only_entry(&squat_set[0]).1.as_str(), Some("8 reps"));
}

#[test]
fn test_planner_rest_mode_gates_default_rest_only() {
    let timed =
        planner_yaml::encode(&rest_gated_workout(RestMode::Timed), &common::fixed_options())
            .unwrap();
    let timed = parse(&timed);
    assert_eq!(rest_values(steps(&timed, "Strength Day")), ["90s", "60s"]);

    let button =
        planner_yaml::encode(&rest_gated_workout(RestMode::Button), &common::fixed_options())
            .unwrap();
    let button = parse(&button);
    assert_eq!(rest_values(steps(&button, "Strength Day")), ["60s"]);
}
