// ABOUTME: Integration tests for converting raw workout JSON into the canonical model
// ABOUTME: Covers structured blocks, flat lists, rep field parsing and field-named validation errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use pierre_core::errors::ErrorCode;
use pierre_core::models::{BlockType, MassUnit, Reps, RestMode, WorkoutSource};
use pierre_workout_mapper::ingest::{parse_structure, to_canonical_json, to_canonical_value};
use serde_json::json;

#[test]
fn test_structured_blocks_map_keywords() {
    common::init_test_logging();
    let workout = to_canonical_json(
        r#"{
            "title": "Upper",
            "blocks": [
                {"label": "A", "structure": "superset", "rounds": 4,
                 "rest_between_sec": 60,
                 "exercises": [{"name": "Bench Press", "reps": 8}, {"name": "Row", "reps": 10}]},
                {"structure": "3 rounds",
                 "exercises": [{"name": "Curl", "sets": 3, "reps": 12}]},
                {"structure": "giant set",
                 "exercises": [{"name": "Dip", "sets": 2}, {"name": "Push Up"}, {"name": "Plank"}]},
                {"structure": "something odd",
                 "exercises": [{"name": "Squat"}]}
            ]
        }"#,
    )
    .unwrap();

    let blocks = workout.blocks();
    assert_eq!(blocks.len(), 4);

    assert_eq!(blocks[0].block_type(), BlockType::Superset);
    assert_eq!(blocks[0].rounds(), 4);
    assert_eq!(blocks[0].rest_between_seconds(), Some(60));
    assert_eq!(blocks[0].label(), Some("A"));

    assert_eq!(blocks[1].block_type(), BlockType::Straight);
    assert_eq!(blocks[1].rounds(), 3);

    assert_eq!(blocks[2].block_type(), BlockType::Circuit);
    assert_eq!(blocks[2].rounds(), 2);

    assert_eq!(blocks[3].block_type(), BlockType::Straight);
    assert_eq!(blocks[3].rounds(), 1);
}

#[test]
fn test_timed_markers_anywhere_make_timed_rounds() {
    for text in ["AMRAP 12", "EMOM 10 min", "21-15-9 for time", "Tabata", "timed round"] {
        assert_eq!(
            parse_structure(Some(text)).block_type,
            BlockType::TimedRound,
            "{text}"
        );
    }
    assert_eq!(parse_structure(None).block_type, BlockType::Straight);
}

#[test]
fn test_flat_list_superset_scenario() {
    let workout = to_canonical_json(
        r#"{"exercises":[{"name":"A1: Bench Press","sets":3,"reps":8},{"name":"A2: Row","sets":3,"reps":8}]}"#,
    )
    .unwrap();

    assert_eq!(workout.title(), "Imported Workout");
    assert_eq!(workout.blocks().len(), 1);
    let block = &workout.blocks()[0];
    assert_eq!(block.block_type(), BlockType::Superset);
    assert_eq!(block.rounds(), 3);
    let names: Vec<&str> = block.exercises().iter().map(|e| e.name()).collect();
    assert_eq!(names, ["Bench Press", "Row"]);
}

#[test]
fn test_rep_field_variants() {
    let workout = to_canonical_value(json!({
        "exercises": [
            {"name": "Plank", "reps": "60s"},
            {"name": "Row Erg", "reps": "500m"},
            {"name": "Clean", "reps": "3+1"},
            {"name": "Pull Up", "reps": "AMRAP"},
            {"name": "Bike", "reps": "2 min"},
            {"name": "Squat", "reps": 5, "weight": 100, "weight_unit": "kg"},
            {"name": "Lunge", "reps": "12", "weight": 40}
        ]
    }))
    .unwrap();

    let exercises: Vec<_> = workout.all_exercises().collect();
    assert_eq!(exercises[0].duration_seconds(), Some(60));
    assert!(exercises[0].reps().is_none());
    assert_eq!(exercises[1].reps(), Some(&Reps::Text("500m".to_owned())));
    assert_eq!(exercises[2].reps(), Some(&Reps::Text("3+1".to_owned())));
    assert_eq!(exercises[3].reps(), Some(&Reps::Text("AMRAP".to_owned())));
    assert_eq!(exercises[4].duration_seconds(), Some(120));
    assert_eq!(exercises[5].reps(), Some(&Reps::Count(5)));
    assert_eq!(exercises[5].load().unwrap().unit(), MassUnit::Kg);
    assert_eq!(exercises[6].reps(), Some(&Reps::Count(12)));
    assert_eq!(exercises[6].load().unwrap().unit(), MassUnit::Lb);
}

#[test]
fn test_settings_and_metadata() {
    let workout = to_canonical_value(json!({
        "title": "  Legs  ",
        "tags": ["Strength", "strength", " Legs "],
        "source": "ocr",
        "platform": "instagram",
        "settings": {"defaultRestSec": 90, "defaultRestType": "button", "warmupSec": 300},
        "exercises": [{"name": "Squat", "sets": 5, "reps": 5}]
    }))
    .unwrap();

    assert_eq!(workout.title(), "Legs");
    assert_eq!(workout.tags(), ["strength", "legs"]);
    assert_eq!(workout.metadata().sources, vec![WorkoutSource::Ocr]);
    assert_eq!(workout.metadata().platform.as_deref(), Some("instagram"));
    assert_eq!(workout.settings().rest_mode, RestMode::Button);
    assert_eq!(workout.settings().default_rest_seconds, Some(90));
    assert_eq!(workout.settings().effective_default_rest(), None);
    assert_eq!(workout.settings().warmup_seconds, Some(300));
}

#[test]
fn test_missing_blocks_and_exercises() {
    let err = to_canonical_json(r#"{"title": "Nothing"}"#).unwrap_err();
    assert_eq!(err.code, ErrorCode::MissingRequiredField);
    assert_eq!(err.field.as_deref(), Some("blocks"));
}

#[test]
fn test_empty_block_names_its_exercises() {
    let err = to_canonical_json(
        r#"{"blocks": [{"exercises": [{"name": "Squat"}]}, {"structure": "circuit", "exercises": []}]}"#,
    )
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
    assert_eq!(err.field.as_deref(), Some("blocks[1].exercises"));
}

#[test]
fn test_empty_flat_list() {
    let err = to_canonical_json(r#"{"exercises": []}"#).unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
    assert_eq!(err.field.as_deref(), Some("exercises"));
}

#[test]
fn test_blank_exercise_name() {
    let err = to_canonical_json(
        r#"{"blocks": [{"exercises": [{"name": "Squat"}, {"name": "   ", "reps": 5}]}]}"#,
    )
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::MissingRequiredField);
    assert_eq!(err.field.as_deref(), Some("blocks[0].exercises[1].name"));
}

#[test]
fn test_oversized_load_is_out_of_range() {
    let err = to_canonical_json(r#"{"exercises": [{"name": "Squat", "weight": 5000}]}"#)
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValueOutOfRange);
}

#[test]
fn test_numeric_reps_beyond_u32_are_out_of_range() {
    let err = to_canonical_value(json!({"exercises": [{"name": "Squat", "reps": 5e9}]}))
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValueOutOfRange);

    let workout =
        to_canonical_value(json!({"exercises": [{"name": "Squat", "reps": 4_294_967_295_u64}]}))
            .unwrap();
    let squat = workout.all_exercises().next().unwrap();
    assert_eq!(squat.reps(), Some(&Reps::Count(u32::MAX)));
}

#[test]
fn test_malformed_json() {
    assert!(to_canonical_json("{not json").is_err());
}
