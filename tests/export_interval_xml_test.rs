// ABOUTME: Integration tests for the interval-training XML encoder
// ABOUTME: IntervalsT folding, FreeRide rep steps, pace estimates, escaping, well-formedness and unroll bounds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::collections::HashMap;

use pierre_core::errors::ErrorCode;
use pierre_core::models::{
    Block, BlockBuilder, BlockType, Distance, DistanceUnit, ExerciseBuilder, WorkoutBuilder,
};
use pierre_workout_mapper::export::interval_xml::{
    encode, IntervalSport, PowerTarget, MAX_INTERVAL_NODES,
};
use pierre_workout_mapper::export::ExportOptions;
use quick_xml::events::Event;
use quick_xml::Reader;

/// Read the document back, failing on any malformed or unbalanced markup
fn element_counts(xml: &str) -> HashMap<String, usize> {
    let mut reader = Reader::from_str(xml);
    let mut counts = HashMap::new();
    let mut depth = 0_usize;
    loop {
        let tag = match reader.read_event().unwrap() {
            Event::Start(start) => {
                depth += 1;
                String::from_utf8(start.name().as_ref().to_vec()).unwrap()
            }
            Event::Empty(empty) => String::from_utf8(empty.name().as_ref().to_vec()).unwrap(),
            Event::End(_) => {
                depth -= 1;
                continue;
            }
            Event::Eof => break,
            _ => continue,
        };
        *counts.entry(tag).or_insert(0) += 1;
    }
    assert_eq!(depth, 0);
    counts
}

fn squat_sets(sets: u32) -> Block {
    let squat = ExerciseBuilder::new("Squat")
        .sets(sets)
        .reps(5)
        .build()
        .unwrap();
    BlockBuilder::new(BlockType::Straight)
        .exercise(squat)
        .build()
        .unwrap()
}

fn interval_block(name: &str) -> Block {
    let sprint = ExerciseBuilder::new(name)
        .sets(8)
        .duration_seconds(30)
        .rest_seconds(15)
        .build()
        .unwrap();
    BlockBuilder::new(BlockType::TimedRound)
        .exercise(sprint)
        .build()
        .unwrap()
}

#[test]
fn test_work_rest_repeat_folds_into_intervals_t() {
    common::init_test_logging();
    let workout = common::workout_with("Track Night", interval_block("Sprint"));
    let xml = encode(&workout, &ExportOptions::default()).unwrap();

    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(xml.contains("<sportType>run</sportType>"));
    assert!(xml.contains(
        r#"<IntervalsT Repeat="8" OnDuration="30" OffDuration="15" OnPower="0.75" OffPower="0.50">"#
    ));
    assert!(xml.contains(r#"message="Sprint""#));
    assert_eq!(xml.matches("<IntervalsT").count(), 1);
}

#[test]
fn test_ftp_text_sets_power_and_bike_sport() {
    let workout = common::workout_with("Threshold", interval_block("Hard @ 110% FTP"));
    let xml = encode(&workout, &ExportOptions::default()).unwrap();
    assert!(xml.contains("<sportType>bike</sportType>"));
    assert!(xml.contains(r#"OnPower="1.10""#));
}

#[test]
fn test_rep_steps_become_free_rides() {
    let block = BlockBuilder::new(BlockType::Straight)
        .exercise(common::reps_exercise("Air Squat", 20))
        .build()
        .unwrap();
    let xml = encode(&common::workout_with("Legs", block), &ExportOptions::default()).unwrap();
    assert!(xml.contains(r#"<FreeRide Duration="60">"#));
    assert!(xml.contains(r#"message="20 x Air Squat""#));
}

#[test]
fn test_other_repeats_are_unrolled() {
    let xml = encode(&common::superset_workout(), &ExportOptions::default()).unwrap();
    assert_eq!(xml.matches("<FreeRide").count(), 6);
    assert_eq!(xml.matches(r#"<SteadyState Duration="30" Power="0.50"/>"#).count(), 3);
    assert!(!xml.contains("IntervalsT"));
}

#[test]
fn test_distance_uses_pace_estimate() {
    let run = ExerciseBuilder::new("Tempo Run")
        .distance(Distance::new(400.0, DistanceUnit::Meters).unwrap())
        .build()
        .unwrap();
    let block = BlockBuilder::new(BlockType::Straight)
        .exercise(run)
        .build()
        .unwrap();
    let workout = common::workout_with("Repeats", block);

    let xml = encode(&workout, &ExportOptions::default()).unwrap();
    assert!(xml.contains(r#"<SteadyState Duration="120" Power="0.75">"#));

    let options = ExportOptions {
        interval_sport: Some(IntervalSport::Bike),
        ..ExportOptions::default()
    };
    let bike = encode(&workout, &options).unwrap();
    assert!(bike.contains(r#"<SteadyState Duration="48" Power="0.75">"#));
}

#[test]
fn test_header_text_is_escaped_and_tags_listed() {
    let block = BlockBuilder::new(BlockType::Straight)
        .exercise(common::timed_exercise("Easy Spin", 600))
        .build()
        .unwrap();
    let workout = WorkoutBuilder::new("Push & Pull <A>")
        .tags(["Z2", "Recovery"])
        .block(block)
        .build()
        .unwrap();
    let xml = encode(&workout, &ExportOptions::default()).unwrap();

    assert!(xml.contains("<name>Push &amp; Pull &lt;A&gt;</name>"));
    assert!(xml.contains("<author>Pierre Workout Mapper</author>"));
    assert!(xml.contains(r#"<tag name="z2"/>"#));
    assert!(!xml.contains("<tags/>"));
}

#[test]
fn test_untagged_workout_has_empty_tags_node() {
    let xml = encode(&common::superset_workout(), &ExportOptions::default()).unwrap();
    assert!(xml.contains("<tags/>"));
    assert!(xml.trim_end().ends_with("</workout_file>"));
}

#[test]
fn test_power_range_parsing() {
    let range = PowerTarget::parse("Sweet spot 88-94% FTP").unwrap();
    assert!((range.mid() - 0.91).abs() < 1e-9);
}

#[test]
fn test_document_reads_back_as_well_formed_xml() {
    let xml = encode(&common::superset_workout(), &ExportOptions::default()).unwrap();
    let counts = element_counts(&xml);

    assert_eq!(counts["workout_file"], 1);
    assert_eq!(counts["workout"], 1);
    assert_eq!(counts["tags"], 1);
    assert_eq!(counts["FreeRide"], 6);
    assert_eq!(counts["textevent"], 6);
    assert_eq!(counts["SteadyState"], 3);
}

#[test]
fn test_escaped_header_reads_back_verbatim() {
    let block = BlockBuilder::new(BlockType::Straight)
        .exercise(common::reps_exercise("Curl \"21s\" & <Drop>", 21))
        .build()
        .unwrap();
    let workout = WorkoutBuilder::new("Push & Pull <A>")
        .block(block)
        .build()
        .unwrap();
    let xml = encode(&workout, &ExportOptions::default()).unwrap();

    let mut reader = Reader::from_str(&xml);
    let mut texts = Vec::new();
    let mut messages = Vec::new();
    loop {
        match reader.read_event().unwrap() {
            Event::Text(text) => texts.push(text.unescape().unwrap().into_owned()),
            Event::Empty(empty) if empty.name().as_ref() == b"textevent" => {
                let message = empty.try_get_attribute("message").unwrap().unwrap();
                messages.push(message.unescape_value().unwrap().into_owned());
            }
            Event::Eof => break,
            _ => {}
        }
    }
    assert!(texts.iter().any(|text| text == "Push & Pull <A>"));
    assert_eq!(messages, vec!["21 x Curl \"21s\" & <Drop>".to_owned()]);
}

#[test]
fn test_unrolled_repeats_are_bounded() {
    let at_limit = common::workout_with("Volume", squat_sets(10_000));
    let xml = encode(&at_limit, &ExportOptions::default()).unwrap();
    assert_eq!(element_counts(&xml)["FreeRide"], MAX_INTERVAL_NODES);

    let oversized = common::workout_with("Volume", squat_sets(100_000));
    let err = encode(&oversized, &ExportOptions::default()).unwrap_err();
    assert_eq!(err.code, ErrorCode::EncodeFailed);
}
