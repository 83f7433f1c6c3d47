// ABOUTME: Shared test utilities and workout fixtures for integration tests
// ABOUTME: Provides quiet logging setup plus builders for the workouts the tests reuse
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `pierre_workout_mapper`

use std::sync::Once;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use pierre_core::models::{
    Block, BlockBuilder, BlockType, Exercise, ExerciseBuilder, Workout, WorkoutBuilder,
};
use pierre_workout_mapper::export::ExportOptions;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Exercise with reps and nothing else
pub fn reps_exercise(name: &str, reps: u32) -> Exercise {
    ExerciseBuilder::new(name).reps(reps).build().unwrap()
}

/// Exercise with a timed target
pub fn timed_exercise(name: &str, seconds: u32) -> Exercise {
    ExerciseBuilder::new(name)
        .duration_seconds(seconds)
        .build()
        .unwrap()
}

/// Single-block workout
pub fn workout_with(title: &str, block: Block) -> Workout {
    WorkoutBuilder::new(title).block(block).build().unwrap()
}

/// Two exercises, three rounds, 30s rest after each pass
pub fn superset_workout() -> Workout {
    let block = BlockBuilder::new(BlockType::Superset)
        .label("A")
        .rounds(3)
        .rest_between_seconds(30)
        .exercise(reps_exercise("A1: Bench Press", 8))
        .exercise(reps_exercise("A2: Barbell Row", 8))
        .build()
        .unwrap();
    workout_with("Push Pull", block)
}

/// For-time block with a 35 minute cap in its structure text
pub fn for_time_workout() -> Workout {
    let block = BlockBuilder::new(BlockType::TimedRound)
        .structure_opt(Some("for time (cap: 35 min)".to_owned()))
        .exercise(reps_exercise("Wall Ball", 50))
        .exercise(reps_exercise("Burpees", 30))
        .build()
        .unwrap();
    workout_with("Chipper", block)
}

/// Fixed date used wherever output embeds a schedule
pub fn fixed_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 11, 5).unwrap()
}

/// Fixed creation instant for reproducible binary output
pub fn fixed_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 11, 5, 7, 30, 0).unwrap()
}

/// Options with the fixed schedule date and creation time
pub fn fixed_options() -> ExportOptions {
    ExportOptions::default()
        .with_schedule_start(fixed_date())
        .with_created_at(fixed_instant())
}
