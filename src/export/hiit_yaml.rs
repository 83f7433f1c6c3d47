// ABOUTME: HIIT planner YAML dialect: flat lap steps, optionally wrapped in repeatUntilTime
// ABOUTME: HIIT detection, time cap extraction and per-exercise lap notes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::LazyLock;

use pierre_core::constants::units::SECONDS_PER_MINUTE;
use pierre_core::errors::AppResult;
use pierre_core::models::{Block, Exercise, Workout};
use pierre_intelligence::normalize;
use regex::Regex;
use serde_yaml::{Mapping, Value};
use tracing::debug;

use super::fit::categories::category_for;
use super::planner_yaml::{format_meters, planner_document, step_key};
use super::ExportOptions;

static CAP_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)cap:\s*(\d+)\s*(?:min|minute|m)").ok());
static REPS_IN_NAME: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)\b\d+\s+reps?\b").ok());
static DISTANCE_IN_NAME: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)\b\d+\s*m\b").ok());

fn matches(pattern: &LazyLock<Option<Regex>>, text: &str) -> bool {
    pattern.as_ref().is_some_and(|regex| regex.is_match(text))
}

/// Whether a workout belongs in the HIIT dialect
#[must_use]
pub fn is_hiit(workout: &Workout) -> bool {
    workout.is_hiit()
}

/// Time cap a block declares: explicit cap, work interval, then `cap: N min` in its structure
#[must_use]
pub fn block_time_cap(block: &Block) -> Option<u32> {
    block
        .time_cap_seconds()
        .or_else(|| block.work_seconds())
        .filter(|secs| *secs > 0)
        .or_else(|| {
            let structure = block.structure()?;
            let minutes: u32 = CAP_PATTERN
                .as_ref()?
                .captures(structure)?
                .get(1)?
                .as_str()
                .parse()
                .ok()?;
            minutes.checked_mul(SECONDS_PER_MINUTE)
        })
}

/// `repeatUntilTime` key: whole minutes under an hour, raw seconds otherwise
#[must_use]
pub fn repeat_until_key(cap_seconds: u32) -> String {
    let minutes = cap_seconds / SECONDS_PER_MINUTE;
    if minutes < 60 {
        format!("repeatUntilTime({minutes}min)")
    } else {
        format!("repeatUntilTime({cap_seconds})")
    }
}

fn is_run(exercise: &Exercise) -> bool {
    normalize(exercise.display_name())
        .split_whitespace()
        .any(|token| token == "run" || token == "running")
}

fn lap_notes(exercise: &Exercise) -> String {
    let clean = exercise.display_name().trim();
    let mut parts = Vec::new();

    if let Some(distance) = exercise.distance() {
        if !matches(&DISTANCE_IN_NAME, clean) {
            parts.push(format_meters(distance.meters()));
        }
    }
    if let Some(reps) = exercise.reps() {
        let count = reps.to_string();
        let leading = clean.starts_with(&format!("{count} "));
        if !matches(&REPS_IN_NAME, clean) && !leading {
            parts.push(format!("{count} reps"));
        }
    }
    if let Some(secs) = exercise.duration_seconds() {
        parts.push(format!("{secs}s"));
    }

    if parts.is_empty() {
        format!("lap | {clean}")
    } else {
        format!("lap | {clean} ({})", parts.join(", "))
    }
}

fn exercise_step(exercise: &Exercise) -> Value {
    let (key, value) = match exercise.distance() {
        Some(distance) if is_run(exercise) => (
            "run".to_owned(),
            format!("lap | {}", format_meters(distance.meters())),
        ),
        _ => (
            step_key(exercise.preferred_name(), category_for(exercise)),
            lap_notes(exercise),
        ),
    };
    let mut mapping = Mapping::new();
    mapping.insert(Value::String(key), Value::String(value));
    Value::Mapping(mapping)
}

/// Render `workout` in the HIIT dialect
///
/// Every exercise of every block becomes one lap step in order. When any block
/// declares a time cap the whole sequence is wrapped in a single
/// `repeatUntilTime`; the last declared cap wins.
///
/// # Errors
///
/// Returns `SerializationError` if YAML rendering fails
pub fn encode(workout: &Workout, options: &ExportOptions) -> AppResult<String> {
    let steps: Vec<Value> = workout.all_exercises().map(exercise_step).collect();
    let cap = workout.blocks().iter().rev().find_map(block_time_cap);
    debug!(steps = steps.len(), cap, "Planned HIIT YAML steps");

    let steps = match cap {
        Some(cap) if !steps.is_empty() => {
            let mut wrapper = Mapping::new();
            wrapper.insert(Value::String(repeat_until_key(cap)), Value::Sequence(steps));
            vec![Value::Mapping(wrapper)]
        }
        _ => steps,
    };
    let doc = planner_document(workout.title(), "hiit", steps, options);
    Ok(serde_yaml::to_string(&doc)?)
}

#[cfg(test)]
mod tests {
    use pierre_core::models::{BlockBuilder, BlockType, ExerciseBuilder};

    use super::*;

    #[test]
    fn test_repeat_until_key_rounds_to_minutes() {
        assert_eq!(repeat_until_key(35 * 60), "repeatUntilTime(35min)");
        assert_eq!(repeat_until_key(90), "repeatUntilTime(1min)");
        assert_eq!(repeat_until_key(3600), "repeatUntilTime(3600)");
    }

    #[test]
    fn test_cap_from_structure_text() {
        let block = BlockBuilder::new(BlockType::TimedRound)
            .structure_opt(Some("for time (cap: 35 min)".to_owned()))
            .exercise(ExerciseBuilder::new("Burpees").reps(50).build().unwrap())
            .build()
            .unwrap();
        assert_eq!(block_time_cap(&block), Some(2100));
    }

    #[test]
    fn test_oversized_cap_is_ignored() {
        let block = BlockBuilder::new(BlockType::TimedRound)
            .structure_opt(Some("for time (cap: 99999999 min)".to_owned()))
            .exercise(ExerciseBuilder::new("Burpees").reps(50).build().unwrap())
            .build()
            .unwrap();
        assert_eq!(block_time_cap(&block), None);
    }
}
