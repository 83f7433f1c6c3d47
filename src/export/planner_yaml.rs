// ABOUTME: GPS-watch planner YAML dialect built from the shared step plan
// ABOUTME: Settings, one strength workout with category-tagged steps, and a schedule plan
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Planner YAML
//!
//! ```yaml
//! settings:
//!   deleteSameNameWorkout: true
//! workouts:
//!   Push Day:
//!     sport: strength
//!     steps:
//!     - repeat(3):
//!       - Bench Press [category: BENCH_PRESS]: 8 reps
//!       - rest: 90s
//! schedulePlan:
//!   start_from: '2025-11-05'
//!   workouts:
//!   - Push Day
//! ```

use pierre_core::errors::AppResult;
use pierre_core::models::Workout;
use serde_yaml::{Mapping, Value};
use tracing::debug;

use super::fit::categories::{category_for, ExerciseCategory};
use super::plan::{ExerciseStep, PlannedStep, StepTarget, WorkoutPlan};
use super::ExportOptions;

/// Step key naming the exercise and, when known, its category
#[must_use]
pub fn step_key(name: &str, category: ExerciseCategory) -> String {
    if category.is_unknown() {
        name.to_owned()
    } else {
        format!("{name} [category: {}]", category.label())
    }
}

/// Whole meters when the distance is integral, else one decimal
#[must_use]
pub fn format_meters(meters: f64) -> String {
    if meters.fract().abs() < f64::EPSILON {
        format!("{}m", meters as u64)
    } else {
        format!("{meters:.1}m")
    }
}

fn seconds(value: u32) -> String {
    format!("{value}s")
}

fn target_value(target: &StepTarget) -> String {
    match target {
        StepTarget::Duration(secs) => seconds(*secs),
        StepTarget::Distance(distance) => format_meters(distance.meters()),
        StepTarget::Reps(count) => format!("{count} reps"),
        StepTarget::Open => "lap".to_owned(),
    }
}

fn single(key: impl Into<String>, value: Value) -> Value {
    let mut mapping = Mapping::new();
    mapping.insert(Value::String(key.into()), value);
    Value::Mapping(mapping)
}

fn exercise_entry(step: &ExerciseStep) -> Value {
    let key = step_key(step.structured_name(), category_for(&step.exercise));
    single(key, Value::String(target_value(&step.target)))
}

fn step_value(step: &PlannedStep) -> Value {
    match step {
        PlannedStep::Exercise(exercise) => exercise_entry(exercise),
        PlannedStep::Work { seconds: secs, exercise } => single(
            step_key(exercise.preferred_name(), category_for(exercise)),
            Value::String(seconds(*secs)),
        ),
        PlannedStep::Rest { seconds: secs } => single("rest", Value::String(seconds(*secs))),
        PlannedStep::Warmup { seconds: secs, .. } => {
            single("warmup", Value::String(seconds(*secs)))
        }
        PlannedStep::Cooldown { seconds: secs, .. } => {
            single("cooldown", Value::String(seconds(*secs)))
        }
        PlannedStep::Repeat { count, steps } => single(
            format!("repeat({count})"),
            Value::Sequence(steps.iter().map(step_value).collect()),
        ),
    }
}

/// Top-level document shared by both planner dialects
pub(crate) fn planner_document(
    title: &str,
    sport: &str,
    steps: Vec<Value>,
    options: &ExportOptions,
) -> Value {
    let mut settings = Mapping::new();
    settings.insert("deleteSameNameWorkout".into(), Value::Bool(true));

    let mut body = Mapping::new();
    body.insert("sport".into(), sport.into());
    body.insert("steps".into(), Value::Sequence(steps));
    let mut workouts = Mapping::new();
    workouts.insert(title.into(), Value::Mapping(body));

    let mut schedule = Mapping::new();
    schedule.insert(
        "start_from".into(),
        options.schedule_date().format("%Y-%m-%d").to_string().into(),
    );
    schedule.insert(
        "workouts".into(),
        Value::Sequence(vec![Value::String(title.to_owned())]),
    );

    let mut doc = Mapping::new();
    doc.insert("settings".into(), Value::Mapping(settings));
    doc.insert("workouts".into(), Value::Mapping(workouts));
    doc.insert("schedulePlan".into(), Value::Mapping(schedule));
    Value::Mapping(doc)
}

/// Render `workout` in the planner dialect
///
/// # Errors
///
/// Returns `SerializationError` if YAML rendering fails
pub fn encode(workout: &Workout, options: &ExportOptions) -> AppResult<String> {
    let plan = WorkoutPlan::build(workout);
    debug!(steps = plan.flat_len(), "Planned planner YAML steps");
    let steps = plan.steps.iter().map(step_value).collect();
    let doc = planner_document(workout.title(), "strength", steps, options);
    Ok(serde_yaml::to_string(&doc)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_key_omits_unknown_category() {
        assert_eq!(step_key("Throwdown", ExerciseCategory::UNKNOWN), "Throwdown");
        let squat = ExerciseCategory::by_name("squat").unwrap();
        assert_eq!(step_key("Back Squat", squat), "Back Squat [category: SQUAT]");
    }

    #[test]
    fn test_format_meters() {
        assert_eq!(format_meters(400.0), "400m");
        assert_eq!(format_meters(1609.344), "1609.3m");
    }
}
