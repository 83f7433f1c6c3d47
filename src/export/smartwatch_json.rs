// ABOUTME: Smartwatch JSON plan: typed intervals (time, distance, reps, rest, repeat) from the step plan
// ABOUTME: Compatibility warnings for very long steps and oversized set counts, plus a reader
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Smartwatch JSON
//!
//! Exercise targets resolve in the order duration, distance, reps; an exercise
//! with none of them becomes a fixed 60 second time step. Time and distance
//! steps show the cleaned display name, rep steps carry the canonical name for
//! structured data.

use pierre_core::constants::units::SECONDS_PER_HOUR;
use pierre_core::errors::AppResult;
use pierre_core::models::{MassUnit, Workout};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::fit::categories::category_for;
use super::plan::{ExerciseStep, PlannedStep, StepTarget, WorkoutPlan};
use super::ExportOptions;

/// Time step used when an exercise has no measurable target
pub const FALLBACK_STEP_SECONDS: u32 = 60;
/// Steps at or above this duration are flagged
pub const MAX_STEP_SECONDS: u32 = SECONDS_PER_HOUR;
/// Set counts above this are flagged
pub const MAX_SETS: u32 = 99;

/// Activity type of the plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SmartwatchSport {
    /// Running
    Running,
    /// Cycling
    Cycling,
    /// Strength training
    StrengthTraining,
}

impl SmartwatchSport {
    /// Running or cycling when every exercise is, strength training otherwise
    #[must_use]
    pub fn detect(workout: &Workout) -> Self {
        let mut categories = workout
            .all_exercises()
            .map(|exercise| category_for(exercise).name)
            .peekable();
        let Some(first) = categories.peek().copied() else {
            return Self::StrengthTraining;
        };
        match first {
            "run" if categories.all(|name| name == "run") => Self::Running,
            "bike" if categories.all(|name| name == "bike") => Self::Cycling,
            _ => Self::StrengthTraining,
        }
    }
}

/// Load attached to a rep step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadTarget {
    /// Stated weight
    pub value: f64,
    /// Unit
    pub unit: MassUnit,
}

/// One interval of the plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SmartwatchInterval {
    /// Warmup
    Warmup {
        /// Duration
        seconds: u32,
    },
    /// Cooldown
    Cooldown {
        /// Duration
        seconds: u32,
    },
    /// Timed step
    Time {
        /// Duration
        seconds: u32,
        /// Exercise shown on the watch
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<String>,
    },
    /// Distance step
    Distance {
        /// Whole meters
        meters: u32,
        /// Exercise shown on the watch
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<String>,
    },
    /// Repetition step
    Reps {
        /// Repetition count
        reps: u32,
        /// Canonical exercise name
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        /// Load, when stated
        #[serde(default, skip_serializing_if = "Option::is_none")]
        load: Option<LoadTarget>,
        /// Rest after the set, when stated on the exercise
        #[serde(rename = "restSec", default, skip_serializing_if = "Option::is_none")]
        rest_sec: Option<u32>,
    },
    /// Rest; no duration means rest until the athlete continues
    Rest {
        /// Duration
        #[serde(default)]
        seconds: Option<u32>,
    },
    /// Repeat the nested intervals
    Repeat {
        /// Number of passes
        reps: u32,
        /// Repeated intervals
        intervals: Vec<SmartwatchInterval>,
    },
}

impl SmartwatchInterval {
    /// The `kind` tag
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Warmup { .. } => "warmup",
            Self::Cooldown { .. } => "cooldown",
            Self::Time { .. } => "time",
            Self::Distance { .. } => "distance",
            Self::Reps { .. } => "reps",
            Self::Rest { .. } => "rest",
            Self::Repeat { .. } => "repeat",
        }
    }

    fn from_exercise(step: &ExerciseStep) -> Self {
        let display = Some(step.display_name().to_owned());
        match &step.target {
            StepTarget::Duration(seconds) => Self::Time {
                seconds: *seconds,
                target: display,
            },
            StepTarget::Distance(distance) => Self::Distance {
                meters: distance.meters().round() as u32,
                target: display,
            },
            StepTarget::Reps(reps) => Self::Reps {
                reps: *reps,
                name: Some(step.structured_name().to_owned()),
                load: step.exercise.load().map(|load| LoadTarget {
                    value: load.value(),
                    unit: load.unit(),
                }),
                rest_sec: step.exercise.rest_seconds(),
            },
            StepTarget::Open => Self::Time {
                seconds: FALLBACK_STEP_SECONDS,
                target: display,
            },
        }
    }

    fn from_planned(step: &PlannedStep) -> Self {
        match step {
            PlannedStep::Exercise(exercise) => Self::from_exercise(exercise),
            PlannedStep::Work { seconds, exercise } => Self::Time {
                seconds: *seconds,
                target: Some(exercise.display_name().to_owned()),
            },
            PlannedStep::Rest { seconds } => Self::Rest {
                seconds: Some(*seconds),
            },
            PlannedStep::Warmup { seconds, .. } => Self::Warmup { seconds: *seconds },
            PlannedStep::Cooldown { seconds, .. } => Self::Cooldown { seconds: *seconds },
            PlannedStep::Repeat { count, steps } => Self::Repeat {
                reps: *count,
                intervals: steps.iter().map(Self::from_planned).collect(),
            },
        }
    }
}

/// Optional schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    /// Local start date (`YYYY-MM-DD`)
    #[serde(default)]
    pub start_local: Option<String>,
}

/// Complete smartwatch plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartwatchPlan {
    /// Workout title
    pub title: String,
    /// Activity type
    pub sport_type: SmartwatchSport,
    /// Ordered intervals
    pub intervals: Vec<SmartwatchInterval>,
    /// Schedule, present only when a start date was requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Schedule>,
}

impl SmartwatchPlan {
    /// Build the plan for `workout`
    #[must_use]
    pub fn build(workout: &Workout, options: &ExportOptions) -> Self {
        let plan = WorkoutPlan::build(workout);
        Self {
            title: workout.title().to_owned(),
            sport_type: SmartwatchSport::detect(workout),
            intervals: plan
                .steps
                .iter()
                .map(SmartwatchInterval::from_planned)
                .collect(),
            schedule: options.schedule_start.map(|date| Schedule {
                start_local: Some(date.format("%Y-%m-%d").to_string()),
            }),
        }
    }

    /// Read a plan back from its JSON document
    ///
    /// # Errors
    ///
    /// Returns `SerializationError` when `json` does not match the schema
    pub fn from_json(json: &str) -> AppResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Kinds of every interval, depth first, repeats before their children
    #[must_use]
    pub fn step_kinds(&self) -> Vec<&'static str> {
        fn walk(intervals: &[SmartwatchInterval], out: &mut Vec<&'static str>) {
            for interval in intervals {
                out.push(interval.kind());
                if let SmartwatchInterval::Repeat { intervals, .. } = interval {
                    walk(intervals, out);
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.intervals, &mut out);
        out
    }

    /// Total number of intervals including nested ones
    #[must_use]
    pub fn step_count(&self) -> usize {
        self.step_kinds().len()
    }
}

/// Warnings for steps many watches cannot represent; the export still proceeds
#[must_use]
pub fn compatibility_warnings(workout: &Workout) -> Vec<String> {
    let mut warnings = Vec::new();
    for exercise in workout.all_exercises() {
        if let Some(seconds) = exercise.duration_seconds().filter(|s| *s >= MAX_STEP_SECONDS) {
            warnings.push(format!(
                "'{}' lasts {seconds}s; steps of an hour or more may not be supported",
                exercise.display_name()
            ));
        }
        if let Some(sets) = exercise.sets().filter(|s| *s > MAX_SETS) {
            warnings.push(format!(
                "'{}' has {sets} sets; more than {MAX_SETS} may not be supported",
                exercise.display_name()
            ));
        }
    }
    warnings
}

/// Render `workout` as a smartwatch JSON plan
///
/// # Errors
///
/// Returns `SerializationError` if JSON rendering fails
pub fn encode(workout: &Workout, options: &ExportOptions) -> AppResult<(String, Vec<String>)> {
    let plan = SmartwatchPlan::build(workout, options);
    let warnings = compatibility_warnings(workout);
    debug!(
        intervals = plan.step_count(),
        warnings = warnings.len(),
        "Built smartwatch plan"
    );
    Ok((serde_json::to_string_pretty(&plan)?, warnings))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_tags() {
        let rest = SmartwatchInterval::Rest { seconds: Some(30) };
        let json = serde_json::to_value(&rest).unwrap();
        assert_eq!(json["kind"], "rest");
        assert_eq!(json["seconds"], 30);

        let reps = SmartwatchInterval::Reps {
            reps: 8,
            name: Some("bench press".to_owned()),
            load: None,
            rest_sec: Some(90),
        };
        let json = serde_json::to_value(&reps).unwrap();
        assert_eq!(json["restSec"], 90);
        assert!(json.get("load").is_none());
    }

    #[test]
    fn test_manual_rest_reads_back() {
        let interval: SmartwatchInterval = serde_json::from_str(r#"{"kind":"rest"}"#).unwrap();
        assert_eq!(interval, SmartwatchInterval::Rest { seconds: None });
    }
}
