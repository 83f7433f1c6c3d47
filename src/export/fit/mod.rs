// ABOUTME: Binary FIT workout encoder built on the shared step plan
// ABOUTME: Header + CRC, typed definition/data records, exercise titles, trailing data CRC
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # FIT workout files
//!
//! Layout of an encoded file:
//!
//! ```text
//! header (12 bytes + CRC) | definitions + data records | data CRC
//! ```
//!
//! Records are emitted in a fixed order: `file_id`, `file_creator`, `workout`,
//! one `workout_step` per flattened step, then one `exercise_title` per exercise
//! step. Repeats are flattened into a trailing repeat step pointing back at the
//! first repeated step. Rest, warmup and cooldown steps use a layout without an
//! exercise category so watches do not label them as exercises.

/// Exercise category table and inference
pub mod categories;
/// CRC-16 shared by header and data
pub mod crc;
/// Record layouts and the little-endian writer
pub mod records;
/// Structural reader used to verify encoded files
pub mod reader;

use std::fmt;

use chrono::{DateTime, Utc};
use pierre_core::errors::{AppError, AppResult};
use pierre_core::models::{Exercise, Workout};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::plan::{PlannedStep, StepTarget, WorkoutPlan};
use categories::{category_for, ExerciseCategory};
use records::{
    RecordWriter, EXERCISE_STEP, EXERCISE_TITLE, FILE_CREATOR, FILE_ID,
    REPEAT_STEP, REST_STEP, STRING_FIELD_SIZE, WORKOUT,
};

pub use reader::{FitFile, FitRecord};

/// Seconds between the Unix epoch and the FIT epoch (1989-12-31T00:00:00Z)
pub const FIT_EPOCH_OFFSET: i64 = 631_065_600;
/// Header size including its CRC
pub const HEADER_SIZE: u8 = 14;
/// Protocol version 1.0
pub const PROTOCOL_VERSION: u8 = 0x10;
/// Profile version 21.117
pub const PROFILE_VERSION: u16 = 0x527D;
/// File signature
pub const FILE_SIGNATURE: &[u8; 4] = b".FIT";

const MANUFACTURER_DEVELOPMENT: u16 = 1;
const PRODUCT_ID: u16 = 65534;
const FILE_TYPE_WORKOUT: u8 = 5;
const WORKOUT_CAPABILITIES: u32 = 32;

/// `workout_step` duration types
pub mod duration_type {
    /// Milliseconds
    pub const TIME: u8 = 0;
    /// Centimeters
    pub const DISTANCE: u8 = 1;
    /// Until lap press
    pub const OPEN: u8 = 5;
    /// Repeat until the referenced steps complete `target_value` times
    pub const REPEAT_UNTIL_STEPS_CMPLT: u8 = 6;
    /// Repetition count
    pub const REPS: u8 = 29;
}

/// `workout_step` intensities
pub mod intensity {
    /// Work
    pub const ACTIVE: u8 = 0;
    /// Rest
    pub const REST: u8 = 1;
    /// Warmup
    pub const WARMUP: u8 = 2;
    /// Cooldown
    pub const COOLDOWN: u8 = 3;
}

/// `workout_step` target type with no target
pub const TARGET_OPEN: u8 = 2;

/// Sport written into the `workout` message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitSport {
    /// Training / strength training
    Strength,
    /// Training / cardio training
    Cardio,
    /// Running
    Running,
}

impl FitSport {
    /// Parse a sport label
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "strength" | "strength_training" | "training" => Some(Self::Strength),
            "cardio" | "cardio_training" | "hiit" => Some(Self::Cardio),
            "run" | "running" => Some(Self::Running),
            _ => None,
        }
    }

    /// `(sport, sub_sport)` codes
    #[must_use]
    pub const fn codes(&self) -> (u8, u8) {
        match self {
            Self::Strength => (10, 20),
            Self::Cardio => (10, 26),
            Self::Running => (1, 0),
        }
    }

    /// Sport for a workout: running when every exercise is a run, cardio for HIIT, else strength
    #[must_use]
    pub fn detect(workout: &Workout) -> Self {
        let all_runs = workout
            .all_exercises()
            .all(|exercise| category_for(exercise).name == "run");
        if all_runs {
            Self::Running
        } else if workout.is_hiit() {
            Self::Cardio
        } else {
            Self::Strength
        }
    }
}

impl fmt::Display for FitSport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Strength => "strength",
            Self::Cardio => "cardio",
            Self::Running => "running",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct StepDuration {
    kind: u8,
    value: u32,
}

impl StepDuration {
    const fn seconds(seconds: u32) -> Self {
        Self {
            kind: duration_type::TIME,
            value: seconds.saturating_mul(1000),
        }
    }

    fn for_target(target: &StepTarget) -> Self {
        match target {
            StepTarget::Duration(seconds) => Self::seconds(*seconds),
            StepTarget::Distance(distance) => Self {
                kind: duration_type::DISTANCE,
                value: (distance.meters() * 100.0).round() as u32,
            },
            StepTarget::Reps(count) => Self {
                kind: duration_type::REPS,
                value: *count,
            },
            StepTarget::Open => Self {
                kind: duration_type::OPEN,
                value: 0,
            },
        }
    }
}

#[derive(Debug, Clone)]
enum FlatStep<'a> {
    Exercise {
        title: &'a str,
        category: ExerciseCategory,
        duration: StepDuration,
    },
    Interval {
        duration: StepDuration,
        intensity: u8,
    },
    Repeat {
        from: u32,
        count: u32,
    },
}

fn exercise_step(exercise: &Exercise, duration: StepDuration) -> FlatStep<'_> {
    FlatStep::Exercise {
        title: exercise.display_name(),
        category: category_for(exercise),
        duration,
    }
}

fn flatten<'a>(steps: &'a [PlannedStep], out: &mut Vec<FlatStep<'a>>) {
    for step in steps {
        match step {
            PlannedStep::Exercise(planned) => out.push(exercise_step(
                &planned.exercise,
                StepDuration::for_target(&planned.target),
            )),
            PlannedStep::Work { seconds, exercise } => {
                out.push(exercise_step(exercise, StepDuration::seconds(*seconds)));
            }
            PlannedStep::Rest { seconds } => out.push(FlatStep::Interval {
                duration: StepDuration::seconds(*seconds),
                intensity: intensity::REST,
            }),
            PlannedStep::Warmup { seconds, .. } => out.push(FlatStep::Interval {
                duration: StepDuration::seconds(*seconds),
                intensity: intensity::WARMUP,
            }),
            PlannedStep::Cooldown { seconds, .. } => out.push(FlatStep::Interval {
                duration: StepDuration::seconds(*seconds),
                intensity: intensity::COOLDOWN,
            }),
            PlannedStep::Repeat { count, steps } => {
                let from = out.len() as u32;
                flatten(steps, out);
                out.push(FlatStep::Repeat {
                    from,
                    count: *count,
                });
            }
        }
    }
}

/// FIT timestamp for a wall-clock instant, clamped at the FIT epoch
#[must_use]
pub fn fit_timestamp(at: DateTime<Utc>) -> u32 {
    u32::try_from((at.timestamp() - FIT_EPOCH_OFFSET).max(0)).unwrap_or(u32::MAX)
}

/// Encoder settings
#[derive(Debug, Clone, Copy, Default)]
pub struct FitEncoder {
    sport: Option<FitSport>,
    created_at: Option<DateTime<Utc>>,
}

impl FitEncoder {
    /// Encoder detecting the sport and stamping the current time
    #[must_use]
    pub const fn new() -> Self {
        Self {
            sport: None,
            created_at: None,
        }
    }

    /// Force a sport instead of detecting one
    #[must_use]
    pub const fn with_sport(mut self, sport: Option<FitSport>) -> Self {
        self.sport = sport;
        self
    }

    /// Fix the creation time (reproducible output)
    #[must_use]
    pub const fn with_created_at(mut self, at: Option<DateTime<Utc>>) -> Self {
        self.created_at = at;
        self
    }

    /// Encode a workout into a complete FIT file
    ///
    /// # Errors
    ///
    /// Returns `EncodeFailed` when the workout plans to zero steps or more
    /// steps than a FIT workout can index
    pub fn encode(&self, workout: &Workout) -> AppResult<Vec<u8>> {
        let plan = WorkoutPlan::build(workout);
        let mut steps = Vec::new();
        flatten(&plan.steps, &mut steps);
        if steps.is_empty() {
            return Err(AppError::encode_failed(
                "workout has no steps to encode as FIT",
            ));
        }
        let step_count = u16::try_from(steps.len()).map_err(|_| {
            AppError::encode_failed(format!("{} steps exceed the FIT step limit", steps.len()))
        })?;

        let sport = self.sport.unwrap_or_else(|| FitSport::detect(workout));
        let timestamp = fit_timestamp(self.created_at.unwrap_or_else(Utc::now));

        let mut writer = RecordWriter::new();
        Self::write_preamble(&mut writer, workout.title(), sport, step_count, timestamp);
        Self::write_steps(&mut writer, &steps);
        Self::write_titles(&mut writer, &steps);

        let data = writer.into_bytes();
        let file = Self::frame(&data)?;
        info!(
            title = %workout.title(),
            %sport,
            steps = steps.len(),
            bytes = file.len(),
            "Encoded FIT workout"
        );
        Ok(file)
    }

    fn write_preamble(
        writer: &mut RecordWriter,
        title: &str,
        sport: FitSport,
        step_count: u16,
        timestamp: u32,
    ) {
        writer.define(&FILE_ID);
        writer
            .record(&FILE_ID)
            .u32(timestamp)
            .u32(timestamp)
            .u16(MANUFACTURER_DEVELOPMENT)
            .u16(PRODUCT_ID)
            .u8(FILE_TYPE_WORKOUT);
        writer.define(&FILE_CREATOR);
        writer.record(&FILE_CREATOR).u16(0).u8(0);

        let (sport_code, sub_sport_code) = sport.codes();
        writer.define(&WORKOUT);
        writer
            .record(&WORKOUT)
            .u8(sport_code)
            .u32(WORKOUT_CAPABILITIES)
            .u16(step_count)
            .string(title, STRING_FIELD_SIZE)
            .u8(sub_sport_code);
    }

    fn write_steps(writer: &mut RecordWriter, steps: &[FlatStep<'_>]) {
        for definition in [EXERCISE_STEP, REST_STEP, REPEAT_STEP] {
            writer.define(&definition);
        }
        for (index, step) in steps.iter().enumerate() {
            let index = index as u16;
            match step {
                FlatStep::Exercise {
                    category, duration, ..
                } => {
                    writer
                        .record(&EXERCISE_STEP)
                        .u16(index)
                        .u32(duration.value)
                        .u8(duration.kind)
                        .u8(TARGET_OPEN)
                        .u8(intensity::ACTIVE)
                        .u16(category.id)
                        .u16(0);
                }
                FlatStep::Interval {
                    duration,
                    intensity,
                } => {
                    writer
                        .record(&REST_STEP)
                        .u16(index)
                        .u32(duration.value)
                        .u8(duration.kind)
                        .u8(TARGET_OPEN)
                        .u8(*intensity);
                }
                FlatStep::Repeat { from, count } => {
                    debug!(index, from, count, "repeat step");
                    writer
                        .record(&REPEAT_STEP)
                        .u16(index)
                        .u32(*from)
                        .u32(*count)
                        .u8(duration_type::REPEAT_UNTIL_STEPS_CMPLT);
                }
            }
        }
    }

    fn write_titles(writer: &mut RecordWriter, steps: &[FlatStep<'_>]) {
        writer.define(&EXERCISE_TITLE);
        for (index, step) in steps.iter().enumerate() {
            if let FlatStep::Exercise {
                title, category, ..
            } = step
            {
                writer
                    .record(&EXERCISE_TITLE)
                    .u16(index as u16)
                    .u16(category.id)
                    .u16(0)
                    .string(title, STRING_FIELD_SIZE);
            }
        }
    }

    fn frame(data: &[u8]) -> AppResult<Vec<u8>> {
        let data_len = u32::try_from(data.len())
            .map_err(|_| AppError::encode_failed("FIT data section exceeds 4 GiB"))?;
        let mut file = Vec::with_capacity(usize::from(HEADER_SIZE) + data.len() + 2);
        file.push(HEADER_SIZE);
        file.push(PROTOCOL_VERSION);
        file.extend_from_slice(&PROFILE_VERSION.to_le_bytes());
        file.extend_from_slice(&data_len.to_le_bytes());
        file.extend_from_slice(FILE_SIGNATURE);
        let header_crc = crc::crc16(&file);
        file.extend_from_slice(&header_crc.to_le_bytes());
        file.extend_from_slice(data);
        file.extend_from_slice(&crc::crc16(data).to_le_bytes());
        Ok(file)
    }
}

/// Encode with default settings
///
/// # Errors
///
/// See [`FitEncoder::encode`]
pub fn encode(workout: &Workout) -> AppResult<Vec<u8>> {
    FitEncoder::new().encode(workout)
}
