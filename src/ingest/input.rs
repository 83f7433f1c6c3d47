// ABOUTME: Serde shapes accepted by the ingest converter (structured blocks or a flat exercise list)
// ABOUTME: Lenient number/text fields and key aliases matching what upstream parsers emit
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A JSON scalar that may arrive as a number or as text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberOrText {
    /// Numeric value
    Number(f64),
    /// Text value, parsed leniently by the converter
    Text(String),
}

/// Workout-level settings block (`settings`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestSettings {
    /// Default rest between sets in seconds
    #[serde(default, alias = "default_rest_sec")]
    pub default_rest_sec: Option<u32>,
    /// `timed` or `button`
    #[serde(default, alias = "default_rest_type")]
    pub default_rest_type: Option<String>,
    /// Leading warmup in seconds
    #[serde(default, alias = "warmup_sec")]
    pub warmup_sec: Option<u32>,
}

/// One exercise as emitted by a parser
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngestExercise {
    /// Raw exercise name (required, non-blank)
    #[serde(default)]
    pub name: Option<String>,
    /// Already-resolved canonical name
    #[serde(default)]
    pub canonical_name: Option<String>,
    /// Number of sets
    #[serde(default)]
    pub sets: Option<u32>,
    /// Repetitions: a count, a duration string, a distance string, or a scheme
    #[serde(default)]
    pub reps: Option<NumberOrText>,
    /// Work duration in seconds
    #[serde(default, alias = "duration_seconds")]
    pub duration_sec: Option<u32>,
    /// Rest after the exercise in seconds
    #[serde(default, alias = "rest_seconds")]
    pub rest_sec: Option<u32>,
    /// Distance in meters
    #[serde(default)]
    pub distance_m: Option<f64>,
    /// Distance as a number (with `distance_unit`) or a string such as `400m`
    #[serde(default)]
    pub distance: Option<NumberOrText>,
    /// Unit for a numeric `distance`
    #[serde(default)]
    pub distance_unit: Option<String>,
    /// Load value
    #[serde(default)]
    pub weight: Option<NumberOrText>,
    /// Load unit (`kg`, `lb`, ...); pounds when absent
    #[serde(default)]
    pub weight_unit: Option<String>,
    /// Load is per side (each dumbbell, each side of the bar)
    #[serde(default)]
    pub per_side: bool,
    /// Equipment keywords
    #[serde(default)]
    pub equipment: Vec<String>,
    /// Variation keywords
    #[serde(default)]
    pub modifiers: Vec<String>,
    /// Tempo notation
    #[serde(default)]
    pub tempo: Option<String>,
    /// Side label
    #[serde(default)]
    pub side: Option<String>,
    /// Free-form notes
    #[serde(default)]
    pub notes: Option<String>,
    /// Exercise type tag (`HIIT`, ...)
    #[serde(default, rename = "type")]
    pub exercise_type: Option<String>,
    /// Superset grouping label
    #[serde(default)]
    pub superset_label: Option<String>,
    /// Circuit grouping label
    #[serde(default)]
    pub circuit_label: Option<String>,
}

/// One structured block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngestBlock {
    /// Block label
    #[serde(default)]
    pub label: Option<String>,
    /// Structure keyword or phrase (`superset`, `3 rounds`, `AMRAP 20`)
    #[serde(default)]
    pub structure: Option<String>,
    /// Explicit round count
    #[serde(default)]
    pub rounds: Option<u32>,
    /// Rest between rounds in seconds
    #[serde(default, alias = "rest_between_rounds_sec")]
    pub rest_between_sec: Option<u32>,
    /// Time cap in seconds
    #[serde(default)]
    pub time_cap_sec: Option<u32>,
    /// Work interval in seconds for timed rounds
    #[serde(default)]
    pub time_work_sec: Option<u32>,
    /// Exercises, in order
    #[serde(default)]
    pub exercises: Vec<IngestExercise>,
}

/// Top-level ingest document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngestInput {
    /// Workout title
    #[serde(default)]
    pub title: Option<String>,
    /// Description
    #[serde(default)]
    pub description: Option<String>,
    /// Notes
    #[serde(default)]
    pub notes: Option<String>,
    /// Tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Single source label
    #[serde(default)]
    pub source: Option<String>,
    /// Source labels
    #[serde(default)]
    pub sources: Vec<String>,
    /// Originating platform
    #[serde(default)]
    pub platform: Option<String>,
    /// Originating URL
    #[serde(default)]
    pub source_url: Option<String>,
    /// Export settings
    #[serde(default)]
    pub settings: Option<IngestSettings>,
    /// Pre-structured blocks
    #[serde(default)]
    pub blocks: Option<Vec<IngestBlock>>,
    /// Flat exercise list, grouped by structure detection
    #[serde(default)]
    pub exercises: Option<Vec<IngestExercise>>,
    /// Anything else the parser emitted
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}
