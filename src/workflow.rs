// ABOUTME: Mapping validation workflow grading every exercise against a device exercise list
// ABOUTME: Produces a report of validated, needs-review and unmapped exercises with suggestions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use pierre_core::constants::matching::{REVIEW_THRESHOLD, SUGGESTION_CUTOFF, SUGGESTION_LIMIT};
use pierre_core::models::Workout;
use pierre_intelligence::{find_match, ConfidenceTier, DeviceExerciseList, Suggestion};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Where an exercise sits in the workout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseLocation {
    /// Zero-based block index
    pub block_index: usize,
    /// Block label, when the block has one
    pub block_label: Option<String>,
    /// Zero-based exercise index within the block
    pub exercise_index: usize,
}

/// Validation outcome for one exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingEntry {
    /// Name as written in the workout
    pub original_name: String,
    /// Best device name, when one scored at least the review threshold
    pub matched_name: Option<String>,
    /// Confidence in `[0, 1]`
    pub confidence: f64,
    /// Review tier
    pub status: ConfidenceTier,
    /// Position in the workout
    pub location: ExerciseLocation,
    /// Up to five ranked alternatives
    pub suggestions: Vec<Suggestion>,
}

/// Mapping validation report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MappingReport {
    /// Exercises inspected
    pub total_exercises: usize,
    /// Auto-accepted exercises
    pub validated: Vec<MappingEntry>,
    /// Exercises to surface for review
    pub needs_review: Vec<MappingEntry>,
    /// Exercises with no usable match
    pub unmapped: Vec<MappingEntry>,
    /// True when nothing is unmapped
    pub can_proceed: bool,
}

impl MappingReport {
    /// Every entry in workout order
    #[must_use]
    pub fn entries(&self) -> Vec<&MappingEntry> {
        let mut entries: Vec<&MappingEntry> = self
            .validated
            .iter()
            .chain(&self.needs_review)
            .chain(&self.unmapped)
            .collect();
        entries.sort_by_key(|entry| (entry.location.block_index, entry.location.exercise_index));
        entries
    }
}

fn grade(name: &str, location: ExerciseLocation, devices: &DeviceExerciseList) -> MappingEntry {
    let result = find_match(name, devices.names(), REVIEW_THRESHOLD);
    let status = result.tier();
    let suggestions = devices.suggestions(name, SUGGESTION_LIMIT, SUGGESTION_CUTOFF);
    debug!(
        exercise = %name,
        matched = ?result.name,
        confidence = result.confidence,
        %status,
        "graded exercise mapping"
    );
    if status == ConfidenceTier::Unmapped {
        warn!(
            exercise = %name,
            confidence = result.confidence,
            suggestions = suggestions.len(),
            "Unmapped exercise"
        );
    }
    MappingEntry {
        original_name: name.to_owned(),
        matched_name: result.name,
        confidence: result.confidence,
        status,
        location,
        suggestions,
    }
}

/// Grade every exercise of `workout` against `devices`
///
/// Exercises are matched on their display name (ordering prefixes stripped).
/// `can_proceed` is true only when no exercise is unmapped.
#[must_use]
pub fn validate_workout_mapping(workout: &Workout, devices: &DeviceExerciseList) -> MappingReport {
    let mut report = MappingReport {
        can_proceed: true,
        ..MappingReport::default()
    };

    for (block_index, block) in workout.blocks().iter().enumerate() {
        for (exercise_index, exercise) in block.exercises().iter().enumerate() {
            let name = exercise.display_name();
            if name.trim().is_empty() {
                continue;
            }
            report.total_exercises += 1;
            let location = ExerciseLocation {
                block_index,
                block_label: block.label().map(str::to_owned),
                exercise_index,
            };
            let entry = grade(name, location, devices);
            match entry.status {
                ConfidenceTier::Valid => report.validated.push(entry),
                ConfidenceTier::NeedsReview => report.needs_review.push(entry),
                ConfidenceTier::Unmapped => report.unmapped.push(entry),
            }
        }
    }

    report.can_proceed = report.unmapped.is_empty();
    info!(
        title = %workout.title(),
        total = report.total_exercises,
        validated = report.validated.len(),
        needs_review = report.needs_review.len(),
        unmapped = report.unmapped.len(),
        can_proceed = report.can_proceed,
        "Validated workout mapping"
    );
    report
}
