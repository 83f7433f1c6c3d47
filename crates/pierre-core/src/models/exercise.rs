// ABOUTME: Exercise model with builder, accessors, and display-name cleanup
// ABOUTME: Leaf of the canonical workout tree consumed by every exporter
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{Distance, Load, Reps, Side};
use crate::errors::{AppError, AppResult};

/// Letter+digit ordering prefix such as `A1:`, `b2 `, `C3;`
static ORDER_PREFIX: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*[A-Z]\d+[:;.)\s-]+").ok());

/// Strip a leading letter+digit ordering prefix from a name
///
/// Returns the input unchanged when stripping would leave nothing.
#[must_use]
pub fn strip_order_prefix(name: &str) -> &str {
    let Some(pattern) = ORDER_PREFIX.as_ref() else {
        return name.trim();
    };
    match pattern.find(name) {
        Some(found) if found.end() < name.len() => name[found.end()..].trim(),
        _ => name.trim(),
    }
}

/// A single exercise within a block
///
/// Fields are private to keep the model immutable once built; use
/// [`ExerciseBuilder`] to construct instances. The only post-construction
/// change is canonical name assignment through a `CanonicalSlot`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    /// Raw exercise name as entered
    name: String,
    /// Catalog-resolved canonical name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    canonical_name: Option<String>,
    /// Number of sets (positive when present)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sets: Option<u32>,
    /// Repetition target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reps: Option<Reps>,
    /// Work duration in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    duration_seconds: Option<u32>,
    /// Rest after the exercise in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rest_seconds: Option<u32>,
    /// Distance target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    distance: Option<Distance>,
    /// Load used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    load: Option<Load>,
    /// Equipment tags (`dumbbell`, `barbell`, ...)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    equipment: Vec<String>,
    /// Modifier tags (`incline`, `single arm`, ...)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    modifiers: Vec<String>,
    /// Tempo notation (`3-1-1-0`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tempo: Option<String>,
    /// Side the exercise is performed on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    side: Option<Side>,
    /// Free-text notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
    /// Explicit exercise type (`HIIT`, `strength`, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    exercise_type: Option<String>,
    /// Explicit superset label from the source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    superset_label: Option<String>,
    /// Explicit circuit label from the source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    circuit_label: Option<String>,
}

impl Exercise {
    /// Raw exercise name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name with any letter+digit ordering prefix removed
    #[must_use]
    pub fn display_name(&self) -> &str {
        strip_order_prefix(&self.name)
    }

    /// Canonical name when resolved
    #[must_use]
    pub fn canonical_name(&self) -> Option<&str> {
        self.canonical_name.as_deref()
    }

    /// Canonical name, falling back to the display name
    #[must_use]
    pub fn preferred_name(&self) -> &str {
        self.canonical_name().unwrap_or_else(|| self.display_name())
    }

    /// Number of sets
    #[must_use]
    pub const fn sets(&self) -> Option<u32> {
        self.sets
    }

    /// Repetition target
    #[must_use]
    pub const fn reps(&self) -> Option<&Reps> {
        self.reps.as_ref()
    }

    /// Work duration in seconds
    #[must_use]
    pub const fn duration_seconds(&self) -> Option<u32> {
        self.duration_seconds
    }

    /// Rest after the exercise in seconds
    #[must_use]
    pub const fn rest_seconds(&self) -> Option<u32> {
        self.rest_seconds
    }

    /// Distance target
    #[must_use]
    pub const fn distance(&self) -> Option<&Distance> {
        self.distance.as_ref()
    }

    /// Load used
    #[must_use]
    pub const fn load(&self) -> Option<&Load> {
        self.load.as_ref()
    }

    /// Equipment tags
    #[must_use]
    pub fn equipment(&self) -> &[String] {
        &self.equipment
    }

    /// Modifier tags
    #[must_use]
    pub fn modifiers(&self) -> &[String] {
        &self.modifiers
    }

    /// Tempo notation
    #[must_use]
    pub fn tempo(&self) -> Option<&str> {
        self.tempo.as_deref()
    }

    /// Side the exercise is performed on
    #[must_use]
    pub const fn side(&self) -> Option<Side> {
        self.side
    }

    /// Free-text notes
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Explicit exercise type
    #[must_use]
    pub fn exercise_type(&self) -> Option<&str> {
        self.exercise_type.as_deref()
    }

    /// Explicit superset label
    #[must_use]
    pub fn superset_label(&self) -> Option<&str> {
        self.superset_label.as_deref()
    }

    /// Explicit circuit label
    #[must_use]
    pub fn circuit_label(&self) -> Option<&str> {
        self.circuit_label.as_deref()
    }

    /// Whether the exercise is explicitly typed as HIIT
    #[must_use]
    pub fn is_hiit(&self) -> bool {
        self.exercise_type
            .as_deref()
            .is_some_and(|kind| kind.trim().eq_ignore_ascii_case("hiit"))
    }

    /// Copy of this exercise with a new raw name and grouping labels cleared
    ///
    /// Used once grouping has been recovered from the labels. Blank names are ignored.
    #[must_use]
    pub fn relabeled(mut self, name: &str) -> Self {
        let trimmed = name.trim();
        if !trimmed.is_empty() {
            trimmed.clone_into(&mut self.name);
        }
        self.superset_label = None;
        self.circuit_label = None;
        self
    }

    pub(crate) fn set_canonical_name(&mut self, canonical: String) {
        self.canonical_name = Some(canonical);
    }

    /// Check the model invariants on a value that did not come through the builder
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank name or zero sets
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::missing_field("name"));
        }
        if self.sets == Some(0) {
            return Err(AppError::out_of_range(
                "sets",
                "sets must be a positive integer",
            ));
        }
        Ok(())
    }
}

/// Builder for [`Exercise`] instances
#[derive(Debug, Clone)]
pub struct ExerciseBuilder {
    exercise: Exercise,
}

impl ExerciseBuilder {
    /// Start a builder with the required raw name
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            exercise: Exercise {
                name: name.into().trim().to_owned(),
                canonical_name: None,
                sets: None,
                reps: None,
                duration_seconds: None,
                rest_seconds: None,
                distance: None,
                load: None,
                equipment: Vec::new(),
                modifiers: Vec::new(),
                tempo: None,
                side: None,
                notes: None,
                exercise_type: None,
                superset_label: None,
                circuit_label: None,
            },
        }
    }

    /// Sets the canonical name
    #[must_use]
    pub fn canonical_name(mut self, value: impl Into<String>) -> Self {
        self.exercise.canonical_name = Some(value.into());
        self
    }

    /// Sets the canonical name (optional)
    #[must_use]
    pub fn canonical_name_opt(mut self, value: Option<String>) -> Self {
        self.exercise.canonical_name = value;
        self
    }

    /// Sets the number of sets
    #[must_use]
    pub const fn sets(mut self, value: u32) -> Self {
        self.exercise.sets = Some(value);
        self
    }

    /// Sets the number of sets (optional)
    #[must_use]
    pub const fn sets_opt(mut self, value: Option<u32>) -> Self {
        self.exercise.sets = value;
        self
    }

    /// Sets a plain repetition count
    #[must_use]
    pub fn reps(mut self, value: u32) -> Self {
        self.exercise.reps = Some(Reps::Count(value));
        self
    }

    /// Sets the repetition target (optional)
    #[must_use]
    pub fn reps_opt(mut self, value: Option<Reps>) -> Self {
        self.exercise.reps = value;
        self
    }

    /// Sets a symbolic repetition scheme
    #[must_use]
    pub fn reps_text(mut self, value: impl Into<String>) -> Self {
        self.exercise.reps = Some(Reps::Text(value.into()));
        self
    }

    /// Sets the work duration in seconds
    #[must_use]
    pub const fn duration_seconds(mut self, value: u32) -> Self {
        self.exercise.duration_seconds = Some(value);
        self
    }

    /// Sets the work duration in seconds (optional)
    #[must_use]
    pub const fn duration_seconds_opt(mut self, value: Option<u32>) -> Self {
        self.exercise.duration_seconds = value;
        self
    }

    /// Sets the rest after the exercise in seconds
    #[must_use]
    pub const fn rest_seconds(mut self, value: u32) -> Self {
        self.exercise.rest_seconds = Some(value);
        self
    }

    /// Sets the rest after the exercise in seconds (optional)
    #[must_use]
    pub const fn rest_seconds_opt(mut self, value: Option<u32>) -> Self {
        self.exercise.rest_seconds = value;
        self
    }

    /// Sets the distance target
    #[must_use]
    pub const fn distance(mut self, value: Distance) -> Self {
        self.exercise.distance = Some(value);
        self
    }

    /// Sets the distance target (optional)
    #[must_use]
    pub const fn distance_opt(mut self, value: Option<Distance>) -> Self {
        self.exercise.distance = value;
        self
    }

    /// Sets the load
    #[must_use]
    pub const fn load(mut self, value: Load) -> Self {
        self.exercise.load = Some(value);
        self
    }

    /// Sets the load (optional)
    #[must_use]
    pub const fn load_opt(mut self, value: Option<Load>) -> Self {
        self.exercise.load = value;
        self
    }

    /// Sets the equipment tags
    #[must_use]
    pub fn equipment(mut self, value: Vec<String>) -> Self {
        self.exercise.equipment = value;
        self
    }

    /// Sets the modifier tags
    #[must_use]
    pub fn modifiers(mut self, value: Vec<String>) -> Self {
        self.exercise.modifiers = value;
        self
    }

    /// Sets the tempo notation (optional)
    #[must_use]
    pub fn tempo_opt(mut self, value: Option<String>) -> Self {
        self.exercise.tempo = value;
        self
    }

    /// Sets the side (optional)
    #[must_use]
    pub const fn side_opt(mut self, value: Option<Side>) -> Self {
        self.exercise.side = value;
        self
    }

    /// Sets the notes (optional)
    #[must_use]
    pub fn notes_opt(mut self, value: Option<String>) -> Self {
        self.exercise.notes = value;
        self
    }

    /// Sets the explicit exercise type
    #[must_use]
    pub fn exercise_type(mut self, value: impl Into<String>) -> Self {
        self.exercise.exercise_type = Some(value.into());
        self
    }

    /// Sets the explicit exercise type (optional)
    #[must_use]
    pub fn exercise_type_opt(mut self, value: Option<String>) -> Self {
        self.exercise.exercise_type = value;
        self
    }

    /// Sets the explicit superset label (optional)
    #[must_use]
    pub fn superset_label_opt(mut self, value: Option<String>) -> Self {
        self.exercise.superset_label = value;
        self
    }

    /// Sets the explicit circuit label (optional)
    #[must_use]
    pub fn circuit_label_opt(mut self, value: Option<String>) -> Self {
        self.exercise.circuit_label = value;
        self
    }

    /// Builds the Exercise, enforcing a non-blank name and positive sets
    ///
    /// # Errors
    ///
    /// Returns `MissingRequiredField` for a blank name and `ValueOutOfRange` for zero sets
    pub fn build(self) -> AppResult<Exercise> {
        self.exercise.validate()?;
        Ok(self.exercise)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_order_prefix() {
        assert_eq!(strip_order_prefix("A1: Bench Press"), "Bench Press");
        assert_eq!(strip_order_prefix("b2 Row"), "Row");
        assert_eq!(strip_order_prefix("Bench Press"), "Bench Press");
        assert_eq!(strip_order_prefix("A1:"), "A1:");
    }

    #[test]
    fn test_builder_rejects_blank_name() {
        assert!(ExerciseBuilder::new("   ").build().is_err());
    }

    #[test]
    fn test_builder_rejects_zero_sets() {
        assert!(ExerciseBuilder::new("Squat").sets(0).build().is_err());
    }
}
