// ABOUTME: Device-specific exercise name list used for watch-compatible name resolution
// ABOUTME: Threshold-gated lookups, suggestion lists, and length-aware fuzzy matching for short names
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fs;
use std::path::Path;

use pierre_core::constants::matching::{
    DEVICE_FUZZY_THRESHOLD, DEVICE_MATCH_THRESHOLD, DEVICE_SHORT_NAME_THRESHOLD,
    DEVICE_STRICT_THRESHOLD, SUGGESTION_CUTOFF, SUGGESTION_LIMIT,
};
use pierre_core::errors::{AppError, AppResult};
use tracing::{debug, info};

use crate::matcher::{find_match, top_matches, MatchResult, Suggestion};

/// Exercise names a typical strength-capable watch knows about
const BUILTIN_DEVICE_EXERCISES: &[&str] = &[
    "Air Squat",
    "Alternating Dumbbell Curl",
    "Back Squat",
    "Barbell Back Squat",
    "Barbell Bench Press",
    "Barbell Deadlift",
    "Barbell Front Squat",
    "Barbell Hip Thrust",
    "Barbell Row",
    "Bench Press",
    "Bent Over Row",
    "Bicep Curl",
    "Box Jump",
    "Bulgarian Split Squat",
    "Burpee",
    "Cable Face Pull",
    "Cable Row",
    "Chin Up",
    "Crunch",
    "Deadlift",
    "Dip",
    "Dumbbell Bench Press",
    "Dumbbell Lateral Raise",
    "Dumbbell Row",
    "Dumbbell Shoulder Press",
    "Farmers Walk",
    "Front Squat",
    "Glute Bridge",
    "Goblet Squat",
    "Hammer Curl",
    "Hanging Leg Raise",
    "Hip Thrust",
    "Incline Barbell Bench Press",
    "Incline Dumbbell Bench Press",
    "Jumping Jack",
    "Kettlebell Swing",
    "Lat Pulldown",
    "Leg Curl",
    "Leg Press",
    "Lunge",
    "Mountain Climber",
    "Overhead Press",
    "Plank",
    "Power Clean",
    "Pull Up",
    "Push Up",
    "Reverse Lunge",
    "Romanian Deadlift",
    "Run",
    "Russian Twist",
    "Side Plank",
    "Sit Up",
    "Skull Crusher",
    "Standing Calf Raise",
    "Sumo Deadlift",
    "Thruster",
    "Trap Bar Deadlift",
    "Triceps Pressdown",
    "Walking Lunge",
    "Wall Ball",
];

/// Ordered list of exercise names accepted by a target device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceExerciseList {
    names: Vec<String>,
}

impl Default for DeviceExerciseList {
    fn default() -> Self {
        Self::builtin()
    }
}

impl DeviceExerciseList {
    /// Build from names; blank entries are dropped and the rest trimmed
    #[must_use]
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            names: names
                .into_iter()
                .map(|name| name.as_ref().trim().to_owned())
                .filter(|name| !name.is_empty())
                .collect(),
        }
    }

    /// The built-in list
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(BUILTIN_DEVICE_EXERCISES)
    }

    /// Parse a newline-separated name list
    #[must_use]
    pub fn from_lines(text: &str) -> Self {
        Self::new(text.lines())
    }

    /// Load a newline-separated name list from disk
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the file cannot be read
    pub fn from_path(path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            AppError::config(format!(
                "Failed to read device exercise list {}: {e}",
                path.display()
            ))
            .with_source(e)
        })?;
        let list = Self::from_lines(&contents);
        info!(path = %path.display(), names = list.len(), "Loaded device exercise list");
        Ok(list)
    }

    /// Names in list order
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of names
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the list is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Best device name when it scores at least `threshold`, else no match with 0.0
    #[must_use]
    pub fn find(&self, raw_name: &str, threshold: f64) -> MatchResult {
        let result = find_match(raw_name, &self.names, threshold);
        if result.is_match() && result.confidence >= threshold {
            result
        } else {
            MatchResult::none()
        }
    }

    /// [`Self::find`] at the default 0.80 threshold
    #[must_use]
    pub fn find_default(&self, raw_name: &str) -> MatchResult {
        self.find(raw_name, DEVICE_MATCH_THRESHOLD)
    }

    /// Ranked alternatives for a review UI
    #[must_use]
    pub fn suggestions(&self, raw_name: &str, limit: usize, cutoff: f64) -> Vec<Suggestion> {
        top_matches(raw_name, &self.names, limit, cutoff)
    }

    /// [`Self::suggestions`] with the default limit of 5 and cutoff of 0.30
    #[must_use]
    pub fn default_suggestions(&self, raw_name: &str) -> Vec<Suggestion> {
        self.suggestions(raw_name, SUGGESTION_LIMIT, SUGGESTION_CUTOFF)
    }

    /// Match with thresholds tuned to the query's shape
    ///
    /// A single word of at most five characters needs 0.85, anything else 0.70.
    /// When a single-word query lands on a name whose length differs from it by
    /// more than twice the query length, a 0.90 retry replaces the result only if
    /// it scores higher.
    #[must_use]
    pub fn fuzzy_match(&self, raw_name: &str) -> MatchResult {
        let trimmed = raw_name.trim();
        let word_count = trimmed.split_whitespace().count();
        let query_len = trimmed.chars().count();
        let threshold = if word_count <= 1 && query_len <= 5 {
            DEVICE_SHORT_NAME_THRESHOLD
        } else {
            DEVICE_FUZZY_THRESHOLD
        };

        let result = self.find(trimmed, threshold);
        let Some(name) = result.name.as_deref() else {
            return result;
        };
        if word_count == 1 && name.chars().count().abs_diff(query_len) > query_len * 2 {
            let strict = self.find(trimmed, DEVICE_STRICT_THRESHOLD);
            debug!(
                query = %trimmed,
                loose = %name,
                strict = ?strict.name,
                "single-word query matched a much longer device name"
            );
            if strict.confidence > result.confidence {
                return strict;
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_gates_on_threshold() {
        let list = DeviceExerciseList::new(["Push Up", "Barbell Back Squat"]);
        assert_eq!(list.find("push-ups", 0.8).name.as_deref(), Some("Push Up"));

        let missed = list.find("zzzz", 0.8);
        assert!(missed.name.is_none());
        assert!(missed.confidence.abs() < f64::EPSILON);
    }

    #[test]
    fn test_from_lines_skips_blanks() {
        let list = DeviceExerciseList::from_lines("Push Up\n\n  Squat  \n");
        assert_eq!(list.names(), ["Push Up".to_owned(), "Squat".to_owned()]);
    }

    #[test]
    fn test_empty_list_never_matches() {
        let list = DeviceExerciseList::new(Vec::<String>::new());
        assert_eq!(list.fuzzy_match("squat"), MatchResult::none());
        assert!(list.default_suggestions("squat").is_empty());
    }
}
