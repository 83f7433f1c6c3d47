// ABOUTME: FIT exercise category table and keyword-based category inference
// ABOUTME: Catalog category hints first, then an ordered keyword table over normalized names
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt;
use std::sync::LazyLock;

use pierre_core::models::Exercise;
use pierre_intelligence::{normalize, CanonicalCatalog};

/// FIT `exercise_category` value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExerciseCategory {
    /// Profile name (`bench_press`)
    pub name: &'static str,
    /// Profile number
    pub id: u16,
}

impl ExerciseCategory {
    /// Category FIT uses for anything it cannot classify
    pub const UNKNOWN: Self = Self {
        name: "unknown",
        id: 65534,
    };

    /// Look up a category by profile name
    #[must_use]
    pub fn by_name(name: &str) -> Option<Self> {
        CATEGORIES
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|&(name, id)| Self { name, id })
    }

    /// Whether this is the unknown category
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.id == Self::UNKNOWN.id
    }

    /// Upper-case label used by planner dialects (`BENCH_PRESS`)
    #[must_use]
    pub fn label(&self) -> String {
        self.name.to_uppercase()
    }
}

impl fmt::Display for ExerciseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

const CATEGORIES: &[(&str, u16)] = &[
    ("bench_press", 0),
    ("calf_raise", 1),
    ("cardio", 2),
    ("carry", 3),
    ("chop", 4),
    ("core", 5),
    ("crunch", 6),
    ("curl", 7),
    ("deadlift", 8),
    ("flye", 9),
    ("hip_raise", 10),
    ("hip_stability", 11),
    ("hip_swing", 12),
    ("hyperextension", 13),
    ("lateral_raise", 14),
    ("leg_curl", 15),
    ("leg_raise", 16),
    ("lunge", 17),
    ("olympic_lift", 18),
    ("plank", 19),
    ("plyo", 20),
    ("pull_up", 21),
    ("push_up", 22),
    ("row", 23),
    ("shoulder_press", 24),
    ("shoulder_stability", 25),
    ("shrug", 26),
    ("sit_up", 27),
    ("squat", 28),
    ("total_body", 29),
    ("triceps_extension", 30),
    ("warm_up", 31),
    ("run", 32),
    ("bike", 33),
    ("battle_rope", 38),
    ("indoor_row", 42),
    ("sled", 45),
];

/// Keywords over normalized names; first hit wins, so specific phrases come first
const KEYWORDS: &[(&str, &str)] = &[
    ("bench press", "bench_press"),
    ("chest press", "bench_press"),
    ("floor press", "bench_press"),
    ("calf raise", "calf_raise"),
    ("leg raise", "leg_raise"),
    ("knee raise", "leg_raise"),
    ("lateral raise", "lateral_raise"),
    ("front raise", "lateral_raise"),
    ("leg curl", "leg_curl"),
    ("hamstring curl", "leg_curl"),
    ("hip thrust", "hip_raise"),
    ("glute bridge", "hip_raise"),
    ("hip bridge", "hip_raise"),
    ("kettlebell swing", "hip_swing"),
    ("swing", "hip_swing"),
    ("push up", "push_up"),
    ("pushup", "push_up"),
    ("pull up", "pull_up"),
    ("pullup", "pull_up"),
    ("chin up", "pull_up"),
    ("pulldown", "pull_up"),
    ("pull down", "pull_up"),
    ("sit up", "sit_up"),
    ("situp", "sit_up"),
    ("face pull", "shoulder_stability"),
    ("farmer", "carry"),
    ("carry", "carry"),
    ("battle rope", "battle_rope"),
    ("rower", "indoor_row"),
    ("erg", "indoor_row"),
    ("sled", "sled"),
    ("jumping jack", "cardio"),
    ("jump rope", "cardio"),
    ("double under", "cardio"),
    ("mountain climber", "plank"),
    ("plank", "plank"),
    ("deadlift", "deadlift"),
    ("rdl", "deadlift"),
    ("good morning", "deadlift"),
    ("wall ball", "squat"),
    ("thruster", "squat"),
    ("squat", "squat"),
    ("leg press", "squat"),
    ("lunge", "lunge"),
    ("step up", "lunge"),
    ("clean", "olympic_lift"),
    ("snatch", "olympic_lift"),
    ("jerk", "olympic_lift"),
    ("shoulder press", "shoulder_press"),
    ("overhead press", "shoulder_press"),
    ("military press", "shoulder_press"),
    ("push press", "shoulder_press"),
    ("curl", "curl"),
    ("row", "row"),
    ("pushdown", "triceps_extension"),
    ("skull crusher", "triceps_extension"),
    ("tricep", "triceps_extension"),
    ("triceps", "triceps_extension"),
    ("dip", "triceps_extension"),
    ("shrug", "shrug"),
    ("flye", "flye"),
    ("fly", "flye"),
    ("crunch", "crunch"),
    ("twist", "core"),
    ("hollow", "core"),
    ("burpee", "total_body"),
    ("box jump", "plyo"),
    ("jump", "plyo"),
    ("run", "run"),
    ("jog", "run"),
    ("sprint", "run"),
    ("bike", "bike"),
    ("cycle", "bike"),
    ("cycling", "bike"),
    ("warm up", "warm_up"),
    ("warmup", "warm_up"),
];

static BUILTIN_CATALOG: LazyLock<CanonicalCatalog> = LazyLock::new(CanonicalCatalog::builtin);

fn contains_phrase(haystack: &str, phrase: &str) -> bool {
    format!(" {haystack} ").contains(&format!(" {phrase} "))
}

/// Infer a category from a free-text name
#[must_use]
pub fn category_for_name(name: &str) -> ExerciseCategory {
    let normalized = normalize(name);
    KEYWORDS
        .iter()
        .find(|(keyword, _)| contains_phrase(&normalized, keyword))
        .and_then(|(_, category)| ExerciseCategory::by_name(category))
        .unwrap_or(ExerciseCategory::UNKNOWN)
}

/// Category for an exercise: the catalog's hint for its canonical name, else keywords
#[must_use]
pub fn category_for(exercise: &Exercise) -> ExerciseCategory {
    exercise
        .canonical_name()
        .and_then(|canonical| BUILTIN_CATALOG.category_of(canonical))
        .and_then(ExerciseCategory::by_name)
        .unwrap_or_else(|| category_for_name(exercise.preferred_name()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_order_prefers_specific_phrases() {
        assert_eq!(category_for_name("Incline DB Bench Press").name, "bench_press");
        assert_eq!(category_for_name("Lying Leg Curl").name, "leg_curl");
        assert_eq!(category_for_name("Hammer Curls").name, "curl");
        assert_eq!(category_for_name("Throwdown").id, ExerciseCategory::UNKNOWN.id);
    }

    #[test]
    fn test_category_ids() {
        assert_eq!(ExerciseCategory::by_name("bench_press").map(|c| c.id), Some(0));
        assert_eq!(ExerciseCategory::by_name("run").map(|c| c.id), Some(32));
        assert_eq!(ExerciseCategory::by_name("bike").map(|c| c.id), Some(33));
    }
}
