// ABOUTME: Deterministic exercise name normalization for fuzzy matching
// ABOUTME: Lowercase, abbreviation expansion, punctuation and stopword removal, singularization
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Exercise name normalization
//!
//! `normalize("DB Bench-Presses")` → `"dumbbell bench press"`. The function is
//! total: any input, including garbage, yields a (possibly empty) string.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Abbreviation → expansion, applied on word boundaries
const ABBREVIATIONS: &[(&str, &str)] = &[
    ("db", "dumbbell"),
    ("dbs", "dumbbell"),
    ("bb", "barbell"),
    ("kb", "kettlebell"),
    ("kbs", "kettlebell swing"),
    ("mb", "medicine ball"),
    ("wb", "wall ball"),
    ("oh", "overhead"),
    ("ohp", "overhead press"),
    ("rdl", "romanian deadlift"),
    ("rdls", "romanian deadlift"),
    ("sldl", "stiff leg deadlift"),
    ("bss", "bulgarian split squat"),
    ("bw", "bodyweight"),
    ("sa", "single arm"),
    ("sl", "single leg"),
    ("alt", "alternating"),
    ("inc", "incline"),
    ("dec", "decline"),
    ("ext", "extension"),
    ("hspu", "handstand push up"),
    ("t2b", "toes to bar"),
    ("ttb", "toes to bar"),
    ("c2b", "chest to bar"),
    ("du", "double under"),
    ("dus", "double under"),
    ("pressup", "push up"),
    ("pressups", "push up"),
];

/// Tokens carrying no exercise identity
const STOPWORDS: &[&str] = &[
    "a", "an", "the", "of", "with", "and", "on", "for", "to", "in", "at", "each", "per", "your",
    "my",
];

/// Plural → singular lookup
const PLURALS: &[(&str, &str)] = &[
    ("presses", "press"),
    ("squats", "squat"),
    ("curls", "curl"),
    ("rows", "row"),
    ("lunges", "lunge"),
    ("deadlifts", "deadlift"),
    ("pushups", "pushup"),
    ("pullups", "pullup"),
    ("chinups", "chinup"),
    ("situps", "situp"),
    ("ups", "up"),
    ("burpees", "burpee"),
    ("raises", "raise"),
    ("extensions", "extension"),
    ("dips", "dip"),
    ("thrusts", "thrust"),
    ("thrusters", "thruster"),
    ("crunches", "crunch"),
    ("swings", "swing"),
    ("flyes", "fly"),
    ("flies", "fly"),
    ("flys", "fly"),
    ("jacks", "jack"),
    ("climbers", "climber"),
    ("kicks", "kick"),
    ("steps", "step"),
    ("planks", "plank"),
    ("snatches", "snatch"),
    ("cleans", "clean"),
    ("jerks", "jerk"),
    ("shrugs", "shrug"),
    ("lifts", "lift"),
    ("walks", "walk"),
    ("carries", "carry"),
    ("twists", "twist"),
    ("bridges", "bridge"),
    ("pulls", "pull"),
    ("pushes", "push"),
    ("jumps", "jump"),
    ("hops", "hop"),
    ("runs", "run"),
    ("sprints", "sprint"),
    ("unders", "under"),
    ("balls", "ball"),
    ("dumbbells", "dumbbell"),
    ("barbells", "barbell"),
    ("kettlebells", "kettlebell"),
    ("bars", "bar"),
    ("legs", "leg"),
    ("arms", "arm"),
    ("toes", "toe"),
    ("knees", "knee"),
    ("hips", "hip"),
    ("calves", "calf"),
    ("glutes", "glute"),
    ("hamstrings", "hamstring"),
    ("triceps", "tricep"),
    ("biceps", "bicep"),
    ("lats", "lat"),
    ("abs", "ab"),
    ("rollouts", "rollout"),
    ("pulldowns", "pulldown"),
    ("pullovers", "pullover"),
];

static ABBREVIATION_MAP: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| ABBREVIATIONS.iter().copied().collect());

static ABBREVIATION_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    let alternatives: Vec<String> = ABBREVIATIONS
        .iter()
        .map(|(short, _)| regex::escape(short))
        .collect();
    Regex::new(&format!(r"\b(?:{})\b", alternatives.join("|"))).ok()
});

static SEPARATOR_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"[-_/]").ok());

static NON_WORD_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"[^\w\s]").ok());

static STOPWORD_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| STOPWORDS.iter().copied().collect());

static PLURAL_MAP: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| PLURALS.iter().copied().collect());

/// Normalize an exercise name for matching
///
/// Steps, in order: lowercase; expand abbreviations on word boundaries;
/// hyphens, underscores, and slashes become spaces; strip everything that is
/// not alphanumeric or whitespace; drop stopwords; singularize each token;
/// join tokens with single spaces.
#[must_use]
pub fn normalize(text: &str) -> String {
    let mut working = text.to_lowercase();

    if let Some(pattern) = ABBREVIATION_PATTERN.as_ref() {
        working = pattern
            .replace_all(&working, |captures: &Captures<'_>| {
                let short = &captures[0];
                ABBREVIATION_MAP
                    .get(short)
                    .copied()
                    .unwrap_or(short)
                    .to_owned()
            })
            .into_owned();
    }
    if let Some(pattern) = SEPARATOR_PATTERN.as_ref() {
        working = pattern.replace_all(&working, " ").into_owned();
    }
    if let Some(pattern) = NON_WORD_PATTERN.as_ref() {
        working = pattern.replace_all(&working, "").into_owned();
    }

    working
        .split_whitespace()
        .filter(|token| !STOPWORD_SET.contains(*token))
        .map(|token| PLURAL_MAP.get(token).copied().unwrap_or(token))
        .collect::<Vec<_>>()
        .join(" ")
}
