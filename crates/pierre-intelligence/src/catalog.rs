// ABOUTME: Canonical exercise catalog with synonyms, equipment, modifiers and FIT category hints
// ABOUTME: Keyword-boosted suggestions, auto/review classification, and the layered exact/alias/fuzzy matcher
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Canonical exercise catalog
//!
//! Two consumers sit on top of the same [`CanonicalCatalog`]:
//!
//! - [`CanonicalCatalog::suggest`] / [`CanonicalCatalog::classify`] score every
//!   entry by its best synonym and add a small bonus per equipment or modifier
//!   keyword found in the query. The canonicalizer uses this path.
//! - [`CatalogMatcher`] runs the staged lookup (exact name, synonym, normalized
//!   synonym, fuzzy) and reports how the match was found.

use std::cmp::Ordering;
use std::fmt;
use std::fs;
use std::iter;
use std::path::Path;

use pierre_core::constants::matching::{
    ALIAS_CONFIDENCE, CATALOG_ACCEPT_THRESHOLD, CATALOG_REVIEW_THRESHOLD, EQUIPMENT_BONUS,
    FUZZY_AUTO_ACCEPT, FUZZY_REJECT_THRESHOLD, KEYWORD_BONUS, NORMALIZED_ALIAS_CONFIDENCE,
    SUGGESTION_CUTOFF,
};
use pierre_core::errors::{AppError, AppResult};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::matcher::Suggestion;
use crate::normalize::normalize;
use crate::similarity::token_set_ratio;

/// One catalog record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Canonical exercise name
    pub canonical: String,
    /// Alternative spellings and common names
    #[serde(default)]
    pub synonyms: Vec<String>,
    /// Equipment keywords (`barbell`, `dumbbell`, ...)
    #[serde(default)]
    pub equipment: Vec<String>,
    /// Variation keywords (`incline`, `single arm`, ...)
    #[serde(default)]
    pub modifiers: Vec<String>,
    /// Exercise category hint, in FIT category naming (`bench_press`, `squat`, ...)
    #[serde(default)]
    pub category: Option<String>,
}

type BuiltinEntry = (
    &'static str,
    &'static [&'static str],
    &'static [&'static str],
    &'static [&'static str],
    &'static str,
);

/// Default catalog: canonical, synonyms, equipment, modifiers, category
const BUILTIN_ENTRIES: &[BuiltinEntry] = &[
    ("Barbell Back Squat", &["back squat", "bb back squat", "squat", "high bar squat"], &["barbell"], &["back"], "squat"),
    ("Front Squat", &["barbell front squat", "bb front squat"], &["barbell"], &["front"], "squat"),
    ("Goblet Squat", &["db goblet squat", "kb goblet squat"], &["dumbbell", "kettlebell"], &["goblet"], "squat"),
    ("Air Squat", &["bodyweight squat", "air squats"], &["bodyweight"], &[], "squat"),
    ("Bulgarian Split Squat", &["rear foot elevated split squat", "rfess", "split squat"], &["dumbbell"], &["split"], "lunge"),
    ("Walking Lunge", &["walking lunges", "db walking lunge"], &["dumbbell"], &["walking"], "lunge"),
    ("Reverse Lunge", &["reverse lunges", "db reverse lunge"], &["dumbbell"], &["reverse"], "lunge"),
    ("Barbell Deadlift", &["deadlift", "conventional deadlift", "bb deadlift"], &["barbell"], &["conventional"], "deadlift"),
    ("Romanian Deadlift", &["rdl", "barbell rdl", "db rdl", "stiff leg deadlift"], &["barbell", "dumbbell"], &["romanian"], "deadlift"),
    ("Sumo Deadlift", &["sumo dl"], &["barbell"], &["sumo"], "deadlift"),
    ("Trap Bar Deadlift", &["hex bar deadlift"], &["trap_bar"], &["trap bar"], "deadlift"),
    ("Barbell Bench Press", &["bench press", "flat bench press", "bb bench"], &["barbell"], &["flat"], "bench_press"),
    ("Incline Barbell Bench Press", &["incline bench", "incline bench press"], &["barbell"], &["incline"], "bench_press"),
    ("Dumbbell Bench Press", &["db bench press", "db bench", "flat db press"], &["dumbbell"], &["flat"], "bench_press"),
    ("Incline Dumbbell Press", &["incline db press", "incline dumbbell bench press"], &["dumbbell"], &["incline"], "bench_press"),
    ("Overhead Press", &["ohp", "military press", "strict press", "barbell shoulder press"], &["barbell"], &["standing"], "shoulder_press"),
    ("Dumbbell Shoulder Press", &["db shoulder press", "seated db press"], &["dumbbell"], &["seated"], "shoulder_press"),
    ("Push Up", &["pushup", "push-up", "press up"], &["bodyweight"], &[], "push_up"),
    ("Pull Up", &["pullup", "pull-up"], &["bodyweight"], &[], "pull_up"),
    ("Chin Up", &["chinup", "chin-up"], &["bodyweight"], &[], "pull_up"),
    ("Lat Pulldown", &["lat pull down", "cable pulldown"], &["cable"], &[], "pull_up"),
    ("Barbell Row", &["bent over row", "bb row", "pendlay row"], &["barbell"], &["bent over"], "row"),
    ("Dumbbell Row", &["single arm db row", "one arm dumbbell row", "db row"], &["dumbbell"], &["single arm"], "row"),
    ("Seated Cable Row", &["cable row", "seated row"], &["cable"], &["seated"], "row"),
    ("Hip Thrust", &["barbell hip thrust", "bb hip thrust"], &["barbell"], &[], "hip_raise"),
    ("Glute Bridge", &["bodyweight glute bridge", "hip bridge"], &["bodyweight"], &[], "hip_raise"),
    ("Kettlebell Swing", &["kb swing", "russian swing", "american swing"], &["kettlebell"], &[], "hip_swing"),
    ("Dumbbell Curl", &["bicep curl", "db curl", "biceps curl"], &["dumbbell"], &[], "curl"),
    ("Alternating Dumbbell Curl", &["alt db curl", "alternating curl"], &["dumbbell"], &["alternating"], "curl"),
    ("Hammer Curl", &["db hammer curl"], &["dumbbell"], &["hammer"], "curl"),
    ("Triceps Pushdown", &["tricep pushdown", "cable pushdown", "rope pushdown"], &["cable"], &[], "triceps_extension"),
    ("Skull Crusher", &["lying triceps extension", "skullcrusher"], &["barbell"], &["lying"], "triceps_extension"),
    ("Dip", &["parallel bar dip", "triceps dip"], &["bodyweight"], &[], "triceps_extension"),
    ("Lateral Raise", &["side lateral raise", "db lateral raise"], &["dumbbell"], &[], "lateral_raise"),
    ("Face Pull", &["cable face pull", "rope face pull"], &["cable"], &[], "shoulder_stability"),
    ("Plank", &["front plank", "forearm plank"], &["bodyweight"], &[], "plank"),
    ("Side Plank", &["side planks"], &["bodyweight"], &["side"], "plank"),
    ("Mountain Climber", &["mountain climbers"], &["bodyweight"], &[], "plank"),
    ("Sit Up", &["situp", "sit-up"], &["bodyweight"], &[], "sit_up"),
    ("Crunch", &["abdominal crunch", "ab crunch"], &["bodyweight"], &[], "crunch"),
    ("Hanging Leg Raise", &["leg raise", "hanging knee raise"], &["bodyweight"], &["hanging"], "leg_raise"),
    ("Russian Twist", &["weighted russian twist"], &["bodyweight"], &[], "core"),
    ("Burpee", &["burpees"], &["bodyweight"], &[], "total_body"),
    ("Box Jump", &["box jumps"], &["box"], &[], "plyo"),
    ("Jumping Jack", &["jumping jacks", "star jump"], &["bodyweight"], &[], "cardio"),
    ("Wall Ball", &["wall balls", "wall ball shot"], &["medicine_ball"], &[], "squat"),
    ("Thruster", &["db thruster", "barbell thruster"], &["barbell", "dumbbell"], &[], "squat"),
    ("Power Clean", &["clean", "hang clean"], &["barbell"], &["power"], "olympic_lift"),
    ("Farmer Carry", &["farmers walk", "farmer's carry", "farmer walk"], &["dumbbell", "kettlebell"], &[], "carry"),
    ("Calf Raise", &["standing calf raise"], &["bodyweight"], &["standing"], "calf_raise"),
    ("Leg Press", &["machine leg press"], &["machine"], &[], "squat"),
    ("Leg Curl", &["hamstring curl", "lying leg curl"], &["machine"], &["lying"], "leg_curl"),
    ("Run", &["running", "jog"], &[], &[], "run"),
];

/// Keywords signalling an equipment type in a raw query
const EQUIPMENT_KEYWORDS: &[(&str, &[&str])] = &[
    ("barbell", &["barbell", "bb", "bar"]),
    ("dumbbell", &["dumbbell", "db", "dumbell"]),
    ("cable", &["cable"]),
    ("machine", &["machine"]),
    ("smith_machine", &["smith", "smith machine"]),
    ("kettlebell", &["kettlebell", "kb"]),
    ("bodyweight", &["bodyweight", "body weight", "bw"]),
];

fn equipment_keywords(equipment: &str) -> &'static [&'static str] {
    EQUIPMENT_KEYWORDS
        .iter()
        .find(|(name, _)| *name == equipment)
        .map(|(_, keywords)| *keywords)
        .unwrap_or_default()
}

/// Normalized forms cached alongside each entry
#[derive(Debug, Clone)]
struct IndexedEntry {
    name: String,
    synonyms: Vec<String>,
}

impl IndexedEntry {
    fn from_entry(entry: &CatalogEntry) -> Self {
        Self {
            name: normalize(&entry.canonical),
            synonyms: entry.synonyms.iter().map(|s| normalize(s)).collect(),
        }
    }
}

/// Catalog classification status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogStatus {
    /// Score at or above the acceptance threshold
    Auto,
    /// Score at or above the review threshold
    Review,
    /// Everything else
    Unknown,
}

impl fmt::Display for CatalogStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Auto => "auto",
            Self::Review => "review",
            Self::Unknown => "unknown",
        })
    }
}

/// Result of [`CanonicalCatalog::classify`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Top-ranked canonical name, absent only for an empty catalog or query
    pub canonical: Option<String>,
    /// Score of the top-ranked entry
    pub score: f64,
    /// Threshold bucket of the top score
    pub status: CatalogStatus,
    /// Ranked alternatives, best first
    pub alternates: Vec<Suggestion>,
}

/// Canonical exercise catalog
#[derive(Debug, Clone)]
pub struct CanonicalCatalog {
    entries: Vec<CatalogEntry>,
    index: Vec<IndexedEntry>,
}

impl Default for CanonicalCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CanonicalCatalog {
    /// Build a catalog from entries
    #[must_use]
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        let index = entries.iter().map(IndexedEntry::from_entry).collect();
        Self { entries, index }
    }

    /// The built-in catalog
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(
            BUILTIN_ENTRIES
                .iter()
                .map(|(canonical, synonyms, equipment, modifiers, category)| CatalogEntry {
                    canonical: (*canonical).to_owned(),
                    synonyms: synonyms.iter().map(|s| (*s).to_owned()).collect(),
                    equipment: equipment.iter().map(|s| (*s).to_owned()).collect(),
                    modifiers: modifiers.iter().map(|s| (*s).to_owned()).collect(),
                    category: Some((*category).to_owned()),
                })
                .collect(),
        )
    }

    /// Parse a catalog from YAML: a sequence of entries
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML does not describe a list of catalog entries
    /// or an entry has a blank canonical name
    pub fn from_yaml_str(yaml: &str) -> AppResult<Self> {
        let entries: Vec<CatalogEntry> = serde_yaml::from_str(yaml)?;
        if let Some(position) = entries
            .iter()
            .position(|entry| entry.canonical.trim().is_empty())
        {
            return Err(AppError::missing_field(format!("[{position}].canonical")));
        }
        Ok(Self::new(entries))
    }

    /// Load a YAML catalog file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn from_path(path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            AppError::config(format!("Failed to read catalog {}: {e}", path.display()))
                .with_source(e)
        })?;
        let catalog = Self::from_yaml_str(&contents)?;
        info!(path = %path.display(), entries = catalog.len(), "Loaded exercise catalog");
        Ok(catalog)
    }

    /// All entries in catalog order
    #[must_use]
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry with exactly this canonical name
    #[must_use]
    pub fn lookup(&self, canonical: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|entry| entry.canonical == canonical)
    }

    /// Canonical names in catalog order
    pub fn canonical_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.canonical.as_str())
    }

    /// Similarity plus keyword bonus, uncapped so bonus-only differences still rank
    fn keyword_score(entry: &CatalogEntry, indexed: &IndexedEntry, query: &str) -> f64 {
        let best = indexed
            .synonyms
            .iter()
            .chain(iter::once(&indexed.name))
            .map(|candidate| token_set_ratio(query, candidate))
            .fold(0.0_f64, f64::max);
        let hits = entry
            .equipment
            .iter()
            .chain(&entry.modifiers)
            .filter(|keyword| query.contains(keyword.as_str()))
            .count();
        (hits as f64).mul_add(KEYWORD_BONUS, best)
    }

    /// Rank every entry against `raw_name`, best first, keeping `top_k`
    ///
    /// An entry's score is its best synonym (or canonical name) similarity plus
    /// 0.03 per equipment or modifier keyword contained in the normalized query,
    /// capped at 1.0. Ranking uses the uncapped score; remaining ties keep
    /// catalog order.
    #[must_use]
    pub fn suggest(&self, raw_name: &str, top_k: usize) -> Vec<Suggestion> {
        let query = normalize(raw_name);
        if query.is_empty() {
            return Vec::new();
        }
        let mut ranked: Vec<(&CatalogEntry, f64)> = self
            .entries
            .iter()
            .zip(&self.index)
            .map(|(entry, indexed)| (entry, Self::keyword_score(entry, indexed, &query)))
            .collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        ranked
            .into_iter()
            .take(top_k)
            .map(|(entry, score)| Suggestion {
                name: entry.canonical.clone(),
                confidence: score.min(1.0),
            })
            .collect()
    }

    /// Classify with the default thresholds (accept 0.85, review 0.60)
    #[must_use]
    pub fn classify(&self, raw_name: &str) -> Classification {
        self.classify_with(raw_name, CATALOG_ACCEPT_THRESHOLD, CATALOG_REVIEW_THRESHOLD)
    }

    /// Classify the top suggestion against explicit thresholds
    #[must_use]
    pub fn classify_with(&self, raw_name: &str, accept: f64, review: f64) -> Classification {
        let alternates = self.suggest(raw_name, 5);
        let Some(top) = alternates.first() else {
            return Classification {
                canonical: None,
                score: 0.0,
                status: CatalogStatus::Unknown,
                alternates,
            };
        };
        let status = if top.confidence >= accept {
            CatalogStatus::Auto
        } else if top.confidence >= review {
            CatalogStatus::Review
        } else {
            CatalogStatus::Unknown
        };
        Classification {
            canonical: Some(top.name.clone()),
            score: top.confidence,
            status,
            alternates,
        }
    }

    /// FIT-style category hint for a canonical name
    #[must_use]
    pub fn category_of(&self, canonical: &str) -> Option<&str> {
        self.lookup(canonical)?.category.as_deref()
    }
}

/// How a [`CatalogMatcher`] result was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    /// Case-insensitive canonical name hit
    Exact,
    /// Synonym hit, literal or normalized
    Alias,
    /// Token-set similarity
    Fuzzy,
    /// Nothing matched
    None,
}

/// Result of a layered catalog lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseMatch {
    /// Matched canonical name
    pub canonical: Option<String>,
    /// Confidence in `[0, 1]`
    pub confidence: f64,
    /// Stage that produced the match
    pub method: MatchMethod,
    /// Query worth recording as a new synonym of the matched entry
    pub suggested_alias: Option<String>,
}

impl ExerciseMatch {
    const fn none() -> Self {
        Self {
            canonical: None,
            confidence: 0.0,
            method: MatchMethod::None,
            suggested_alias: None,
        }
    }

    fn found(entry: &CatalogEntry, confidence: f64, method: MatchMethod) -> Self {
        Self {
            canonical: Some(entry.canonical.clone()),
            confidence,
            method,
            suggested_alias: None,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum FuzzySource {
    Name,
    Synonym,
}

/// Staged matcher: exact name, synonym, normalized synonym, then fuzzy
#[derive(Debug, Clone, Default)]
pub struct CatalogMatcher {
    catalog: CanonicalCatalog,
}

impl CatalogMatcher {
    /// Wrap a catalog
    #[must_use]
    pub const fn new(catalog: CanonicalCatalog) -> Self {
        Self { catalog }
    }

    /// Underlying catalog
    #[must_use]
    pub const fn catalog(&self) -> &CanonicalCatalog {
        &self.catalog
    }

    fn has_equipment_keyword(raw_lower: &str, entry: &CatalogEntry) -> bool {
        entry.equipment.iter().any(|equipment| {
            let keywords = equipment_keywords(equipment);
            if keywords.is_empty() {
                raw_lower.contains(equipment.as_str())
            } else {
                keywords.iter().any(|keyword| raw_lower.contains(keyword))
            }
        })
    }

    fn fuzzy_score(raw_lower: &str, entry: &CatalogEntry, base: f64) -> f64 {
        if Self::has_equipment_keyword(raw_lower, entry) {
            (base + EQUIPMENT_BONUS).min(1.0)
        } else {
            base
        }
    }

    /// Match one planned exercise name
    #[must_use]
    pub fn match_name(&self, planned_name: &str) -> ExerciseMatch {
        let planned = planned_name.trim();
        if planned.is_empty() {
            return ExerciseMatch::none();
        }

        if let Some(entry) = self
            .catalog
            .entries
            .iter()
            .find(|entry| entry.canonical.eq_ignore_ascii_case(planned))
        {
            debug!(query = %planned, canonical = %entry.canonical, "exact catalog match");
            return ExerciseMatch::found(entry, 1.0, MatchMethod::Exact);
        }

        if let Some(entry) = self.catalog.entries.iter().find(|entry| {
            entry
                .synonyms
                .iter()
                .any(|synonym| synonym.eq_ignore_ascii_case(planned))
        }) {
            debug!(query = %planned, canonical = %entry.canonical, "synonym catalog match");
            return ExerciseMatch::found(entry, ALIAS_CONFIDENCE, MatchMethod::Alias);
        }

        let query = normalize(planned);
        if query.is_empty() {
            return ExerciseMatch::none();
        }
        if let Some(entry) = self
            .catalog
            .entries
            .iter()
            .zip(&self.catalog.index)
            .find(|(_, indexed)| indexed.synonyms.contains(&query))
            .map(|(entry, _)| entry)
        {
            debug!(query = %planned, canonical = %entry.canonical, "normalized synonym catalog match");
            return ExerciseMatch::found(entry, NORMALIZED_ALIAS_CONFIDENCE, MatchMethod::Alias);
        }

        self.fuzzy_match(planned, &query)
            .unwrap_or_else(ExerciseMatch::none)
    }

    fn fuzzy_match(&self, planned: &str, query: &str) -> Option<ExerciseMatch> {
        let raw_lower = planned.to_lowercase();
        let mut best: Option<(usize, f64, FuzzySource)> = None;

        for (position, (entry, indexed)) in
            self.catalog.entries.iter().zip(&self.catalog.index).enumerate()
        {
            let candidates = iter::once((&indexed.name, FuzzySource::Name))
                .chain(indexed.synonyms.iter().map(|s| (s, FuzzySource::Synonym)));
            for (candidate, source) in candidates {
                let score =
                    Self::fuzzy_score(&raw_lower, entry, token_set_ratio(query, candidate));
                if best.is_none_or(|(_, best_score, _)| score > best_score) {
                    best = Some((position, score, source));
                }
            }
        }

        let (position, score, source) = best?;
        if score < FUZZY_REJECT_THRESHOLD {
            return None;
        }
        let entry = &self.catalog.entries[position];
        let indexed = &self.catalog.index[position];
        let suggested_alias = (score >= FUZZY_AUTO_ACCEPT
            && source == FuzzySource::Name
            && !indexed.synonyms.iter().any(|synonym| synonym == query))
        .then(|| planned.to_owned());

        debug!(query = %planned, canonical = %entry.canonical, score, "fuzzy catalog match");
        Some(ExerciseMatch {
            suggested_alias,
            ..ExerciseMatch::found(entry, score, MatchMethod::Fuzzy)
        })
    }

    /// Match many names in parallel; output order follows input order
    #[must_use]
    pub fn match_batch<S>(&self, planned_names: &[S]) -> Vec<ExerciseMatch>
    where
        S: AsRef<str> + Sync,
    {
        planned_names
            .par_iter()
            .map(|name| self.match_name(name.as_ref()))
            .collect()
    }

    /// Up to `limit` entries scoring at least 0.3 by name or synonym, best first
    #[must_use]
    pub fn suggest_matches(&self, planned_name: &str, limit: usize) -> Vec<ExerciseMatch> {
        let query = normalize(planned_name);
        if query.is_empty() {
            return Vec::new();
        }
        let raw_lower = planned_name.to_lowercase();
        let mut matches: Vec<ExerciseMatch> = self
            .catalog
            .entries
            .iter()
            .zip(&self.catalog.index)
            .filter_map(|(entry, indexed)| {
                let base = iter::once(&indexed.name)
                    .chain(&indexed.synonyms)
                    .map(|candidate| token_set_ratio(&query, candidate))
                    .fold(0.0_f64, f64::max);
                let score = Self::fuzzy_score(&raw_lower, entry, base);
                (score >= SUGGESTION_CUTOFF)
                    .then(|| ExerciseMatch::found(entry, score, MatchMethod::Fuzzy))
            })
            .collect();
        matches.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(Ordering::Equal)
        });
        matches.truncate(limit);
        matches
    }
}
