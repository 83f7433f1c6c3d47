// ABOUTME: Resolves free-text exercise names against candidate lists with confidence scores
// ABOUTME: Alias table, token-set fuzzy scoring, top-N suggestions, and valid/review/unmapped tiering
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Exercise name matching
//!
//! Every function here is total: empty candidate lists, blank queries, and
//! garbage text all produce a well-formed "no match" result rather than an error.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use pierre_core::constants::matching::{REVIEW_THRESHOLD, VALID_THRESHOLD};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::normalize::normalize;
use crate::similarity::token_set_ratio;

/// Normalized query → canonical target for names fuzzy scoring handles poorly
const ALIASES: &[(&str, &str)] = &[
    ("pushup", "push up"),
    ("push up", "push up"),
    ("bench press", "barbell bench press"),
    ("flat bench press", "barbell bench press"),
    ("incline bench", "incline barbell bench press"),
    ("hip thrust", "hip thrust"),
    ("deadlift", "deadlift"),
    ("romanian deadlift", "romanian deadlift"),
    ("alternating dumbbell curl", "alternating dumbbell curl"),
    ("pullup", "pull up"),
    ("chinup", "chin up"),
    ("situp", "sit up"),
];

static ALIAS_MAP: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| ALIASES.iter().copied().collect());

/// Look up the alias target for an already-normalized query
#[must_use]
pub fn alias_target(normalized_query: &str) -> Option<&'static str> {
    ALIAS_MAP.get(normalized_query).copied()
}

/// Outcome of matching one name: the chosen candidate (if any) and a confidence in `[0, 1]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Matched candidate, exactly as it appeared in the candidate list
    pub name: Option<String>,
    /// Confidence score in `[0, 1]`
    pub confidence: f64,
}

impl MatchResult {
    /// The "no match" result
    #[must_use]
    pub const fn none() -> Self {
        Self {
            name: None,
            confidence: 0.0,
        }
    }

    /// Whether a candidate was chosen
    #[must_use]
    pub const fn is_match(&self) -> bool {
        self.name.is_some()
    }

    /// Tier for this result
    #[must_use]
    pub fn tier(&self) -> ConfidenceTier {
        ConfidenceTier::from_match(self)
    }
}

/// One ranked candidate from [`top_matches`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Candidate name as it appeared in the candidate list
    pub name: String,
    /// Confidence score in `[0, 1]`
    pub confidence: f64,
}

/// Review tier derived from a match confidence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceTier {
    /// Confidence ≥ 0.88: auto-accept
    Valid,
    /// 0.40 ≤ confidence < 0.88: surface for review
    NeedsReview,
    /// Confidence < 0.40 or no match
    Unmapped,
}

impl ConfidenceTier {
    /// Classify a confidence; `matched == false` is always unmapped
    #[must_use]
    pub fn classify(matched: bool, confidence: f64) -> Self {
        if !matched || confidence < REVIEW_THRESHOLD {
            Self::Unmapped
        } else if confidence >= VALID_THRESHOLD {
            Self::Valid
        } else {
            Self::NeedsReview
        }
    }

    /// Tier for a match result
    #[must_use]
    pub fn from_match(result: &MatchResult) -> Self {
        Self::classify(result.is_match(), result.confidence)
    }

    /// Stable identifier
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::NeedsReview => "needs_review",
            Self::Unmapped => "unmapped",
        }
    }
}

impl fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score every candidate against an already-normalized query, skipping candidates
/// that normalize to nothing
fn score_candidates<'a, S>(
    normalized_query: &'a str,
    candidates: &'a [S],
) -> impl Iterator<Item = (&'a str, f64)> + 'a
where
    S: AsRef<str>,
{
    candidates.iter().filter_map(move |candidate| {
        let candidate = candidate.as_ref();
        let normalized = normalize(candidate);
        if normalized.is_empty() {
            return None;
        }
        Some((candidate, token_set_ratio(normalized_query, &normalized)))
    })
}

/// Resolve `raw_name` against `candidates`
///
/// 1. normalize the query
/// 2. an alias table hit whose target is among the candidates returns confidence 1.0
/// 3. otherwise every candidate is normalized and scored by token-set similarity
/// 4. the best-scoring candidate (first on ties) is returned when its score
///    reaches `threshold`; below it the name is withheld but the score is kept
///
/// Empty candidate lists and zero best scores yield [`MatchResult::none`].
#[must_use]
pub fn find_match<S>(raw_name: &str, candidates: &[S], threshold: f64) -> MatchResult
where
    S: AsRef<str>,
{
    let query = normalize(raw_name);
    if query.is_empty() || candidates.is_empty() {
        return MatchResult::none();
    }

    if let Some(target) = alias_target(&query) {
        let target = normalize(target);
        if let Some(hit) = candidates
            .iter()
            .map(AsRef::as_ref)
            .find(|candidate| normalize(candidate) == target)
        {
            debug!(query = %raw_name, matched = %hit, "alias match");
            return MatchResult {
                name: Some(hit.to_owned()),
                confidence: 1.0,
            };
        }
    }

    let mut best: Option<(&str, f64)> = None;
    for (candidate, score) in score_candidates(&query, candidates) {
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((candidate, score));
        }
    }

    match best {
        Some((_, score)) if score <= 0.0 => MatchResult::none(),
        Some((candidate, score)) if score >= threshold => MatchResult {
            name: Some(candidate.to_owned()),
            confidence: score,
        },
        Some((_, score)) => MatchResult {
            name: None,
            confidence: score,
        },
        None => MatchResult::none(),
    }
}

/// The `limit` best candidates scoring at least `cutoff`, sorted by descending score
///
/// Candidates with equal scores keep their input order.
#[must_use]
pub fn top_matches<S>(
    raw_name: &str,
    candidates: &[S],
    limit: usize,
    cutoff: f64,
) -> Vec<Suggestion>
where
    S: AsRef<str>,
{
    let query = normalize(raw_name);
    if query.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<Suggestion> = score_candidates(&query, candidates)
        .filter(|(_, score)| *score >= cutoff)
        .map(|(name, confidence)| Suggestion {
            name: name.to_owned(),
            confidence,
        })
        .collect();
    scored.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
    });
    scored.truncate(limit);
    scored
}
