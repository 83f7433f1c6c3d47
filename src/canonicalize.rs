// ABOUTME: Canonicalizer assigning catalog names to workout exercises
// ABOUTME: Normalized-name resolver cache first, then the catalog with an acceptance threshold
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Canonicalization
//!
//! For every exercise, in block order: normalize the raw name, ask the
//! [`CanonicalResolver`] (a cache of earlier decisions), and on a miss classify
//! against the [`CanonicalCatalog`]. Only a top suggestion at or above the
//! acceptance threshold (0.85 unless configured) is assigned. A miss leaves the
//! exercise as it was; it is never an error.
//!
//! [`Canonicalizer::canonicalize_in_place`] needs `&mut Workout`, so the borrow
//! checker gives it exclusive access for the whole mutation window. Use the
//! copying variants when the same workout is shared across threads.

use std::collections::HashMap;
use std::fs;
use std::ops::AddAssign;
use std::path::Path;

use pierre_core::constants::matching::{CATALOG_ACCEPT_THRESHOLD, CATALOG_REVIEW_THRESHOLD};
use pierre_core::errors::{AppError, AppResult};
use pierre_core::models::Workout;
use pierre_intelligence::{normalize, CanonicalCatalog, CatalogStatus};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::MapperConfig;

/// Lookup of earlier canonicalization decisions keyed by normalized name
pub trait CanonicalResolver: Send + Sync {
    /// Canonical name recorded for `normalized`, if any
    fn resolve(&self, normalized: &str) -> Option<String>;
}

/// Resolver that never knows anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoResolver;

impl CanonicalResolver for NoResolver {
    fn resolve(&self, _normalized: &str) -> Option<String> {
        None
    }
}

impl<F> CanonicalResolver for F
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    fn resolve(&self, normalized: &str) -> Option<String> {
        self(normalized)
    }
}

/// Fixed name → canonical map
///
/// Keys are normalized on insert, so `"DB Bench"` and `"dumbbell bench"` share
/// one entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticResolver {
    entries: HashMap<String, String>,
}

impl StaticResolver {
    /// Empty resolver
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `raw` → `canonical`
    pub fn insert(&mut self, raw: &str, canonical: impl Into<String>) {
        let key = normalize(raw);
        if !key.is_empty() {
            self.entries.insert(key, canonical.into());
        }
    }

    /// Builder-style [`Self::insert`]
    #[must_use]
    pub fn with(mut self, raw: &str, canonical: impl Into<String>) -> Self {
        self.insert(raw, canonical);
        self
    }

    /// Parse a YAML mapping of raw names to canonical names
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` if the document is not a string mapping
    pub fn from_yaml_str(yaml: &str) -> AppResult<Self> {
        let raw: HashMap<String, String> = serde_yaml::from_str(yaml)?;
        Ok(raw
            .iter()
            .fold(Self::new(), |resolver, (name, canonical)| {
                resolver.with(name, canonical.as_str())
            }))
    }

    /// Load a YAML mapping from disk
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read, `InvalidFormat` if it does not parse
    pub fn from_path(path: &Path) -> AppResult<Self> {
        let yaml = fs::read_to_string(path).map_err(|e| {
            AppError::config(format!("cannot read resolver file {}", path.display())).with_source(e)
        })?;
        let resolver = Self::from_yaml_str(&yaml)?;
        info!(path = %path.display(), entries = resolver.len(), "Loaded canonical resolver");
        Ok(resolver)
    }

    /// Number of recorded names
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CanonicalResolver for StaticResolver {
    fn resolve(&self, normalized: &str) -> Option<String> {
        self.entries.get(normalized).cloned()
    }
}

/// Where a canonical name came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", content = "canonical", rename_all = "snake_case")]
pub enum Resolution {
    /// Resolver cache hit
    Cache(String),
    /// Catalog match at or above the acceptance threshold
    Catalog(String),
    /// Nothing cleared the bar
    Unresolved,
}

impl Resolution {
    /// The resolved canonical name, if any
    #[must_use]
    pub fn canonical(&self) -> Option<&str> {
        match self {
            Self::Cache(name) | Self::Catalog(name) => Some(name),
            Self::Unresolved => None,
        }
    }
}

/// Counts from one canonicalization pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalizationSummary {
    /// Names answered by the resolver
    pub resolved_from_cache: usize,
    /// Names answered by the catalog
    pub resolved_from_catalog: usize,
    /// Names left without a new canonical name
    pub unresolved: usize,
}

impl CanonicalizationSummary {
    /// Exercises visited
    #[must_use]
    pub const fn total(&self) -> usize {
        self.resolved_from_cache + self.resolved_from_catalog + self.unresolved
    }

    fn record(&mut self, resolution: &Resolution) {
        match resolution {
            Resolution::Cache(_) => self.resolved_from_cache += 1,
            Resolution::Catalog(_) => self.resolved_from_catalog += 1,
            Resolution::Unresolved => self.unresolved += 1,
        }
    }
}

impl AddAssign for CanonicalizationSummary {
    fn add_assign(&mut self, other: Self) {
        self.resolved_from_cache += other.resolved_from_cache;
        self.resolved_from_catalog += other.resolved_from_catalog;
        self.unresolved += other.unresolved;
    }
}

/// Assigns canonical exercise names to workouts
#[derive(Debug, Clone)]
pub struct Canonicalizer<R = NoResolver> {
    catalog: CanonicalCatalog,
    resolver: R,
    accept_threshold: f64,
}

impl Default for Canonicalizer {
    fn default() -> Self {
        Self::new(CanonicalCatalog::builtin())
    }
}

impl Canonicalizer {
    /// Canonicalizer over `catalog` with no resolver and the default threshold
    #[must_use]
    pub const fn new(catalog: CanonicalCatalog) -> Self {
        Self {
            catalog,
            resolver: NoResolver,
            accept_threshold: CATALOG_ACCEPT_THRESHOLD,
        }
    }

    /// Canonicalizer using the configured catalog and threshold
    ///
    /// # Errors
    ///
    /// Returns an error if the configured catalog file cannot be loaded
    pub fn from_config(config: &MapperConfig) -> AppResult<Self> {
        Ok(Self::new(config.load_catalog()?).with_accept_threshold(config.accept_threshold))
    }
}

impl<R: CanonicalResolver> Canonicalizer<R> {
    /// Swap in a resolver
    #[must_use]
    pub fn with_resolver<S: CanonicalResolver>(self, resolver: S) -> Canonicalizer<S> {
        Canonicalizer {
            catalog: self.catalog,
            resolver,
            accept_threshold: self.accept_threshold,
        }
    }

    /// Override the acceptance threshold (clamped to [0, 1])
    #[must_use]
    pub fn with_accept_threshold(mut self, threshold: f64) -> Self {
        self.accept_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Catalog in use
    #[must_use]
    pub const fn catalog(&self) -> &CanonicalCatalog {
        &self.catalog
    }

    /// Acceptance threshold in use
    #[must_use]
    pub const fn accept_threshold(&self) -> f64 {
        self.accept_threshold
    }

    /// Resolve a single raw exercise name
    #[must_use]
    pub fn resolve_name(&self, raw_name: &str) -> Resolution {
        let normalized = normalize(raw_name);
        if let Some(cached) = self.resolver.resolve(&normalized) {
            return Resolution::Cache(cached);
        }
        let classification =
            self.catalog
                .classify_with(raw_name, self.accept_threshold, CATALOG_REVIEW_THRESHOLD);
        match (classification.status, classification.canonical) {
            (CatalogStatus::Auto, Some(canonical)) => Resolution::Catalog(canonical),
            _ => Resolution::Unresolved,
        }
    }

    /// Assign canonical names in place
    pub fn canonicalize_in_place(&self, workout: &mut Workout) -> CanonicalizationSummary {
        let mut summary = CanonicalizationSummary::default();
        for mut slot in workout.canonical_slots() {
            let resolution = self.resolve_name(slot.exercise().name());
            debug!(
                block = slot.block_index(),
                exercise = slot.exercise_index(),
                name = %slot.exercise().name(),
                resolution = ?resolution,
                "canonicalized exercise"
            );
            if let Some(canonical) = resolution.canonical() {
                slot.assign_canonical_name(canonical);
            }
            summary.record(&resolution);
        }
        info!(
            title = %workout.title(),
            from_cache = summary.resolved_from_cache,
            from_catalog = summary.resolved_from_catalog,
            unresolved = summary.unresolved,
            "Canonicalized workout"
        );
        summary
    }

    /// Canonicalized copy; `workout` is untouched
    #[must_use]
    pub fn canonicalize(&self, workout: &Workout) -> Workout {
        self.canonicalize_owned(workout.clone())
    }

    /// Canonicalize a workout the caller hands over
    #[must_use]
    pub fn canonicalize_owned(&self, mut workout: Workout) -> Workout {
        self.canonicalize_in_place(&mut workout);
        workout
    }

    /// Canonicalized copies of many workouts, in parallel
    #[must_use]
    pub fn canonicalize_batch(&self, workouts: &[Workout]) -> Vec<Workout> {
        workouts
            .par_iter()
            .map(|workout| self.canonicalize(workout))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_resolver_normalizes_keys() {
        let resolver = StaticResolver::new().with("DB Bench", "Dumbbell Bench Press");
        assert_eq!(
            resolver.resolve(&normalize("dumbbell bench")),
            Some("Dumbbell Bench Press".to_owned())
        );
    }

    #[test]
    fn test_closure_resolver_wins_over_catalog() {
        let canonicalizer = Canonicalizer::default()
            .with_resolver(|normalized: &str| (normalized == "bench press").then(|| "Custom".to_owned()));
        assert_eq!(
            canonicalizer.resolve_name("Bench Press"),
            Resolution::Cache("Custom".to_owned())
        );
    }

    #[test]
    fn test_summary_add_assign() {
        let mut total = CanonicalizationSummary {
            resolved_from_cache: 1,
            resolved_from_catalog: 2,
            unresolved: 0,
        };
        total += CanonicalizationSummary {
            resolved_from_cache: 0,
            resolved_from_catalog: 1,
            unresolved: 3,
        };
        assert_eq!(total.total(), 7);
    }
}
