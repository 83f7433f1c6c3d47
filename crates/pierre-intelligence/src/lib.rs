// ABOUTME: Exercise name matching and workout structure inference engine
// ABOUTME: Normalization, token-set similarity, catalog and device matching, superset/circuit detection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Intelligence
//!
//! The heuristic half of the workout mapper. Everything here is a pure function
//! over text and model values; the lookup tables (abbreviations, stopwords,
//! plurals, aliases, built-in catalogs) are loaded once and read-only afterwards.
//!
//! ## Modules
//!
//! - **normalize**: name normalization (`normalize`)
//! - **similarity**: order-insensitive token-set similarity
//! - **matcher**: `find_match`, `top_matches`, and confidence tiering
//! - **catalog**: canonical exercise catalog and the layered catalog matcher
//! - **device**: device-specific exercise name lists
//! - **structure**: superset/circuit inference over flat exercise lists

/// Exercise name normalization
pub mod normalize;

/// Token-set similarity scoring
pub mod similarity;

/// Free-text to candidate matching with confidence tiers
pub mod matcher;

/// Canonical exercise catalog and layered catalog matching
pub mod catalog;

/// Device-specific exercise name lists
pub mod device;

/// Superset and circuit inference from flat exercise lists
pub mod structure;

pub use catalog::{
    CanonicalCatalog, CatalogEntry, CatalogMatcher, CatalogStatus, Classification, ExerciseMatch,
    MatchMethod,
};
pub use device::DeviceExerciseList;
pub use matcher::{find_match, top_matches, ConfidenceTier, MatchResult, Suggestion};
pub use normalize::normalize;
pub use structure::detect_groups;
