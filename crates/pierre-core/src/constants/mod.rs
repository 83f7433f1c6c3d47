// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Model limits, unit conversions, and match confidence thresholds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Constants are grouped into logical domains rather than being in a single large file.

/// Unit conversion and measurement constants
pub mod units;

/// Workout model limits
pub mod limits {
    /// Maximum workout title length in characters
    pub const MAX_TITLE_LENGTH: usize = 200;
    /// Maximum description or notes length in characters
    pub const MAX_TEXT_LENGTH: usize = 2000;
    /// Maximum load value accepted (either unit)
    pub const MAX_LOAD_VALUE: f64 = 2000.0;
    /// Maximum tag length after trimming
    pub const MAX_TAG_LENGTH: usize = 50;
    /// Default title for imported workouts without one
    pub const DEFAULT_WORKOUT_TITLE: &str = "Imported Workout";
}

/// Confidence thresholds for exercise name matching
pub mod matching {
    /// Confidence at or above which a device match is auto-accepted
    pub const VALID_THRESHOLD: f64 = 0.88;
    /// Confidence at or above which a match is surfaced for review
    pub const REVIEW_THRESHOLD: f64 = 0.40;
    /// Acceptance threshold for assigning a catalog canonical name
    pub const CATALOG_ACCEPT_THRESHOLD: f64 = 0.85;
    /// Catalog classification review threshold
    pub const CATALOG_REVIEW_THRESHOLD: f64 = 0.60;
    /// Default device list matching threshold
    pub const DEVICE_MATCH_THRESHOLD: f64 = 0.80;
    /// Device fuzzy threshold for single short words
    pub const DEVICE_SHORT_NAME_THRESHOLD: f64 = 0.85;
    /// Device fuzzy threshold for everything else
    pub const DEVICE_FUZZY_THRESHOLD: f64 = 0.70;
    /// Device retry threshold when a single word matched a much longer name
    pub const DEVICE_STRICT_THRESHOLD: f64 = 0.90;
    /// Default cutoff for suggestion lists
    pub const SUGGESTION_CUTOFF: f64 = 0.30;
    /// Default number of suggestions returned
    pub const SUGGESTION_LIMIT: usize = 5;
    /// Fuzzy scores below this are rejected by the layered matcher
    pub const FUZZY_REJECT_THRESHOLD: f64 = 0.50;
    /// Fuzzy scores at or above this auto-accept in the layered matcher
    pub const FUZZY_AUTO_ACCEPT: f64 = 0.90;
    /// Confidence assigned to synonym hits in the layered matcher
    pub const ALIAS_CONFIDENCE: f64 = 0.95;
    /// Confidence assigned to normalized synonym hits in the layered matcher
    pub const NORMALIZED_ALIAS_CONFIDENCE: f64 = 0.93;
    /// Layered matcher bonus when an entry's equipment appears in the query
    pub const EQUIPMENT_BONUS: f64 = 0.05;
    /// Catalog suggestion bonus per equipment or modifier keyword in the query
    pub const KEYWORD_BONUS: f64 = 0.03;
}
