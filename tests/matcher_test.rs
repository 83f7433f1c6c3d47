// ABOUTME: Integration tests for name normalization, fuzzy matching and confidence tiers
// ABOUTME: Exercises find_match, top_matches, the canonical catalog and device exercise lists
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use pierre_intelligence::{
    find_match, normalize, top_matches, CanonicalCatalog, CatalogMatcher, CatalogStatus,
    ConfidenceTier, DeviceExerciseList, MatchMethod, MatchResult,
};

const BENCH_CANDIDATES: [&str; 2] = ["Barbell Bench Press", "Dumbbell Bench Press"];

#[test]
fn test_db_bench_press_resolves_to_dumbbell() {
    common::init_test_logging();
    let result = find_match("db bench press", &BENCH_CANDIDATES, 0.7);
    assert_eq!(result.name.as_deref(), Some("Dumbbell Bench Press"));
    assert!(result.confidence >= 0.7);
}

#[test]
fn test_empty_candidates_yield_no_match() {
    let empty: [&str; 0] = [];
    let result = find_match("squat", &empty, 0.0);
    assert_eq!(result, MatchResult::none());
    assert!(result.name.is_none());
    assert!(result.confidence.abs() < f64::EPSILON);
}

#[test]
fn test_confidence_stays_in_unit_interval() {
    let candidates = ["Back Squat", "Front Squat", "Push Up", "Deadlift", "Run"];
    for query in [
        "squat",
        "BACK SQUAT!!",
        "push-ups",
        "zzz",
        "",
        "the and of",
        "front back squat deadlift",
    ] {
        let result = find_match(query, &candidates, 0.0);
        assert!(
            (0.0..=1.0).contains(&result.confidence),
            "{query}: {}",
            result.confidence
        );
    }
}

#[test]
fn test_below_threshold_withholds_name_but_keeps_score() {
    let result = find_match("bench row", &BENCH_CANDIDATES, 0.99);
    assert!(result.name.is_none());
    assert!(result.confidence > 0.0);
}

#[test]
fn test_tier_boundaries_are_exact() {
    assert_eq!(ConfidenceTier::classify(true, 1.0), ConfidenceTier::Valid);
    assert_eq!(ConfidenceTier::classify(true, 0.88), ConfidenceTier::Valid);
    assert_eq!(
        ConfidenceTier::classify(true, 0.879_999),
        ConfidenceTier::NeedsReview
    );
    assert_eq!(
        ConfidenceTier::classify(true, 0.40),
        ConfidenceTier::NeedsReview
    );
    assert_eq!(
        ConfidenceTier::classify(true, 0.399_999),
        ConfidenceTier::Unmapped
    );
    assert_eq!(ConfidenceTier::classify(false, 0.95), ConfidenceTier::Unmapped);
    assert_eq!(
        ConfidenceTier::from_match(&MatchResult::none()),
        ConfidenceTier::Unmapped
    );
    assert_eq!(ConfidenceTier::NeedsReview.to_string(), "needs_review");
}

#[test]
fn test_top_matches_sorted_and_limited() {
    let candidates = [
        "Barbell Bench Press",
        "Dumbbell Bench Press",
        "Incline Dumbbell Bench Press",
        "Squat",
    ];
    let suggestions = top_matches("dumbbell bench", &candidates, 2, 0.3);
    assert_eq!(suggestions.len(), 2);
    assert!(suggestions[0].confidence >= suggestions[1].confidence);
    assert!(suggestions.iter().all(|s| s.name != "Squat"));
    assert!(top_matches("", &candidates, 5, 0.0).is_empty());
}

#[test]
fn test_normalize_pipeline() {
    assert_eq!(normalize("DB Bench-Presses"), "dumbbell bench press");
    assert_eq!(normalize("RDLs"), "romanian deadlift");
    assert_eq!(normalize("  "), "");
}

#[test]
fn test_catalog_classification_tiers() {
    let catalog = CanonicalCatalog::builtin();

    let exact = catalog.classify("Dumbbell Bench Press");
    assert_eq!(exact.status, CatalogStatus::Auto);
    assert_eq!(exact.canonical.as_deref(), Some("Dumbbell Bench Press"));

    // equipment keyword breaks the tie with the "bench press" synonym
    let db = catalog.classify("db bench press");
    assert_eq!(db.canonical.as_deref(), Some("Dumbbell Bench Press"));
    assert!(db
        .alternates
        .iter()
        .any(|alternate| alternate.name == "Barbell Bench Press"));

    let unknown = catalog.classify("Underwater Basket Weaving");
    assert_ne!(unknown.status, CatalogStatus::Auto);
    assert!(unknown.alternates.len() <= 5);
}

#[test]
fn test_catalog_from_yaml() {
    let catalog = CanonicalCatalog::from_yaml_str(
        "- canonical: Zercher Squat\n  synonyms: [zercher]\n  equipment: [barbell]\n  category: squat\n",
    )
    .unwrap();
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.category_of("Zercher Squat"), Some("squat"));

    assert!(CanonicalCatalog::from_yaml_str("- canonical: '  '\n").is_err());
}

#[test]
fn test_layered_catalog_matcher_stages() {
    let matcher = CatalogMatcher::new(CanonicalCatalog::builtin());

    let exact = matcher.match_name("goblet squat");
    assert_eq!(exact.method, MatchMethod::Exact);
    assert!((exact.confidence - 1.0).abs() < f64::EPSILON);

    let alias = matcher.match_name("RFESS");
    assert_eq!(alias.method, MatchMethod::Alias);
    assert_eq!(alias.canonical.as_deref(), Some("Bulgarian Split Squat"));

    let none = matcher.match_name("");
    assert_eq!(none.method, MatchMethod::None);

    let batch = matcher.match_batch(&["ohp", "kb swing", "goblet squat"]);
    let canonical: Vec<Option<&str>> = batch.iter().map(|m| m.canonical.as_deref()).collect();
    assert_eq!(
        canonical,
        [
            Some("Overhead Press"),
            Some("Kettlebell Swing"),
            Some("Goblet Squat")
        ]
    );
}

#[test]
fn test_device_list_threshold_and_suggestions() {
    let devices = DeviceExerciseList::from_lines("Bench Press\n\n  Goblet Squat \nRun\n");
    assert_eq!(devices.len(), 3);
    assert_eq!(devices.names()[1], "Goblet Squat");

    let hit = devices.find("goblet squats", 0.8);
    assert_eq!(hit.name.as_deref(), Some("Goblet Squat"));

    let miss = devices.find("underwater basket weaving", 0.8);
    assert_eq!(miss, MatchResult::none());

    let suggestions = devices.suggestions("squat", 5, 0.3);
    assert_eq!(suggestions[0].name, "Goblet Squat");
}

#[test]
fn test_device_fuzzy_match_uses_builtin_names() {
    let devices = DeviceExerciseList::builtin();
    let result = devices.fuzzy_match("Burpees");
    assert_eq!(result.name.as_deref(), Some("Burpee"));
    assert_eq!(result.tier(), ConfidenceTier::Valid);
}
