// ABOUTME: Integration tests for assigning catalog names to workout exercises
// ABOUTME: Resolver cache priority, catalog acceptance, copy semantics, idempotence and batches
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use pierre_core::models::{BlockBuilder, BlockType, Workout};
use pierre_workout_mapper::canonicalize::{
    CanonicalizationSummary, Canonicalizer, Resolution, StaticResolver,
};

fn mixed_workout() -> Workout {
    let block = BlockBuilder::new(BlockType::Straight)
        .exercise(common::reps_exercise("Goblet Squats", 10))
        .exercise(common::reps_exercise("KB Swings", 15))
        .exercise(common::reps_exercise("Underwater Basket Weaving", 1))
        .build()
        .unwrap();
    common::workout_with("Mixed", block)
}

fn canonical_names(workout: &Workout) -> Vec<Option<&str>> {
    workout
        .all_exercises()
        .map(|exercise| exercise.canonical_name())
        .collect()
}

#[test]
fn test_catalog_assigns_confident_names_only() {
    common::init_test_logging();
    let canonicalizer = Canonicalizer::default();
    let mut workout = mixed_workout();

    let summary = canonicalizer.canonicalize_in_place(&mut workout);

    let names = canonical_names(&workout);
    assert_eq!(names[0], Some("Goblet Squat"));
    assert_eq!(names[2], None);
    assert_eq!(summary.resolved_from_cache, 0);
    assert_eq!(summary.unresolved, 1);
    assert_eq!(summary.total(), 3);
}

#[test]
fn test_resolver_cache_is_consulted_first() {
    let resolver = StaticResolver::new().with("kettlebell swings", "Russian KB Swing");
    let canonicalizer = Canonicalizer::default().with_resolver(resolver);

    assert_eq!(
        canonicalizer.resolve_name("KB Swings"),
        Resolution::Cache("Russian KB Swing".to_owned())
    );

    let mut workout = mixed_workout();
    let summary = canonicalizer.canonicalize_in_place(&mut workout);
    assert_eq!(
        summary,
        CanonicalizationSummary {
            resolved_from_cache: 1,
            resolved_from_catalog: 1,
            unresolved: 1,
        }
    );
    assert_eq!(canonical_names(&workout)[1], Some("Russian KB Swing"));
}

#[test]
fn test_static_resolver_from_yaml() {
    let resolver = StaticResolver::from_yaml_str("\"DB Bench\": Dumbbell Bench Press\n").unwrap();
    assert_eq!(resolver.len(), 1);
    let canonicalizer = Canonicalizer::default().with_resolver(resolver);
    assert_eq!(
        canonicalizer.resolve_name("dumbbell bench").canonical(),
        Some("Dumbbell Bench Press")
    );
}

#[test]
fn test_copy_leaves_original_untouched() {
    let original = mixed_workout();
    let canonical = Canonicalizer::default().canonicalize(&original);

    assert!(canonical_names(&original).iter().all(Option::is_none));
    assert_eq!(canonical_names(&canonical)[0], Some("Goblet Squat"));
    let raw_names = |workout: &Workout| -> Vec<String> {
        workout
            .all_exercises()
            .map(|exercise| exercise.name().to_owned())
            .collect()
    };
    assert_eq!(raw_names(&original), raw_names(&canonical));
}

#[test]
fn test_canonicalization_is_idempotent() {
    let canonicalizer = Canonicalizer::default();
    let once = canonicalizer.canonicalize(&mixed_workout());
    let twice = canonicalizer.canonicalize(&once);
    assert_eq!(once, twice);
}

#[test]
fn test_unresolved_is_not_an_error() {
    let canonicalizer = Canonicalizer::default();
    assert_eq!(canonicalizer.resolve_name(""), Resolution::Unresolved);
    assert_eq!(canonicalizer.resolve_name("!!!"), Resolution::Unresolved);
}

#[test]
fn test_threshold_is_clamped() {
    let canonicalizer = Canonicalizer::default().with_accept_threshold(5.0);
    assert!((canonicalizer.accept_threshold() - 1.0).abs() < f64::EPSILON);
}

#[test]
fn test_batch_preserves_order() {
    let workouts = vec![mixed_workout(), common::superset_workout(), mixed_workout()];
    let results = Canonicalizer::default().canonicalize_batch(&workouts);

    let titles: Vec<&str> = results.iter().map(Workout::title).collect();
    assert_eq!(titles, ["Mixed", "Push Pull", "Mixed"]);
    assert_eq!(canonical_names(&results[2])[0], Some("Goblet Squat"));
}
