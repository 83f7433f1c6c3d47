// ABOUTME: Integration tests for the workout store port and the export use case
// ABOUTME: Owner scoping, not-found handling, canonicalized output and export status recording
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::Arc;

use pierre_core::errors::ErrorCode;
use pierre_workout_mapper::canonicalize::{Canonicalizer, StaticResolver};
use pierre_workout_mapper::export::ExportFormat;
use pierre_workout_mapper::ports::{ExportWorkout, InMemoryWorkoutStore, WorkoutStore};
use uuid::Uuid;

#[tokio::test]
async fn test_store_is_scoped_by_owner() {
    common::init_test_logging();
    let store = InMemoryWorkoutStore::new();
    let owner = Uuid::new_v4();
    let id = store.save(&common::superset_workout(), owner).await.unwrap();

    let stored = store.get(id, owner).await.unwrap().unwrap();
    assert_eq!(stored.id(), Some(id));
    assert_eq!(stored.title(), "Push Pull");

    assert!(store.get(id, Uuid::new_v4()).await.unwrap().is_none());
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_export_records_status_on_stored_workout() {
    let store = Arc::new(InMemoryWorkoutStore::new());
    let owner = Uuid::new_v4();
    let id = store.save(&common::superset_workout(), owner).await.unwrap();

    let use_case = ExportWorkout::new(Arc::clone(&store)).with_options(common::fixed_options());
    let output = use_case
        .execute(id, owner, ExportFormat::PlannerYaml, true)
        .await
        .unwrap();
    assert_eq!(output.format, ExportFormat::PlannerYaml);

    let stored = store.get(id, owner).await.unwrap().unwrap();
    assert!(stored.metadata().is_exported);
    assert_eq!(
        stored.metadata().exported_to_device.as_deref(),
        Some("planner-yaml")
    );
    assert!(stored.metadata().exported_at.is_some());
}

#[tokio::test]
async fn test_export_canonicalizes_a_copy() {
    let store = Arc::new(InMemoryWorkoutStore::new());
    let owner = Uuid::new_v4();
    let id = store.save(&common::superset_workout(), owner).await.unwrap();

    let canonicalizer = Canonicalizer::default()
        .with_resolver(StaticResolver::new().with("A1: Bench Press", "Floor Press"));
    let use_case = ExportWorkout::new(Arc::clone(&store))
        .with_canonicalizer(canonicalizer)
        .with_options(common::fixed_options());
    let output = use_case
        .execute(id, owner, ExportFormat::SmartwatchJson, false)
        .await
        .unwrap();

    assert!(output.body.as_text().unwrap().contains("Floor Press"));

    let stored = store.get(id, owner).await.unwrap().unwrap();
    assert!(stored.all_exercises().all(|e| e.canonical_name().is_none()));
    assert!(!stored.metadata().is_exported);
}

#[tokio::test]
async fn test_routed_export_records_produced_format() {
    let store = Arc::new(InMemoryWorkoutStore::new());
    let owner = Uuid::new_v4();
    let id = store.save(&common::for_time_workout(), owner).await.unwrap();

    let output = ExportWorkout::new(Arc::clone(&store))
        .with_options(common::fixed_options())
        .execute(id, owner, ExportFormat::PlannerYaml, true)
        .await
        .unwrap();
    assert_eq!(output.format, ExportFormat::HiitYaml);

    let stored = store.get(id, owner).await.unwrap().unwrap();
    assert_eq!(
        stored.metadata().exported_to_device.as_deref(),
        Some("hiit-yaml")
    );
}

#[tokio::test]
async fn test_missing_workout_is_not_found() {
    let store = Arc::new(InMemoryWorkoutStore::new());
    let err = ExportWorkout::new(store)
        .execute(Uuid::new_v4(), Uuid::new_v4(), ExportFormat::Fit, true)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_export_status_for_unknown_workout_fails() {
    let store = InMemoryWorkoutStore::new();
    let err = store
        .update_export_status(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "fit",
            common::fixed_instant(),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
    assert!(store.is_empty());
}
