// ABOUTME: Workout persistence port, an in-memory adapter, and the export use case built on it
// ABOUTME: Fetch, canonicalize a copy, encode, then optionally record the export on the stored workout
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Persistence boundary
//!
//! Storage is an external collaborator; only its interface lives here. The
//! [`InMemoryWorkoutStore`] adapter backs tests and the CLI.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use pierre_core::errors::{AppError, AppResult};
use pierre_core::models::Workout;
use tracing::{debug, info};
use uuid::Uuid;

use crate::canonicalize::{CanonicalResolver, Canonicalizer, NoResolver};
use crate::export::{export, ExportFormat, ExportOptions, ExportOutput};

/// Workout persistence, scoped by owner
#[async_trait]
pub trait WorkoutStore: Send + Sync {
    /// Workout `id` owned by `owner`, if present
    async fn get(&self, id: Uuid, owner: Uuid) -> AppResult<Option<Workout>>;

    /// Store a workout, assigning an id when it has none; returns the id
    async fn save(&self, workout: &Workout, owner: Uuid) -> AppResult<Uuid>;

    /// Record that workout `id` was exported to `device` at `at`
    async fn update_export_status(
        &self,
        id: Uuid,
        owner: Uuid,
        device: &str,
        at: DateTime<Utc>,
    ) -> AppResult<()>;
}

/// Concurrent in-memory store
#[derive(Debug, Default, Clone)]
pub struct InMemoryWorkoutStore {
    workouts: Arc<DashMap<(Uuid, Uuid), Workout>>,
}

impl InMemoryWorkoutStore {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored workouts
    #[must_use]
    pub fn len(&self) -> usize {
        self.workouts.len()
    }

    /// True when nothing is stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.workouts.is_empty()
    }
}

#[async_trait]
impl WorkoutStore for InMemoryWorkoutStore {
    async fn get(&self, id: Uuid, owner: Uuid) -> AppResult<Option<Workout>> {
        Ok(self
            .workouts
            .get(&(owner, id))
            .map(|entry| entry.value().clone()))
    }

    async fn save(&self, workout: &Workout, owner: Uuid) -> AppResult<Uuid> {
        let id = workout.id().unwrap_or_else(Uuid::new_v4);
        self.workouts
            .insert((owner, id), workout.clone().with_id(id));
        debug!(%id, %owner, "stored workout");
        Ok(id)
    }

    async fn update_export_status(
        &self,
        id: Uuid,
        owner: Uuid,
        device: &str,
        at: DateTime<Utc>,
    ) -> AppResult<()> {
        let (key, workout) = self
            .workouts
            .remove(&(owner, id))
            .ok_or_else(|| AppError::not_found(format!("Workout {id}")))?;
        self.workouts.insert(key, workout.mark_exported(device, at));
        Ok(())
    }
}

/// Export use case: fetch, canonicalize a copy, encode, record the export
pub struct ExportWorkout<S, R = NoResolver> {
    store: Arc<S>,
    canonicalizer: Canonicalizer<R>,
    options: ExportOptions,
}

impl<S: WorkoutStore> ExportWorkout<S> {
    /// Use case with the built-in catalog and default options
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            canonicalizer: Canonicalizer::default(),
            options: ExportOptions::default(),
        }
    }
}

impl<S: WorkoutStore, R: CanonicalResolver> ExportWorkout<S, R> {
    /// Replace the canonicalizer
    #[must_use]
    pub fn with_canonicalizer<T: CanonicalResolver>(
        self,
        canonicalizer: Canonicalizer<T>,
    ) -> ExportWorkout<S, T> {
        ExportWorkout {
            store: self.store,
            canonicalizer,
            options: self.options,
        }
    }

    /// Replace the encoder options
    #[must_use]
    pub fn with_options(mut self, options: ExportOptions) -> Self {
        self.options = options;
        self
    }

    /// Export workout `id` of `owner` as `format`
    ///
    /// When `record` is set the stored workout is marked as exported to the
    /// produced format.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` when the workout does not exist, otherwise
    /// whatever the store or encoder reports
    pub async fn execute(
        &self,
        id: Uuid,
        owner: Uuid,
        format: ExportFormat,
        record: bool,
    ) -> AppResult<ExportOutput> {
        let stored = self
            .store
            .get(id, owner)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Workout {id}")))?;
        let workout = self.canonicalizer.canonicalize(&stored);
        let output = export(&workout, format, &self.options)?;

        if record {
            self.store
                .update_export_status(id, owner, output.format.as_str(), Utc::now())
                .await?;
        }
        info!(%id, %owner, format = %output.format, record, "Export use case completed");
        Ok(output)
    }
}
