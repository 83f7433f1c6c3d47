// ABOUTME: Canonical workout model shared by ingest, canonicalization, and every exporter
// ABOUTME: Re-exports Workout, Block, Exercise, and their measurement value types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Canonical Workout Model
//!
//! The format-agnostic `Workout → Block → Exercise` tree every exporter reads from.
//!
//! ## Design Principles
//!
//! - **Immutable values**: private fields, accessor methods, consuming builders
//! - **Validated construction**: builders enforce the model invariants
//! - **Single mutation window**: canonical names are assigned through `CanonicalSlot`
//! - **Serializable**: every model round-trips through JSON

mod block;
mod exercise;
mod measure;
mod workout;

pub use block::{Block, BlockBuilder, BlockType};
pub use exercise::{strip_order_prefix, Exercise, ExerciseBuilder};
pub use measure::{Distance, DistanceUnit, Load, MassUnit, Reps, Side};
pub use workout::{
    CanonicalSlot, RestMode, Workout, WorkoutBuilder, WorkoutMetadata, WorkoutSettings,
    WorkoutSource,
};
