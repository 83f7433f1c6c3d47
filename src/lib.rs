// ABOUTME: Main library entry point for the Pierre workout mapper
// ABOUTME: Ingest, canonicalization, multi-device export, mapping validation and the persistence port
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

// Crate-level attributes:
// - deny(unsafe_code): Zero-tolerance unsafe policy
#![deny(unsafe_code)]

//! # Pierre Workout Mapper
//!
//! Turns loosely structured workout descriptions into a canonical workout model
//! and re-exports that model to device formats.
//!
//! ## Pipeline
//!
//! ```text
//! raw JSON ─► ingest ─► Workout ─► canonicalize ─► export ─► YAML / XML / JSON / FIT
//! ```
//!
//! - **Ingest**: structured blocks or a flat exercise list (grouping recovered
//!   from `A1:` prefixes and `(superset A)` markers)
//! - **Canonicalize**: catalog names assigned through normalization and fuzzy matching
//! - **Export**: five encoders sharing one step planner
//! - **Workflow**: per-exercise device mapping report with review tiers
//!
//! The model lives in `pierre-core`, matching and structure detection in
//! `pierre-intelligence`.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use pierre_workout_mapper::canonicalize::Canonicalizer;
//! use pierre_workout_mapper::export::{export, ExportFormat, ExportOptions};
//! use pierre_workout_mapper::ingest::to_canonical_json;
//! use pierre_core::errors::AppResult;
//!
//! fn main() -> AppResult<()> {
//!     let workout = to_canonical_json(
//!         r#"{"title":"Push","exercises":[{"name":"A1: Bench Press","sets":3,"reps":8},
//!                                      {"name":"A2: Row","sets":3,"reps":8}]}"#,
//!     )?;
//!     let workout = Canonicalizer::default().canonicalize_owned(workout);
//!     let output = export(&workout, ExportFormat::Fit, &ExportOptions::default())?;
//!     println!("{} bytes of {}", output.body.len(), output.content_type);
//!     Ok(())
//! }
//! ```

/// Exercise name canonicalization over a workout
pub mod canonicalize;

/// Environment-driven configuration
pub mod config;

/// Device export encoders
pub mod export;

/// Raw input conversion into the canonical model
pub mod ingest;

/// Structured logging setup for binaries
pub mod logging;

/// Persistence port and the export use case
pub mod ports;

/// Device mapping validation
pub mod workflow;
