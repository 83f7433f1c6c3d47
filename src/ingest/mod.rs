// ABOUTME: Ingest converter turning parser output into the canonical workout model
// ABOUTME: Accepts structured blocks or a flat exercise list handed to structure detection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Ingest
//!
//! Upstream parsers (text, OCR, manual entry) emit a loosely-typed JSON
//! document. This module reads it into [`IngestInput`] and converts it into a
//! validated [`pierre_core::models::Workout`]:
//!
//! - **Structured input**: every block names its structure (`superset`,
//!   `3 rounds`, `for time (cap: 20 min)`, ...) and carries its own exercises
//! - **Flat input**: a single exercise list; grouping is recovered by
//!   [`pierre_intelligence::detect_groups`]
//!
//! Structural problems fail loudly with the offending field path
//! (`blocks[0].exercises[2].name`); lenient scalar parsing never guesses a
//! structure.

mod converter;
mod fields;
mod input;

pub use converter::{to_canonical, to_canonical_json, to_canonical_value};
pub use fields::{parse_reps, parse_structure, ParsedReps, StructureSpec};
pub use input::{IngestBlock, IngestExercise, IngestInput, IngestSettings, NumberOrText};
