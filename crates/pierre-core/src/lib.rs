// ABOUTME: Core types and constants for the Pierre workout mapper
// ABOUTME: Foundation crate with error handling, constants, and the canonical workout model
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Core
//!
//! Foundation crate providing shared types and constants for the Pierre workout
//! mapper. This crate is designed to change infrequently, enabling incremental
//! compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and `AppResult`
//! - **constants**: Limits, unit conversions, and matching thresholds
//! - **models**: The canonical workout model (`Workout` → `Block` → `Exercise`)

/// Unified error handling system with standard error codes
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Canonical workout model (Workout, Block, Exercise, Load, etc.)
pub mod models;
