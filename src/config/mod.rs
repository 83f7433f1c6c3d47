// ABOUTME: Configuration management module for mapper settings
// ABOUTME: Environment variables, defaults, and the global configuration instance
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//! Configuration module for the Pierre workout mapper
//!
//! Configuration is environment-only; there are no config files besides the
//! optional catalog and device list the environment can point at.

/// Environment-driven mapper configuration
pub mod environment;

pub use environment::MapperConfig;
