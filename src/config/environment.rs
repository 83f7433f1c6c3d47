// ABOUTME: Environment-driven mapper configuration with a process-wide singleton
// ABOUTME: Match thresholds, catalog and device list paths, default export format, schedule offset
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::env;
use std::path::PathBuf;
use std::sync::OnceLock;

use pierre_core::constants::matching::CATALOG_ACCEPT_THRESHOLD;
use pierre_core::errors::{AppError, AppResult};
use pierre_intelligence::{CanonicalCatalog, DeviceExerciseList};
use tracing::{info, warn};

use crate::export::ExportFormat;

/// Catalog acceptance threshold for the canonicalizer
pub const ENV_ACCEPT_THRESHOLD: &str = "PIERRE_MAPPER_ACCEPT_THRESHOLD";
/// YAML catalog replacing the built-in one
pub const ENV_CATALOG_PATH: &str = "PIERRE_MAPPER_CATALOG_PATH";
/// Newline-separated device exercise names replacing the built-in list
pub const ENV_DEVICE_EXERCISES_PATH: &str = "PIERRE_MAPPER_DEVICE_EXERCISES_PATH";
/// Export format used when none is requested
pub const ENV_DEFAULT_FORMAT: &str = "PIERRE_MAPPER_DEFAULT_FORMAT";
/// Days from today to the first scheduled planner workout
pub const ENV_SCHEDULE_OFFSET_DAYS: &str = "PIERRE_MAPPER_SCHEDULE_OFFSET_DAYS";

/// Default planner schedule offset in days
pub const DEFAULT_SCHEDULE_OFFSET_DAYS: u32 = 7;

/// Mapper configuration
#[derive(Debug, Clone, PartialEq)]
pub struct MapperConfig {
    /// Catalog acceptance threshold in `[0, 1]`
    pub accept_threshold: f64,
    /// Custom catalog file
    pub catalog_path: Option<PathBuf>,
    /// Custom device exercise list file
    pub device_exercises_path: Option<PathBuf>,
    /// Format used when the caller does not pick one
    pub default_format: ExportFormat,
    /// Planner schedule offset in days
    pub schedule_offset_days: u32,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            accept_threshold: CATALOG_ACCEPT_THRESHOLD,
            catalog_path: None,
            device_exercises_path: None,
            default_format: ExportFormat::PlannerYaml,
            schedule_offset_days: DEFAULT_SCHEDULE_OFFSET_DAYS,
        }
    }
}

/// Global configuration singleton
static MAPPER_CONFIG: OnceLock<MapperConfig> = OnceLock::new();

/// Read a variable, treating unset and blank the same
fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

impl MapperConfig {
    /// Get the global configuration instance
    ///
    /// Invalid environment values are logged and replaced by defaults.
    pub fn global() -> &'static Self {
        MAPPER_CONFIG.get_or_init(|| {
            Self::from_env().unwrap_or_else(|e| {
                warn!("Failed to load mapper config: {e}, using defaults");
                Self::default()
            })
        })
    }

    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns a `ConfigInvalid` error naming the first variable with an invalid value
    pub fn from_env() -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(raw) = non_empty_var(ENV_ACCEPT_THRESHOLD) {
            let threshold: f64 = raw.parse().map_err(|_| {
                AppError::config_invalid(ENV_ACCEPT_THRESHOLD, format!("'{raw}' is not a number"))
            })?;
            if !(0.0..=1.0).contains(&threshold) {
                return Err(AppError::config_invalid(
                    ENV_ACCEPT_THRESHOLD,
                    format!("{threshold} is outside [0, 1]"),
                ));
            }
            config.accept_threshold = threshold;
        }

        config.catalog_path = non_empty_var(ENV_CATALOG_PATH).map(PathBuf::from);
        config.device_exercises_path = non_empty_var(ENV_DEVICE_EXERCISES_PATH).map(PathBuf::from);

        if let Some(raw) = non_empty_var(ENV_DEFAULT_FORMAT) {
            config.default_format = ExportFormat::parse(&raw)
                .map_err(|e| AppError::config_invalid(ENV_DEFAULT_FORMAT, e.message))?;
        }

        if let Some(raw) = non_empty_var(ENV_SCHEDULE_OFFSET_DAYS) {
            config.schedule_offset_days = raw.parse().map_err(|_| {
                AppError::config_invalid(
                    ENV_SCHEDULE_OFFSET_DAYS,
                    format!("'{raw}' is not a whole number of days"),
                )
            })?;
        }

        info!(
            accept_threshold = config.accept_threshold,
            default_format = %config.default_format,
            schedule_offset_days = config.schedule_offset_days,
            custom_catalog = config.catalog_path.is_some(),
            custom_device_list = config.device_exercises_path.is_some(),
            "Loaded mapper configuration"
        );
        Ok(config)
    }

    /// The configured catalog, or the built-in one
    ///
    /// # Errors
    ///
    /// Returns an error if a configured catalog file cannot be read or parsed
    pub fn load_catalog(&self) -> AppResult<CanonicalCatalog> {
        self.catalog_path
            .as_deref()
            .map_or_else(|| Ok(CanonicalCatalog::builtin()), CanonicalCatalog::from_path)
    }

    /// The configured device exercise list, or the built-in one
    ///
    /// # Errors
    ///
    /// Returns an error if a configured list file cannot be read
    pub fn load_device_list(&self) -> AppResult<DeviceExerciseList> {
        self.device_exercises_path
            .as_deref()
            .map_or_else(|| Ok(DeviceExerciseList::builtin()), DeviceExerciseList::from_path)
    }
}
