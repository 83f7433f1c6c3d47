// ABOUTME: Export engine selecting one of five device encoders through a closed format enum
// ABOUTME: Format names, content types, options, the export entry point and its output envelope
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Export Engine
//!
//! Every encoder reads the same canonical [`Workout`] and produces one device format.
//!
//! ## Supported Formats
//!
//! - **planner-yaml**: GPS-watch planner dialect (strength sport, schedule plan)
//! - **hiit-yaml**: HIIT planner dialect (flat steps, optional `repeatUntilTime`)
//! - **interval-xml**: interval-training XML (`.zwo`)
//! - **smartwatch-json**: smartwatch step/interval JSON plan
//! - **fit**: binary FIT workout file
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pierre_workout_mapper::export::{export, ExportFormat, ExportOptions};
//!
//! let format = ExportFormat::parse("fit")?;
//! let output = export(&workout, format, &ExportOptions::default())?;
//! std::fs::write(format!("workout.{}", output.file_extension), output.body.as_bytes())?;
//! ```

/// Binary FIT encoder
pub mod fit;
/// HIIT planner YAML dialect
pub mod hiit_yaml;
/// Interval-training XML
pub mod interval_xml;
/// Shared step planner
pub mod plan;
/// GPS-watch planner YAML dialect
pub mod planner_yaml;
/// Smartwatch JSON plan
pub mod smartwatch_json;

use std::fmt;

use chrono::{DateTime, Days, NaiveDate, Utc};
use pierre_core::errors::{AppError, AppResult};
use pierre_core::models::Workout;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::environment::DEFAULT_SCHEDULE_OFFSET_DAYS;
use fit::{FitEncoder, FitSport};
use interval_xml::IntervalSport;

/// Export target selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportFormat {
    /// GPS-watch planner YAML (default)
    #[default]
    PlannerYaml,
    /// HIIT planner YAML
    HiitYaml,
    /// Interval-training XML
    IntervalXml,
    /// Smartwatch JSON plan
    SmartwatchJson,
    /// Binary FIT workout
    Fit,
}

impl ExportFormat {
    /// Every format, in listing order
    pub const ALL: [Self; 5] = [
        Self::PlannerYaml,
        Self::HiitYaml,
        Self::IntervalXml,
        Self::SmartwatchJson,
        Self::Fit,
    ];

    /// Parse a format name or alias (case-insensitive)
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedFormat` listing every valid name when `name` is unknown
    pub fn parse(name: &str) -> AppResult<Self> {
        match name.trim().to_lowercase().as_str() {
            "planner-yaml" | "planner_yaml" | "yaml" | "garmin" => Ok(Self::PlannerYaml),
            "hiit-yaml" | "hiit_yaml" | "hiit" => Ok(Self::HiitYaml),
            "interval-xml" | "interval_xml" | "zwo" | "xml" => Ok(Self::IntervalXml),
            "smartwatch-json" | "smartwatch_json" | "workoutkit" | "json" => {
                Ok(Self::SmartwatchJson)
            }
            "fit" => Ok(Self::Fit),
            _ => {
                let valid: Vec<&str> = Self::ALL.iter().map(Self::as_str).collect();
                Err(AppError::unsupported_format(name, &valid))
            }
        }
    }

    /// Canonical format name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PlannerYaml => "planner-yaml",
            Self::HiitYaml => "hiit-yaml",
            Self::IntervalXml => "interval-xml",
            Self::SmartwatchJson => "smartwatch-json",
            Self::Fit => "fit",
        }
    }

    /// MIME content type of the encoded output
    #[must_use]
    pub const fn content_type(&self) -> &'static str {
        match self {
            Self::PlannerYaml | Self::HiitYaml => "application/x-yaml",
            Self::IntervalXml => "application/xml",
            Self::SmartwatchJson => "application/json",
            Self::Fit => "application/octet-stream",
        }
    }

    /// File extension without the dot
    #[must_use]
    pub const fn file_extension(&self) -> &'static str {
        match self {
            Self::PlannerYaml | Self::HiitYaml => "yaml",
            Self::IntervalXml => "zwo",
            Self::SmartwatchJson => "json",
            Self::Fit => "fit",
        }
    }

    /// Whether the output is binary
    #[must_use]
    pub const fn is_binary(&self) -> bool {
        matches!(self, Self::Fit)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Knobs shared by the encoders; every field has a sensible default
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// First scheduled date for planner dialects; `None` means today plus the offset
    pub schedule_start: Option<NaiveDate>,
    /// Creation time stamped into binary files; `None` means now
    pub created_at: Option<DateTime<Utc>>,
    /// Interval XML sport; `None` detects it from the workout
    pub interval_sport: Option<IntervalSport>,
    /// FIT sport; `None` detects it from the workout
    pub fit_sport: Option<FitSport>,
    /// Days after today used when `schedule_start` is unset
    pub schedule_offset_days: u32,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            schedule_start: None,
            created_at: None,
            interval_sport: None,
            fit_sport: None,
            schedule_offset_days: DEFAULT_SCHEDULE_OFFSET_DAYS,
        }
    }
}

impl ExportOptions {
    /// Options carrying the configured schedule offset
    #[must_use]
    pub fn with_schedule_offset(mut self, days: u32) -> Self {
        self.schedule_offset_days = days;
        self
    }

    /// Fix the planner schedule start date
    #[must_use]
    pub const fn with_schedule_start(mut self, date: NaiveDate) -> Self {
        self.schedule_start = Some(date);
        self
    }

    /// Fix the creation timestamp
    #[must_use]
    pub const fn with_created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }

    /// Resolved planner start date
    #[must_use]
    pub fn schedule_date(&self) -> NaiveDate {
        self.schedule_start.unwrap_or_else(|| {
            let today = Utc::now().date_naive();
            today
                .checked_add_days(Days::new(u64::from(self.schedule_offset_days)))
                .unwrap_or(today)
        })
    }
}

/// Encoded payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportBody {
    /// UTF-8 document
    Text(String),
    /// Binary file
    Binary(Vec<u8>),
}

impl ExportBody {
    /// Raw bytes of the payload
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Text(text) => text.as_bytes(),
            Self::Binary(bytes) => bytes,
        }
    }

    /// Text payload, `None` for binary output
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Binary(_) => None,
        }
    }

    /// Payload length in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// True for an empty payload
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}

/// Result of an export: the payload plus how to serve it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutput {
    /// Format actually produced (planner YAML may be routed to HIIT)
    pub format: ExportFormat,
    /// MIME content type
    pub content_type: &'static str,
    /// File extension without the dot
    pub file_extension: &'static str,
    /// Encoded payload
    pub body: ExportBody,
    /// Compatibility warnings; the export still succeeded
    pub warnings: Vec<String>,
}

impl ExportOutput {
    fn new(format: ExportFormat, body: ExportBody, warnings: Vec<String>) -> Self {
        Self {
            format,
            content_type: format.content_type(),
            file_extension: format.file_extension(),
            body,
            warnings,
        }
    }
}

/// Encode `workout` into `format`
///
/// A planner YAML request for a HIIT workout is routed to the HIIT dialect and
/// the routing is reported in `warnings`.
///
/// # Errors
///
/// Returns `EncodeFailed` when the encoder cannot produce a document (for
/// example a FIT file with zero steps) or `SerializationError` when the
/// document cannot be serialized
pub fn export(
    workout: &Workout,
    format: ExportFormat,
    options: &ExportOptions,
) -> AppResult<ExportOutput> {
    let output = match format {
        ExportFormat::PlannerYaml if hiit_yaml::is_hiit(workout) => {
            warn!(title = %workout.title(), "Routing HIIT workout to the HIIT planner dialect");
            let body = hiit_yaml::encode(workout, options)?;
            ExportOutput::new(
                ExportFormat::HiitYaml,
                ExportBody::Text(body),
                vec![format!(
                    "workout '{}' reads as HIIT; exported with the {} dialect",
                    workout.title(),
                    ExportFormat::HiitYaml
                )],
            )
        }
        ExportFormat::PlannerYaml => ExportOutput::new(
            format,
            ExportBody::Text(planner_yaml::encode(workout, options)?),
            Vec::new(),
        ),
        ExportFormat::HiitYaml => ExportOutput::new(
            format,
            ExportBody::Text(hiit_yaml::encode(workout, options)?),
            Vec::new(),
        ),
        ExportFormat::IntervalXml => ExportOutput::new(
            format,
            ExportBody::Text(interval_xml::encode(workout, options)?),
            Vec::new(),
        ),
        ExportFormat::SmartwatchJson => {
            let (body, warnings) = smartwatch_json::encode(workout, options)?;
            ExportOutput::new(format, ExportBody::Text(body), warnings)
        }
        ExportFormat::Fit => {
            let body = FitEncoder::new()
                .with_sport(options.fit_sport)
                .with_created_at(options.created_at)
                .encode(workout)?;
            ExportOutput::new(format, ExportBody::Binary(body), Vec::new())
        }
    };

    for warning in &output.warnings {
        warn!(format = %output.format, "{warning}");
    }
    info!(
        title = %workout.title(),
        requested = %format,
        produced = %output.format,
        bytes = output.body.len(),
        "Exported workout"
    );
    Ok(output)
}

#[cfg(test)]
mod tests {
    use pierre_core::errors::ErrorCode;

    use super::*;

    #[test]
    fn test_format_aliases() {
        assert_eq!(ExportFormat::parse("garmin").unwrap(), ExportFormat::PlannerYaml);
        assert_eq!(ExportFormat::parse("ZWO").unwrap(), ExportFormat::IntervalXml);
        assert_eq!(
            ExportFormat::parse("workoutkit").unwrap(),
            ExportFormat::SmartwatchJson
        );
    }

    #[test]
    fn test_unknown_format_lists_valid_names() {
        let err = ExportFormat::parse("tcx").unwrap_err();
        assert_eq!(err.code, ErrorCode::UnsupportedFormat);
        for format in ExportFormat::ALL {
            assert!(err.message.contains(format.as_str()));
        }
    }

    #[test]
    fn test_schedule_date_prefers_explicit_start() {
        let date = NaiveDate::from_ymd_opt(2025, 11, 5).unwrap();
        let options = ExportOptions::default().with_schedule_start(date);
        assert_eq!(options.schedule_date(), date);
    }
}
