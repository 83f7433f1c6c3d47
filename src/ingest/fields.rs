// ABOUTME: Lenient field parsers for ingest: structure keywords, rep schemes, loads and distances
// ABOUTME: Duration-string reps become durations, distance and symbolic schemes stay verbatim
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::LazyLock;

use pierre_core::constants::units::SECONDS_PER_MINUTE;
use pierre_core::errors::{AppError, AppResult};
use pierre_core::models::{BlockType, Distance, DistanceUnit, Load, MassUnit, Reps};
use regex::Regex;
use tracing::debug;

use super::input::NumberOrText;

static LEADING_ROUNDS: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\s*(\d+)\s*(?:x\s+)?(.*)$").ok());

static SECONDS_REPS: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)^(\d+)\s*(?:s|sec|secs|second|seconds)$").ok());

static MINUTES_REPS: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)^(\d+)\s*(?:min|mins|minute|minutes)$").ok());

/// Phrases that make any structure text a timed round
const TIMED_MARKERS: &[&str] = &["for time", "for-time", "amrap", "emom", "tabata"];

/// Parsed structure text: block type plus a leading round count if one was given
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructureSpec {
    /// Block type the keyword maps to
    pub block_type: BlockType,
    /// Leading integer, e.g. `3` in `3 rounds`
    pub leading_rounds: Option<u32>,
}

/// Map structure text onto a block type
///
/// A leading integer is split off first (`"3 rounds"` gives 3 rounds of the
/// remainder). Text containing a timed marker anywhere is a timed round.
/// Unrecognized keywords, including a bare `rounds`, are straight.
#[must_use]
pub fn parse_structure(text: Option<&str>) -> StructureSpec {
    let lowered = text.unwrap_or_default().trim().to_lowercase();

    let (leading_rounds, keyword) = LEADING_ROUNDS
        .as_ref()
        .and_then(|pattern| pattern.captures(&lowered))
        .and_then(|captures| {
            let rounds = captures.get(1)?.as_str().parse::<u32>().ok()?;
            let rest = captures.get(2).map_or("", |m| m.as_str()).trim().to_owned();
            Some((Some(rounds).filter(|r| *r > 0), rest))
        })
        .unwrap_or_else(|| (None, lowered.clone()));

    let block_type = if TIMED_MARKERS.iter().any(|marker| lowered.contains(marker)) {
        BlockType::TimedRound
    } else {
        match keyword.as_str() {
            "superset" | "super set" | "superset pair" | "supersets" => BlockType::Superset,
            "circuit" | "giant set" | "giant sets" => BlockType::Circuit,
            "timed-round" | "timed round" | "timed_round" => BlockType::TimedRound,
            _ => BlockType::Straight,
        }
    };

    StructureSpec {
        block_type,
        leading_rounds,
    }
}

/// Rep field split into its meaning
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedReps {
    /// Repetition target kept on the exercise
    pub reps: Option<Reps>,
    /// Duration recovered from a `60s` / `2 min` rep string
    pub duration_seconds: Option<u32>,
}

fn capture_u32(pattern: Option<&Regex>, text: &str) -> Option<u32> {
    pattern?
        .captures(text)?
        .get(1)?
        .as_str()
        .parse()
        .ok()
}

/// Interpret a rep value
///
/// Whole numbers are counts. Strings like `60s` or `2 min` are durations.
/// Distance strings (`500m`) and schemes (`8-10`, `3+1`, `AMRAP`) are kept
/// verbatim as text.
///
/// # Errors
///
/// Returns `ValueOutOfRange` for negative, fractional or oversized numeric reps
pub fn parse_reps(value: Option<&NumberOrText>) -> AppResult<ParsedReps> {
    match value {
        None => Ok(ParsedReps::default()),
        Some(NumberOrText::Number(number)) => {
            if !number.is_finite() || *number < 0.0 || number.fract().abs() > f64::EPSILON {
                return Err(AppError::out_of_range(
                    "reps",
                    format!("reps must be a whole non-negative number, got {number}"),
                ));
            }
            if *number > f64::from(u32::MAX) {
                return Err(AppError::out_of_range(
                    "reps",
                    format!("reps {number} exceeds maximum of {}", u32::MAX),
                ));
            }
            Ok(ParsedReps {
                reps: Some(Reps::Count(*number as u32)),
                duration_seconds: None,
            })
        }
        Some(NumberOrText::Text(text)) => Ok(parse_rep_text(text)),
    }
}

fn parse_rep_text(text: &str) -> ParsedReps {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return ParsedReps::default();
    }
    if let Some(seconds) = capture_u32(SECONDS_REPS.as_ref(), trimmed) {
        return ParsedReps {
            reps: None,
            duration_seconds: Some(seconds),
        };
    }
    if let Some(minutes) = capture_u32(MINUTES_REPS.as_ref(), trimmed) {
        return ParsedReps {
            reps: None,
            duration_seconds: Some(minutes.saturating_mul(SECONDS_PER_MINUTE)),
        };
    }
    if let Ok(count) = trimmed.parse::<u32>() {
        return ParsedReps {
            reps: Some(Reps::Count(count)),
            duration_seconds: None,
        };
    }
    ParsedReps {
        reps: Some(Reps::Text(trimmed.to_owned())),
        duration_seconds: None,
    }
}

/// Build a load from a weight value and unit
///
/// Missing, unparseable, or non-positive weights yield no load. The unit
/// defaults to pounds.
///
/// # Errors
///
/// Returns `ValueOutOfRange` when the weight exceeds the model limit
pub fn parse_load(
    weight: Option<&NumberOrText>,
    unit: Option<&str>,
    per_side: bool,
) -> AppResult<Option<Load>> {
    let value = match weight {
        None => return Ok(None),
        Some(NumberOrText::Number(number)) => *number,
        Some(NumberOrText::Text(text)) => match text.trim().parse::<f64>() {
            Ok(number) => number,
            Err(_) => {
                debug!(weight = %text, "ignoring unparseable weight");
                return Ok(None);
            }
        },
    };
    if value <= 0.0 {
        return Ok(None);
    }
    let unit = unit.and_then(MassUnit::parse).unwrap_or(MassUnit::Lb);
    Load::new(value, unit, per_side).map(Some)
}

/// Build a distance from `distance_m`, or `distance` plus `distance_unit`
///
/// # Errors
///
/// Returns `ValueOutOfRange` for a non-positive numeric distance
pub fn parse_distance(
    distance_m: Option<f64>,
    distance: Option<&NumberOrText>,
    unit: Option<&str>,
) -> AppResult<Option<Distance>> {
    if let Some(meters) = distance_m {
        return Distance::new(meters, DistanceUnit::Meters).map(Some);
    }
    match distance {
        None => Ok(None),
        Some(NumberOrText::Number(value)) => {
            let unit = unit
                .and_then(DistanceUnit::parse)
                .unwrap_or(DistanceUnit::Meters);
            Distance::new(*value, unit).map(Some)
        }
        Some(NumberOrText::Text(text)) => Ok(Distance::parse(text.trim())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structure_keywords() {
        assert_eq!(
            parse_structure(Some("3 rounds")),
            StructureSpec {
                block_type: BlockType::Straight,
                leading_rounds: Some(3),
            }
        );
        assert_eq!(parse_structure(Some("Super Set")).block_type, BlockType::Superset);
        assert_eq!(parse_structure(Some("giant set")).block_type, BlockType::Circuit);
        assert_eq!(parse_structure(Some("AMRAP 20 min")).block_type, BlockType::TimedRound);
        assert_eq!(parse_structure(Some("5 rounds for time")).block_type, BlockType::TimedRound);
        assert_eq!(parse_structure(Some("pyramid")).block_type, BlockType::Straight);
        assert_eq!(parse_structure(None).block_type, BlockType::Straight);
    }

    #[test]
    fn test_rep_strings() {
        let duration = parse_rep_text("60s");
        assert_eq!(duration.duration_seconds, Some(60));
        assert!(duration.reps.is_none());

        assert_eq!(parse_rep_text("2 min").duration_seconds, Some(120));
        assert_eq!(parse_rep_text("12").reps, Some(Reps::Count(12)));
        assert_eq!(parse_rep_text("500m").reps, Some(Reps::Text("500m".to_owned())));
        assert_eq!(parse_rep_text("3+1").reps, Some(Reps::Text("3+1".to_owned())));
    }
}
