// ABOUTME: Measurement value types for exercises: Load, Distance, Reps, and Side
// ABOUTME: Unit parsing and conversion with two-decimal rounding for mass units
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::constants::limits::MAX_LOAD_VALUE;
use crate::constants::units::{
    KG_TO_LB, LB_TO_KG, METERS_PER_KM, METERS_PER_MILE, METERS_PER_YARD,
};
use crate::errors::{AppError, AppResult};

/// `500m`, `1.5 km`, `2mi`, `100 yd`
static DISTANCE_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*(\d+(?:\.\d+)?)\s*(m|km|mi|yd)\s*$").ok());

/// `8-12`, `8 - 12`
static REP_RANGE_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\s*(\d+)\s*-\s*(\d+)\s*$").ok());

/// Leading integer of a free-form rep text (`10 each side`)
static LEADING_INT_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\s*(\d+)\b").ok());

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Mass units accepted for exercise loads
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MassUnit {
    /// Kilograms
    Kg,
    /// Pounds
    Lb,
}

impl MassUnit {
    /// Parse a unit label; unknown labels yield `None`
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "kg" | "kgs" | "kilo" | "kilos" | "kilogram" | "kilograms" => Some(Self::Kg),
            "lb" | "lbs" | "pound" | "pounds" => Some(Self::Lb),
            _ => None,
        }
    }

    /// Short label (`kg` / `lb`)
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Kg => "kg",
            Self::Lb => "lb",
        }
    }
}

/// Weight used for an exercise
///
/// `value` is the stated weight; when `per_side` is set (dumbbells, single-arm
/// work) the total moved is twice the stated value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Load {
    value: f64,
    unit: MassUnit,
    #[serde(default)]
    per_side: bool,
}

impl Load {
    /// Create a load, rejecting non-positive, non-finite, or implausibly large values
    ///
    /// # Errors
    ///
    /// Returns `ValueOutOfRange` when the value is not in `(0, 2000]`
    pub fn new(value: f64, unit: MassUnit, per_side: bool) -> AppResult<Self> {
        if !value.is_finite() || value <= 0.0 {
            return Err(AppError::out_of_range(
                "load.value",
                format!("load must be a positive number, got {value}"),
            ));
        }
        if value > MAX_LOAD_VALUE {
            return Err(AppError::out_of_range(
                "load.value",
                format!("load {value} exceeds maximum of {MAX_LOAD_VALUE}"),
            ));
        }
        Ok(Self {
            value,
            unit,
            per_side,
        })
    }

    /// Stated value in the stated unit
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }

    /// Stated unit
    #[must_use]
    pub const fn unit(&self) -> MassUnit {
        self.unit
    }

    /// Whether the value applies to each side
    #[must_use]
    pub const fn per_side(&self) -> bool {
        self.per_side
    }

    /// Stated value in kilograms, rounded to two decimals
    #[must_use]
    pub fn to_kg(&self) -> f64 {
        match self.unit {
            MassUnit::Kg => round2(self.value),
            MassUnit::Lb => round2(self.value * LB_TO_KG),
        }
    }

    /// Stated value in pounds, rounded to two decimals
    #[must_use]
    pub fn to_lb(&self) -> f64 {
        match self.unit {
            MassUnit::Kg => round2(self.value * KG_TO_LB),
            MassUnit::Lb => round2(self.value),
        }
    }

    /// Total load moved in the stated unit (doubled for per-side loads)
    #[must_use]
    pub fn total(&self) -> f64 {
        if self.per_side {
            self.value * 2.0
        } else {
            self.value
        }
    }

    /// Same load expressed in another unit
    #[must_use]
    pub fn in_unit(&self, unit: MassUnit) -> Self {
        let value = match unit {
            MassUnit::Kg => self.to_kg(),
            MassUnit::Lb => self.to_lb(),
        };
        Self {
            value,
            unit,
            per_side: self.per_side,
        }
    }
}

impl fmt::Display for Load {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit.as_str())?;
        if self.per_side {
            write!(f, " per side")?;
        }
        Ok(())
    }
}

/// Distance units accepted for exercises
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DistanceUnit {
    /// Meters
    #[serde(rename = "m")]
    Meters,
    /// Kilometers
    #[serde(rename = "km")]
    Kilometers,
    /// Statute miles
    #[serde(rename = "mi")]
    Miles,
    /// Yards
    #[serde(rename = "yd")]
    Yards,
}

impl DistanceUnit {
    /// Parse a unit label; unknown labels yield `None`
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "m" | "meter" | "meters" | "metre" | "metres" => Some(Self::Meters),
            "km" | "kilometer" | "kilometers" | "kilometre" | "kilometres" => {
                Some(Self::Kilometers)
            }
            "mi" | "mile" | "miles" => Some(Self::Miles),
            "yd" | "yard" | "yards" => Some(Self::Yards),
            _ => None,
        }
    }

    /// Short label used in exported text
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Meters => "m",
            Self::Kilometers => "km",
            Self::Miles => "mi",
            Self::Yards => "yd",
        }
    }
}

/// Distance target for an exercise
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Distance {
    value: f64,
    unit: DistanceUnit,
}

impl Distance {
    /// Create a distance, rejecting non-positive or non-finite values
    ///
    /// # Errors
    ///
    /// Returns `ValueOutOfRange` for values that are not strictly positive
    pub fn new(value: f64, unit: DistanceUnit) -> AppResult<Self> {
        if !value.is_finite() || value <= 0.0 {
            return Err(AppError::out_of_range(
                "distance",
                format!("distance must be a positive number, got {value}"),
            ));
        }
        Ok(Self { value, unit })
    }

    /// Parse strings like `500m` or `1.5 km`
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let captures = DISTANCE_PATTERN.as_ref()?.captures(text)?;
        let value: f64 = captures.get(1)?.as_str().parse().ok()?;
        let unit = DistanceUnit::parse(captures.get(2)?.as_str())?;
        Self::new(value, unit).ok()
    }

    /// Stated value
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }

    /// Stated unit
    #[must_use]
    pub const fn unit(&self) -> DistanceUnit {
        self.unit
    }

    /// Distance in meters
    #[must_use]
    pub fn meters(&self) -> f64 {
        match self.unit {
            DistanceUnit::Meters => self.value,
            DistanceUnit::Kilometers => self.value * METERS_PER_KM,
            DistanceUnit::Miles => self.value * METERS_PER_MILE,
            DistanceUnit::Yards => self.value * METERS_PER_YARD,
        }
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.as_str())
    }
}

/// Repetition target: a plain count, or a scheme kept verbatim (`8-10`, `3+1`, `AMRAP`, `500m`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Reps {
    /// Plain repetition count
    Count(u32),
    /// Symbolic or range scheme
    Text(String),
}

impl Reps {
    /// Best-effort numeric count: ranges average to the nearest integer, free text
    /// uses its leading integer, symbolic schemes yield `None`
    #[must_use]
    pub fn leading_count(&self) -> Option<u32> {
        match self {
            Self::Count(count) => Some(*count),
            Self::Text(text) => {
                if let Some(captures) = REP_RANGE_PATTERN
                    .as_ref()
                    .and_then(|pattern| pattern.captures(text))
                {
                    let low: u32 = captures.get(1)?.as_str().parse().ok()?;
                    let high: u32 = captures.get(2)?.as_str().parse().ok()?;
                    return Some((low + high).div_ceil(2));
                }
                LEADING_INT_PATTERN
                    .as_ref()?
                    .captures(text)?
                    .get(1)?
                    .as_str()
                    .parse()
                    .ok()
            }
        }
    }
}

impl fmt::Display for Reps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(count) => write!(f, "{count}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// Which side an exercise is performed on
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Left side only
    Left,
    /// Right side only
    Right,
    /// Both sides
    Both,
    /// Alternating sides
    Alternating,
}

impl Side {
    /// Parse a side label; unknown labels yield `None`
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "left" | "l" => Some(Self::Left),
            "right" | "r" => Some(Self::Right),
            "both" | "each" | "each side" => Some(Self::Both),
            "alternating" | "alt" => Some(Self::Alternating),
            _ => None,
        }
    }
}
