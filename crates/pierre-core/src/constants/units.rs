// ABOUTME: Unit conversion constants for mass and distance
// ABOUTME: Shared by Load and Distance conversions and by every exporter
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Pounds to kilograms
pub const LB_TO_KG: f64 = 0.453_592_37;

/// Kilograms to pounds
pub const KG_TO_LB: f64 = 2.204_622_62;

/// Meters per kilometer
pub const METERS_PER_KM: f64 = 1000.0;

/// Meters per statute mile
pub const METERS_PER_MILE: f64 = 1609.344;

/// Meters per yard
pub const METERS_PER_YARD: f64 = 0.9144;

/// Seconds per minute
pub const SECONDS_PER_MINUTE: u32 = 60;

/// Seconds per hour
pub const SECONDS_PER_HOUR: u32 = 3600;
