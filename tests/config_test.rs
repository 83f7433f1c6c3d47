// ABOUTME: Integration tests for environment-driven mapper configuration
// ABOUTME: Defaults, validated overrides, and loading catalog and device list files from disk
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::env;
use std::fs;
use std::path::PathBuf;

use pierre_core::errors::ErrorCode;
use pierre_workout_mapper::canonicalize::Canonicalizer;
use pierre_workout_mapper::config::environment::{
    ENV_ACCEPT_THRESHOLD, ENV_CATALOG_PATH, ENV_DEFAULT_FORMAT, ENV_DEVICE_EXERCISES_PATH,
    ENV_SCHEDULE_OFFSET_DAYS,
};
use pierre_workout_mapper::config::MapperConfig;
use pierre_workout_mapper::export::ExportFormat;
use serial_test::serial;
use tempfile::TempDir;

const ALL_VARS: [&str; 5] = [
    ENV_ACCEPT_THRESHOLD,
    ENV_CATALOG_PATH,
    ENV_DEVICE_EXERCISES_PATH,
    ENV_DEFAULT_FORMAT,
    ENV_SCHEDULE_OFFSET_DAYS,
];

fn clear_env() {
    for key in ALL_VARS {
        env::remove_var(key);
    }
}

#[test]
#[serial]
fn test_defaults_without_environment() {
    common::init_test_logging();
    clear_env();
    let config = MapperConfig::from_env().unwrap();
    assert!((config.accept_threshold - 0.85).abs() < f64::EPSILON);
    assert_eq!(config.default_format, ExportFormat::PlannerYaml);
    assert_eq!(config.schedule_offset_days, 7);
    assert!(config.catalog_path.is_none());
}

#[test]
#[serial]
fn test_valid_overrides() {
    clear_env();
    env::set_var(ENV_ACCEPT_THRESHOLD, " 0.9 ");
    env::set_var(ENV_DEFAULT_FORMAT, "fit");
    env::set_var(ENV_SCHEDULE_OFFSET_DAYS, "0");
    env::set_var(ENV_DEVICE_EXERCISES_PATH, "");

    let config = MapperConfig::from_env().unwrap();
    clear_env();

    assert!((config.accept_threshold - 0.9).abs() < f64::EPSILON);
    assert_eq!(config.default_format, ExportFormat::Fit);
    assert_eq!(config.schedule_offset_days, 0);
    assert!(config.device_exercises_path.is_none());
}

#[test]
#[serial]
fn test_invalid_values_name_their_variable() {
    for (key, value) in [
        (ENV_ACCEPT_THRESHOLD, "1.5"),
        (ENV_ACCEPT_THRESHOLD, "high"),
        (ENV_DEFAULT_FORMAT, "tcx"),
        (ENV_SCHEDULE_OFFSET_DAYS, "-3"),
    ] {
        clear_env();
        env::set_var(key, value);
        let err = MapperConfig::from_env().unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigInvalid, "{key}={value}");
        assert_eq!(err.field.as_deref(), Some(key));
    }
    clear_env();
}

#[test]
#[serial]
fn test_catalog_and_device_list_from_files() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let catalog_path = dir.path().join("catalog.yaml");
    fs::write(
        &catalog_path,
        "- canonical: Landmine Press\n  synonyms: [landmine, lm press]\n  category: shoulder_press\n",
    )
    .unwrap();
    let devices_path = dir.path().join("devices.txt");
    fs::write(&devices_path, "Landmine Press\nRun\n").unwrap();

    env::set_var(ENV_CATALOG_PATH, &catalog_path);
    env::set_var(ENV_DEVICE_EXERCISES_PATH, &devices_path);
    let config = MapperConfig::from_env().unwrap();
    clear_env();

    let catalog = config.load_catalog().unwrap();
    assert_eq!(catalog.len(), 1);
    let devices = config.load_device_list().unwrap();
    assert_eq!(devices.names(), ["Landmine Press", "Run"]);

    let canonicalizer = Canonicalizer::from_config(&config).unwrap();
    assert_eq!(
        canonicalizer.resolve_name("LM Press").canonical(),
        Some("Landmine Press")
    );
}

#[test]
fn test_missing_files_are_config_errors() {
    let config = MapperConfig {
        catalog_path: Some(PathBuf::from("/nonexistent/catalog.yaml")),
        device_exercises_path: Some(PathBuf::from("/nonexistent/devices.txt")),
        ..MapperConfig::default()
    };
    assert_eq!(config.load_catalog().unwrap_err().code, ErrorCode::ConfigError);
    assert_eq!(
        config.load_device_list().unwrap_err().code,
        ErrorCode::ConfigError
    );
}
