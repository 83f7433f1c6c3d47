// ABOUTME: Command handlers for the pierre-mapper CLI
// ABOUTME: File reading, export writing and human-readable reports
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::Result;
use pierre_core::constants::matching::SUGGESTION_CUTOFF;
use pierre_core::models::Workout;
use pierre_workout_mapper::canonicalize::Canonicalizer;
use pierre_workout_mapper::config::MapperConfig;
use pierre_workout_mapper::export::{export, ExportFormat, ExportOptions};
use pierre_workout_mapper::ingest::to_canonical_json;
use pierre_workout_mapper::workflow::validate_workout_mapping;
use serde_json::json;
use tracing::info;

fn read_workout(input: &Path) -> Result<Workout> {
    let raw = fs::read_to_string(input)?;
    Ok(to_canonical_json(&raw)?)
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

/// `convert`: ingest, canonicalize, export, write
pub fn convert(
    config: &MapperConfig,
    input: &Path,
    format: Option<&str>,
    output: Option<&Path>,
    raw_names: bool,
) -> Result<()> {
    let format = format.map_or(Ok(config.default_format), ExportFormat::parse)?;
    let mut workout = read_workout(input)?;
    if !raw_names {
        workout = Canonicalizer::from_config(config)?.canonicalize_owned(workout);
    }

    let options = ExportOptions::default().with_schedule_offset(config.schedule_offset_days);
    let exported = export(&workout, format, &options)?;
    for warning in &exported.warnings {
        eprintln!("warning: {warning}");
    }

    match output {
        Some(path) => {
            fs::write(path, exported.body.as_bytes())?;
            info!(
                path = %path.display(),
                format = %exported.format,
                bytes = exported.body.len(),
                "Wrote export"
            );
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(exported.body.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

/// `match`: catalog classification plus device suggestions
pub fn match_name(config: &MapperConfig, name: &str, limit: usize) -> Result<()> {
    let canonicalizer = Canonicalizer::from_config(config)?;
    let resolution = canonicalizer.resolve_name(name);
    let devices = config.load_device_list()?;
    let device = devices.fuzzy_match(name);
    let suggestions = devices.suggestions(name, limit, SUGGESTION_CUTOFF);

    print_json(&json!({
        "query": name,
        "canonical": resolution,
        "device_match": device,
        "device_tier": device.tier(),
        "suggestions": suggestions,
    }))
}

/// `validate`: device mapping report
pub fn validate(config: &MapperConfig, input: &Path) -> Result<()> {
    let workout = read_workout(input)?;
    let devices = config.load_device_list()?;
    let report = validate_workout_mapping(&workout, &devices);
    print_json(&serde_json::to_value(&report)?)
}

/// `detect`: one line per block with its type, rounds and exercises
pub fn detect(input: &Path) -> Result<()> {
    let workout = read_workout(input)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", workout.title())?;
    for (index, block) in workout.blocks().iter().enumerate() {
        let names: Vec<&str> = block
            .exercises()
            .iter()
            .map(|exercise| exercise.display_name())
            .collect();
        writeln!(
            stdout,
            "  block {}: {} x{} [{}]",
            index + 1,
            block.block_type(),
            block.rounds(),
            names.join(", ")
        )?;
    }
    Ok(())
}

/// `formats`: name, extension and content type of every format
pub fn formats() {
    for format in ExportFormat::ALL {
        println!(
            "{:<16} .{:<5} {}",
            format.as_str(),
            format.file_extension(),
            format.content_type()
        );
    }
}
