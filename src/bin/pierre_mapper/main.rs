// ABOUTME: pierre-mapper CLI - convert, match, validate and inspect workouts from the terminal
// ABOUTME: Parses arguments with clap and dispatches to the command handlers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Export a workout JSON file as a FIT file
//! pierre-mapper convert workout.json --format fit --output workout.fit
//!
//! # Print the planner YAML for a workout (format from PIERRE_MAPPER_DEFAULT_FORMAT)
//! pierre-mapper convert workout.json
//!
//! # Resolve a free-text exercise name
//! pierre-mapper match "db bench press" --limit 3
//!
//! # Check every exercise against the device exercise list
//! pierre-mapper validate workout.json
//!
//! # Show the recovered block structure
//! pierre-mapper detect workout.json
//!
//! # List export formats
//! pierre-mapper formats
//! ```

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use pierre_workout_mapper::config::MapperConfig;
use pierre_workout_mapper::logging;
use tracing::debug;

#[derive(Parser)]
#[command(
    name = "pierre-mapper",
    about = "Pierre Workout Mapper",
    long_about = "Convert loosely structured workouts into canonical form and export them to device formats."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Convert a workout JSON file to a device format
    Convert {
        /// Workout JSON (structured blocks or a flat exercise list)
        input: PathBuf,

        /// Export format (defaults to PIERRE_MAPPER_DEFAULT_FORMAT)
        #[arg(long, short = 'f')]
        format: Option<String>,

        /// Output file (stdout when omitted)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Keep raw exercise names instead of resolving catalog names
        #[arg(long)]
        raw_names: bool,
    },

    /// Resolve an exercise name against the catalog and device list
    Match {
        /// Free-text exercise name
        name: String,

        /// Number of suggestions to show
        #[arg(long, default_value = "5")]
        limit: usize,
    },

    /// Grade every exercise of a workout against the device exercise list
    Validate {
        /// Workout JSON
        input: PathBuf,
    },

    /// Show the block structure recovered from a workout
    Detect {
        /// Workout JSON
        input: PathBuf,
    },

    /// List export formats
    Formats,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_from_env()?;

    let config = MapperConfig::global();
    debug!(?config, "pierre-mapper starting");

    match cli.command {
        Command::Convert {
            input,
            format,
            output,
            raw_names,
        } => commands::convert(config, &input, format.as_deref(), output.as_deref(), raw_names),
        Command::Match { name, limit } => commands::match_name(config, &name, limit),
        Command::Validate { input } => commands::validate(config, &input),
        Command::Detect { input } => commands::detect(&input),
        Command::Formats => {
            commands::formats();
            Ok(())
        }
    }
}
