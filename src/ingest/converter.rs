// ABOUTME: Converts parsed ingest documents into the canonical workout model
// ABOUTME: Structured blocks map keyword-by-keyword, flat lists go through structure detection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use pierre_core::constants::limits::DEFAULT_WORKOUT_TITLE;
use pierre_core::errors::{AppError, AppResult};
use pierre_core::models::{
    Block, BlockBuilder, BlockType, Exercise, ExerciseBuilder, RestMode, Side, Workout,
    WorkoutBuilder, WorkoutMetadata, WorkoutSettings, WorkoutSource,
};
use pierre_intelligence::detect_groups;
use serde_json::Value;
use tracing::{debug, info};

use super::fields::{parse_distance, parse_load, parse_reps, parse_structure};
use super::input::{IngestBlock, IngestExercise, IngestInput, IngestSettings};

/// Re-root a field-level error under `prefix`
fn under(prefix: &str) -> impl Fn(AppError) -> AppError + '_ {
    move |error| {
        let field = match error.field.as_deref() {
            Some(inner) if !inner.is_empty() => format!("{prefix}.{inner}"),
            _ => prefix.to_owned(),
        };
        error.with_field(field)
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(ToOwned::to_owned)
}

/// Convert one exercise; errors carry field names relative to the exercise
fn convert_exercise(input: &IngestExercise) -> AppResult<Exercise> {
    let name = non_blank(input.name.as_deref()).ok_or_else(|| AppError::missing_field("name"))?;
    let parsed_reps = parse_reps(input.reps.as_ref())?;
    let load = parse_load(
        input.weight.as_ref(),
        input.weight_unit.as_deref(),
        input.per_side,
    )
    .map_err(|e| e.with_field("weight"))?;
    let distance = parse_distance(
        input.distance_m,
        input.distance.as_ref(),
        input.distance_unit.as_deref(),
    )
    .map_err(|e| e.with_field("distance"))?;

    ExerciseBuilder::new(name)
        .canonical_name_opt(non_blank(input.canonical_name.as_deref()))
        .sets_opt(input.sets)
        .reps_opt(parsed_reps.reps)
        .duration_seconds_opt(input.duration_sec.or(parsed_reps.duration_seconds))
        .rest_seconds_opt(input.rest_sec)
        .distance_opt(distance)
        .load_opt(load)
        .equipment(input.equipment.clone())
        .modifiers(input.modifiers.clone())
        .tempo_opt(non_blank(input.tempo.as_deref()))
        .side_opt(input.side.as_deref().and_then(Side::parse))
        .notes_opt(non_blank(input.notes.as_deref()))
        .exercise_type_opt(non_blank(input.exercise_type.as_deref()))
        .superset_label_opt(non_blank(input.superset_label.as_deref()))
        .circuit_label_opt(non_blank(input.circuit_label.as_deref()))
        .build()
}

fn convert_exercises(inputs: &[IngestExercise], prefix: &str) -> AppResult<Vec<Exercise>> {
    inputs
        .iter()
        .enumerate()
        .map(|(index, exercise)| {
            convert_exercise(exercise).map_err(under(&format!("{prefix}[{index}]")))
        })
        .collect()
}

/// Rounds precedence: explicit, leading integer, grouped block's first sets, 1
fn resolve_rounds(
    explicit: Option<u32>,
    leading: Option<u32>,
    block_type: BlockType,
    exercises: &[Exercise],
) -> u32 {
    explicit
        .filter(|rounds| *rounds > 0)
        .or(leading)
        .or_else(|| {
            block_type
                .is_grouped()
                .then(|| exercises.first().and_then(Exercise::sets))
                .flatten()
        })
        .unwrap_or(1)
}

fn convert_block(input: &IngestBlock, index: usize) -> AppResult<Block> {
    let prefix = format!("blocks[{index}]");
    if input.exercises.is_empty() {
        return Err(AppError::invalid_field(
            format!("{prefix}.exercises"),
            "a block must contain at least one exercise",
        ));
    }
    let exercises = convert_exercises(&input.exercises, &format!("{prefix}.exercises"))?;
    let structure = parse_structure(input.structure.as_deref());
    let rounds = resolve_rounds(
        input.rounds,
        structure.leading_rounds,
        structure.block_type,
        &exercises,
    );

    debug!(
        block = index,
        block_type = %structure.block_type,
        rounds,
        exercises = exercises.len(),
        "converted block"
    );

    BlockBuilder::new(structure.block_type)
        .label_opt(non_blank(input.label.as_deref()))
        .rounds(rounds)
        .exercises(exercises)
        .time_cap_seconds_opt(input.time_cap_sec)
        .work_seconds_opt(input.time_work_sec)
        .rest_between_seconds_opt(input.rest_between_sec)
        .structure_opt(non_blank(input.structure.as_deref()))
        .build()
        .map_err(under(&prefix))
}

fn convert_settings(input: Option<&IngestSettings>) -> WorkoutSettings {
    input.map_or_else(WorkoutSettings::default, |settings| WorkoutSettings {
        rest_mode: settings
            .default_rest_type
            .as_deref()
            .and_then(RestMode::parse)
            .unwrap_or_default(),
        default_rest_seconds: settings.default_rest_sec,
        warmup_seconds: settings.warmup_sec.filter(|seconds| *seconds > 0),
    })
}

fn convert_metadata(input: &IngestInput) -> WorkoutMetadata {
    let mut sources: Vec<WorkoutSource> = input
        .source
        .iter()
        .chain(&input.sources)
        .map(|label| WorkoutSource::parse(label))
        .collect();
    sources.dedup();
    if sources.is_empty() {
        sources.push(WorkoutSource::Import);
    }
    WorkoutMetadata {
        sources,
        platform: non_blank(input.platform.as_deref()),
        source_url: non_blank(input.source_url.as_deref()),
        ..WorkoutMetadata::default()
    }
}

fn convert_blocks(input: &IngestInput) -> AppResult<Vec<Block>> {
    match (&input.blocks, &input.exercises) {
        (Some(blocks), _) if !blocks.is_empty() => blocks
            .iter()
            .enumerate()
            .map(|(index, block)| convert_block(block, index))
            .collect(),
        (_, Some(exercises)) => {
            if exercises.is_empty() {
                return Err(AppError::invalid_field(
                    "exercises",
                    "the exercise list must not be empty",
                ));
            }
            let converted = convert_exercises(exercises, "exercises")?;
            detect_groups(converted)
        }
        _ => Err(AppError::missing_field("blocks")),
    }
}

/// Convert a parsed ingest document into a validated [`Workout`]
///
/// # Errors
///
/// Returns a validation error naming the offending field: `blocks` when
/// neither blocks nor exercises are present, `blocks[i].exercises` for an
/// empty block, `exercises` for an empty flat list, and
/// `blocks[i].exercises[j].name` for a blank exercise name
pub fn to_canonical(input: &IngestInput) -> AppResult<Workout> {
    let blocks = convert_blocks(input)?;
    let title = non_blank(input.title.as_deref()).unwrap_or_else(|| DEFAULT_WORKOUT_TITLE.to_owned());

    if !input.extra.is_empty() {
        debug!(keys = ?input.extra.keys().collect::<Vec<_>>(), "ignoring unknown ingest keys");
    }

    let workout = WorkoutBuilder::new(title)
        .description_opt(non_blank(input.description.as_deref()))
        .notes_opt(non_blank(input.notes.as_deref()))
        .tags(&input.tags)
        .blocks(blocks)
        .metadata(convert_metadata(input))
        .settings(convert_settings(input.settings.as_ref()))
        .build()?;

    info!(
        title = %workout.title(),
        blocks = workout.blocks().len(),
        exercises = workout.total_exercises(),
        "Converted ingest document to canonical workout"
    );
    Ok(workout)
}

/// Convert an already-parsed JSON value
///
/// # Errors
///
/// Returns `InvalidFormat` if the value does not have the ingest shape, then
/// any error from [`to_canonical`]
pub fn to_canonical_value(value: Value) -> AppResult<Workout> {
    let input: IngestInput = serde_json::from_value(value)?;
    to_canonical(&input)
}

/// Convert a JSON document
///
/// # Errors
///
/// Returns `InvalidFormat` for malformed JSON, then any error from [`to_canonical`]
pub fn to_canonical_json(json: &str) -> AppResult<Workout> {
    let input: IngestInput = serde_json::from_str(json)?;
    to_canonical(&input)
}
