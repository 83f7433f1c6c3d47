// ABOUTME: Recovers superset and circuit grouping from a flat exercise list
// ABOUTME: Label extraction from fields, parenthetical markers, and A1-style prefixes, grouped by occurrence count
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Structure detection
//!
//! Each exercise may carry a circuit label and a superset label, taken from the
//! explicit label fields, from a `(circuit X)` / `(rounds X)` / `(superset X)`
//! marker in the name, or from a letter+digit prefix such as `A1:` (label `A`).
//!
//! Grouping is decided by how often a label occurs across the whole list, not by
//! which syntax tagged it: three or more occurrences make a circuit, exactly two
//! make a superset. A label tagged as a circuit that occurs twice is therefore a
//! superset.
//!
//! The detector works in two passes over an index-addressed arena: the first
//! pass resolves labels and counts them, the second walks the exercises in
//! order and moves each one out of the arena into its block.

use std::collections::HashMap;
use std::mem;
use std::sync::LazyLock;

use pierre_core::errors::AppResult;
use pierre_core::models::{strip_order_prefix, Block, BlockBuilder, BlockType, Exercise};
use regex::Regex;
use tracing::debug;

static CIRCUIT_MARKER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)\(\s*(?:circuit|rounds)\s+([^)]+?)\s*\)").ok());

static SUPERSET_MARKER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)\(\s*superset\s+([^)]+?)\s*\)").ok());

static PREFIX_LABEL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*([A-Z])\d+[:;.)\s-]+").ok());

/// Minimum label occurrences for a circuit
const CIRCUIT_MIN_COUNT: usize = 3;
/// Exact label occurrences for a superset
const SUPERSET_COUNT: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Group {
    Circuit(String),
    Superset(String),
}

impl Group {
    const fn block_type(&self) -> BlockType {
        match self {
            Self::Circuit(_) => BlockType::Circuit,
            Self::Superset(_) => BlockType::Superset,
        }
    }

    fn label(&self) -> &str {
        match self {
            Self::Circuit(label) | Self::Superset(label) => label,
        }
    }
}

/// Labels and cleaned name resolved for one exercise in the first pass
#[derive(Debug, Default)]
struct ResolvedLabels {
    circuit: Option<String>,
    superset: Option<String>,
    clean_name: String,
}

fn marker_label(pattern: Option<&Regex>, name: &str) -> Option<String> {
    let captures = pattern?.captures(name)?;
    let label = captures.get(1)?.as_str().trim();
    (!label.is_empty()).then(|| label.to_owned())
}

fn prefix_label(name: &str) -> Option<String> {
    let captures = PREFIX_LABEL.as_ref()?.captures(name)?;
    Some(captures.get(1)?.as_str().to_uppercase())
}

fn explicit_label(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(ToOwned::to_owned)
}

fn strip_markers(name: &str) -> String {
    let mut cleaned = name.to_owned();
    for regex in [CIRCUIT_MARKER.as_ref(), SUPERSET_MARKER.as_ref()]
        .into_iter()
        .flatten()
    {
        cleaned = regex.replace_all(&cleaned, "").into_owned();
    }
    strip_order_prefix(&cleaned)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn resolve_labels(exercise: &Exercise) -> ResolvedLabels {
    let name = exercise.name();
    let prefix = prefix_label(name);
    ResolvedLabels {
        circuit: explicit_label(exercise.circuit_label())
            .or_else(|| marker_label(CIRCUIT_MARKER.as_ref(), name))
            .or_else(|| prefix.clone()),
        superset: explicit_label(exercise.superset_label())
            .or_else(|| marker_label(SUPERSET_MARKER.as_ref(), name))
            .or(prefix),
        clean_name: strip_markers(name),
    }
}

fn classify(
    labels: &ResolvedLabels,
    circuit_counts: &HashMap<String, usize>,
    superset_counts: &HashMap<String, usize>,
) -> Option<Group> {
    let circuit = labels
        .circuit
        .as_ref()
        .map(|label| (label, circuit_counts.get(label).copied().unwrap_or(0)));
    let superset = labels
        .superset
        .as_ref()
        .map(|label| (label, superset_counts.get(label).copied().unwrap_or(0)));

    for (label, count) in circuit.into_iter().chain(superset) {
        if count >= CIRCUIT_MIN_COUNT {
            return Some(Group::Circuit(label.clone()));
        }
    }
    for (label, count) in circuit.into_iter().chain(superset) {
        if count == SUPERSET_COUNT {
            return Some(Group::Superset(label.clone()));
        }
    }
    None
}

fn flush_standalone(pending: &mut Vec<Exercise>, blocks: &mut Vec<Block>) -> AppResult<()> {
    if pending.is_empty() {
        return Ok(());
    }
    let exercises = mem::take(pending);
    blocks.push(BlockBuilder::new(BlockType::Straight).exercises(exercises).build()?);
    Ok(())
}

fn flush_run(
    run: &mut Option<(Group, Vec<Exercise>)>,
    blocks: &mut Vec<Block>,
) -> AppResult<()> {
    let Some((group, exercises)) = run.take() else {
        return Ok(());
    };
    let rounds = exercises.first().and_then(Exercise::sets).unwrap_or(1).max(1);
    debug!(
        block_type = %group.block_type(),
        label = group.label(),
        members = exercises.len(),
        rounds,
        "detected grouped block"
    );
    blocks.push(
        BlockBuilder::new(group.block_type())
            .label(group.label())
            .rounds(rounds)
            .exercises(exercises)
            .build()?,
    );
    Ok(())
}

/// Group a flat exercise list into straight, superset, and circuit blocks
///
/// Blocks come out in input order. Consecutive exercises sharing a group form
/// one block; any ungrouped exercise ends the current group and is buffered
/// into a straight block. Group rounds come from the first member's sets.
/// Names are stored without their grouping markers or ordering prefixes.
/// Empty input yields a single empty straight block.
///
/// # Errors
///
/// Returns a validation error if a produced block fails its invariants, which
/// only happens for exercises that did not come through the model builders
pub fn detect_groups(exercises: Vec<Exercise>) -> AppResult<Vec<Block>> {
    if exercises.is_empty() {
        return Ok(vec![Block::empty()]);
    }

    // Pass 1: resolve labels and count occurrences
    let resolved: Vec<ResolvedLabels> = exercises.iter().map(resolve_labels).collect();
    let mut circuit_counts: HashMap<String, usize> = HashMap::new();
    let mut superset_counts: HashMap<String, usize> = HashMap::new();
    for labels in &resolved {
        if let Some(label) = &labels.circuit {
            *circuit_counts.entry(label.clone()).or_default() += 1;
        }
        if let Some(label) = &labels.superset {
            *superset_counts.entry(label.clone()).or_default() += 1;
        }
    }

    // Pass 2: move exercises out of the arena into blocks, in order
    let mut arena: Vec<Option<Exercise>> = exercises.into_iter().map(Some).collect();
    let mut blocks = Vec::new();
    let mut pending: Vec<Exercise> = Vec::new();
    let mut run: Option<(Group, Vec<Exercise>)> = None;

    for (index, labels) in resolved.iter().enumerate() {
        let Some(exercise) = arena[index].take() else {
            continue;
        };
        let exercise = exercise.relabeled(&labels.clean_name);

        match classify(labels, &circuit_counts, &superset_counts) {
            Some(group) => {
                if let Some((current, members)) = run.as_mut() {
                    if *current == group {
                        members.push(exercise);
                        continue;
                    }
                }
                flush_run(&mut run, &mut blocks)?;
                flush_standalone(&mut pending, &mut blocks)?;
                run = Some((group, vec![exercise]));
            }
            None => {
                flush_run(&mut run, &mut blocks)?;
                pending.push(exercise);
            }
        }
    }
    flush_run(&mut run, &mut blocks)?;
    flush_standalone(&mut pending, &mut blocks)?;

    Ok(blocks)
}
