// ABOUTME: Block model grouping exercises as straight sets, supersets, circuits, or timed rounds
// ABOUTME: Carries round count, time cap, work interval, and between-round rest
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt;
use std::slice::IterMut;

use serde::{Deserialize, Serialize};

use super::Exercise;
use crate::errors::{AppError, AppResult};

/// How the exercises of a block are performed
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BlockType {
    /// Each exercise performed for its own sets
    #[default]
    Straight,
    /// Two exercises alternated back-to-back
    Superset,
    /// Three or more exercises cycled for a number of rounds
    Circuit,
    /// Work/rest intervals on the clock (EMOM, AMRAP, Tabata, for time)
    TimedRound,
}

impl BlockType {
    /// Stable identifier
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Straight => "straight",
            Self::Superset => "superset",
            Self::Circuit => "circuit",
            Self::TimedRound => "timed_round",
        }
    }

    /// Whether members are performed as passes of a repeated sequence
    #[must_use]
    pub const fn is_grouped(&self) -> bool {
        matches!(self, Self::Superset | Self::Circuit)
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An ordered group of exercises sharing one execution structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Optional label (`A`, `Warm-up`, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    /// Execution structure
    #[serde(default)]
    block_type: BlockType,
    /// Number of passes (at least 1)
    #[serde(default = "default_rounds")]
    rounds: u32,
    /// Exercises in execution order
    exercises: Vec<Exercise>,
    /// Overall time cap in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    time_cap_seconds: Option<u32>,
    /// Work interval in seconds for timed rounds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    work_seconds: Option<u32>,
    /// Rest between rounds in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rest_between_seconds: Option<u32>,
    /// Structure text as written in the source (`for time (cap: 35 min)`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    structure: Option<String>,
}

const fn default_rounds() -> u32 {
    1
}

impl Block {
    /// A straight block with no exercises
    ///
    /// Only produced by structure detection on empty input; `WorkoutBuilder::build`
    /// rejects it.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            label: None,
            block_type: BlockType::Straight,
            rounds: 1,
            exercises: Vec::new(),
            time_cap_seconds: None,
            work_seconds: None,
            rest_between_seconds: None,
            structure: None,
        }
    }

    /// Block label
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Execution structure
    #[must_use]
    pub const fn block_type(&self) -> BlockType {
        self.block_type
    }

    /// Number of passes
    #[must_use]
    pub const fn rounds(&self) -> u32 {
        self.rounds
    }

    /// Exercises in execution order
    #[must_use]
    pub fn exercises(&self) -> &[Exercise] {
        &self.exercises
    }

    /// Overall time cap in seconds
    #[must_use]
    pub const fn time_cap_seconds(&self) -> Option<u32> {
        self.time_cap_seconds
    }

    /// Work interval in seconds
    #[must_use]
    pub const fn work_seconds(&self) -> Option<u32> {
        self.work_seconds
    }

    /// Rest between rounds in seconds
    #[must_use]
    pub const fn rest_between_seconds(&self) -> Option<u32> {
        self.rest_between_seconds
    }

    /// Raw structure text
    #[must_use]
    pub fn structure(&self) -> Option<&str> {
        self.structure.as_deref()
    }

    /// Whether the block has no exercises
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    /// Total sets: straight blocks sum exercise sets (1 when unset), grouped
    /// blocks multiply rounds by member count; saturates at `u32::MAX`
    #[must_use]
    pub fn total_sets(&self) -> u32 {
        match self.block_type {
            BlockType::Straight => self
                .exercises
                .iter()
                .map(|exercise| exercise.sets().unwrap_or(1))
                .fold(0, u32::saturating_add),
            BlockType::Superset | BlockType::Circuit | BlockType::TimedRound => {
                let members = u32::try_from(self.exercises.len()).unwrap_or(u32::MAX);
                self.rounds.saturating_mul(members)
            }
        }
    }

    pub(crate) fn exercises_mut(&mut self) -> IterMut<'_, Exercise> {
        self.exercises.iter_mut()
    }

    /// Check the model invariants
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty block, zero rounds, or an invalid exercise
    pub fn validate(&self) -> AppResult<()> {
        if self.exercises.is_empty() {
            return Err(AppError::invalid_field(
                "exercises",
                "a block must contain at least one exercise",
            ));
        }
        if self.rounds == 0 {
            return Err(AppError::out_of_range("rounds", "rounds must be at least 1"));
        }
        for (index, exercise) in self.exercises.iter().enumerate() {
            exercise.validate().map_err(|error| {
                let field = error.field.clone().unwrap_or_default();
                error.with_field(format!("exercises[{index}].{field}"))
            })?;
        }
        Ok(())
    }
}

/// Builder for [`Block`] instances
#[derive(Debug, Clone)]
pub struct BlockBuilder {
    block: Block,
}

impl BlockBuilder {
    /// Start a builder for the given structure
    #[must_use]
    pub fn new(block_type: BlockType) -> Self {
        let mut block = Block::empty();
        block.block_type = block_type;
        Self { block }
    }

    /// Sets the label (optional)
    #[must_use]
    pub fn label_opt(mut self, value: Option<String>) -> Self {
        self.block.label = value;
        self
    }

    /// Sets the label
    #[must_use]
    pub fn label(mut self, value: impl Into<String>) -> Self {
        self.block.label = Some(value.into());
        self
    }

    /// Sets the number of rounds
    #[must_use]
    pub const fn rounds(mut self, value: u32) -> Self {
        self.block.rounds = value;
        self
    }

    /// Appends one exercise
    #[must_use]
    pub fn exercise(mut self, value: Exercise) -> Self {
        self.block.exercises.push(value);
        self
    }

    /// Replaces the exercise list
    #[must_use]
    pub fn exercises(mut self, value: Vec<Exercise>) -> Self {
        self.block.exercises = value;
        self
    }

    /// Sets the time cap in seconds (optional)
    #[must_use]
    pub const fn time_cap_seconds_opt(mut self, value: Option<u32>) -> Self {
        self.block.time_cap_seconds = value;
        self
    }

    /// Sets the work interval in seconds (optional)
    #[must_use]
    pub const fn work_seconds_opt(mut self, value: Option<u32>) -> Self {
        self.block.work_seconds = value;
        self
    }

    /// Sets the rest between rounds in seconds
    #[must_use]
    pub const fn rest_between_seconds(mut self, value: u32) -> Self {
        self.block.rest_between_seconds = Some(value);
        self
    }

    /// Sets the rest between rounds in seconds (optional)
    #[must_use]
    pub const fn rest_between_seconds_opt(mut self, value: Option<u32>) -> Self {
        self.block.rest_between_seconds = value;
        self
    }

    /// Sets the raw structure text (optional)
    #[must_use]
    pub fn structure_opt(mut self, value: Option<String>) -> Self {
        self.block.structure = value;
        self
    }

    /// Builds the Block, enforcing at least one exercise and one round
    ///
    /// # Errors
    ///
    /// Returns a validation error when an invariant does not hold
    pub fn build(self) -> AppResult<Block> {
        self.block.validate()?;
        Ok(self.block)
    }
}
