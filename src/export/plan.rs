// ABOUTME: Shared step planner turning canonical blocks into an ordered step tree
// ABOUTME: Applies the repeat wrapping and rest insertion rules every encoder relies on
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Step planning
//!
//! Every device format except the HIIT dialect is a walk over the same tree:
//!
//! - **Straight** blocks: one step per exercise, repeated by the exercise's own
//!   sets (block rounds only when sets are unset) with its rest inside the repeat
//! - **Superset / circuit** blocks: members back to back, one pass rest after
//!   the last member, the pass repeated `rounds` times
//! - **Timed-round** blocks: a work interval plus optional rest, repeated by the
//!   exercise's sets or else the block rounds
//!
//! A repeat of 1 is never wrapped. Default rest only applies in timed rest mode.

use pierre_core::models::{Block, BlockType, Distance, Exercise, Reps, Workout};
use serde::Serialize;

/// What an exercise step asks the athlete to do, in priority order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepTarget {
    /// Work for a number of seconds
    Duration(u32),
    /// Cover a distance
    Distance(Distance),
    /// Perform a number of repetitions
    Reps(u32),
    /// Lap-button step with no measurable target
    Open,
}

impl StepTarget {
    /// Target for an exercise: duration, then distance, then reps
    #[must_use]
    pub fn for_exercise(exercise: &Exercise) -> Self {
        if let Some(seconds) = exercise.duration_seconds().filter(|s| *s > 0) {
            return Self::Duration(seconds);
        }
        if let Some(distance) = exercise.distance() {
            return Self::Distance(*distance);
        }
        // "500m" kept as symbolic reps is still a distance
        if let Some(Reps::Text(text)) = exercise.reps() {
            if let Some(distance) = Distance::parse(text) {
                return Self::Distance(distance);
            }
        }
        exercise
            .reps()
            .and_then(Reps::leading_count)
            .filter(|count| *count > 0)
            .map_or(Self::Open, Self::Reps)
    }
}

/// One exercise to perform
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExerciseStep {
    /// Source exercise
    pub exercise: Exercise,
    /// Resolved target
    pub target: StepTarget,
}

impl ExerciseStep {
    fn new(exercise: &Exercise) -> Self {
        Self {
            target: StepTarget::for_exercise(exercise),
            exercise: exercise.clone(),
        }
    }

    /// Name shown to the athlete (ordering prefix stripped)
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.exercise.display_name()
    }

    /// Name for structured data: canonical when resolved
    #[must_use]
    pub fn structured_name(&self) -> &str {
        self.exercise.preferred_name()
    }
}

/// A node in the planned step tree
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlannedStep {
    /// Exercise with its target
    Exercise(ExerciseStep),
    /// Timed work interval of a timed-round block
    Work {
        /// Work duration
        seconds: u32,
        /// Exercise performed during the interval
        exercise: Exercise,
    },
    /// Timed rest
    Rest {
        /// Rest duration
        seconds: u32,
    },
    /// Warmup interval
    Warmup {
        /// Warmup duration
        seconds: u32,
        /// Optional label
        name: Option<String>,
    },
    /// Cooldown interval
    Cooldown {
        /// Cooldown duration
        seconds: u32,
        /// Optional label
        name: Option<String>,
    },
    /// Repeat the children `count` times (always more than once)
    Repeat {
        /// Number of passes
        count: u32,
        /// Steps repeated
        steps: Vec<PlannedStep>,
    },
}

impl PlannedStep {
    /// Number of leaf steps plus one per repeat marker
    #[must_use]
    pub fn flat_len(&self) -> usize {
        match self {
            Self::Repeat { steps, .. } => 1 + steps.iter().map(Self::flat_len).sum::<usize>(),
            _ => 1,
        }
    }
}

/// Planned steps for a whole workout
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkoutPlan {
    /// Top-level steps in order
    pub steps: Vec<PlannedStep>,
}

impl WorkoutPlan {
    /// Plan every block of `workout`
    #[must_use]
    pub fn build(workout: &Workout) -> Self {
        let default_rest = workout.settings().effective_default_rest();
        let mut steps = Vec::new();
        if let Some(seconds) = workout.settings().warmup_seconds.filter(|s| *s > 0) {
            steps.push(PlannedStep::Warmup {
                seconds,
                name: None,
            });
        }
        for block in workout.blocks() {
            steps.extend(plan_block(block, default_rest));
        }
        Self { steps }
    }

    /// True when nothing was planned
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Steps after flattening repeats into trailing markers
    #[must_use]
    pub fn flat_len(&self) -> usize {
        self.steps.iter().map(PlannedStep::flat_len).sum()
    }

    /// Every exercise step, depth first
    #[must_use]
    pub fn exercise_steps(&self) -> Vec<&ExerciseStep> {
        fn collect<'a>(steps: &'a [PlannedStep], out: &mut Vec<&'a ExerciseStep>) {
            for step in steps {
                match step {
                    PlannedStep::Exercise(exercise) => out.push(exercise),
                    PlannedStep::Repeat { steps, .. } => collect(steps, out),
                    _ => {}
                }
            }
        }
        let mut out = Vec::new();
        collect(&self.steps, &mut out);
        out
    }
}

/// Wrap `steps` in a repeat unless `count` is 1
fn repeated(count: u32, steps: Vec<PlannedStep>) -> Vec<PlannedStep> {
    if count > 1 && !steps.is_empty() {
        vec![PlannedStep::Repeat { count, steps }]
    } else {
        steps
    }
}

fn rest(seconds: Option<u32>) -> Option<PlannedStep> {
    seconds
        .filter(|s| *s > 0)
        .map(|seconds| PlannedStep::Rest { seconds })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Warmup,
    Cooldown,
}

fn phase_of(block: &Block) -> Option<Phase> {
    let label = block.label()?.trim().to_lowercase();
    let phase = match label.as_str() {
        "warmup" | "warm up" | "warm-up" => Phase::Warmup,
        "cooldown" | "cool down" | "cool-down" => Phase::Cooldown,
        _ => return None,
    };
    block
        .exercises()
        .iter()
        .all(|exercise| exercise.duration_seconds().is_some_and(|s| s > 0))
        .then_some(phase)
}

fn plan_block(block: &Block, default_rest: Option<u32>) -> Vec<PlannedStep> {
    if let Some(phase) = phase_of(block) {
        return block
            .exercises()
            .iter()
            .map(|exercise| {
                let seconds = exercise.duration_seconds().unwrap_or_default();
                let name = Some(exercise.display_name().to_owned());
                match phase {
                    Phase::Warmup => PlannedStep::Warmup { seconds, name },
                    Phase::Cooldown => PlannedStep::Cooldown { seconds, name },
                }
            })
            .collect();
    }
    match block.block_type() {
        BlockType::Straight => plan_straight(block, default_rest),
        BlockType::Superset | BlockType::Circuit => plan_grouped(block, default_rest),
        BlockType::TimedRound => plan_timed(block, default_rest),
    }
}

fn plan_straight(block: &Block, default_rest: Option<u32>) -> Vec<PlannedStep> {
    block
        .exercises()
        .iter()
        .flat_map(|exercise| {
            let mut set = vec![PlannedStep::Exercise(ExerciseStep::new(exercise))];
            set.extend(rest(exercise.rest_seconds().or(default_rest)));
            repeated(exercise.sets().unwrap_or(block.rounds()), set)
        })
        .collect()
}

fn plan_grouped(block: &Block, default_rest: Option<u32>) -> Vec<PlannedStep> {
    let mut pass: Vec<PlannedStep> = block
        .exercises()
        .iter()
        .map(|exercise| PlannedStep::Exercise(ExerciseStep::new(exercise)))
        .collect();
    pass.extend(rest(block.rest_between_seconds().or(default_rest)));
    repeated(block.rounds(), pass)
}

fn plan_timed(block: &Block, default_rest: Option<u32>) -> Vec<PlannedStep> {
    let work_of = |exercise: &Exercise| {
        exercise
            .duration_seconds()
            .or_else(|| block.work_seconds())
            .filter(|s| *s > 0)
    };
    if !block.exercises().iter().any(|exercise| work_of(exercise).is_some()) {
        // AMRAP/for-time blocks without intervals run as a circuit of the members
        return plan_grouped(block, default_rest);
    }
    block
        .exercises()
        .iter()
        .flat_map(|exercise| {
            let work = work_of(exercise).map_or_else(
                || PlannedStep::Exercise(ExerciseStep::new(exercise)),
                |seconds| PlannedStep::Work {
                    seconds,
                    exercise: exercise.clone(),
                },
            );
            let mut interval = vec![work];
            interval.extend(rest(exercise.rest_seconds().or(block.rest_between_seconds())));
            repeated(exercise.sets().unwrap_or(block.rounds()), interval)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pierre_core::models::{BlockBuilder, ExerciseBuilder, WorkoutBuilder};

    use super::*;

    fn exercise(name: &str) -> Exercise {
        ExerciseBuilder::new(name).reps(10).build().unwrap()
    }

    #[test]
    fn test_superset_pass_rest_after_last_member() {
        let workout = WorkoutBuilder::new("t")
            .block(
                BlockBuilder::new(BlockType::Superset)
                    .rounds(3)
                    .rest_between_seconds(30)
                    .exercise(exercise("A"))
                    .exercise(exercise("B"))
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();
        let plan = WorkoutPlan::build(&workout);
        assert_eq!(plan.steps.len(), 1);
        assert!(matches!(
            &plan.steps[0],
            PlannedStep::Repeat { count: 3, steps }
                if steps.len() == 3 && matches!(steps[2], PlannedStep::Rest { seconds: 30 })
        ));
        assert_eq!(plan.flat_len(), 4);
    }

    #[test]
    fn test_straight_sets_are_not_multiplied_by_rounds() {
        let squat = ExerciseBuilder::new("Squat").sets(3).reps(8).build().unwrap();
        let press = exercise("Press");
        let workout = WorkoutBuilder::new("t")
            .block(
                BlockBuilder::new(BlockType::Straight)
                    .rounds(3)
                    .exercise(squat)
                    .exercise(press)
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();
        let plan = WorkoutPlan::build(&workout);
        assert_eq!(plan.steps.len(), 2);
        assert!(matches!(
            &plan.steps[0],
            PlannedStep::Repeat { count: 3, steps }
                if steps.len() == 1 && matches!(steps[0], PlannedStep::Exercise(_))
        ));
        // no sets of its own: block rounds apply
        assert!(matches!(&plan.steps[1], PlannedStep::Repeat { count: 3, .. }));
    }

    #[test]
    fn test_single_round_is_not_wrapped() {
        let workout = WorkoutBuilder::new("t")
            .block(
                BlockBuilder::new(BlockType::Straight)
                    .exercise(exercise("Squat"))
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();
        let plan = WorkoutPlan::build(&workout);
        assert_eq!(plan.steps.len(), 1);
        assert!(matches!(plan.steps[0], PlannedStep::Exercise(_)));
    }
}
