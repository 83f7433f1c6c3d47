// ABOUTME: Workout model: title, tags, blocks, provenance metadata, settings, and usage counters
// ABOUTME: Value-returning edits plus the canonical-name staging handles used during canonicalization
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt;
use std::mem;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Block, Exercise};
use crate::constants::limits::{MAX_TAG_LENGTH, MAX_TEXT_LENGTH, MAX_TITLE_LENGTH};
use crate::errors::{AppError, AppResult};

/// Where a workout came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutSource {
    /// Parsed from free text
    Text,
    /// Extracted from an image
    Ocr,
    /// Entered by hand
    Manual,
    /// Imported from another application or file
    Import,
    /// Generated by an assistant
    Ai,
    /// Transcribed from a video
    Video,
}

impl WorkoutSource {
    /// Parse a source label; unknown labels map to `Import`
    #[must_use]
    pub fn parse(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "text" | "paste" => Self::Text,
            "ocr" | "image" | "photo" => Self::Ocr,
            "manual" | "user" => Self::Manual,
            "ai" | "llm" => Self::Ai,
            "video" | "youtube" | "instagram" | "tiktok" => Self::Video,
            _ => Self::Import,
        }
    }
}

/// Provenance and export bookkeeping
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkoutMetadata {
    /// Source kinds that contributed to this workout
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<WorkoutSource>,
    /// Originating platform (`instagram`, `youtube`, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    /// Originating URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    /// When the workout was created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// When the workout was last exported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<DateTime<Utc>>,
    /// Device or format the workout was last exported to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_to_device: Option<String>,
    /// Whether the workout has been exported
    #[serde(default)]
    pub is_exported: bool,
}

/// How rest between sets is handled on the device
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RestMode {
    /// Rest counts down a configured duration
    #[default]
    Timed,
    /// Rest lasts until the athlete presses a button
    Button,
}

impl RestMode {
    /// Parse a rest type label; unknown labels yield `None`
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "timed" | "time" => Some(Self::Timed),
            "button" | "lap" | "manual" => Some(Self::Button),
            _ => None,
        }
    }
}

/// Workout-level export settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutSettings {
    /// Rest handling mode; a default rest is only synthesized in `Timed` mode
    #[serde(default)]
    pub rest_mode: RestMode,
    /// Default rest in seconds when no exercise or block rest is configured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_rest_seconds: Option<u32>,
    /// Leading warmup duration in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warmup_seconds: Option<u32>,
}

impl WorkoutSettings {
    /// Default rest to synthesize, honoring the rest mode gate
    #[must_use]
    pub fn effective_default_rest(&self) -> Option<u32> {
        match self.rest_mode {
            RestMode::Timed => self.default_rest_seconds.filter(|seconds| *seconds > 0),
            RestMode::Button => None,
        }
    }
}

/// A complete workout: the root of the canonical model
///
/// Built once per conversion through [`WorkoutBuilder`] and treated as an
/// immutable value afterwards. Edits consume the value and return a new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<Uuid>,
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tags: Vec<String>,
    blocks: Vec<Block>,
    #[serde(default)]
    metadata: WorkoutMetadata,
    #[serde(default)]
    settings: WorkoutSettings,
    #[serde(default)]
    is_favorite: bool,
    #[serde(default)]
    times_completed: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_used_at: Option<DateTime<Utc>>,
}

/// Lower-case, trim, and de-duplicate tags, keeping first-seen order
fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut normalized: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim().to_lowercase();
        if tag.is_empty() || tag.chars().count() > MAX_TAG_LENGTH {
            continue;
        }
        if !normalized.contains(&tag) {
            normalized.push(tag);
        }
    }
    normalized
}

impl Workout {
    /// Persistent identifier, when stored
    #[must_use]
    pub const fn id(&self) -> Option<Uuid> {
        self.id
    }

    /// Workout title
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Description
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Notes
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Normalized tags
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Blocks in execution order
    #[must_use]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Provenance metadata
    #[must_use]
    pub const fn metadata(&self) -> &WorkoutMetadata {
        &self.metadata
    }

    /// Export settings
    #[must_use]
    pub const fn settings(&self) -> &WorkoutSettings {
        &self.settings
    }

    /// Favorite flag
    #[must_use]
    pub const fn is_favorite(&self) -> bool {
        self.is_favorite
    }

    /// Completion counter
    #[must_use]
    pub const fn times_completed(&self) -> u32 {
        self.times_completed
    }

    /// Last time the workout was completed
    #[must_use]
    pub const fn last_used_at(&self) -> Option<DateTime<Utc>> {
        self.last_used_at
    }

    /// Every exercise in block order
    pub fn all_exercises(&self) -> impl Iterator<Item = &Exercise> {
        self.blocks.iter().flat_map(Block::exercises)
    }

    /// Number of exercises across all blocks
    #[must_use]
    pub fn total_exercises(&self) -> usize {
        self.blocks.iter().map(|block| block.exercises().len()).sum()
    }

    /// Number of sets across all blocks, saturating at `u32::MAX`
    #[must_use]
    pub fn total_sets(&self) -> u32 {
        self.blocks
            .iter()
            .map(Block::total_sets)
            .fold(0, u32::saturating_add)
    }

    /// Whether the workout reads as a HIIT session: structure text mentions
    /// `for time`, `amrap`, or `emom`, or an exercise is typed HIIT
    #[must_use]
    pub fn is_hiit(&self) -> bool {
        let structured = self.blocks.iter().any(|block| {
            block.structure().is_some_and(|structure| {
                let structure = structure.to_lowercase();
                ["for time", "amrap", "emom"]
                    .iter()
                    .any(|marker| structure.contains(marker))
            })
        });
        structured || self.all_exercises().any(Exercise::is_hiit)
    }

    /// Copy with a persistent identifier
    #[must_use]
    pub const fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    /// Copy with the tag set replaced
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags = normalize_tags(tags);
        self
    }

    /// Copy with one tag added (no-op when already present)
    #[must_use]
    pub fn add_tag(mut self, tag: &str) -> Self {
        let mut tags = mem::take(&mut self.tags);
        tags.push(tag.to_owned());
        self.tags = normalize_tags(tags);
        self
    }

    /// Copy with one tag removed (case-insensitive)
    #[must_use]
    pub fn remove_tag(mut self, tag: &str) -> Self {
        let needle = tag.trim().to_lowercase();
        self.tags.retain(|existing| *existing != needle);
        self
    }

    /// Copy with the favorite flag flipped
    #[must_use]
    pub const fn toggle_favorite(mut self) -> Self {
        self.is_favorite = !self.is_favorite;
        self
    }

    /// Copy with one more completion recorded at `at`
    #[must_use]
    pub const fn record_completion(mut self, at: DateTime<Utc>) -> Self {
        self.times_completed = self.times_completed.saturating_add(1);
        self.last_used_at = Some(at);
        self
    }

    /// Copy marked as exported to `device` at `at`
    #[must_use]
    pub fn mark_exported(mut self, device: impl Into<String>, at: DateTime<Utc>) -> Self {
        self.metadata.is_exported = true;
        self.metadata.exported_at = Some(at);
        self.metadata.exported_to_device = Some(device.into());
        self
    }

    /// Staging handles for canonical name assignment, in block order
    ///
    /// This is the only mutation window on a built workout. Holding `&mut self`
    /// guarantees no other reader or writer observes a half-canonicalized value.
    pub fn canonical_slots(&mut self) -> impl Iterator<Item = CanonicalSlot<'_>> + '_ {
        self.blocks
            .iter_mut()
            .enumerate()
            .flat_map(|(block_index, block)| {
                block
                    .exercises_mut()
                    .enumerate()
                    .map(move |(exercise_index, exercise)| CanonicalSlot {
                        block_index,
                        exercise_index,
                        exercise,
                    })
            })
    }

    /// Check the model invariants on a value that did not come through the builder
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the first offending field
    pub fn validate(&self) -> AppResult<()> {
        validate_title(&self.title)?;
        validate_text("description", self.description.as_deref())?;
        validate_text("notes", self.notes.as_deref())?;
        if self.blocks.is_empty() {
            return Err(AppError::invalid_field(
                "blocks",
                "a workout must contain at least one block",
            ));
        }
        for (index, block) in self.blocks.iter().enumerate() {
            block.validate().map_err(|error| {
                let field = error.field.clone().unwrap_or_default();
                error.with_field(format!("blocks[{index}].{field}"))
            })?;
        }
        Ok(())
    }
}

impl fmt::Display for Workout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} blocks, {} exercises)",
            self.title,
            self.blocks.len(),
            self.total_exercises()
        )
    }
}

fn validate_title(title: &str) -> AppResult<()> {
    if title.trim().is_empty() {
        return Err(AppError::missing_field("title"));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(AppError::out_of_range(
            "title",
            format!("title must be at most {MAX_TITLE_LENGTH} characters"),
        ));
    }
    Ok(())
}

fn validate_text(field: &str, text: Option<&str>) -> AppResult<()> {
    match text {
        Some(text) if text.chars().count() > MAX_TEXT_LENGTH => Err(AppError::out_of_range(
            field,
            format!("{field} must be at most {MAX_TEXT_LENGTH} characters"),
        )),
        _ => Ok(()),
    }
}

/// Write handle over one exercise during canonicalization
///
/// Exposes the exercise read-only and allows exactly one kind of change:
/// assigning its canonical name.
#[derive(Debug)]
pub struct CanonicalSlot<'a> {
    block_index: usize,
    exercise_index: usize,
    exercise: &'a mut Exercise,
}

impl CanonicalSlot<'_> {
    /// Index of the owning block
    #[must_use]
    pub const fn block_index(&self) -> usize {
        self.block_index
    }

    /// Index of the exercise within its block
    #[must_use]
    pub const fn exercise_index(&self) -> usize {
        self.exercise_index
    }

    /// The exercise being canonicalized
    #[must_use]
    pub fn exercise(&self) -> &Exercise {
        self.exercise
    }

    /// Record the resolved canonical name
    pub fn assign_canonical_name(&mut self, canonical: impl Into<String>) {
        self.exercise.set_canonical_name(canonical.into());
    }
}

/// Builder for [`Workout`] instances
#[derive(Debug, Clone)]
pub struct WorkoutBuilder {
    workout: Workout,
}

impl WorkoutBuilder {
    /// Start a builder with the required title
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            workout: Workout {
                id: None,
                title: title.into().trim().to_owned(),
                description: None,
                notes: None,
                tags: Vec::new(),
                blocks: Vec::new(),
                metadata: WorkoutMetadata::default(),
                settings: WorkoutSettings::default(),
                is_favorite: false,
                times_completed: 0,
                last_used_at: None,
            },
        }
    }

    /// Sets the identifier (optional)
    #[must_use]
    pub const fn id_opt(mut self, value: Option<Uuid>) -> Self {
        self.workout.id = value;
        self
    }

    /// Sets the description (optional)
    #[must_use]
    pub fn description_opt(mut self, value: Option<String>) -> Self {
        self.workout.description = value;
        self
    }

    /// Sets the notes (optional)
    #[must_use]
    pub fn notes_opt(mut self, value: Option<String>) -> Self {
        self.workout.notes = value;
        self
    }

    /// Sets the tags; they are normalized on the way in
    #[must_use]
    pub fn tags<I, S>(mut self, value: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.workout.tags = normalize_tags(value);
        self
    }

    /// Appends one block
    #[must_use]
    pub fn block(mut self, value: Block) -> Self {
        self.workout.blocks.push(value);
        self
    }

    /// Replaces the block list
    #[must_use]
    pub fn blocks(mut self, value: Vec<Block>) -> Self {
        self.workout.blocks = value;
        self
    }

    /// Sets the provenance metadata
    #[must_use]
    pub fn metadata(mut self, value: WorkoutMetadata) -> Self {
        self.workout.metadata = value;
        self
    }

    /// Sets the export settings
    #[must_use]
    pub const fn settings(mut self, value: WorkoutSettings) -> Self {
        self.workout.settings = value;
        self
    }

    /// Builds the Workout, enforcing a valid title and at least one non-empty block
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the first offending field
    pub fn build(self) -> AppResult<Workout> {
        self.workout.validate()?;
        Ok(self.workout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_tags_dedupes_case_insensitively() {
        let tags = normalize_tags(["Strength", " strength ", "HIIT", ""]);
        assert_eq!(tags, vec!["strength".to_owned(), "hiit".to_owned()]);
    }

    #[test]
    fn test_effective_default_rest_gated_by_mode() {
        let timed = WorkoutSettings {
            rest_mode: RestMode::Timed,
            default_rest_seconds: Some(45),
            warmup_seconds: None,
        };
        let button = WorkoutSettings {
            rest_mode: RestMode::Button,
            ..timed
        };
        assert_eq!(timed.effective_default_rest(), Some(45));
        assert_eq!(button.effective_default_rest(), None);
    }
}
