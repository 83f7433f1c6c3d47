// ABOUTME: Interval-training XML (.zwo) encoder: one interval node per planned step
// ABOUTME: FTP power targets from exercise text, pace estimates for distance steps, sport detection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Interval XML
//!
//! Step mapping:
//!
//! | Planned step | Node |
//! |--------------|------|
//! | warmup / cooldown | `Warmup` / `Cooldown` power ramp |
//! | timed exercise or work interval | `SteadyState` |
//! | distance exercise | `SteadyState` with a pace-estimated duration |
//! | rep or open exercise | `FreeRide` of 60 s with the target as a text event |
//! | rest | `SteadyState` at recovery power |
//! | repeat of (timed work, rest) | `IntervalsT` |
//! | any other repeat | children unrolled `count` times |
//!
//! Unrolling stops with `EncodeFailed` past [`MAX_INTERVAL_NODES`] nodes.

use std::fmt;
use std::sync::LazyLock;

use pierre_core::errors::{AppError, AppResult};
use pierre_core::models::{Exercise, Workout};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::plan::{ExerciseStep, PlannedStep, StepTarget, WorkoutPlan};
use super::ExportOptions;

const AUTHOR: &str = "Pierre Workout Mapper";
const DEFAULT_WORK_POWER: f64 = 0.75;
const RECOVERY_POWER: f64 = 0.50;
const RAMP_LOW: f64 = 0.25;
const RAMP_HIGH: f64 = 0.75;
const FREE_RIDE_SECONDS: u32 = 60;
/// Upper bound on interval nodes once repeats are unrolled
pub const MAX_INTERVAL_NODES: usize = 10_000;
/// Seconds per meter at an easy 5:00/km run
const RUN_SECONDS_PER_METER: f64 = 0.3;
/// Seconds per meter at 30 km/h
const BIKE_SECONDS_PER_METER: f64 = 0.12;

const BIKE_KEYWORDS: &[&str] = &["ftp", "bike", "ride", "cycling", "spin", "watts"];

static FTP_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d{1,3})\s*(?:-\s*(\d{1,3}))?\s*%\s*(?:of\s+)?ftp").ok()
});

/// Sport written into the interval file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntervalSport {
    /// Cycling
    Bike,
    /// Running
    Run,
}

impl IntervalSport {
    /// Parse a sport label
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "bike" | "cycling" | "ride" => Some(Self::Bike),
            "run" | "running" => Some(Self::Run),
            _ => None,
        }
    }

    /// Bike when any cycling keyword appears in the workout text, run otherwise
    #[must_use]
    pub fn detect(workout: &Workout) -> Self {
        let mut text = workout.title().to_lowercase();
        for part in workout.description().into_iter().chain(workout.notes()) {
            text.push(' ');
            text.push_str(&part.to_lowercase());
        }
        for exercise in workout.all_exercises() {
            text.push(' ');
            text.push_str(&exercise.name().to_lowercase());
            if let Some(notes) = exercise.notes() {
                text.push(' ');
                text.push_str(&notes.to_lowercase());
            }
        }
        if BIKE_KEYWORDS.iter().any(|keyword| text.contains(keyword)) {
            Self::Bike
        } else {
            Self::Run
        }
    }

    /// Tag value of `sportType`
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Bike => "bike",
            Self::Run => "run",
        }
    }

    const fn seconds_per_meter(self) -> f64 {
        match self {
            Self::Bike => BIKE_SECONDS_PER_METER,
            Self::Run => RUN_SECONDS_PER_METER,
        }
    }
}

impl fmt::Display for IntervalSport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Power as a fraction of FTP
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerTarget {
    /// Lower bound
    pub low: f64,
    /// Upper bound (equal to `low` for a single value)
    pub high: f64,
}

impl PowerTarget {
    const fn single(value: f64) -> Self {
        Self {
            low: value,
            high: value,
        }
    }

    /// Midpoint of the range
    #[must_use]
    pub fn mid(&self) -> f64 {
        (self.low + self.high) / 2.0
    }

    fn is_range(&self) -> bool {
        (self.high - self.low).abs() > f64::EPSILON
    }

    /// Parse `NN% FTP` or `NN-MM% FTP`
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let captures = FTP_PATTERN.as_ref()?.captures(text)?;
        let low: f64 = captures.get(1)?.as_str().parse().ok()?;
        let high: f64 = captures
            .get(2)
            .and_then(|high| high.as_str().parse().ok())
            .unwrap_or(low);
        Some(Self {
            low: low / 100.0,
            high: high / 100.0,
        })
    }

    /// Target stated in the exercise's name or notes
    #[must_use]
    pub fn for_exercise(exercise: &Exercise) -> Option<Self> {
        Self::parse(exercise.name()).or_else(|| exercise.notes().and_then(Self::parse))
    }
}

type Attributes = Vec<(&'static str, String)>;

fn power_attrs(power: PowerTarget) -> Attributes {
    if power.is_range() {
        vec![
            ("PowerLow", format!("{:.2}", power.low)),
            ("PowerHigh", format!("{:.2}", power.high)),
        ]
    } else {
        vec![("Power", format!("{:.2}", power.low))]
    }
}

fn element<'a>(tag: &'a str, attrs: &[(&'static str, String)]) -> BytesStart<'a> {
    BytesStart::new(tag)
        .with_attributes(attrs.iter().map(|(key, value)| (*key, value.as_str())))
}

/// Indented XML event writer over an in-memory buffer
struct XmlDocument {
    writer: Writer<Vec<u8>>,
}

impl XmlDocument {
    fn new() -> AppResult<Self> {
        let mut document = Self {
            writer: Writer::new_with_indent(Vec::new(), b' ', 4),
        };
        document.write(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        Ok(document)
    }

    fn write(&mut self, event: Event<'_>) -> AppResult<()> {
        self.writer
            .write_event(event)
            .map_err(|e| AppError::encode_failed(format!("Failed to write interval XML: {e}")))
    }

    fn open(&mut self, tag: &str) -> AppResult<()> {
        self.write(Event::Start(BytesStart::new(tag)))
    }

    fn close(&mut self, tag: &str) -> AppResult<()> {
        self.write(Event::End(BytesEnd::new(tag)))
    }

    fn empty(&mut self, tag: &str, attrs: &[(&'static str, String)]) -> AppResult<()> {
        self.write(Event::Empty(element(tag, attrs)))
    }

    fn text(&mut self, tag: &str, value: &str) -> AppResult<()> {
        self.open(tag)?;
        self.write(Event::Text(BytesText::new(value)))?;
        self.close(tag)
    }

    /// Interval node, with a text event child when `message` is set
    fn interval(
        &mut self,
        tag: &str,
        attrs: &[(&'static str, String)],
        message: Option<&str>,
    ) -> AppResult<()> {
        match message {
            Some(message) => {
                self.write(Event::Start(element(tag, attrs)))?;
                self.write(Event::Empty(
                    BytesStart::new("textevent")
                        .with_attributes([("timeoffset", "0"), ("message", message)]),
                ))?;
                self.close(tag)
            }
            None => self.empty(tag, attrs),
        }
    }

    fn finish(self) -> AppResult<String> {
        String::from_utf8(self.writer.into_inner())
            .map_err(|e| AppError::encode_failed(format!("Interval XML is not UTF-8: {e}")))
    }
}

struct IntervalRenderer {
    sport: IntervalSport,
    document: XmlDocument,
    nodes: usize,
}

impl IntervalRenderer {
    fn interval(
        &mut self,
        tag: &str,
        attrs: &[(&'static str, String)],
        message: Option<&str>,
    ) -> AppResult<()> {
        self.nodes += 1;
        if self.nodes > MAX_INTERVAL_NODES {
            return Err(AppError::encode_failed(format!(
                "Interval XML would exceed {MAX_INTERVAL_NODES} interval nodes"
            )));
        }
        self.document.interval(tag, attrs, message)
    }

    fn steady(
        &mut self,
        seconds: u32,
        power: PowerTarget,
        message: Option<&str>,
    ) -> AppResult<()> {
        let mut attrs = vec![("Duration", seconds.to_string())];
        attrs.extend(power_attrs(power));
        self.interval("SteadyState", &attrs, message)
    }

    fn free_ride(&mut self, message: &str) -> AppResult<()> {
        let attrs = [("Duration", FREE_RIDE_SECONDS.to_string())];
        self.interval("FreeRide", &attrs, Some(message))
    }

    fn ramp(
        &mut self,
        tag: &str,
        seconds: u32,
        from: f64,
        to: f64,
        name: Option<&str>,
    ) -> AppResult<()> {
        let attrs = [
            ("Duration", seconds.to_string()),
            ("PowerLow", format!("{from:.2}")),
            ("PowerHigh", format!("{to:.2}")),
        ];
        self.interval(tag, &attrs, name)
    }

    fn exercise(&mut self, step: &ExerciseStep) -> AppResult<()> {
        let power = PowerTarget::for_exercise(&step.exercise)
            .unwrap_or(PowerTarget::single(DEFAULT_WORK_POWER));
        let name = step.display_name();
        match &step.target {
            StepTarget::Duration(seconds) => self.steady(*seconds, power, Some(name)),
            StepTarget::Distance(distance) => {
                let seconds = (distance.meters() * self.sport.seconds_per_meter())
                    .round()
                    .max(1.0) as u32;
                self.steady(seconds, power, Some(&format!("{distance} {name}")))
            }
            StepTarget::Reps(reps) => self.free_ride(&format!("{reps} x {name}")),
            StepTarget::Open => self.free_ride(name),
        }
    }

    fn timed_work(step: &PlannedStep) -> Option<(u32, &Exercise)> {
        match step {
            PlannedStep::Work { seconds, exercise } => Some((*seconds, exercise)),
            PlannedStep::Exercise(ExerciseStep {
                exercise,
                target: StepTarget::Duration(seconds),
            }) => Some((*seconds, exercise)),
            _ => None,
        }
    }

    fn repeat(&mut self, count: u32, steps: &[PlannedStep]) -> AppResult<()> {
        if let [work, PlannedStep::Rest { seconds: off }] = steps {
            if let Some((on, exercise)) = Self::timed_work(work) {
                let power = PowerTarget::for_exercise(exercise)
                    .unwrap_or(PowerTarget::single(DEFAULT_WORK_POWER));
                let attrs = [
                    ("Repeat", count.to_string()),
                    ("OnDuration", on.to_string()),
                    ("OffDuration", off.to_string()),
                    ("OnPower", format!("{:.2}", power.mid())),
                    ("OffPower", format!("{RECOVERY_POWER:.2}")),
                ];
                return self.interval("IntervalsT", &attrs, Some(exercise.display_name()));
            }
        }
        if steps.is_empty() {
            return Ok(());
        }
        for _ in 0..count {
            self.steps(steps)?;
        }
        Ok(())
    }

    fn steps(&mut self, steps: &[PlannedStep]) -> AppResult<()> {
        for step in steps {
            match step {
                PlannedStep::Exercise(exercise) => self.exercise(exercise)?,
                PlannedStep::Work { seconds, exercise } => {
                    let power = PowerTarget::for_exercise(exercise)
                        .unwrap_or(PowerTarget::single(DEFAULT_WORK_POWER));
                    self.steady(*seconds, power, Some(exercise.display_name()))?;
                }
                PlannedStep::Rest { seconds } => {
                    self.steady(*seconds, PowerTarget::single(RECOVERY_POWER), None)?;
                }
                PlannedStep::Warmup { seconds, name } => {
                    self.ramp("Warmup", *seconds, RAMP_LOW, RAMP_HIGH, name.as_deref())?;
                }
                PlannedStep::Cooldown { seconds, name } => {
                    self.ramp("Cooldown", *seconds, RAMP_HIGH, RAMP_LOW, name.as_deref())?;
                }
                PlannedStep::Repeat { count, steps } => self.repeat(*count, steps)?,
            }
        }
        Ok(())
    }
}

/// Render `workout` as an interval XML document
///
/// # Errors
///
/// Returns `EncodeFailed` when unrolled repeats would exceed the interval node
/// limit, or when the XML writer fails
pub fn encode(workout: &Workout, options: &ExportOptions) -> AppResult<String> {
    let sport = options
        .interval_sport
        .unwrap_or_else(|| IntervalSport::detect(workout));
    let plan = WorkoutPlan::build(workout);
    debug!(%sport, steps = plan.flat_len(), "Planned interval XML steps");

    let mut document = XmlDocument::new()?;
    document.open("workout_file")?;
    document.text("author", AUTHOR)?;
    document.text("name", workout.title())?;
    document.text("description", workout.description().unwrap_or_default())?;
    document.text("sportType", sport.as_str())?;
    if workout.tags().is_empty() {
        document.empty("tags", &[])?;
    } else {
        document.open("tags")?;
        for tag in workout.tags() {
            document.empty("tag", &[("name", tag.clone())])?;
        }
        document.close("tags")?;
    }

    document.open("workout")?;
    let mut renderer = IntervalRenderer {
        sport,
        document,
        nodes: 0,
    };
    renderer.steps(&plan.steps)?;
    let mut document = renderer.document;
    document.close("workout")?;
    document.close("workout_file")?;
    document.finish()
}
