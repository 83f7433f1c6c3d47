// ABOUTME: Criterion benchmarks for exercise matching, canonicalization and device encoders
// ABOUTME: Measures normalize/find_match latency, batch canonicalization and per-format export cost
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Criterion benchmarks for the workout mapping pipeline.
//!
//! Covers name normalization, fuzzy matching against the built-in device list,
//! catalog canonicalization over workout batches, and every export format.

#![allow(
    clippy::missing_docs_in_private_items,
    clippy::unwrap_used,
    missing_docs
)]

use chrono::{NaiveDate, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pierre_core::models::{BlockBuilder, BlockType, ExerciseBuilder, Workout, WorkoutBuilder};
use pierre_intelligence::{find_match, normalize, DeviceExerciseList};
use pierre_workout_mapper::canonicalize::Canonicalizer;
use pierre_workout_mapper::export::{export, ExportFormat, ExportOptions};

const RAW_NAMES: &[&str] = &[
    "DB Bench Press",
    "A1: Barbell Back Squats",
    "Push-Ups!!",
    "KB Swings",
    "RDLs",
    "Single Arm DB Row",
    "Wall Balls",
    "Underwater Basket Weaving",
];

/// Workout with `blocks` supersets of four exercises each
#[allow(clippy::cast_possible_truncation)]
fn generate_workout(blocks: usize) -> Workout {
    let mut builder = WorkoutBuilder::new(format!("Bench Workout {blocks}"));
    for index in 0..blocks {
        let exercises = (0..4)
            .map(|offset| {
                let name = RAW_NAMES[(index * 4 + offset) % RAW_NAMES.len()];
                ExerciseBuilder::new(name)
                    .reps(8 + (offset as u32))
                    .build()
                    .unwrap()
            })
            .collect();
        let block = BlockBuilder::new(BlockType::Superset)
            .rounds(3)
            .rest_between_seconds(60)
            .exercises(exercises)
            .build()
            .unwrap();
        builder = builder.block(block);
    }
    builder.build().unwrap()
}

fn fixed_options() -> ExportOptions {
    ExportOptions::default()
        .with_schedule_start(NaiveDate::from_ymd_opt(2025, 11, 5).unwrap())
        .with_created_at(Utc.with_ymd_and_hms(2025, 11, 5, 7, 30, 0).unwrap())
}

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");
    group.throughput(Throughput::Elements(RAW_NAMES.len() as u64));
    group.bench_function("raw_names", |b| {
        b.iter(|| {
            for name in RAW_NAMES {
                black_box(normalize(black_box(name)));
            }
        });
    });
    group.finish();
}

fn bench_find_match(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_match");
    let devices = DeviceExerciseList::builtin();

    for name in ["DB Bench Press", "Burpees", "Underwater Basket Weaving"] {
        group.bench_with_input(BenchmarkId::new("builtin_devices", name), &name, |b, name| {
            b.iter(|| find_match(black_box(name), black_box(devices.names()), 0.7));
        });
    }
    group.finish();
}

fn bench_canonicalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("canonicalize");
    let canonicalizer = Canonicalizer::default();

    for count in [1_usize, 10, 100] {
        let workouts: Vec<Workout> = (0..count).map(|_| generate_workout(4)).collect();
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("batch", count), &workouts, |b, workouts| {
            b.iter(|| canonicalizer.canonicalize_batch(black_box(workouts)));
        });
    }
    group.finish();
}

fn bench_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("export");
    let workout = Canonicalizer::default().canonicalize(&generate_workout(8));
    let options = fixed_options();

    for format in ExportFormat::ALL {
        group.bench_with_input(
            BenchmarkId::new("format", format.as_str()),
            &format,
            |b, format| {
                b.iter(|| export(black_box(&workout), *format, &options).unwrap());
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_normalize,
    bench_find_match,
    bench_canonicalize,
    bench_export
);
criterion_main!(benches);
