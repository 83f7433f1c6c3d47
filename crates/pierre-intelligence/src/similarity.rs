// ABOUTME: Order-insensitive token-set similarity between normalized exercise names
// ABOUTME: InDel-based ratio over shared and differing token sets, scored in [0, 1]
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Token-set similarity
//!
//! Both inputs are split on whitespace into token sets. When one set is a
//! subset of the other (and they share at least one token) the score is 1.0.
//! Otherwise the shared tokens are sorted and joined, each side's extra tokens
//! are appended, and the best normalized InDel ratio among the three pairings
//! is returned.

use std::collections::BTreeSet;
use std::mem;

/// Normalized InDel similarity: `2 * LCS / (len(a) + len(b))`, over chars
#[must_use]
pub fn indel_ratio(left: &str, right: &str) -> f64 {
    let left: Vec<char> = left.chars().collect();
    let right: Vec<char> = right.chars().collect();
    let total = left.len() + right.len();
    if total == 0 {
        return 1.0;
    }
    let common = longest_common_subsequence(&left, &right);
    (2 * common) as f64 / total as f64
}

fn longest_common_subsequence(left: &[char], right: &[char]) -> usize {
    if left.is_empty() || right.is_empty() {
        return 0;
    }
    let mut previous = vec![0_usize; right.len() + 1];
    let mut current = vec![0_usize; right.len() + 1];
    for &l in left {
        for (j, &r) in right.iter().enumerate() {
            current[j + 1] = if l == r {
                previous[j] + 1
            } else {
                current[j].max(previous[j + 1])
            };
        }
        mem::swap(&mut previous, &mut current);
    }
    previous[right.len()]
}

fn join_with(prefix: &str, rest: &str) -> String {
    match (prefix.is_empty(), rest.is_empty()) {
        (true, _) => rest.to_owned(),
        (false, true) => prefix.to_owned(),
        (false, false) => format!("{prefix} {rest}"),
    }
}

/// Token-set similarity in `[0, 1]`
///
/// Empty inputs on either side score 0.0.
#[must_use]
pub fn token_set_ratio(left: &str, right: &str) -> f64 {
    let left_tokens: BTreeSet<&str> = left.split_whitespace().collect();
    let right_tokens: BTreeSet<&str> = right.split_whitespace().collect();
    if left_tokens.is_empty() || right_tokens.is_empty() {
        return 0.0;
    }

    let shared: Vec<&str> = left_tokens.intersection(&right_tokens).copied().collect();
    let only_left: Vec<&str> = left_tokens.difference(&right_tokens).copied().collect();
    let only_right: Vec<&str> = right_tokens.difference(&left_tokens).copied().collect();

    if !shared.is_empty() && (only_left.is_empty() || only_right.is_empty()) {
        return 1.0;
    }

    let shared = shared.join(" ");
    let with_left = join_with(&shared, &only_left.join(" "));
    let with_right = join_with(&shared, &only_right.join(" "));

    let mut best = indel_ratio(&with_left, &with_right);
    if !shared.is_empty() {
        best = best
            .max(indel_ratio(&shared, &with_left))
            .max(indel_ratio(&shared, &with_right));
    }
    best.clamp(0.0, 1.0)
}
