// Copyright 2026-present Quarry Contributors
// SPDX-License-Identifier: Apache-2.0

//! Result ordering: how matches get sorted.
//!
//! The order is a strict chain of tie-breaks, and it is total — two distinct
//! candidates never compare equal, so every search over the same snapshot
//! returns the same sequence.
//!
//! Sort order:
//! 1. **Score** — descending. Scores within `SCORE_TIE_EPSILON` are a tie.
//! 2. **Root distance** — ascending, only when the search supplied a root
//!    path. Distance counts directory-boundary steps via the nearest common
//!    ancestor, not characters.
//! 3. **Length** — ascending; shorter candidates win.
//! 4. **Id** — ascending, for absolute determinism.

use std::cmp::Ordering;

use crate::query::is_path_separator;
use crate::types::CandidateId;

/// Scores closer than this are considered tied and fall through to the
/// distance/length tie-breaks.
pub(crate) const SCORE_TIE_EPSILON: f64 = 1e-9;

/// Everything the comparator needs about one match, detached from the
/// result payload so shard heaps stay small.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct RankKey {
    pub score: f64,
    /// Directory distance to the search's root path; 0 when no root was
    /// supplied, so the tie-break is inert.
    pub root_distance: u32,
    /// Candidate length in chars.
    pub len: u32,
    pub id: CandidateId,
}

/// Compare two matches for ranking. `Less` ranks first.
pub(crate) fn compare_keys(a: &RankKey, b: &RankKey) -> Ordering {
    if (a.score - b.score).abs() > SCORE_TIE_EPSILON {
        // Descending: the higher score ranks first.
        return b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal);
    }
    a.root_distance
        .cmp(&b.root_distance)
        .then_with(|| a.len.cmp(&b.len))
        .then_with(|| a.id.cmp(&b.id))
}

/// Directory-boundary distance between two paths: the number of components
/// below their nearest common ancestor, summed over both sides.
///
/// `_` is separator-equivalent for matching but does not delimit
/// directories; only `/` and `\` split here.
pub(crate) fn path_distance(a: &str, b: &str) -> u32 {
    let a_parts: Vec<&str> = split_components(a).collect();
    let b_parts: Vec<&str> = split_components(b).collect();
    let common = a_parts
        .iter()
        .zip(&b_parts)
        .take_while(|(x, y)| x == y)
        .count();
    (a_parts.len() - common + b_parts.len() - common) as u32
}

fn split_components(path: &str) -> impl Iterator<Item = &str> {
    path.split(|c: char| is_path_separator(c))
        .filter(|part| !part.is_empty())
}
