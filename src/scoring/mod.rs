// Copyright 2026-present Quarry Contributors
// SPDX-License-Identifier: Apache-2.0

//! The math behind match scoring and ranking.
//!
//! A match's score is `coverage × gap coefficient × bonus factor`, each in
//! (0, 1], with whole-string equality short-circuiting to exactly 1.0. The
//! constants below are load-bearing: the orderings the engine promises
//! (separator-start beats camelCase-start beats mid-word; boundary placement
//! beats case agreement; the worst gap dominates) all come down to these
//! values, so change them together or not at all.
//!
//! # Constants
//!
//! | Constant                   | Value | Why this value                                        |
//! |----------------------------|-------|-------------------------------------------------------|
//! | `GAP_ONE_COEFF`            | 0.60  | A single 1-char gap keeps 60% of the coverage score   |
//! | `GAP_DECAY`                | 0.05  | Each extra unmatched char in a gap costs 5 points     |
//! | `GAP_FLOOR`                | 0.20  | Gaps of 9+ chars all cost the same; still a match     |
//! | `BOUNDARY_SEPARATOR`       | 1.0   | Run starting right after `/` `\` `_`                  |
//! | `BOUNDARY_STRING_START`    | 1.0   | Run starting at index 0 counts as a word start        |
//! | `BOUNDARY_CASE_TRANSITION` | 0.8   | camelCase word start: real, but weaker than a slash   |
//! | `BOUNDARY_WEIGHT`          | 0.05  | Boundary bonus scale; must stay above AGREEMENT_WEIGHT|
//! | `AGREEMENT_WEIGHT`         | 0.01  | Exact-case/exact-separator agreement; a soft nudge    |
//!
//! `BOUNDARY_WEIGHT > AGREEMENT_WEIGHT * 2` keeps boundary placement
//! dominant over case agreement (camelCase candidates must outrank their
//! all-lowercase twins for a lowercase query). The composed bonus is divided
//! by `BONUS_NORMALIZER` so scores stay inside (0, 1].

mod kernel;
pub(crate) mod ranking;

pub(crate) use kernel::score_candidate;

/// Gap coefficient for a 1-character gap between two matched runs.
pub const GAP_ONE_COEFF: f64 = 0.60;

/// Per-character decay of the gap coefficient beyond the first.
pub const GAP_DECAY: f64 = 0.05;

/// Floor of the gap coefficient, reached at gaps of 9 characters and up.
pub const GAP_FLOOR: f64 = 0.20;

/// Gap length at which `GAP_FLOOR` is reached; longer gaps all score alike.
pub(crate) const GAP_FLOOR_LEN: usize = 9;

/// Boundary value for a run starting immediately after a path separator.
pub const BOUNDARY_SEPARATOR: f64 = 1.0;

/// Boundary value for a run starting at the beginning of the string.
pub const BOUNDARY_STRING_START: f64 = 1.0;

/// Boundary value for a run starting at a lowercase→uppercase transition.
pub const BOUNDARY_CASE_TRANSITION: f64 = 0.8;

/// Weight of the averaged run-boundary bonus in the composed score.
pub const BOUNDARY_WEIGHT: f64 = 0.05;

/// Weight of the exact-character agreement fraction in the composed score.
pub const AGREEMENT_WEIGHT: f64 = 0.01;

/// Normalizer keeping the composed bonus factor at or below 1.
pub(crate) const BONUS_NORMALIZER: f64 = 1.0 + BOUNDARY_WEIGHT + AGREEMENT_WEIGHT;

/// DP state-space cap. Beyond `query len × candidate len` cells, scoring
/// falls back to a conservative estimate instead of aligning (degenerate
/// inputs must terminate fast and must not score well).
pub(crate) const MAX_DP_CELLS: usize = 10_000;

/// Coverage multiplier for the oversized-candidate estimate.
pub(crate) const OVERSIZE_ESTIMATE_COEFF: f64 = 0.75;

/// Coefficient applied for a gap of `gap` unmatched characters between two
/// matched runs. `gap == 0` means the runs are one contiguous run.
pub(crate) fn gap_coefficient(gap: usize) -> f64 {
    if gap == 0 {
        1.0
    } else {
        (GAP_ONE_COEFF - GAP_DECAY * (gap - 1) as f64).max(GAP_FLOOR)
    }
}
