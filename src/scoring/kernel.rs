// Copyright 2026-present Quarry Contributors
// SPDX-License-Identifier: Apache-2.0

//! Subsequence-alignment scoring for one (query, candidate) pair.
//!
//! Greedy leftmost matching is not good enough: the leftmost assignment of
//! query characters can land mid-word when a slightly later assignment lands
//! on a path segment or camelCase boundary. So the kernel runs a
//! dynamic program over (query index, candidate position), picking the
//! assignment with the best summed per-character quality, then composes the
//! final score from that winning alignment:
//!
//! ```text
//! score = coverage × worst-gap coefficient × bonus / BONUS_NORMALIZER
//! ```
//!
//! - coverage: query length over the candidate span from the last path
//!   separator before the first matched character. Matching the basename of
//!   a deep path is as good as matching a short string.
//! - worst-gap: the minimum `gap_coefficient` over the alignment's internal
//!   gaps; a single contiguous run pays nothing.
//! - bonus: averaged run-boundary values plus the fraction of characters
//!   agreeing with the query byte-for-byte (case and separator identity).
//!
//! The DP runs over suffixes so that the per-start-position span
//! normalization can pick the best first position at the top level. Position
//! windows are pruned by forward/backward subsequence scans, which double as
//! the no-match early out. The state space is capped at `MAX_DP_CELLS`;
//! oversized degenerate inputs get a flat conservative estimate instead of a
//! perfect score.

use crate::query::{fold_case, fold_separator, is_path_separator, is_separator, NormalizedQuery};
use crate::store::CandidateData;
use crate::scoring::{
    gap_coefficient, AGREEMENT_WEIGHT, BONUS_NORMALIZER, BOUNDARY_CASE_TRANSITION,
    BOUNDARY_SEPARATOR, BOUNDARY_STRING_START, BOUNDARY_WEIGHT, GAP_FLOOR, GAP_FLOOR_LEN,
    MAX_DP_CELLS, OVERSIZE_ESTIMATE_COEFF,
};

/// Outcome of scoring one candidate: a score in (0, 1] and, when requested,
/// the matched character positions.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CandidateMatch {
    pub score: f64,
    pub indexes: Option<Vec<usize>>,
}

/// One DP state: the best suffix alignment with query\[i\] matched at a
/// given candidate position, plus the aggregates needed to compose the
/// final score without a second traversal.
#[derive(Debug, Clone, Copy)]
struct Cell {
    /// Summed per-character quality of the suffix alignment. The argmax key.
    sum: f64,
    /// Minimum gap coefficient over the suffix's internal gaps (1.0 = none).
    min_gap: f64,
    /// Sum of boundary values of run starts strictly after this character.
    boundary: f64,
    /// Count of those run starts.
    runs: u32,
    /// Characters in the suffix agreeing with the query exactly.
    agree: u32,
    /// Position matched by the next query character (`NO_NEXT` at the end).
    next: u32,
}

const NO_NEXT: u32 = u32::MAX;

const INVALID: Cell = Cell {
    sum: f64::NEG_INFINITY,
    min_gap: 1.0,
    boundary: 0.0,
    runs: 0,
    agree: 0,
    next: NO_NEXT,
};

impl Cell {
    fn is_valid(&self) -> bool {
        self.sum > f64::NEG_INFINITY
    }
}

/// Boundary value of a run starting at `j`, or 0.0 mid-word.
fn boundary_bonus(chars: &[char], j: usize) -> f64 {
    if j == 0 {
        return BOUNDARY_STRING_START;
    }
    let prev = chars[j - 1];
    if is_separator(prev) {
        BOUNDARY_SEPARATOR
    } else if prev.is_lowercase() && chars[j].is_uppercase() {
        BOUNDARY_CASE_TRANSITION
    } else {
        0.0
    }
}

/// Decide whether the query matches `candidate` as a subsequence and score
/// the best alignment. `None` means no match — including when `max_gap`
/// disqualifies every alignment.
pub(crate) fn score_candidate(
    candidate: &CandidateData,
    query: &NormalizedQuery,
    max_gap: Option<usize>,
    record_indexes: bool,
) -> Option<CandidateMatch> {
    let m = query.folded.len();
    let n = candidate.chars.len();

    // Empty query: vacuous match, maximal score. Ordering among the
    // all-matching candidates falls to the length tie-break.
    if m == 0 {
        return Some(CandidateMatch {
            score: 1.0,
            indexes: record_indexes.then(Vec::new),
        });
    }

    // Whole-string equality under the active case mode (separator identity
    // included) is the one way to score exactly 1.0.
    if m == n && is_whole_string_match(candidate, query) {
        return Some(CandidateMatch {
            score: 1.0,
            indexes: record_indexes.then(|| (0..n).collect()),
        });
    }

    if m > n {
        return None;
    }

    let cand_at = |j: usize| -> char {
        if query.case_sensitive {
            fold_separator(candidate.chars[j])
        } else {
            candidate.folded[j]
        }
    };

    // Backward scan: the last viable position for each query character.
    // Doubles as the subsequence check (and prunes the DP windows hard).
    let mut last = vec![0usize; m];
    {
        let mut h = n as isize - 1;
        for i in (0..m).rev() {
            let qc = query.folded[i];
            while h >= 0 && cand_at(h as usize) != qc {
                h -= 1;
            }
            if h < 0 {
                return None;
            }
            last[i] = h as usize;
            h -= 1;
        }
    }

    // Forward scan: the first viable position for each query character.
    // Cannot fail once the backward scan succeeded.
    let mut first = vec![0usize; m];
    {
        let mut h = 0usize;
        for i in 0..m {
            while cand_at(h) != query.folded[i] {
                h += 1;
            }
            first[i] = h;
            h += 1;
        }
    }

    if n * m > MAX_DP_CELLS {
        return oversize_estimate(m, n, &first, max_gap, record_indexes);
    }

    let agree_at = |i: usize, j: usize| -> u32 {
        u32::from(query.raw[i] == candidate.chars[j])
    };

    let mut dp = vec![INVALID; m * n];

    // Base row: the final query character ends the alignment.
    for j in first[m - 1]..=last[m - 1] {
        if cand_at(j) != query.folded[m - 1] {
            continue;
        }
        let agree = agree_at(m - 1, j);
        dp[(m - 1) * n + j] = Cell {
            sum: AGREEMENT_WEIGHT * f64::from(agree),
            min_gap: 1.0,
            boundary: 0.0,
            runs: 0,
            agree,
            next: NO_NEXT,
        };
    }

    // Suffix maxima over the next row for the gap-floor region, where the
    // transition value no longer depends on the gap length. Rebuilt per row.
    let mut floor_suffix: Vec<(f64, u32)> = vec![(f64::NEG_INFINITY, NO_NEXT); n + 1];

    for i in (0..m.saturating_sub(1)).rev() {
        let next_base = (i + 1) * n;

        if max_gap.is_none() {
            floor_suffix[n] = (f64::NEG_INFINITY, NO_NEXT);
            for j in (0..n).rev() {
                let mut best = floor_suffix[j + 1];
                let cell = &dp[next_base + j];
                if cell.is_valid() {
                    let val =
                        cell.sum + GAP_FLOOR + BOUNDARY_WEIGHT * boundary_bonus(&candidate.chars, j);
                    if val > best.0 {
                        best = (val, j as u32);
                    }
                }
                floor_suffix[j] = best;
            }
        }

        let near_cap = max_gap.map_or(GAP_FLOOR_LEN, |g| g.min(GAP_FLOOR_LEN));

        for j in first[i]..=last[i] {
            if cand_at(j) != query.folded[i] {
                continue;
            }

            let mut best_val = f64::NEG_INFINITY;
            let mut best_next = NO_NEXT;
            let mut best_gap = 0usize;
            let mut best_bonus = 0.0f64;

            // Near gaps, where the coefficient still varies per character.
            for gap in 0..=near_cap {
                let jn = j + 1 + gap;
                if jn > last[i + 1] {
                    break;
                }
                let cell = &dp[next_base + jn];
                if !cell.is_valid() {
                    continue;
                }
                let bonus = if gap > 0 {
                    boundary_bonus(&candidate.chars, jn)
                } else {
                    0.0
                };
                let val = cell.sum
                    + gap_coefficient(gap)
                    + if gap > 0 { BOUNDARY_WEIGHT * bonus } else { 0.0 };
                if val > best_val {
                    best_val = val;
                    best_next = jn as u32;
                    best_gap = gap;
                    best_bonus = bonus;
                }
            }

            // Far gaps, all at the floor coefficient.
            let far_lo = j + 2 + GAP_FLOOR_LEN;
            match max_gap {
                None => {
                    if far_lo <= last[i + 1] {
                        let (val, jn) = floor_suffix[far_lo];
                        if val > best_val {
                            best_val = val;
                            best_next = jn;
                            best_gap = jn as usize - j - 1;
                            best_bonus = boundary_bonus(&candidate.chars, jn as usize);
                        }
                    }
                }
                Some(limit) if limit > GAP_FLOOR_LEN => {
                    let far_hi = (j + 1 + limit).min(last[i + 1]);
                    for jn in far_lo..=far_hi {
                        let cell = &dp[next_base + jn];
                        if !cell.is_valid() {
                            continue;
                        }
                        let bonus = boundary_bonus(&candidate.chars, jn);
                        let val = cell.sum + GAP_FLOOR + BOUNDARY_WEIGHT * bonus;
                        if val > best_val {
                            best_val = val;
                            best_next = jn as u32;
                            best_gap = jn - j - 1;
                            best_bonus = bonus;
                        }
                    }
                }
                Some(_) => {}
            }

            if best_next == NO_NEXT {
                continue;
            }

            let chosen = dp[next_base + best_next as usize];
            let agree = agree_at(i, j);
            dp[i * n + j] = Cell {
                sum: best_val + AGREEMENT_WEIGHT * f64::from(agree),
                min_gap: if best_gap > 0 {
                    chosen.min_gap.min(gap_coefficient(best_gap))
                } else {
                    chosen.min_gap
                },
                boundary: chosen.boundary + if best_gap > 0 { best_bonus } else { 0.0 },
                runs: chosen.runs + u32::from(best_gap > 0),
                agree: chosen.agree + agree,
                next: best_next,
            };
        }
    }

    // Top level: compose the final score per first position. The coverage
    // span depends on where the alignment starts, so the choice of first
    // position is made against the composed score, not the raw sum.
    let mut best_score = f64::NEG_INFINITY;
    let mut best_start = usize::MAX;
    let mut last_sep = 0usize;
    for j in 0..=last[0] {
        if is_path_separator(candidate.chars[j]) {
            last_sep = j;
        }
        if j < first[0] {
            continue;
        }
        let cell = &dp[j];
        if !cell.is_valid() {
            continue;
        }
        let runs = f64::from(cell.runs + 1);
        let boundary = cell.boundary + boundary_bonus(&candidate.chars, j);
        let coverage = m as f64 / (n - last_sep) as f64;
        let bonus = 1.0
            + BOUNDARY_WEIGHT * (boundary / runs)
            + AGREEMENT_WEIGHT * (f64::from(cell.agree) / m as f64);
        let score = coverage * cell.min_gap * bonus / BONUS_NORMALIZER;
        if score > best_score {
            best_score = score;
            best_start = j;
        }
    }

    if best_start == usize::MAX {
        // Every alignment tripped over max_gap.
        return None;
    }

    let indexes = record_indexes.then(|| {
        let mut indexes = Vec::with_capacity(m);
        let mut j = best_start;
        for i in 0..m {
            indexes.push(j);
            j = dp[i * n + j].next as usize;
        }
        indexes
    });

    Some(CandidateMatch {
        score: best_score,
        indexes,
    })
}

fn is_whole_string_match(candidate: &CandidateData, query: &NormalizedQuery) -> bool {
    if query.case_sensitive {
        query.raw == candidate.chars
    } else {
        query
            .raw
            .iter()
            .zip(&candidate.chars)
            .all(|(&a, &b)| fold_case(a) == fold_case(b))
    }
}

/// Conservative result for state spaces past `MAX_DP_CELLS`: a flat
/// coverage-proportional estimate, no indexes. Runs in the time of the
/// subsequence scans that preceded it. `max_gap` is checked against the
/// greedy leftmost alignment, the only one already in hand.
fn oversize_estimate(
    m: usize,
    n: usize,
    first: &[usize],
    max_gap: Option<usize>,
    _record_indexes: bool,
) -> Option<CandidateMatch> {
    if let Some(limit) = max_gap {
        for i in 1..m {
            if first[i] - first[i - 1] - 1 > limit {
                return None;
            }
        }
    }
    Some(CandidateMatch {
        score: OVERSIZE_ESTIMATE_COEFF * m as f64 / n as f64,
        indexes: None,
    })
}
