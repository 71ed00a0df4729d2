// Copyright 2026-present Quarry Contributors
// SPDX-License-Identifier: Apache-2.0

//! Query normalization: what happens to a raw query before any scoring.
//!
//! Three things are decided here, once per search:
//! - ASCII whitespace (spaces, tabs) is stripped outright. Whitespace is not
//!   matched against anything and does not open a gap.
//! - The effective case mode: `case_sensitive` wins, otherwise `smart_case`
//!   plus an uppercase letter in the query forces sensitivity, otherwise
//!   comparisons fold case.
//! - The letter bitmask used to prune non-matching candidates cheaply.
//!
//! Separator equivalence also lives here: `\` and `_` fold to `/` so a query
//! written with any of them matches a candidate written with any other.
//! Exact-separator agreement still ranks higher, via the agreement bonus in
//! the scoring kernel.

use crate::types::MatchOptions;

/// A query after whitespace stripping, case-mode resolution, and separator
/// folding. Built once per `search` call and shared by every shard.
#[derive(Debug, Clone)]
pub(crate) struct NormalizedQuery {
    /// Whitespace-stripped query characters, original case and separators.
    pub raw: Vec<char>,
    /// `raw` with separators folded, and case folded unless the effective
    /// mode is case-sensitive. This is what the kernel compares against.
    pub folded: Vec<char>,
    /// Effective case mode for this search.
    pub case_sensitive: bool,
    /// Bitmask of ASCII letters present (case-insensitive), for prefiltering.
    pub bitmask: u32,
}

impl NormalizedQuery {
    pub(crate) fn new(query: &str, options: &MatchOptions) -> NormalizedQuery {
        let raw: Vec<char> = query.chars().filter(|c| !matches!(c, ' ' | '\t')).collect();
        let case_sensitive =
            options.case_sensitive || (options.smart_case && raw.iter().any(|c| c.is_uppercase()));
        let folded: Vec<char> = raw
            .iter()
            .map(|&c| {
                let c = fold_separator(c);
                if case_sensitive {
                    c
                } else {
                    fold_case(c)
                }
            })
            .collect();
        let bitmask = letter_bitmask(raw.iter().copied());
        NormalizedQuery {
            raw,
            folded,
            case_sensitive,
            bitmask,
        }
    }
}

/// Path-separator-equivalent characters: `/`, `\`, and `_` are mutually
/// interchangeable for matching.
pub(crate) fn is_separator(c: char) -> bool {
    matches!(c, '/' | '\\' | '_')
}

/// Structural path separators, used for the coverage span and for path
/// distance. `_` is match-equivalent to a separator but does not delimit
/// directories.
pub(crate) fn is_path_separator(c: char) -> bool {
    matches!(c, '/' | '\\')
}

/// Canonical separator for comparison purposes.
pub(crate) fn fold_separator(c: char) -> char {
    if is_separator(c) {
        '/'
    } else {
        c
    }
}

/// Single-scalar lowercase fold. Multi-scalar lowercase expansions keep
/// their first scalar so positions stay stable.
pub(crate) fn fold_case(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// Bitmask of the ASCII letters contained in `chars`, case-insensitive
/// (`a` = bit 0 ... `z` = bit 25).
///
/// A candidate whose mask does not cover the query's mask cannot contain the
/// query as a subsequence, which prunes most of a large corpus before the
/// alignment ever runs.
pub(crate) fn letter_bitmask(chars: impl Iterator<Item = char>) -> u32 {
    let mut mask = 0u32;
    for c in chars {
        let c = c.to_ascii_lowercase();
        if c.is_ascii_lowercase() {
            mask |= 1 << (c as u32 - 'a' as u32);
        }
    }
    mask
}
