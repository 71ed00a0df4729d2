// Copyright 2026-present Quarry Contributors
// SPDX-License-Identifier: Apache-2.0

//! Core types: search options, results, and the error taxonomy.
//!
//! `MatchOptions` is a closed set of typed fields with defaults. There is no
//! dynamic option bag: a field the engine does not know about cannot be
//! expressed, and a value outside its domain is rejected by
//! [`MatchOptions::validate`] before any work happens.

use std::error::Error;
use std::fmt;

/// Identifier for a candidate in the store.
///
/// Callers may supply their own ids; when omitted, ids are assigned as
/// sequential ordinals (see [`crate::Matcher::insert`]).
pub type CandidateId = u32;

/// Per-search options.
///
/// | Field                  | Default   | Meaning                                        |
/// |------------------------|-----------|------------------------------------------------|
/// | `case_sensitive`       | `false`   | Compare characters without case folding        |
/// | `smart_case`           | `false`   | Uppercase in the query forces case-sensitivity |
/// | `max_results`          | unbounded | Truncate the ranked result list                |
/// | `max_gap`              | unbounded | Reject candidates with a larger unmatched run  |
/// | `num_threads`          | `1`       | Worker fan-out for one `search` call           |
/// | `record_match_indexes` | `false`   | Return matched character positions             |
/// | `root_path`            | `None`    | Tie-break equal scores by path distance        |
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOptions {
    /// Compare query and candidate characters without case folding.
    pub case_sensitive: bool,
    /// When the query contains an uppercase letter, compare case-sensitively;
    /// otherwise case-insensitively. Applies whether or not `case_sensitive`
    /// is set.
    pub smart_case: bool,
    /// Upper bound on the number of results returned. `None` is unbounded.
    pub max_results: Option<usize>,
    /// Upper bound on the unmatched run between two matched characters.
    /// Candidates whose every alignment exceeds it are rejected.
    pub max_gap: Option<usize>,
    /// Number of parallel workers for this search. Must be at least 1.
    pub num_threads: usize,
    /// Record the character positions that matched, at some scoring cost.
    pub record_match_indexes: bool,
    /// When set, equal-score results are ordered by directory distance from
    /// this path, closest first.
    pub root_path: Option<String>,
}

impl Default for MatchOptions {
    fn default() -> Self {
        MatchOptions {
            case_sensitive: false,
            smart_case: false,
            max_results: None,
            max_gap: None,
            num_threads: 1,
            record_match_indexes: false,
            root_path: None,
        }
    }
}

impl MatchOptions {
    /// Check every field against its documented domain.
    ///
    /// The only field with a constrained domain is `num_threads`, which must
    /// be positive. The unsigned option types make the remaining domains
    /// total.
    pub fn validate(&self) -> Result<(), MatchError> {
        if self.num_threads == 0 {
            return Err(MatchError::InvalidOption {
                option: "num_threads",
                reason: "must be a positive worker count".to_string(),
            });
        }
        Ok(())
    }
}

/// One ranked search result.
///
/// Produced fresh per search and never retained by the engine; the caller
/// owns it outright.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    /// Relevance in `(0, 1]`. Exactly 1.0 for a whole-string match under the
    /// active case mode.
    pub score: f64,
    /// Id of the matched candidate.
    pub id: CandidateId,
    /// The candidate's value at the time of the search.
    pub value: String,
    /// Character positions in `value` that the query matched, in increasing
    /// order. Present only when `record_match_indexes` was set.
    pub match_indexes: Option<Vec<usize>>,
}

/// Errors surfaced by engine calls.
///
/// Every error is local to the call that raised it: the store is never left
/// half-mutated and no partial search output escapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    /// Explicit ids and values differ in length on construction or insert.
    ArityMismatch { ids_len: usize, values_len: usize },
    /// An option value is outside its documented domain.
    InvalidOption {
        option: &'static str,
        reason: String,
    },
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchError::ArityMismatch {
                ids_len,
                values_len,
            } => {
                write!(
                    f,
                    "ids and values must have the same length ({} ids, {} values)",
                    ids_len, values_len
                )
            }
            MatchError::InvalidOption { option, reason } => {
                write!(f, "invalid option `{}`: {}", option, reason)
            }
        }
    }
}

impl Error for MatchError {}
