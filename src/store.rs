// Copyright 2026-present Quarry Contributors
// SPDX-License-Identifier: Apache-2.0

//! The mutable candidate corpus.
//!
//! Candidates live in a dense vector so table scans stay cache-friendly; an
//! id map on the side makes overwrite and removal O(1). Add/remove pay a
//! little extra for that density, but searches outnumber mutations by orders
//! of magnitude in the quick-open workload this engine serves.
//!
//! Id semantics are dual and explicit at the call site:
//! - explicit ids: map semantics, last write per id wins;
//! - omitted ids: list semantics, each value takes the next ordinal after
//!   the highest id ever assigned (reset to 0 by `replace_all`).
//!
//! Equal values under different ids are distinct, independently matchable
//! entries.

use std::collections::HashMap;

use crate::query::{fold_case, fold_separator, letter_bitmask};
use crate::types::{CandidateId, MatchError};

/// One candidate plus everything precomputed at insert time so the scoring
/// scan never touches the raw `String`.
#[derive(Debug, Clone)]
pub(crate) struct CandidateData {
    pub id: CandidateId,
    pub value: String,
    /// `value` as chars; scoring is char-positional.
    pub chars: Vec<char>,
    /// `chars` case-folded and separator-folded, the case-insensitive
    /// comparison form.
    pub folded: Vec<char>,
    /// Letter bitmask for the subsequence prefilter.
    pub bitmask: u32,
}

impl CandidateData {
    pub(crate) fn new(id: CandidateId, value: String) -> CandidateData {
        let chars: Vec<char> = value.chars().collect();
        let folded: Vec<char> = chars
            .iter()
            .map(|&c| fold_case(fold_separator(c)))
            .collect();
        // The prefilter must see the same alphabet the kernel compares
        // against, so the mask comes from the folded form. Unicode chars
        // like KELVIN SIGN fold to ASCII letters and count.
        let bitmask = letter_bitmask(folded.iter().copied());
        CandidateData {
            id,
            value,
            chars,
            folded,
            bitmask,
        }
    }
}

/// Id-keyed candidate collection. Owned by the engine behind its lock; all
/// operations here are single-threaded and atomic from the caller's view.
#[derive(Debug, Default)]
pub(crate) struct CandidateStore {
    entries: Vec<CandidateData>,
    by_id: HashMap<CandidateId, usize>,
    /// Next id handed out when the caller omits ids.
    next_ordinal: CandidateId,
}

impl CandidateStore {
    pub(crate) fn new() -> CandidateStore {
        CandidateStore::default()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn entries(&self) -> &[CandidateData] {
        &self.entries
    }

    /// Insert values, overwriting any candidate already stored under the
    /// same id. Fails with `ArityMismatch` before touching the store if an
    /// explicit id list and the value list differ in length.
    pub(crate) fn insert(
        &mut self,
        ids: Option<Vec<CandidateId>>,
        values: Vec<String>,
    ) -> Result<(), MatchError> {
        let ids = self.resolve_ids(ids, &values)?;
        self.entries.reserve(values.len());
        for (id, value) in ids.into_iter().zip(values) {
            self.upsert(id, value);
        }
        Ok(())
    }

    /// Drop everything and insert the given values. Ordinal assignment
    /// restarts from zero.
    pub(crate) fn replace_all(
        &mut self,
        ids: Option<Vec<CandidateId>>,
        values: Vec<String>,
    ) -> Result<(), MatchError> {
        // Validate before clearing: a failed call must leave the store as
        // it was.
        if let Some(ids) = &ids {
            if ids.len() != values.len() {
                return Err(MatchError::ArityMismatch {
                    ids_len: ids.len(),
                    values_len: values.len(),
                });
            }
        }
        self.entries.clear();
        self.by_id.clear();
        self.next_ordinal = 0;
        self.insert(ids, values)
    }

    /// Remove the candidates stored under `ids`. Unknown ids are ignored.
    pub(crate) fn remove_by_ids(&mut self, ids: &[CandidateId]) {
        for &id in ids {
            if let Some(index) = self.by_id.remove(&id) {
                self.swap_remove(index);
            }
        }
    }

    /// Legacy value-keyed removal: drop every candidate whose value equals
    /// one of the given strings.
    pub(crate) fn remove_by_values(&mut self, values: &[&str]) {
        for &value in values {
            // A value may be stored under several ids; remove them all.
            while let Some(index) = self.entries.iter().position(|c| c.value == value) {
                self.by_id.remove(&self.entries[index].id);
                self.swap_remove(index);
            }
        }
    }

    fn resolve_ids(
        &mut self,
        ids: Option<Vec<CandidateId>>,
        values: &[String],
    ) -> Result<Vec<CandidateId>, MatchError> {
        match ids {
            Some(ids) => {
                if ids.len() != values.len() {
                    return Err(MatchError::ArityMismatch {
                        ids_len: ids.len(),
                        values_len: values.len(),
                    });
                }
                Ok(ids)
            }
            None => {
                let start = self.next_ordinal;
                Ok((0..values.len())
                    .map(|offset| start + offset as CandidateId)
                    .collect())
            }
        }
    }

    fn upsert(&mut self, id: CandidateId, value: String) {
        let candidate = CandidateData::new(id, value);
        match self.by_id.get(&id) {
            Some(&index) => {
                // Last write wins for an id already present.
                self.entries[index] = candidate;
            }
            None => {
                self.by_id.insert(id, self.entries.len());
                self.entries.push(candidate);
            }
        }
        // Ordinal assignment continues after the highest id ever seen.
        self.next_ordinal = self.next_ordinal.max(id.saturating_add(1));
    }

    fn swap_remove(&mut self, index: usize) {
        self.entries.swap_remove(index);
        if let Some(moved) = self.entries.get(index) {
            self.by_id.insert(moved.id, index);
        }
    }
}
