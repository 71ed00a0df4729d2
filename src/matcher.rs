// Copyright 2026-present Quarry Contributors
// SPDX-License-Identifier: Apache-2.0

//! The engine facade: a mutable candidate corpus plus the search
//! coordinator that fans scoring out across it.
//!
//! One `Matcher` owns one candidate store behind a reader-writer lock.
//! Searches hold the read lock for the duration of scoring, mutations take
//! the write lock, so a search in flight sees either the whole pre-mutation
//! snapshot or the whole post-mutation one — never a torn store.
//!
//! A multi-threaded search splits the snapshot into `num_threads` contiguous
//! shards and scores them on a rayon pool sized to exactly that count. Each
//! shard keeps a bounded worst-at-the-top heap of its best `max_results`
//! hits, so no shard carries more than the caller can receive; the merge
//! re-heaps the shard winners under the same comparator. The pool is built
//! lazily, cached inside the matcher, and rebuilt only when a search asks
//! for a different width. Workers are joined before `search` returns; there
//! is no cancellation, only the `max_results` / corpus-size cost bounds.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::{Mutex, RwLock};
use rayon::prelude::*;
use tracing::{debug, trace, warn};

use crate::query::NormalizedQuery;
use crate::scoring::ranking::{compare_keys, path_distance, RankKey};
use crate::scoring::score_candidate;
use crate::store::{CandidateData, CandidateStore};
use crate::types::{CandidateId, MatchError, MatchOptions, MatchResult};

/// Below this many live candidates a search scans single-threaded no matter
/// what `num_threads` says; fan-out overhead would dominate. Results are
/// identical either way.
const PARALLEL_MIN_CANDIDATES: usize = 10_000;

/// Fuzzy subsequence matching engine over a mutable candidate corpus.
///
/// ```
/// use quarry::{MatchOptions, Matcher};
///
/// let matcher = Matcher::new(["src/main.rs", "src/matcher.rs", "README.md"]);
/// let results = matcher.search("mat", &MatchOptions::default()).unwrap();
/// assert_eq!(results[0].value, "src/matcher.rs");
/// ```
pub struct Matcher {
    store: RwLock<CandidateStore>,
    /// Cached worker pool, keyed by its thread count.
    pool: Mutex<Option<(usize, Arc<rayon::ThreadPool>)>>,
}

impl Matcher {
    /// Build a matcher over `values`, with ids assigned as ordinals
    /// `0..values.len()`.
    pub fn new<I, S>(values: I) -> Matcher
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut store = CandidateStore::new();
        // Ordinal ids cannot mismatch; the Result is vacuously Ok.
        store
            .insert(None, values.into_iter().map(Into::into).collect())
            .ok();
        Matcher {
            store: RwLock::new(store),
            pool: Mutex::new(None),
        }
    }

    /// Build a matcher over explicitly-identified values. Fails with
    /// [`MatchError::ArityMismatch`] when the sequences differ in length.
    pub fn with_ids(ids: Vec<CandidateId>, values: Vec<String>) -> Result<Matcher, MatchError> {
        let mut store = CandidateStore::new();
        store.insert(Some(ids), values)?;
        Ok(Matcher {
            store: RwLock::new(store),
            pool: Mutex::new(None),
        })
    }

    /// Number of live candidates.
    pub fn len(&self) -> usize {
        self.store.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.read().is_empty()
    }

    /// Insert candidates. Explicit ids overwrite any candidate already
    /// stored under the same id; omitted ids take sequential ordinals after
    /// the highest id assigned so far. All-or-nothing on error.
    pub fn insert(
        &self,
        ids: Option<Vec<CandidateId>>,
        values: Vec<String>,
    ) -> Result<(), MatchError> {
        let count = values.len();
        self.store.write().insert(ids, values)?;
        trace!(count, "inserted candidates");
        Ok(())
    }

    /// Replace the whole corpus. Ordinal assignment restarts from zero.
    /// All-or-nothing on error.
    pub fn replace_all(
        &self,
        ids: Option<Vec<CandidateId>>,
        values: Vec<String>,
    ) -> Result<(), MatchError> {
        let count = values.len();
        self.store.write().replace_all(ids, values)?;
        trace!(count, "replaced all candidates");
        Ok(())
    }

    /// Remove candidates by id. Unknown ids are ignored.
    pub fn remove_by_ids(&self, ids: &[CandidateId]) {
        self.store.write().remove_by_ids(ids);
        trace!(count = ids.len(), "removed candidates by id");
    }

    /// Legacy value-keyed removal: drop every candidate whose value equals
    /// one of the given strings.
    pub fn remove_by_values(&self, values: &[&str]) {
        self.store.write().remove_by_values(values);
        trace!(count = values.len(), "removed candidates by value");
    }

    /// Search the current snapshot, returning at most `max_results` matches
    /// ranked by score, root distance, length, and id.
    ///
    /// Synchronous: scoring (parallel or not) completes before this
    /// returns. Two searches with no intervening mutation return identical
    /// sequences.
    pub fn search(
        &self,
        query: &str,
        options: &MatchOptions,
    ) -> Result<Vec<MatchResult>, MatchError> {
        options.validate()?;
        let limit = options.max_results.unwrap_or(usize::MAX);
        if limit == 0 {
            return Ok(Vec::new());
        }

        let normalized = NormalizedQuery::new(query, options);
        let started = Instant::now();

        let store = self.store.read();
        let entries = store.entries();
        if entries.is_empty() {
            return Ok(Vec::new());
        }

        let threads = options.num_threads;
        let shard_heaps: Vec<BinaryHeap<ShardHit>> =
            if threads > 1 && entries.len() >= PARALLEL_MIN_CANDIDATES {
                let shard_len = entries.len().div_ceil(threads);
                match self.worker_pool(threads) {
                    Some(pool) => pool.install(|| {
                        entries
                            .par_chunks(shard_len)
                            .enumerate()
                            .map(|(shard, chunk)| {
                                scan_shard(chunk, shard * shard_len, &normalized, options, limit)
                            })
                            .collect()
                    }),
                    None => vec![scan_shard(entries, 0, &normalized, options, limit)],
                }
            } else {
                vec![scan_shard(entries, 0, &normalized, options, limit)]
            };

        // Merge shard winners under the same comparator and bound.
        let mut combined: BinaryHeap<ShardHit> = BinaryHeap::new();
        for heap in shard_heaps {
            for hit in heap {
                push_bounded(&mut combined, hit, limit);
            }
        }

        let results: Vec<MatchResult> = combined
            .into_sorted_vec()
            .into_iter()
            .map(|hit| {
                let candidate = &entries[hit.store_index];
                MatchResult {
                    score: hit.key.score,
                    id: candidate.id,
                    value: candidate.value.clone(),
                    match_indexes: hit.indexes,
                }
            })
            .collect();

        debug!(
            candidates = entries.len(),
            results = results.len(),
            threads,
            elapsed_us = started.elapsed().as_micros() as u64,
            "search complete"
        );
        Ok(results)
    }

    /// Worker pool of exactly `threads` workers, built on first use and
    /// rebuilt when the requested width changes. `None` means pool
    /// construction failed and the caller should scan inline.
    fn worker_pool(&self, threads: usize) -> Option<Arc<rayon::ThreadPool>> {
        let mut cached = self.pool.lock();
        if let Some((width, pool)) = cached.as_ref() {
            if *width == threads {
                return Some(Arc::clone(pool));
            }
        }
        match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
            Ok(pool) => {
                let pool = Arc::new(pool);
                *cached = Some((threads, Arc::clone(&pool)));
                Some(pool)
            }
            Err(error) => {
                warn!(%error, "worker pool unavailable; scanning single-threaded");
                None
            }
        }
    }
}

impl Default for Matcher {
    fn default() -> Matcher {
        Matcher::new(Vec::<String>::new())
    }
}

// Hand-written: rayon's ThreadPool is not Debug, so a derive is out.
impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matcher")
            .field("candidates", &self.store.read().len())
            .field("pool_threads", &self.pool.lock().as_ref().map(|(n, _)| *n))
            .finish()
    }
}

/// One match inside a shard heap: the ranking key plus what it takes to
/// build the caller's result after the merge.
#[derive(Debug)]
struct ShardHit {
    key: RankKey,
    store_index: usize,
    indexes: Option<Vec<usize>>,
}

// BinaryHeap is a max-heap; ordering hits worst-first puts the eviction
// candidate at the top and makes into_sorted_vec yield best-first.
impl Ord for ShardHit {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_keys(&self.key, &other.key)
    }
}

impl PartialOrd for ShardHit {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ShardHit {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ShardHit {}

/// Push while keeping the heap within `limit` entries, evicting the
/// worst-ranked hit once full.
fn push_bounded(heap: &mut BinaryHeap<ShardHit>, hit: ShardHit, limit: usize) {
    if heap.len() < limit {
        heap.push(hit);
        return;
    }
    if let Some(worst) = heap.peek() {
        if hit.cmp(worst) == Ordering::Less {
            heap.push(hit);
            heap.pop();
        }
    }
}

/// Score every candidate in one shard, keeping a bounded top list.
fn scan_shard(
    shard: &[CandidateData],
    base_index: usize,
    query: &NormalizedQuery,
    options: &MatchOptions,
    limit: usize,
) -> BinaryHeap<ShardHit> {
    let mut heap = BinaryHeap::new();
    let root = options.root_path.as_deref();
    for (offset, candidate) in shard.iter().enumerate() {
        // Letter prefilter: a candidate missing one of the query's letters
        // cannot contain it as a subsequence.
        if candidate.bitmask & query.bitmask != query.bitmask {
            continue;
        }
        let Some(scored) =
            score_candidate(candidate, query, options.max_gap, options.record_match_indexes)
        else {
            continue;
        };
        let key = RankKey {
            score: scored.score,
            root_distance: root.map_or(0, |root| path_distance(&candidate.value, root)),
            len: candidate.chars.len() as u32,
            id: candidate.id,
        };
        push_bounded(
            &mut heap,
            ShardHit {
                key,
                store_index: base_index + offset,
                indexes: scored.indexes,
            },
            limit,
        );
    }
    heap
}
