// Copyright 2026-present Quarry Contributors
// SPDX-License-Identifier: Apache-2.0

//! Fuzzy subsequence matching over large candidate corpora.
//!
//! This crate scores candidate strings against a query matched as a
//! subsequence, preferring contiguous runs, boundary-aligned characters,
//! and matches close to the end of a path. It is built for path-heavy
//! workloads (file finders, symbol pickers) but works on any strings.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐     ┌─────────────┐     ┌──────────────┐
//! │  query.rs  │────▶│ scoring/    │◀────│   store.rs   │
//! │ (Normalized│     │ (kernel,    │     │ (CandidateStore,
//! │   Query)   │     │  ranking)   │     │  CandidateData) │
//! └────────────┘     └─────────────┘     └──────────────┘
//!                           │                    │
//!                           ▼                    ▼
//!                    ┌─────────────────────────────────┐
//!                    │           matcher.rs            │
//!                    │  (Matcher: sharded search over  │
//!                    │   a locked candidate snapshot)  │
//!                    └─────────────────────────────────┘
//! ```
//!
//! | Module    | Responsibility                                           |
//! |-----------|----------------------------------------------------------|
//! | `types`   | Options, results, errors                                 |
//! | `query`   | Query normalization, separator and case folding          |
//! | `store`   | Id-keyed candidate corpus with precomputed folded forms  |
//! | `scoring` | Alignment kernel and the result ranking order            |
//! | `matcher` | Engine facade: locking, sharding, bounded top-k merge    |
//!
//! # Usage
//!
//! ```
//! use quarry::{MatchOptions, Matcher};
//!
//! let matcher = Matcher::new([
//!     "src/scoring/kernel.rs",
//!     "src/store.rs",
//!     "benches/search_bench.rs",
//! ]);
//!
//! let options = MatchOptions {
//!     max_results: Some(10),
//!     ..MatchOptions::default()
//! };
//! let results = matcher.search("sker", &options).unwrap();
//! assert_eq!(results[0].value, "src/scoring/kernel.rs");
//! ```

mod matcher;
mod query;
mod scoring;
mod store;
mod types;

pub use matcher::Matcher;
pub use types::{CandidateId, MatchError, MatchOptions, MatchResult};
