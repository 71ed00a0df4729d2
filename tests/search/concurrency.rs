//! Sharded search and shared-matcher concurrency.

use std::thread;

use quarry::{MatchOptions, Matcher};

use super::common::path_corpus;

/// Big enough to clear the single-thread fast path inside the coordinator.
const LARGE_CORPUS: usize = 12_000;

#[test]
fn sharded_search_matches_the_single_threaded_scan() {
    let matcher = Matcher::new(path_corpus(LARGE_CORPUS));
    let options = MatchOptions {
        max_results: Some(50),
        ..MatchOptions::default()
    };
    let single = matcher.search("kernel", &options).unwrap();
    for threads in [2, 4, 8] {
        let sharded = matcher
            .search(
                "kernel",
                &MatchOptions {
                    num_threads: threads,
                    ..options.clone()
                },
            )
            .unwrap();
        assert_eq!(single, sharded, "thread count {threads} changed results");
    }
}

#[test]
fn high_thread_counts_are_harmless() {
    let matcher = Matcher::new(path_corpus(LARGE_CORPUS));
    let options = MatchOptions {
        num_threads: 64,
        max_results: Some(10),
        ..MatchOptions::default()
    };
    let results = matcher.search("store", &options).unwrap();
    assert_eq!(results.len(), 10);
}

#[test]
fn concurrent_searches_share_one_matcher() {
    let matcher = Matcher::new(path_corpus(2_000));
    let expected = matcher.search("query", &MatchOptions::default()).unwrap();
    thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for _ in 0..10 {
                    let results = matcher.search("query", &MatchOptions::default()).unwrap();
                    assert_eq!(results, expected);
                }
            });
        }
    });
}

#[test]
fn searches_interleaved_with_mutations_stay_consistent() {
    let matcher = Matcher::new(path_corpus(2_000));
    thread::scope(|scope| {
        let searcher = scope.spawn(|| {
            for _ in 0..50 {
                let results = matcher.search("matcher", &MatchOptions::default()).unwrap();
                // Every observed result comes from a complete snapshot.
                for window in results.windows(2) {
                    assert!(window[0].score >= window[1].score - 1e-9);
                }
            }
        });
        let writer = scope.spawn(|| {
            for i in 0..50 {
                let value = format!("extra/matcher_{i}.rs");
                matcher.insert(None, vec![value.clone()]).unwrap();
                matcher.remove_by_values(&[value.as_str()]);
            }
        });
        searcher.join().unwrap();
        writer.join().unwrap();
    });
    // All transient inserts were removed again.
    assert_eq!(matcher.len(), 2_000);
}

#[test]
fn mutations_issued_before_a_search_are_visible_to_it() {
    let matcher = Matcher::new(path_corpus(100));
    matcher
        .insert(None, vec!["unique/sentinel.rs".to_string()])
        .unwrap();
    let results = matcher.search("sentinel", &MatchOptions::default()).unwrap();
    assert_eq!(results[0].value, "unique/sentinel.rs");
}
