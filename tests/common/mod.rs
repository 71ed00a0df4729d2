//! Shared test utilities and fixtures.

#![allow(dead_code)]

use quarry::{MatchOptions, MatchResult, Matcher};

/// Build a matcher with ordinal ids over string literals.
pub fn matcher_from(values: &[&str]) -> Matcher {
    Matcher::new(values.iter().copied())
}

/// Search with default options, panicking on option errors.
pub fn search(matcher: &Matcher, query: &str) -> Vec<MatchResult> {
    matcher
        .search(query, &MatchOptions::default())
        .expect("default options are valid")
}

/// Project results down to their candidate values, in rank order.
pub fn values(results: &[MatchResult]) -> Vec<String> {
    results.iter().map(|r| r.value.clone()).collect()
}

/// Assert a score sits within 5% relative tolerance of the expected anchor.
pub fn assert_close(actual: f64, expected: f64) {
    let tolerance = expected * 0.05;
    assert!(
        (actual - expected).abs() <= tolerance,
        "score {actual} not within 5% of {expected}"
    );
}

/// Synthetic path corpus large enough to trigger the sharded scan path.
pub fn path_corpus(count: usize) -> Vec<String> {
    let dirs = ["src", "lib", "test", "vendor", "docs", "build"];
    let stems = ["matcher", "store", "query", "kernel", "ranking", "index"];
    let exts = ["rs", "js", "cpp", "h", "md", "toml"];
    (0..count)
        .map(|i| {
            format!(
                "{}/{}/{}_{}.{}",
                dirs[i % dirs.len()],
                dirs[(i / 7) % dirs.len()],
                stems[i % stems.len()],
                i,
                exts[i % exts.len()],
            )
        })
        .collect()
}
