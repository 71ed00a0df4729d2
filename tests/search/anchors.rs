//! Fixed-point score checks against the reference candidate
//! `"abcdefghijk/test"` (length 16).
//!
//! Each scenario pins the composed score to a known value: coverage times
//! the worst gap coefficient, with the bonus factor hovering near 1. The
//! assertions allow 5% relative slack for the bonus term.

use super::common::{assert_close, matcher_from, search};

const REFERENCE: &str = "abcdefghijk/test";

fn score_of(query: &str) -> f64 {
    let matcher = matcher_from(&[REFERENCE]);
    let results = search(&matcher, query);
    assert_eq!(results.len(), 1, "query {query:?} should match");
    results[0].score
}

#[test]
fn single_prefix_char_with_large_gap() {
    // 'a' then a ten-char gap to "/test": floor gap coefficient 0.20.
    assert_close(score_of("a/test"), 0.20 * 6.0 / 16.0);
}

#[test]
fn two_prefix_chars_with_large_gap() {
    assert_close(score_of("ab/test"), 0.20 * 7.0 / 16.0);
}

#[test]
fn three_prefix_chars_with_shorter_gap() {
    // Gap of eight between 'c' and '/': coefficient 0.25.
    assert_close(score_of("abc/test"), 0.25 * 8.0 / 16.0);
}

#[test]
fn near_complete_prefix() {
    // Single-char gap ('k' skipped): coefficient 0.60.
    assert_close(score_of("abcdefghij/test"), 0.60 * 15.0 / 16.0);
}

#[test]
fn identical_query_scores_exactly_one() {
    assert_eq!(score_of(REFERENCE), 1.0);
}

#[test]
fn empty_query_matches_everything_at_one() {
    let matcher = matcher_from(&["abc", "zzz/yyy"]);
    let results = search(&matcher, "");
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.score == 1.0));
}
