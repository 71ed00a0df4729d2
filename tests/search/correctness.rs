//! Core matching semantics: subsequence containment, folding rules,
//! match index recording, and store mutation visibility.

use quarry::{MatchOptions, Matcher};

use super::common::{matcher_from, search, values};

#[test]
fn non_subsequence_candidates_are_excluded() {
    let matcher = matcher_from(&["abc", "acb", "bac", "ab"]);
    assert_eq!(values(&search(&matcher, "abc")), vec!["abc"]);
}

#[test]
fn repeated_searches_return_identical_sequences() {
    let matcher = matcher_from(&["abc", "abcd", "a/b/c", "axbxc"]);
    let first = search(&matcher, "abc");
    let second = search(&matcher, "abc");
    assert_eq!(first, second);
}

#[test]
fn separator_characters_fold_together() {
    // Underscore, slash, and backslash are interchangeable for matching.
    let matcher = matcher_from(&["a/b", "a\\b", "a_b", "a.b"]);
    let results = search(&matcher, "a_b");
    let found = values(&results);
    assert!(found.contains(&"a/b".to_string()));
    assert!(found.contains(&"a\\b".to_string()));
    assert!(found.contains(&"a_b".to_string()));
    assert!(!found.contains(&"a.b".to_string()));
}

#[test]
fn whole_string_equality_requires_same_separators() {
    // Case folding alone earns the perfect score; separator folding does not.
    let matcher = matcher_from(&["a/b", "A/B"]);
    let results = search(&matcher, "a/b");
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.score == 1.0));

    let folded = matcher_from(&["a_b"]);
    let results = search(&folded, "a/b");
    assert_eq!(results.len(), 1);
    assert!(results[0].score < 1.0);
}

#[test]
fn whitespace_in_the_query_is_ignored() {
    let matcher = matcher_from(&["abc"]);
    let results = search(&matcher, " a b\tc ");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].score, 1.0);
}

#[test]
fn match_indexes_prefer_the_contiguous_alignment() {
    let matcher = matcher_from(&["alphabetacappa"]);
    let options = MatchOptions {
        record_match_indexes: true,
        ..MatchOptions::default()
    };
    let results = matcher.search("abc", &options).unwrap();
    assert_eq!(results.len(), 1);
    // "abc" aligns to the "ab" run in "alphABetaCappa", not the first 'a'.
    assert_eq!(results[0].match_indexes, Some(vec![4, 5, 9]));
}

#[test]
fn match_indexes_cover_the_whole_value_on_equality() {
    let matcher = matcher_from(&["abc"]);
    let options = MatchOptions {
        record_match_indexes: true,
        ..MatchOptions::default()
    };
    let results = matcher.search("abc", &options).unwrap();
    assert_eq!(results[0].match_indexes, Some(vec![0, 1, 2]));
}

#[test]
fn indexes_are_omitted_unless_requested() {
    let matcher = matcher_from(&["abc"]);
    let results = search(&matcher, "abc");
    assert_eq!(results[0].match_indexes, None);
}

#[test]
fn unicode_values_that_fold_to_ascii_are_found() {
    // KELVIN SIGN folds to 'k': the candidate must survive the letter
    // prefilter and score as a whole-string match.
    let matcher = matcher_from(&["\u{212A}"]);
    let results = search(&matcher, "k");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].score, 1.0);
}

#[test]
fn duplicate_ids_collapse_to_one_candidate() {
    let matcher =
        Matcher::with_ids(vec![0, 0], vec!["abc".to_string(), "abc".to_string()]).unwrap();
    let results = search(&matcher, "ac");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, 0);
}

#[test]
fn distinct_ids_keep_equal_values_independent() {
    let matcher =
        Matcher::with_ids(vec![0, 1], vec!["abc".to_string(), "abc".to_string()]).unwrap();
    let results = search(&matcher, "ac");
    assert_eq!(results.len(), 2);
    let mut ids: Vec<_> = results.iter().map(|r| r.id).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![0, 1]);
}

#[test]
fn removal_by_id_makes_the_value_unreachable() {
    let matcher = Matcher::with_ids(vec![7], vec!["needle".to_string()]).unwrap();
    matcher.remove_by_ids(&[7]);
    assert!(search(&matcher, "needle").is_empty());
}

#[test]
fn shorter_candidates_outscore_longer_ones_for_the_same_match() {
    // Same matched subsequence, less unmatched tail.
    let matcher = matcher_from(&["abcd", "abcdefgh"]);
    let results = search(&matcher, "abc");
    assert_eq!(values(&results), vec!["abcd", "abcdefgh"]);
    assert!(results[0].score > results[1].score);
}

#[test]
fn empty_store_returns_no_results() {
    let matcher = Matcher::default();
    assert!(search(&matcher, "anything").is_empty());
}
