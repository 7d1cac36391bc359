use std::collections::HashSet;

use tango_types::AttemptResult;

use crate::normalize::{DefaultNormalizer, Normalizer};

/// Levenshtein distance over Unicode scalar values
pub fn levenshtein(a: &str, b: &str) -> usize {
    if a.is_empty() {
        return b.chars().count();
    } else if b.is_empty() {
        return a.chars().count();
    }

    let b_chars: Vec<char> = b.chars().collect();
    let mut prev_row: Vec<usize> = (0..=b_chars.len()).collect();
    let mut curr_row = vec![0; b_chars.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        curr_row[0] = i + 1;

        for (j, cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            curr_row[j + 1] = (prev_row[j + 1] + 1)
                .min(curr_row[j] + 1)
                .min(prev_row[j] + cost);
        }

        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[b_chars.len()]
}

/// Grade `produced` against `expected` with the default normalizer.
///
/// Accuracy comes from the character-level Levenshtein distance of the
/// normalized strings, missed tokens from a word-level set comparison.
pub fn score(expected: &str, produced: &str) -> AttemptResult {
    score_with(&DefaultNormalizer, expected, produced)
}

pub fn score_with<N>(normalizer: &N, expected: &str, produced: &str) -> AttemptResult
where
    N: Normalizer + ?Sized,
{
    let expected = normalizer.normalize(expected);
    let produced = normalizer.normalize(produced);

    // An empty target counts as a miss, not a free pass
    if expected.is_empty() {
        return AttemptResult::default();
    }

    if produced.is_empty() {
        return AttemptResult {
            accuracy: 0,
            missed_tokens: expected.split_whitespace().map(str::to_string).collect(),
        };
    }

    let distance = levenshtein(&expected, &produced);
    let max_len = expected.chars().count().max(produced.chars().count());
    debug_assert!(distance <= max_len);

    let accuracy = ((1.0 - distance as f64 / max_len as f64) * 100.0).round();
    debug_assert!((0.0..=100.0).contains(&accuracy));

    let produced_tokens: HashSet<&str> = produced.split_whitespace().collect();
    let missed_tokens = expected
        .split_whitespace()
        .filter(|token| !produced_tokens.contains(token))
        .map(str::to_string)
        .collect();

    AttemptResult {
        accuracy: accuracy as u8,
        missed_tokens,
    }
}
