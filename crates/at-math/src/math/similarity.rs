//! Text similarity ratios for dedup and linkage evidence.

/// Character-level sequence similarity in [0, 1].
///
/// Normalized Levenshtein: 1 - edit_distance / max_len. Two empty
/// strings are identical (1.0); one empty string scores 0.0.
pub fn sequence_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let dist = levenshtein(&a, &b);
    let max_len = a.len().max(b.len());
    1.0 - dist as f64 / max_len as f64
}

/// Token-level Jaccard overlap in [0, 1].
///
/// Tokens are whitespace-separated; comparison is case-sensitive, so
/// callers normalize first.
pub fn token_jaccard(a: &str, b: &str) -> f64 {
    use std::collections::BTreeSet;
    let left: BTreeSet<&str> = a.split_whitespace().collect();
    let right: BTreeSet<&str> = b.split_whitespace().collect();
    if left.is_empty() && right.is_empty() {
        return 1.0;
    }
    let inter = left.intersection(&right).count();
    let union = left.union(&right).count();
    if union == 0 {
        return 0.0;
    }
    inter as f64 / union as f64
}

/// Two-row dynamic-programming edit distance.
fn levenshtein(a: &[char], b: &[char]) -> usize {
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let sub_cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j] + sub_cost)
                .min(prev[j + 1] + 1)
                .min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}
