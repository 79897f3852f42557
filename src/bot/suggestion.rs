//! Closest-command suggestion for unrecognized command input.

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum SuggestionError {
    #[error("No registered commands to match against")]
    EmptyCandidateSet,
}

/// Returns the candidate closest to `query`.
///
/// Similarity is the normalized Levenshtein ratio
/// `1 - distance / max(chars)` in `[0, 1]`. Ties break to the first
/// candidate in iteration order. The candidate set is read-only and
/// consumed fresh on every call.
pub fn closest_match<I, S>(query: &str, candidates: I) -> Result<String, SuggestionError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut best: Option<(String, f64)> = None;

    for candidate in candidates {
        let candidate = candidate.as_ref();
        let score = similarity_ratio(query, candidate);
        if best.as_ref().is_none_or(|(_, top)| score > *top) {
            best = Some((candidate.to_string(), score));
        }
    }

    best.map(|(name, _)| name)
        .ok_or(SuggestionError::EmptyCandidateSet)
}

/// Normalized similarity in `[0, 1]`; `1.0` means equal strings.
fn similarity_ratio(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f64 / longest as f64
}

/// Levenshtein distance over Unicode scalar values, single-row DP.
fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.iter().enumerate() {
        let mut prev_diag = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            let next = (row[j] + 1).min(row[j + 1] + 1).min(prev_diag + cost);
            prev_diag = row[j + 1];
            row[j + 1] = next;
        }
    }

    row[b.len()]
}
