//! Name similarity for "did you mean" suggestions

use std::collections::HashSet;

/// Rank `candidates` by similarity to `query`, most similar first.
/// Candidates with no resemblance at all are dropped.
pub fn rank_similar<'a, I>(query: &str, candidates: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let query_lower = query.to_lowercase();
    let mut matches: Vec<(String, usize)> = candidates
        .into_iter()
        .filter_map(|candidate| {
            let score = similarity_score(&query_lower, &candidate.to_lowercase());
            (score > 0).then(|| (candidate.to_string(), score))
        })
        .collect();

    // Higher score first, ties alphabetical so output is stable
    matches.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    matches.into_iter().map(|(name, _)| name).collect()
}

/// Score how close `candidate` is to `query`; both already lowercased
fn similarity_score(query: &str, candidate: &str) -> usize {
    let mut score = 0;

    // Exact prefix match is best
    if candidate.starts_with(query) {
        score += 100;
    } else if candidate.contains(query) {
        score += 50;
    } else if query.contains(candidate) {
        score += 30;
    }

    // Shared characters
    let query_chars: HashSet<char> = query.chars().filter(|c| c.is_alphanumeric()).collect();
    let candidate_chars: HashSet<char> = candidate.chars().filter(|c| c.is_alphanumeric()).collect();
    let common = query_chars.intersection(&candidate_chars).count();

    // A couple of shared letters is noise, not resemblance
    if score == 0 && common * 2 < query_chars.len().max(1) {
        return 0;
    }
    score += common * 2;

    // Penalize length difference
    let len_diff = (query.len() as i64 - candidate.len() as i64).unsigned_abs() as usize;
    if len_diff < 5 && score > 0 {
        score += 5 - len_diff;
    }

    score
}
