//! "Did you mean" suggestions for misspelled field names and enum values.

/// Suggestions further away than this are noise, not typos
pub const MAX_SUGGESTION_DISTANCE: usize = 2;

/// Levenshtein distance between two strings, counted in chars.
///
/// # Examples
///
/// ```
/// use carrots_core::utils::suggest::edit_distance;
///
/// assert_eq!(edit_distance("kitten", "sitting"), 3);
/// assert_eq!(edit_distance("scope", "scope"), 0);
/// ```
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Two rolling rows instead of the full matrix
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Closest candidate to `query`, compared case-insensitively, if it is within
/// [`MAX_SUGGESTION_DISTANCE`] edits.
///
/// Ties keep the earliest candidate.
pub fn closest_match(query: &str, candidates: &[&'static str]) -> Option<&'static str> {
    let query = query.to_lowercase();
    let mut best: Option<(&'static str, usize)> = None;

    for &candidate in candidates {
        let distance = edit_distance(&query, &candidate.to_lowercase());
        let better = match best {
            Some((_, d)) => distance < d,
            None => true,
        };
        if better {
            best = Some((candidate, distance));
        }
    }

    best.filter(|&(_, d)| d <= MAX_SUGGESTION_DISTANCE)
        .map(|(c, _)| c)
}
