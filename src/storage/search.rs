//! Fuzzy name matching for entity search
//!
//! Similarity is `(longer - edit_distance) / longer` over lower-cased
//! characters, giving a score in `[0, 1]`.

/// Levenshtein distance counted in characters
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != cb);
            current[j + 1] = substitution
                .min(previous[j + 1] + 1)
                .min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

/// Case-insensitive similarity of two strings
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let longer = a.chars().count().max(b.chars().count());
    if longer == 0 {
        return 1.0;
    }
    (longer - levenshtein(&a, &b)) as f64 / longer as f64
}

/// Best similarity of `query` against the whole display name or any single
/// word of it, so "Jon" finds "John Smith"
pub fn name_similarity(name: &str, query: &str) -> f64 {
    let query = query.trim();
    std::iter::once(name)
        .chain(name.split_whitespace())
        .map(|candidate| similarity(candidate, query))
        .fold(0.0, f64::max)
}

/// Result of a store search
///
/// An empty query and a query that found nothing are different answers.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome<T> {
    /// The query was empty
    NoQuery,
    /// The query matched nothing
    NoMatch,
    /// One or more candidates, best first
    Matches(Vec<T>),
}

impl<T> SearchOutcome<T> {
    pub(crate) fn from_matches(matches: Vec<T>) -> Self {
        if matches.is_empty() {
            Self::NoMatch
        } else {
            Self::Matches(matches)
        }
    }

    pub fn matches(&self) -> &[T] {
        match self {
            Self::Matches(found) => found,
            Self::NoQuery | Self::NoMatch => &[],
        }
    }

    pub fn into_matches(self) -> Vec<T> {
        match self {
            Self::Matches(found) => found,
            Self::NoQuery | Self::NoMatch => Vec::new(),
        }
    }

    pub fn is_no_query(&self) -> bool {
        matches!(self, Self::NoQuery)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> SearchOutcome<U> {
        match self {
            Self::NoQuery => SearchOutcome::NoQuery,
            Self::NoMatch => SearchOutcome::NoMatch,
            Self::Matches(found) => SearchOutcome::Matches(found.into_iter().map(f).collect()),
        }
    }
}

/// Rank candidates whose name clears `threshold`, best match first
pub(crate) fn rank_by_name<T>(
    candidates: impl IntoIterator<Item = T>,
    query: &str,
    threshold: f64,
    name_of: impl Fn(&T) -> String,
) -> Vec<T> {
    let mut scored: Vec<(f64, String, T)> = candidates
        .into_iter()
        .filter_map(|candidate| {
            let name = name_of(&candidate);
            let score = name_similarity(&name, query);
            (score >= threshold).then_some((score, name, candidate))
        })
        .collect();

    scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
    scored.into_iter().map(|(_, _, candidate)| candidate).collect()
}
