use serde::{Deserialize, Serialize};

use crate::models::{CandidateRef, Recipe, ScoredOption};

/// Base score for edit-distance matches. Any substring hit scores below
/// this, since labels are far shorter than 100 bytes in practice.
const FUZZY_BASE_SCORE: usize = 100;

/// Edit distance beyond which a candidate is considered unrelated
const MAX_EDIT_DISTANCE: usize = 3;

/// Anything with a display label can be fuzzy-filtered
pub trait Labeled {
    fn label(&self) -> &str;
}

impl Labeled for ScoredOption {
    fn label(&self) -> &str {
        &self.label
    }
}

impl Labeled for CandidateRef {
    fn label(&self) -> &str {
        &self.label
    }
}

impl Labeled for Recipe {
    fn label(&self) -> &str {
        &self.title
    }
}

/// One run of a label, flagged when it falls inside the matched range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSpan {
    pub text: String,
    pub matched: bool,
}

/// Keeps the candidates matching the query, best match first. Used to
/// narrow option lists and order search results as the user types.
///
/// Substring hits are scored by where they start, so prefix matches rank
/// ahead of mid-word ones; candidates with no substring hit get a second
/// chance via edit distance, scored into a band that never beats a
/// substring hit. The sort is stable, so equally scored candidates keep
/// their incoming order. An empty query keeps everything untouched.
pub fn filter_by_query<T: Labeled>(candidates: Vec<T>, query: &str) -> Vec<T> {
    if query.is_empty() || candidates.is_empty() {
        return candidates;
    }

    let query_lower = query.to_lowercase();
    let max_distance = MAX_EDIT_DISTANCE.min(query.chars().count() / 2);

    let mut scored: Vec<(usize, T)> = candidates
        .into_iter()
        .filter_map(|candidate| {
            match_score(candidate.label(), &query_lower, max_distance)
                .map(|score| (score, candidate))
        })
        .collect();

    scored.sort_by_key(|(score, _)| *score);
    scored.into_iter().map(|(_, candidate)| candidate).collect()
}

/// Lower is better. Substring hits score their starting byte offset;
/// near misses score FUZZY_BASE_SCORE plus their edit distance; None
/// means the candidate should be dropped.
fn match_score(label: &str, query_lower: &str, max_distance: usize) -> Option<usize> {
    let label_lower = label.to_lowercase();

    if let Some(index) = label_lower.find(query_lower) {
        return Some(index);
    }

    let distance = levenshtein(&label_lower, query_lower);
    (distance <= max_distance).then_some(FUZZY_BASE_SCORE + distance)
}

/// Classic edit distance over chars, two-row dynamic programming
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
    let mut current = vec![0usize; b.len() + 1];

    for (i, char_a) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, char_b) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(char_a != char_b);
            current[j + 1] = substitution
                .min(previous[j + 1] + 1)
                .min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

/// Splits a label into spans around the first case-insensitive occurrence
/// of the query, preserving the label's original casing. Labels without a
/// substring hit (including edit-distance matches) come back as a single
/// unmatched span.
pub fn highlight(label: &str, query: &str) -> Vec<TextSpan> {
    let unmatched = |text: &str| TextSpan {
        text: text.to_string(),
        matched: false,
    };

    if query.is_empty() {
        return vec![unmatched(label)];
    }

    let query_lower = query.to_lowercase();
    let Some(start) = label.to_lowercase().find(&query_lower) else {
        return vec![unmatched(label)];
    };
    let end = start + query_lower.len();

    // Lowercasing can shift byte offsets for non-ASCII labels; fall back
    // to an unhighlighted span instead of slicing mid-character.
    let (Some(before), Some(hit), Some(after)) =
        (label.get(..start), label.get(start..end), label.get(end..))
    else {
        return vec![unmatched(label)];
    };

    let mut spans = Vec::new();
    if !before.is_empty() {
        spans.push(unmatched(before));
    }
    spans.push(TextSpan {
        text: hit.to_string(),
        matched: true,
    });
    if !after.is_empty() {
        spans.push(unmatched(after));
    }
    spans
}
