use crate::models::{OptionKind, PreferenceRecord, ScoredOption};

/// Net score of one option value across the whole like/dislike history.
///
/// Each liked record counts +1 and each disliked record -1. Matching is
/// case-insensitive and per kind: areas and categories compare against
/// the record's single field, ingredients against membership in the
/// record's ingredient list.
pub fn preference_score(value: &str, kind: OptionKind, history: &[PreferenceRecord]) -> i32 {
    let value_lower = value.to_lowercase();

    history
        .iter()
        .filter(|record| match kind {
            OptionKind::Area => record
                .area
                .as_deref()
                .is_some_and(|area| area.to_lowercase() == value_lower),
            OptionKind::Category => record
                .category
                .as_deref()
                .is_some_and(|category| category.to_lowercase() == value_lower),
            OptionKind::Ingredient => record
                .ingredients
                .iter()
                .any(|ingredient| ingredient.to_lowercase() == value_lower),
        })
        .map(|record| record.preference.signum())
        .sum()
}

/// Scores every option value and orders them best first: higher score
/// wins, ties break on case-insensitive label. The sort is stable and
/// total, so the result order never depends on scoring internals.
pub fn rank_options(
    values: Vec<String>,
    kind: OptionKind,
    history: &[PreferenceRecord],
) -> Vec<ScoredOption> {
    let mut options: Vec<ScoredOption> = values
        .into_iter()
        .map(|value| ScoredOption {
            score: preference_score(&value, kind, history),
            label: value.clone(),
            value,
        })
        .collect();

    options.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.label.to_lowercase().cmp(&b.label.to_lowercase()))
    });

    options
}
