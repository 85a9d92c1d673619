use serde::{Deserialize, Serialize};

/// Which recipe attribute an option value belongs to. Scoring matches a
/// value against a different record field per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    Area,
    Category,
    Ingredient,
}

/// A selectable filter option with its preference score.
/// Computed per request, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredOption {
    pub value: String,
    pub label: String,
    pub score: i32,
}

/// A labeled group of options, as served by the combined choices endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OptionGroup {
    pub label: String,
    pub options: Vec<ScoredOption>,
}
