use serde::{Deserialize, Serialize};

/// A fully hydrated recipe as returned to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recipe {
    pub id: String,
    pub title: String,
    pub category: Option<String>,
    pub area: Option<String>,
    pub instructions: String,
    pub thumbnail: Option<String>,
    pub tags: Option<String>,
    pub youtube: Option<String>,
    pub source: Option<String>,
    pub ingredients: Vec<Ingredient>,
}

/// One ingredient line on a recipe
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ingredient {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub measure: Option<String>,
}

/// Lightweight reference to a recipe as returned by catalog filter queries.
/// Carries just enough to draw from and resolve later via lookup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CandidateRef {
    pub id: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

/// Caller-supplied recommendation filters. Any subset may be present.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Filters {
    pub area: Option<String>,
    pub category: Option<String>,
    pub ingredient: Option<String>,
}
