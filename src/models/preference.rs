use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::models::Recipe;

/// A like or dislike, stored on the wire and in the database as +1 / -1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum Preference {
    Liked,
    Disliked,
}

impl Preference {
    /// Contribution of one record to a preference score
    pub fn signum(self) -> i32 {
        match self {
            Preference::Liked => 1,
            Preference::Disliked => -1,
        }
    }
}

impl From<Preference> for i8 {
    fn from(preference: Preference) -> Self {
        match preference {
            Preference::Liked => 1,
            Preference::Disliked => -1,
        }
    }
}

impl TryFrom<i8> for Preference {
    type Error = String;

    fn try_from(raw: i8) -> Result<Self, Self::Error> {
        match raw {
            1 => Ok(Preference::Liked),
            -1 => Ok(Preference::Disliked),
            other => Err(format!("preference must be 1 or -1, got {}", other)),
        }
    }
}

/// A stored reaction to a recipe, denormalized so scoring never needs
/// a catalog round trip.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PreferenceRecord {
    pub id: String,
    pub title: String,
    pub preference: Preference,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
}

impl PreferenceRecord {
    /// Builds the record stored when a recipe is liked or disliked
    pub fn from_recipe(recipe: &Recipe, preference: Preference) -> Self {
        Self {
            id: recipe.id.clone(),
            title: recipe.title.clone(),
            preference,
            timestamp: Utc::now().timestamp_millis(),
            image_url: recipe.thumbnail.clone(),
            category: recipe.category.clone(),
            area: recipe.area.clone(),
            ingredients: recipe.ingredients.iter().map(|i| i.name.clone()).collect(),
        }
    }
}
