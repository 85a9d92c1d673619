use std::collections::HashSet;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::models::{
    Filters, OptionGroup, OptionKind, Preference, PreferenceRecord, Recipe, ScoredOption,
};
use crate::services::search::SearchHit;
use crate::services::{fuzzy, preference, search};

use super::AppState;

// Request types

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    #[serde(default)]
    pub filters: Filters,
    #[serde(default)]
    pub exclude_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct OptionsQuery {
    #[serde(default)]
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct SavePreferenceRequest {
    pub recipe_id: String,
    pub preference: Preference,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Recommend one recipe for the given filters and exclusion set
pub async fn recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<Recipe>> {
    let excluded: HashSet<String> = request.exclude_ids.into_iter().collect();
    let recipe = state
        .recommender
        .recommend(&request.filters, &excluded)
        .await?;

    Ok(Json(recipe))
}

/// Area options ranked by preference, optionally narrowed by ?q=
pub async fn area_options(
    State(state): State<AppState>,
    Query(params): Query<OptionsQuery>,
) -> AppResult<Json<Vec<ScoredOption>>> {
    let areas = state.options.areas().await?.to_vec();
    let history = state.history.records().await;

    let ranked = preference::rank_options(areas, OptionKind::Area, &history);
    let narrowed = fuzzy::filter_by_query(ranked, params.q.as_deref().unwrap_or(""));

    Ok(Json(narrowed))
}

/// Ingredient and category options as labeled groups, each ranked by
/// preference and narrowed by ?q=. Groups left without options are dropped.
pub async fn choice_options(
    State(state): State<AppState>,
    Query(params): Query<OptionsQuery>,
) -> AppResult<Json<Vec<OptionGroup>>> {
    let (ingredients, categories) = state.options.choices().await?;
    let ingredients = ingredients.to_vec();
    let categories = categories.to_vec();
    let history = state.history.records().await;
    let query = params.q.as_deref().unwrap_or("");

    let groups: Vec<OptionGroup> = [
        ("Ingredients", ingredients, OptionKind::Ingredient),
        ("Categories", categories, OptionKind::Category),
    ]
    .into_iter()
    .map(|(label, values, kind)| OptionGroup {
        label: label.to_string(),
        options: fuzzy::filter_by_query(preference::rank_options(values, kind, &history), query),
    })
    .filter(|group| !group.options.is_empty())
    .collect();

    Ok(Json(groups))
}

/// Search recipes by name, returning hits with highlight spans
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<Vec<SearchHit>>> {
    let hits = search::search_recipes(state.catalog.clone(), &params.q).await?;
    Ok(Json(hits))
}

/// Stored preference history, newest first
pub async fn list_preferences(State(state): State<AppState>) -> Json<Vec<PreferenceRecord>> {
    Json(state.history.records().await)
}

/// Record a like or dislike for a recipe
pub async fn save_preference(
    State(state): State<AppState>,
    Json(request): Json<SavePreferenceRequest>,
) -> AppResult<(StatusCode, Json<PreferenceRecord>)> {
    let recipe = state
        .catalog
        .lookup(&request.recipe_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("recipe {}", request.recipe_id)))?;

    let record = PreferenceRecord::from_recipe(&recipe, request.preference);
    state.history.save(record.clone()).await?;

    tracing::info!(recipe_id = %record.id, preference = ?request.preference, "Preference saved");

    Ok((StatusCode::CREATED, Json(record)))
}

/// Delete a stored preference by recipe id
pub async fn remove_preference(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.history.remove(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
