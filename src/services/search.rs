use std::sync::Arc;

use serde::Serialize;

use crate::{
    catalog::CatalogClient,
    error::{AppError, AppResult},
    models::Recipe,
    services::fuzzy::{self, TextSpan},
};

/// Upstream name search can return a long tail; only this many results
/// are kept before fuzzy ordering.
pub const SEARCH_RESULT_LIMIT: usize = 5;

/// One search result with the spans a client needs to highlight the hit
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub recipe: Recipe,
    pub highlight: Vec<TextSpan>,
}

/// Name search over the catalog: takes the first few upstream results,
/// reorders them by fuzzy match quality, and attaches highlight spans.
pub async fn search_recipes(
    catalog: Arc<dyn CatalogClient>,
    query: &str,
) -> AppResult<Vec<SearchHit>> {
    let query = query.trim();
    if query.is_empty() {
        return Err(AppError::InvalidInput(
            "Search query cannot be empty".to_string(),
        ));
    }

    let mut recipes = catalog.search_by_name(query).await?;
    recipes.truncate(SEARCH_RESULT_LIMIT);

    let hits: Vec<SearchHit> = fuzzy::filter_by_query(recipes, query)
        .into_iter()
        .map(|recipe| SearchHit {
            highlight: fuzzy::highlight(&recipe.title, query),
            recipe,
        })
        .collect();

    tracing::info!(query = %query, hits = hits.len(), "Recipe search completed");

    Ok(hits)
}
