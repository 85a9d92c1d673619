use std::collections::HashMap;

use reqwest::Client as HttpClient;
use serde::{de::DeserializeOwned, Deserialize};

use crate::{
    catalog::CatalogClient,
    error::{AppError, AppResult},
    models::{CandidateRef, Ingredient, Recipe},
};

/// Number of `strIngredientN` / `strMeasureN` column pairs on a meal row
const INGREDIENT_SLOTS: usize = 20;

#[derive(Debug, Deserialize)]
struct MealsEnvelope<T> {
    meals: Option<Vec<T>>,
}

/// One row of `list.php?a=list`
#[derive(Debug, Deserialize)]
struct AreaEntry {
    #[serde(rename = "strArea")]
    area: Option<String>,
}

/// One row of `list.php?c=list`
#[derive(Debug, Deserialize)]
struct CategoryEntry {
    #[serde(rename = "strCategory")]
    category: Option<String>,
}

/// One row of `list.php?i=list`
#[derive(Debug, Deserialize)]
struct IngredientEntry {
    #[serde(rename = "strIngredient")]
    ingredient: Option<String>,
}

/// One row of a `filter.php` response
#[derive(Debug, Deserialize)]
struct FilterEntry {
    #[serde(rename = "idMeal")]
    id: Option<String>,
    #[serde(rename = "strMeal")]
    name: Option<String>,
    #[serde(rename = "strMealThumb")]
    thumbnail: Option<String>,
}

impl FilterEntry {
    /// Rows without a usable id cannot be resolved later and are dropped
    fn into_candidate(self) -> Option<CandidateRef> {
        let id = self.id.filter(|id| !id.is_empty())?;
        Some(CandidateRef {
            id,
            label: self.name.unwrap_or_default(),
            thumbnail: none_if_blank(self.thumbnail),
        })
    }
}

/// Full meal row from `lookup.php`, `search.php`, and `random.php`.
/// The numbered ingredient and measure columns land in the flattened map.
#[derive(Debug, Deserialize)]
struct MealDetail {
    #[serde(rename = "idMeal")]
    id: Option<String>,
    #[serde(rename = "strMeal")]
    name: Option<String>,
    #[serde(rename = "strCategory")]
    category: Option<String>,
    #[serde(rename = "strArea")]
    area: Option<String>,
    #[serde(rename = "strInstructions")]
    instructions: Option<String>,
    #[serde(rename = "strMealThumb")]
    thumbnail: Option<String>,
    #[serde(rename = "strTags")]
    tags: Option<String>,
    #[serde(rename = "strYoutube")]
    youtube: Option<String>,
    #[serde(rename = "strSource")]
    source: Option<String>,
    #[serde(flatten)]
    columns: HashMap<String, serde_json::Value>,
}

impl MealDetail {
    fn into_recipe(self) -> Option<Recipe> {
        let ingredients = self.collect_ingredients();
        let id = self.id.filter(|id| !id.is_empty())?;
        let title = self.name.filter(|name| !name.is_empty())?;

        Some(Recipe {
            id,
            title,
            category: none_if_blank(self.category),
            area: none_if_blank(self.area),
            instructions: self.instructions.unwrap_or_default(),
            thumbnail: none_if_blank(self.thumbnail),
            tags: none_if_blank(self.tags),
            youtube: none_if_blank(self.youtube),
            source: none_if_blank(self.source),
            ingredients,
        })
    }

    /// Walks the numbered columns, skipping blank or null slots and
    /// attaching the measure only when its column holds text.
    fn collect_ingredients(&self) -> Vec<Ingredient> {
        (1..=INGREDIENT_SLOTS)
            .filter_map(|slot| {
                let name = self
                    .columns
                    .get(&format!("strIngredient{}", slot))?
                    .as_str()?
                    .trim();
                if name.is_empty() {
                    return None;
                }

                let measure = self
                    .columns
                    .get(&format!("strMeasure{}", slot))
                    .and_then(|value| value.as_str())
                    .map(str::trim)
                    .filter(|measure| !measure.is_empty())
                    .map(String::from);

                Some(Ingredient {
                    name: name.to_string(),
                    measure,
                })
            })
            .collect()
    }
}

fn none_if_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

/// Catalog client backed by a TheMealDB-compatible HTTP API
///
/// The upstream wire format is quirky: every payload arrives as
/// `{"meals": [...]}` with `null` standing in for an empty result, and
/// ingredient lines are spread across twenty numbered column pairs.
/// The conversion types above normalize those quirks at the boundary.
pub struct MealDbCatalog {
    http_client: HttpClient,
    api_url: String,
}

impl MealDbCatalog {
    pub fn new(api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_url,
        }
    }

    /// Issues one GET and unwraps the `{"meals": ...}` envelope,
    /// mapping the upstream null-for-empty convention to an empty vec.
    async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> AppResult<Vec<T>> {
        let url = format!("{}/{}", self.api_url, path);
        tracing::debug!(url = %url, "Catalog request");

        let response = self.http_client.get(&url).query(query).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::CatalogUnavailable(format!(
                "catalog returned status {}: {}",
                status, body
            )));
        }

        let envelope: MealsEnvelope<T> = response.json().await?;
        Ok(envelope.meals.unwrap_or_default())
    }
}

#[async_trait::async_trait]
impl CatalogClient for MealDbCatalog {
    async fn list_areas(&self) -> AppResult<Vec<String>> {
        let entries: Vec<AreaEntry> = self.fetch("list.php", &[("a", "list")]).await?;
        Ok(entries
            .into_iter()
            .filter_map(|entry| none_if_blank(entry.area))
            .collect())
    }

    async fn list_categories(&self) -> AppResult<Vec<String>> {
        let entries: Vec<CategoryEntry> = self.fetch("list.php", &[("c", "list")]).await?;
        Ok(entries
            .into_iter()
            .filter_map(|entry| none_if_blank(entry.category))
            .collect())
    }

    async fn list_ingredients(&self) -> AppResult<Vec<String>> {
        let entries: Vec<IngredientEntry> = self.fetch("list.php", &[("i", "list")]).await?;
        Ok(entries
            .into_iter()
            .filter_map(|entry| none_if_blank(entry.ingredient))
            .collect())
    }

    async fn filter_by_area(&self, area: &str) -> AppResult<Vec<CandidateRef>> {
        let entries: Vec<FilterEntry> = self.fetch("filter.php", &[("a", area)]).await?;
        Ok(entries
            .into_iter()
            .filter_map(FilterEntry::into_candidate)
            .collect())
    }

    async fn filter_by_category(&self, category: &str) -> AppResult<Vec<CandidateRef>> {
        let entries: Vec<FilterEntry> = self.fetch("filter.php", &[("c", category)]).await?;
        Ok(entries
            .into_iter()
            .filter_map(FilterEntry::into_candidate)
            .collect())
    }

    async fn filter_by_ingredient(&self, ingredient: &str) -> AppResult<Vec<CandidateRef>> {
        let entries: Vec<FilterEntry> = self.fetch("filter.php", &[("i", ingredient)]).await?;
        Ok(entries
            .into_iter()
            .filter_map(FilterEntry::into_candidate)
            .collect())
    }

    async fn lookup(&self, id: &str) -> AppResult<Option<Recipe>> {
        let entries: Vec<MealDetail> = self.fetch("lookup.php", &[("i", id)]).await?;
        Ok(entries.into_iter().next().and_then(MealDetail::into_recipe))
    }

    async fn search_by_name(&self, query: &str) -> AppResult<Vec<Recipe>> {
        let entries: Vec<MealDetail> = self.fetch("search.php", &[("s", query)]).await?;
        let recipes: Vec<Recipe> = entries
            .into_iter()
            .filter_map(MealDetail::into_recipe)
            .collect();

        tracing::info!(query = %query, results = recipes.len(), "Catalog name search completed");

        Ok(recipes)
    }

    async fn random(&self) -> AppResult<Recipe> {
        let entries: Vec<MealDetail> = self.fetch("random.php", &[]).await?;
        entries
            .into_iter()
            .next()
            .and_then(MealDetail::into_recipe)
            .ok_or_else(|| {
                AppError::CatalogUnavailable("random endpoint returned no recipe".to_string())
            })
    }
}
