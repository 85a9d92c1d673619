use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::{
    catalog::CatalogClient,
    error::{AppError, AppResult},
};

/// Process-lifetime cache for the catalog's option lists
///
/// Areas, categories, and ingredients change rarely upstream, so each
/// list is fetched at most once per process and reused for every request
/// after that. A failed fetch is not cached: the next request retries.
pub struct OptionCatalog {
    catalog: Arc<dyn CatalogClient>,
    areas: OnceCell<Vec<String>>,
    categories: OnceCell<Vec<String>>,
    ingredients: OnceCell<Vec<String>>,
}

impl OptionCatalog {
    pub fn new(catalog: Arc<dyn CatalogClient>) -> Self {
        Self {
            catalog,
            areas: OnceCell::new(),
            categories: OnceCell::new(),
            ingredients: OnceCell::new(),
        }
    }

    pub async fn areas(&self) -> AppResult<&[String]> {
        let areas = self
            .areas
            .get_or_try_init(|| async {
                let areas = self.catalog.list_areas().await?;
                tracing::info!(count = areas.len(), "Cached catalog area list");
                Ok::<_, AppError>(areas)
            })
            .await?;
        Ok(areas.as_slice())
    }

    pub async fn categories(&self) -> AppResult<&[String]> {
        let categories = self
            .categories
            .get_or_try_init(|| async {
                let categories = self.catalog.list_categories().await?;
                tracing::info!(count = categories.len(), "Cached catalog category list");
                Ok::<_, AppError>(categories)
            })
            .await?;
        Ok(categories.as_slice())
    }

    pub async fn ingredients(&self) -> AppResult<&[String]> {
        let ingredients = self
            .ingredients
            .get_or_try_init(|| async {
                let ingredients = self.catalog.list_ingredients().await?;
                tracing::info!(count = ingredients.len(), "Cached catalog ingredient list");
                Ok::<_, AppError>(ingredients)
            })
            .await?;
        Ok(ingredients.as_slice())
    }

    /// Ingredient and category lists together, fetched concurrently on
    /// first use. The combined choices endpoint needs both at once.
    pub async fn choices(&self) -> AppResult<(&[String], &[String])> {
        let (ingredients, categories) = tokio::try_join!(self.ingredients(), self.categories())?;
        Ok((ingredients, categories))
    }
}
