use crate::{
    error::AppResult,
    models::{CandidateRef, Recipe},
};

pub mod mealdb;

pub use mealdb::MealDbCatalog;

/// Remote recipe catalog abstraction
///
/// The catalog is the read-only source of recipes, filter indexes, and
/// option lists. Implementations wrap an upstream HTTP API; tests swap in
/// a mock. Every method is a point-in-time read with no session state, so
/// callers decide what to cache and for how long.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogClient: Send + Sync {
    /// All cuisine areas known to the catalog
    async fn list_areas(&self) -> AppResult<Vec<String>>;

    /// All recipe categories known to the catalog
    async fn list_categories(&self) -> AppResult<Vec<String>>;

    /// All ingredients known to the catalog
    async fn list_ingredients(&self) -> AppResult<Vec<String>>;

    /// References to every recipe from the given cuisine area
    async fn filter_by_area(&self, area: &str) -> AppResult<Vec<CandidateRef>>;

    /// References to every recipe in the given category
    async fn filter_by_category(&self, category: &str) -> AppResult<Vec<CandidateRef>>;

    /// References to every recipe using the given ingredient
    async fn filter_by_ingredient(&self, ingredient: &str) -> AppResult<Vec<CandidateRef>>;

    /// Full recipe by id, or None when the catalog has no such recipe
    async fn lookup(&self, id: &str) -> AppResult<Option<Recipe>>;

    /// Full recipes whose titles match the query, in catalog order
    async fn search_by_name(&self, query: &str) -> AppResult<Vec<Recipe>>;

    /// One recipe drawn at random by the catalog itself
    async fn random(&self) -> AppResult<Recipe>;
}
