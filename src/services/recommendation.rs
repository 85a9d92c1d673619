use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use rand::{rngs::StdRng, Rng, SeedableRng};
use tokio::sync::Mutex;

use crate::{
    catalog::CatalogClient,
    error::{AppError, AppResult},
    models::{CandidateRef, Filters, Recipe},
};

/// Filtered random recipe recommendation
///
/// A recommendation narrows the catalog through up to three filters (area,
/// category, ingredient) and an exclusion set of already seen recipe ids,
/// then draws uniformly from the strongest non-empty tier:
///
///   1. category/ingredient union restricted to the area
///   2. category/ingredient union outside the area
///   3. anything from the area
///   4. a catalog-wide random draw
///
/// Tiers are tried strictly in order and only the winning tier draws.
/// Tier 4 is the unconditional fallback and ignores the exclusion set, so
/// a caller that has excluded an entire filter pool still gets a recipe.
pub struct Recommender {
    catalog: Arc<dyn CatalogClient>,
    rng: Mutex<StdRng>,
}

impl Recommender {
    pub fn new(catalog: Arc<dyn CatalogClient>) -> Self {
        Self::with_rng(catalog, StdRng::from_entropy())
    }

    /// Seeded variant for reproducible draws
    pub fn with_rng(catalog: Arc<dyn CatalogClient>, rng: StdRng) -> Self {
        Self {
            catalog,
            rng: Mutex::new(rng),
        }
    }

    /// Recommends one recipe honoring the filters and exclusion set.
    /// Filter index fetches run concurrently; an omitted filter
    /// contributes an empty list without a catalog call. Any transport
    /// error aborts the whole recommendation rather than degrading to a
    /// weaker tier.
    pub async fn recommend(
        &self,
        filters: &Filters,
        excluded: &HashSet<String>,
    ) -> AppResult<Recipe> {
        let (area_list, category_list, ingredient_list) = tokio::try_join!(
            async {
                match filters.area.as_deref() {
                    Some(area) => self.catalog.filter_by_area(area).await,
                    None => Ok(Vec::new()),
                }
            },
            async {
                match filters.category.as_deref() {
                    Some(category) => self.catalog.filter_by_category(category).await,
                    None => Ok(Vec::new()),
                }
            },
            async {
                match filters.ingredient.as_deref() {
                    Some(ingredient) => self.catalog.filter_by_ingredient(ingredient).await,
                    None => Ok(Vec::new()),
                }
            },
        )?;

        let area_ids: HashSet<&str> = area_list.iter().map(|c| c.id.as_str()).collect();
        let has_area = filters.area.is_some();
        let has_union = filters.category.is_some() || filters.ingredient.is_some();

        // Tier 1: union candidates that also belong to the area
        if has_area && has_union {
            let eligible = dedup_union(
                category_list
                    .iter()
                    .chain(ingredient_list.iter())
                    .filter(|c| area_ids.contains(c.id.as_str()) && !excluded.contains(&c.id)),
            );
            if let Some(recipe) = self.pick(1, &eligible).await? {
                return Ok(recipe);
            }
        }

        // Tier 2: union candidates outside the area
        if has_union {
            let eligible = dedup_union(
                category_list
                    .iter()
                    .chain(ingredient_list.iter())
                    .filter(|c| !area_ids.contains(c.id.as_str()) && !excluded.contains(&c.id)),
            );
            if let Some(recipe) = self.pick(2, &eligible).await? {
                return Ok(recipe);
            }
        }

        // Tier 3: anything from the area, duplicates impossible within one list
        if has_area {
            let eligible: Vec<CandidateRef> = area_list
                .iter()
                .filter(|c| !excluded.contains(&c.id))
                .cloned()
                .collect();
            if let Some(recipe) = self.pick(3, &eligible).await? {
                return Ok(recipe);
            }
        }

        // Tier 4: catalog-wide random draw, not filtered by the exclusion set
        tracing::info!("Filter tiers exhausted, falling back to catalog random");
        self.catalog.random().await
    }

    /// Draws uniformly from the eligible pool and resolves the winner to
    /// a full recipe. An empty pool falls through to the next tier; a
    /// winner the catalog can no longer resolve is an error, not a retry.
    async fn pick(&self, tier: u8, eligible: &[CandidateRef]) -> AppResult<Option<Recipe>> {
        if eligible.is_empty() {
            tracing::debug!(tier, "No eligible candidates, trying next tier");
            return Ok(None);
        }

        let index = self.rng.lock().await.gen_range(0..eligible.len());
        let candidate = &eligible[index];

        tracing::info!(
            tier,
            eligible = eligible.len(),
            recipe_id = %candidate.id,
            "Recommendation candidate selected"
        );

        let recipe = self
            .catalog
            .lookup(&candidate.id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("recipe {}", candidate.id)))?;

        Ok(Some(recipe))
    }
}

/// Collapses duplicate ids from the chained category and ingredient
/// lists. A duplicate keeps its first-seen position but the stored entry
/// is overwritten, so the later list's copy wins.
fn dedup_union<'a, I>(candidates: I) -> Vec<CandidateRef>
where
    I: IntoIterator<Item = &'a CandidateRef>,
{
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut ordered: Vec<CandidateRef> = Vec::new();

    for candidate in candidates {
        match slots.get(&candidate.id) {
            Some(&slot) => ordered[slot] = candidate.clone(),
            None => {
                slots.insert(candidate.id.clone(), ordered.len());
                ordered.push(candidate.clone());
            }
        }
    }

    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MockCatalogClient;
    use mockall::predicate::eq;

    fn candidate(id: &str) -> CandidateRef {
        candidate_labeled(id, &format!("Recipe {}", id))
    }

    fn candidate_labeled(id: &str, label: &str) -> CandidateRef {
        CandidateRef {
            id: id.to_string(),
            label: label.to_string(),
            thumbnail: None,
        }
    }

    fn recipe(id: &str) -> Recipe {
        Recipe {
            id: id.to_string(),
            title: format!("Recipe {}", id),
            category: None,
            area: None,
            instructions: String::new(),
            thumbnail: None,
            tags: None,
            youtube: None,
            source: None,
            ingredients: Vec::new(),
        }
    }

    fn filters(area: Option<&str>, category: Option<&str>, ingredient: Option<&str>) -> Filters {
        Filters {
            area: area.map(String::from),
            category: category.map(String::from),
            ingredient: ingredient.map(String::from),
        }
    }

    fn excluded(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    #[tokio::test]
    async fn test_tier1_draws_from_union_inside_area() {
        let mut catalog = MockCatalogClient::new();
        catalog
            .expect_filter_by_area()
            .with(eq("Japanese"))
            .times(1)
            .returning(|_| Ok(vec![candidate("1"), candidate("2")]));
        catalog
            .expect_filter_by_category()
            .with(eq("Chicken"))
            .times(1)
            .returning(|_| Ok(vec![candidate("2")]));
        catalog
            .expect_filter_by_ingredient()
            .with(eq("soy sauce"))
            .times(1)
            .returning(|_| Ok(vec![candidate("3")]));
        catalog
            .expect_lookup()
            .with(eq("2"))
            .times(1)
            .returning(|id| Ok(Some(recipe(id))));

        let recommender = Recommender::new(Arc::new(catalog));
        let result = recommender
            .recommend(
                &filters(Some("Japanese"), Some("Chicken"), Some("soy sauce")),
                &HashSet::new(),
            )
            .await
            .unwrap();

        // Candidate 3 is outside the area, so 2 is the only tier-1 pick
        assert_eq!(result.id, "2");
    }

    #[tokio::test]
    async fn test_omitted_filters_make_no_catalog_calls() {
        let mut catalog = MockCatalogClient::new();
        catalog.expect_random().times(1).returning(|| Ok(recipe("99")));

        let recommender = Recommender::new(Arc::new(catalog));
        let result = recommender
            .recommend(&Filters::default(), &HashSet::new())
            .await
            .unwrap();

        assert_eq!(result.id, "99");
    }

    #[tokio::test]
    async fn test_excluded_ids_never_win() {
        let mut catalog = MockCatalogClient::new();
        catalog
            .expect_filter_by_area()
            .times(1)
            .returning(|_| Ok(vec![candidate("1"), candidate("2")]));
        catalog
            .expect_filter_by_category()
            .times(1)
            .returning(|_| Ok(vec![candidate("1"), candidate("2")]));
        catalog
            .expect_lookup()
            .with(eq("2"))
            .times(1)
            .returning(|id| Ok(Some(recipe(id))));

        let recommender = Recommender::new(Arc::new(catalog));
        let result = recommender
            .recommend(
                &filters(Some("Italian"), Some("Pasta"), None),
                &excluded(&["1"]),
            )
            .await
            .unwrap();

        assert_eq!(result.id, "2");
    }

    #[tokio::test]
    async fn test_union_outside_area_falls_to_tier2() {
        let mut catalog = MockCatalogClient::new();
        catalog
            .expect_filter_by_area()
            .times(1)
            .returning(|_| Ok(vec![candidate("10")]));
        catalog
            .expect_filter_by_category()
            .times(1)
            .returning(|_| Ok(vec![candidate("20")]));
        catalog
            .expect_lookup()
            .with(eq("20"))
            .times(1)
            .returning(|id| Ok(Some(recipe(id))));

        let recommender = Recommender::new(Arc::new(catalog));
        let result = recommender
            .recommend(&filters(Some("French"), Some("Beef"), None), &HashSet::new())
            .await
            .unwrap();

        assert_eq!(result.id, "20");
    }

    #[tokio::test]
    async fn test_tier3_serves_area_when_no_union_filter() {
        let mut catalog = MockCatalogClient::new();
        catalog
            .expect_filter_by_area()
            .times(1)
            .returning(|_| Ok(vec![candidate("1"), candidate("2"), candidate("3")]));
        catalog
            .expect_lookup()
            .with(eq("3"))
            .times(1)
            .returning(|id| Ok(Some(recipe(id))));

        let recommender = Recommender::new(Arc::new(catalog));
        let result = recommender
            .recommend(&filters(Some("Japanese"), None, None), &excluded(&["1", "2"]))
            .await
            .unwrap();

        assert_eq!(result.id, "3");
    }

    #[tokio::test]
    async fn test_tier4_may_repeat_excluded_recipe() {
        let mut catalog = MockCatalogClient::new();
        catalog
            .expect_filter_by_area()
            .times(1)
            .returning(|_| Ok(vec![candidate("1")]));
        catalog.expect_random().times(1).returning(|| Ok(recipe("1")));

        let recommender = Recommender::new(Arc::new(catalog));
        let result = recommender
            .recommend(&filters(Some("Japanese"), None, None), &excluded(&["1"]))
            .await
            .unwrap();

        // The fallback draw is catalog-wide and may hand back an excluded id
        assert_eq!(result.id, "1");
    }

    #[tokio::test]
    async fn test_exhausted_tiers_fall_through_to_random() {
        let mut catalog = MockCatalogClient::new();
        // Candidate 5 sits in every pool and is excluded everywhere
        catalog
            .expect_filter_by_area()
            .times(1)
            .returning(|_| Ok(vec![candidate("5")]));
        catalog
            .expect_filter_by_category()
            .times(1)
            .returning(|_| Ok(vec![candidate("5")]));
        catalog.expect_random().times(1).returning(|| Ok(recipe("42")));

        let recommender = Recommender::new(Arc::new(catalog));
        let result = recommender
            .recommend(
                &filters(Some("Italian"), Some("Pasta"), None),
                &excluded(&["5"]),
            )
            .await
            .unwrap();

        assert_eq!(result.id, "42");
    }

    #[tokio::test]
    async fn test_transport_error_aborts_recommendation() {
        let mut catalog = MockCatalogClient::new();
        catalog
            .expect_filter_by_area()
            .returning(|_| Err(AppError::CatalogUnavailable("connection refused".to_string())));
        catalog
            .expect_filter_by_category()
            .returning(|_| Ok(vec![candidate("1")]));

        let recommender = Recommender::new(Arc::new(catalog));
        let result = recommender
            .recommend(&filters(Some("Italian"), Some("Pasta"), None), &HashSet::new())
            .await;

        assert!(matches!(result, Err(AppError::CatalogUnavailable(_))));
    }

    #[tokio::test]
    async fn test_unresolvable_winner_is_not_found() {
        let mut catalog = MockCatalogClient::new();
        catalog
            .expect_filter_by_area()
            .times(1)
            .returning(|_| Ok(vec![candidate("1")]));
        catalog
            .expect_lookup()
            .with(eq("1"))
            .times(1)
            .returning(|_| Ok(None));

        let recommender = Recommender::new(Arc::new(catalog));
        let result = recommender
            .recommend(&filters(Some("Japanese"), None, None), &HashSet::new())
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_seeded_rng_is_deterministic() {
        async fn pick_with_seed(seed: u64) -> String {
            let mut catalog = MockCatalogClient::new();
            catalog.expect_filter_by_area().returning(|_| {
                Ok(vec![
                    candidate("1"),
                    candidate("2"),
                    candidate("3"),
                    candidate("4"),
                    candidate("5"),
                ])
            });
            catalog
                .expect_lookup()
                .returning(|id| Ok(Some(recipe(id))));

            let recommender =
                Recommender::with_rng(Arc::new(catalog), StdRng::seed_from_u64(seed));
            recommender
                .recommend(&filters(Some("Japanese"), None, None), &HashSet::new())
                .await
                .unwrap()
                .id
        }

        assert_eq!(pick_with_seed(7).await, pick_with_seed(7).await);
    }

    #[test]
    fn test_dedup_union_keeps_slot_and_overwrites_entry() {
        let first = candidate_labeled("1", "First");
        let from_category = candidate_labeled("2", "From Category");
        let from_ingredient = candidate_labeled("2", "From Ingredient");

        let deduped = dedup_union([&first, &from_category, &from_ingredient]);

        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].id, "1");
        assert_eq!(deduped[1].id, "2");
        assert_eq!(deduped[1].label, "From Ingredient");
    }
}
