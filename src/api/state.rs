use std::sync::Arc;

use rand::{rngs::StdRng, SeedableRng};

use crate::{
    catalog::CatalogClient,
    services::{OptionCatalog, PreferenceHistory, Recommender},
    store::PreferenceStore,
};

/// Shared application state: the catalog client plus the services wired
/// around it. Cloning is cheap, everything lives behind an Arc.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogClient>,
    pub recommender: Arc<Recommender>,
    pub options: Arc<OptionCatalog>,
    pub history: Arc<PreferenceHistory>,
}

impl AppState {
    /// Wires the services around the given catalog and preference store
    pub fn new(catalog: Arc<dyn CatalogClient>, store: Arc<dyn PreferenceStore>) -> Self {
        Self {
            recommender: Arc::new(Recommender::new(catalog.clone())),
            options: Arc::new(OptionCatalog::new(catalog.clone())),
            history: Arc::new(PreferenceHistory::new(store)),
            catalog,
        }
    }

    /// Same wiring with a seeded recommender, for reproducible draws
    pub fn with_seeded_rng(
        catalog: Arc<dyn CatalogClient>,
        store: Arc<dyn PreferenceStore>,
        seed: u64,
    ) -> Self {
        Self {
            recommender: Arc::new(Recommender::with_rng(
                catalog.clone(),
                StdRng::seed_from_u64(seed),
            )),
            options: Arc::new(OptionCatalog::new(catalog.clone())),
            history: Arc::new(PreferenceHistory::new(store)),
            catalog,
        }
    }
}
