use std::sync::Arc;

use crate::db::InteractionStore;
use crate::models::{CategoryItem, CATEGORIES};
use crate::services::orchestrator::RecommendationSession;
use crate::services::providers::CatalogProvider;
use crate::services::random::RandomSource;

/// Shared application state
///
/// The session carries its own interior locking, so handlers clone the state
/// freely and call straight into it.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<RecommendationSession>,
    pub store: Arc<dyn InteractionStore>,
    pub provider: Arc<dyn CatalogProvider>,
    pub categories: &'static [CategoryItem],
}

impl AppState {
    /// Wires a session around the given provider and interaction store,
    /// serving the standard category menu.
    pub fn new(
        provider: Arc<dyn CatalogProvider>,
        store: Arc<dyn InteractionStore>,
        rng: RandomSource,
    ) -> Self {
        Self::with_categories(provider, store, rng, CATEGORIES)
    }

    /// Same, with a custom category table. Tests use this to keep menus small.
    pub fn with_categories(
        provider: Arc<dyn CatalogProvider>,
        store: Arc<dyn InteractionStore>,
        rng: RandomSource,
        categories: &'static [CategoryItem],
    ) -> Self {
        let session = Arc::new(RecommendationSession::new(
            Arc::clone(&provider),
            Arc::clone(&store),
            rng,
        ));
        Self {
            session,
            store,
            provider,
            categories,
        }
    }
}
