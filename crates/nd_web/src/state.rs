use nd_core::{ArticleSource, Authenticator, Dashboard, KeyValueStore, RateTable};
use nd_feed::{fetch_or_fallback, FetchOutcome};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Everything the handlers share. The dashboard is the only mutable piece
/// and every change to it goes through the lock.
pub struct AppState {
    pub dashboard: RwLock<Dashboard>,
    pub store: Arc<dyn KeyValueStore>,
    pub source: Arc<dyn ArticleSource>,
    pub auth: Arc<dyn Authenticator>,
}

impl AppState {
    /// Build the state with the persisted rate table (or the defaults).
    /// The article store starts empty until [`AppState::refresh`] runs.
    pub async fn load(
        store: Arc<dyn KeyValueStore>,
        source: Arc<dyn ArticleSource>,
        auth: Arc<dyn Authenticator>,
    ) -> Self {
        let rates = RateTable::load_or_seed(store.as_ref()).await;
        Self {
            dashboard: RwLock::new(Dashboard::new(rates)),
            store,
            source,
            auth,
        }
    }

    /// Fetch from the article source and replace the store wholesale.
    pub async fn refresh(&self) -> FetchOutcome {
        let outcome = fetch_or_fallback(self.source.as_ref()).await;
        info!("🔄 Loaded {} articles from {}", outcome.articles.len(), self.source.name());
        self.dashboard.write().await.replace_articles(outcome.articles.clone());
        outcome
    }
}
