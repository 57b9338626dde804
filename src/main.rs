use std::sync::Arc;

use reeltaste_api::config::Config;
use reeltaste_api::db::{create_pool, create_redis_client, Cache, PgInteractionStore};
use reeltaste_api::models::{validate_categories, CATEGORIES};
use reeltaste_api::routes::create_router;
use reeltaste_api::services::providers::{CatalogProvider, TmdbProvider};
use reeltaste_api::services::random::RandomSource;
use reeltaste_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    validate_categories(CATEGORIES).map_err(|e| anyhow::anyhow!(e))?;

    let pool = create_pool(&config.database_url).await?;
    sqlx::migrate!().run(&pool).await?;

    let redis_client = create_redis_client(&config.redis_url)?;
    let (cache, cache_writer) = Cache::new(redis_client).await;

    let provider: Arc<dyn CatalogProvider> = Arc::new(TmdbProvider::new(cache, &config)?);
    tracing::info!(provider = provider.name(), "Catalog provider ready");

    let store = Arc::new(PgInteractionStore::new(pool));
    let state = AppState::new(provider, store, RandomSource::new());
    let app = create_router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Recommendation API listening");
    axum::serve(listener, app).await?;

    cache_writer.shutdown().await;
    Ok(())
}
