use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use forkcast_api::{
    api::{create_router, AppState},
    catalog::{CatalogClient, MealDbCatalog},
    config::Config,
    store::{PreferenceStore, SqliteStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "forkcast_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let catalog: Arc<dyn CatalogClient> = Arc::new(MealDbCatalog::new(config.catalog_api_url.clone()));
    let store: Arc<dyn PreferenceStore> = Arc::new(
        SqliteStore::connect(&config.database_url)
            .await
            .with_context(|| format!("failed to open preference store at {}", config.database_url))?,
    );

    let state = AppState::new(catalog, store);
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    tracing::info!(addr = %addr, catalog = %config.catalog_api_url, "forkcast-api listening");
    axum::serve(listener, app).await?;

    Ok(())
}
