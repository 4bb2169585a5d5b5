use std::sync::Arc;

use anyhow::Context;
use plant_catalog::config::{AppConfig, StoreBackend};
use plant_catalog::store::{InMemoryPlantStore, PlantStore};
use plant_catalog::{http, seed, telemetry, CatalogService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_tracing();

    let config = AppConfig::from_env().context("failed to load configuration")?;

    match config.store_backend {
        StoreBackend::Memory => run(InMemoryPlantStore::new(), &config).await,
        #[cfg(feature = "sled")]
        StoreBackend::Sled => {
            let store = plant_catalog::store::SledPlantStore::open(&config.data_dir)
                .with_context(|| format!("failed to open store at {}", config.data_dir.display()))?;
            run(store, &config).await
        }
        #[cfg(not(feature = "sled"))]
        StoreBackend::Sled => anyhow::bail!("STORE_BACKEND=sled requires the `sled` feature"),
    }
}

async fn run<S: PlantStore + 'static>(store: S, config: &AppConfig) -> anyhow::Result<()> {
    if config.seed_db {
        seed::seed(&store).await.context("failed to seed database")?;
    }

    let service = Arc::new(CatalogService::new(store));
    http::serve(
        service.clone(),
        &config.api_base_path,
        &config.bind_addr(),
        shutdown_signal(),
    )
    .await
    .with_context(|| format!("server on {} failed", config.bind_addr()))?;

    service.store().close().await.context("failed to close store")?;
    tracing::info!("plant catalog stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutdown signal received");
}
