use anyhow::Context;
use plant_catalog::config::{AppConfig, StoreBackend};
use plant_catalog::store::{PlantStore, SledPlantStore};
use plant_catalog::{seed, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_tracing();

    let config = AppConfig::from_env().context("failed to load configuration")?;
    if config.store_backend == StoreBackend::Memory {
        anyhow::bail!("nothing to seed: STORE_BACKEND=memory does not persist");
    }

    let store = SledPlantStore::open(&config.data_dir)
        .with_context(|| format!("failed to open store at {}", config.data_dir.display()))?;
    let plants = seed::seed(&store).await.context("failed to seed database")?;
    store.close().await.context("failed to close store")?;

    for plant in &plants {
        println!("{}  {}", plant.id, plant.name);
    }
    tracing::info!(count = plants.len(), data_dir = %store.data_dir().display(), "database seeded");
    Ok(())
}
