//! Durability of the sled-backed store across reopen.

use std::sync::Arc;

use plant_catalog::catalog::PlantFilter;
use plant_catalog::seed;
use plant_catalog::store::{PlantStore, SledPlantStore};
use plant_catalog::CatalogService;

use crate::support::start_server;

#[tokio::test]
async fn seeded_database_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();

    {
        let store = SledPlantStore::open(dir.path()).unwrap();
        let seeded = seed::seed(&store).await.unwrap();
        assert_eq!(seeded.len(), 6);
        store.close().await.unwrap();
    }

    let service = CatalogService::new(SledPlantStore::open(dir.path()).unwrap());
    let all = service.list(&PlantFilter::new()).await.unwrap();
    assert_eq!(all.len(), 6);
    assert_eq!(all[0].name, "Fiddle Leaf Fig");

    let out_of_stock = service.list(&PlantFilter::new().in_stock(false)).await.unwrap();
    assert_eq!(out_of_stock.len(), 1);
    assert_eq!(out_of_stock[0].name, "Snake Plant");
}

#[tokio::test]
async fn serves_http_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let store = SledPlantStore::open(dir.path()).unwrap();
    seed::seed(&store).await.unwrap();

    let base = start_server(Arc::new(CatalogService::new(store))).await;
    let body: serde_json::Value = reqwest::get(format!("{base}/plants?category=Indoor,Large"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["name"], "Fiddle Leaf Fig");
}
