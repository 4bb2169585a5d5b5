use std::sync::Arc;

use plant_catalog::store::{InMemoryPlantStore, PlantStore};
use plant_catalog::{http, CatalogService, NewPlant, Plant};

pub const BASE_PATH: &str = "/api";

pub fn jade() -> NewPlant {
    NewPlant::new("Jade Plant", "₹899.99", vec!["Succulent,Indoor".into()])
        .description("Lucky jade plant with thick, glossy leaves.")
}

pub fn snake() -> NewPlant {
    NewPlant::new("Snake Plant", "₹1499.50", vec!["Indoor,Low Light".into()]).in_stock(false)
}

pub fn fern() -> NewPlant {
    NewPlant::new("Boston Fern", "₹650", vec!["Indoor".into(), "Hanging".into()])
}

/// Insert plants in order and return what the store saved.
pub async fn insert_all<S: PlantStore>(store: &S, plants: Vec<NewPlant>) -> Vec<Plant> {
    store.insert_many(plants).await.unwrap()
}

pub fn in_memory_service() -> Arc<CatalogService<InMemoryPlantStore>> {
    Arc::new(CatalogService::new(InMemoryPlantStore::new()))
}

/// Bind to port 0 and return the API root, e.g. `http://127.0.0.1:43121/api`.
pub async fn start_server<S: PlantStore + 'static>(service: Arc<CatalogService<S>>) -> String {
    let app = http::app(service, BASE_PATH);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}{BASE_PATH}")
}
