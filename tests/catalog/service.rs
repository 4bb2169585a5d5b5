//! Catalog operations against the in-memory store.

use std::collections::HashSet;

use plant_catalog::catalog::{CategoryCount, PlantFilter, SortOrder};
use plant_catalog::{CatalogError, CatalogService, PlantPatch, StoreError};
use plant_catalog::store::InMemoryPlantStore;

use crate::support::{fern, insert_all, jade, snake};

async fn catalog() -> CatalogService<InMemoryPlantStore> {
    let service = CatalogService::new(InMemoryPlantStore::new());
    insert_all(service.store(), vec![jade(), snake(), fern()]).await;
    service
}

fn names(plants: &[plant_catalog::Plant]) -> Vec<&str> {
    plants.iter().map(|p| p.name.as_str()).collect()
}

#[tokio::test]
async fn in_stock_filter_partitions_the_catalog() {
    let service = catalog().await;

    let all = service.list(&PlantFilter::new()).await.unwrap();
    let stocked = service.list(&PlantFilter::new().in_stock(true)).await.unwrap();
    let unstocked = service.list(&PlantFilter::new().in_stock(false)).await.unwrap();

    assert_eq!(stocked.len() + unstocked.len(), all.len());
    assert!(stocked.iter().all(|p| p.in_stock));
    assert!(unstocked.iter().all(|p| !p.in_stock));

    let ids: HashSet<_> = stocked.iter().chain(&unstocked).map(|p| p.id).collect();
    assert_eq!(ids.len(), all.len());
}

#[tokio::test]
async fn default_listing_is_sorted_by_name() {
    let service = catalog().await;
    let all = service.list(&PlantFilter::new()).await.unwrap();
    assert_eq!(names(&all), vec!["Boston Fern", "Jade Plant", "Snake Plant"]);

    let desc = service
        .list(&PlantFilter::new().sort_by("name", SortOrder::Desc))
        .await
        .unwrap();
    assert_eq!(names(&desc), vec!["Snake Plant", "Jade Plant", "Boston Fern"]);
}

#[tokio::test]
async fn search_matches_name_description_and_categories() {
    let service = catalog().await;

    let by_name = service.list(&PlantFilter::new().search("SNAKE")).await.unwrap();
    assert_eq!(names(&by_name), vec!["Snake Plant"]);

    let by_description = service.list(&PlantFilter::new().search("glossy")).await.unwrap();
    assert_eq!(names(&by_description), vec!["Jade Plant"]);

    let by_category = service.list(&PlantFilter::new().search("hanging")).await.unwrap();
    assert_eq!(names(&by_category), vec!["Boston Fern"]);

    let nothing = service.list(&PlantFilter::new().search("cactus")).await.unwrap();
    assert!(nothing.is_empty());
}

#[tokio::test]
async fn category_filter_is_exact_element_match() {
    let service = catalog().await;

    let indoor = service.list(&PlantFilter::new().category("Indoor")).await.unwrap();
    assert_eq!(names(&indoor), vec!["Boston Fern"]);

    let joined = service
        .list(&PlantFilter::new().category("Succulent,Indoor"))
        .await
        .unwrap();
    assert_eq!(names(&joined), vec!["Jade Plant"]);

    let absent = service.list(&PlantFilter::new().category("Cactus")).await.unwrap();
    assert!(absent.is_empty());
}

#[tokio::test]
async fn categories_counts_each_distinct_value() {
    let service = catalog().await;
    let mut counts = service.categories().await.unwrap();
    counts.sort_by(|a, b| a.name.cmp(&b.name));

    assert_eq!(
        counts,
        vec![
            CategoryCount { name: "Hanging".into(), count: 1 },
            CategoryCount { name: "Indoor".into(), count: 1 },
            CategoryCount { name: "Indoor,Low Light".into(), count: 1 },
            CategoryCount { name: "Succulent,Indoor".into(), count: 1 },
        ]
    );
}

#[tokio::test]
async fn categories_of_an_empty_catalog_is_empty() {
    let service = CatalogService::new(InMemoryPlantStore::new());
    assert!(service.categories().await.unwrap().is_empty());
}

#[tokio::test]
async fn update_then_delete_round_trip() {
    let service = catalog().await;
    let jade = service.list(&PlantFilter::new().search("jade")).await.unwrap().remove(0);
    let id = jade.id.to_string();

    let patch = PlantPatch {
        price: Some("₹999".into()),
        in_stock: Some(false),
        ..Default::default()
    };
    let updated = service.update(&id, patch).await.unwrap();
    assert_eq!(updated.price, "₹999");
    assert!(!updated.in_stock);
    assert_eq!(updated.name, jade.name);
    assert_eq!(updated.created_at, jade.created_at);
    assert!(updated.updated_at >= jade.updated_at);

    let removed = service.delete(&id).await.unwrap();
    assert_eq!(removed.id, jade.id);
    assert!(matches!(service.get(&id).await, Err(CatalogError::NotFound(_))));
    assert!(matches!(service.delete(&id).await, Err(CatalogError::NotFound(_))));
}

#[tokio::test]
async fn malformed_id_is_a_store_error_not_a_miss() {
    let service = catalog().await;

    let err = service.get("not-an-id").await.unwrap_err();
    assert!(matches!(err, CatalogError::Store(StoreError::InvalidId(_))));
    assert_eq!(err.status_code(), 500);

    let err = service.delete("123").await.unwrap_err();
    assert_eq!(err.status_code(), 500);
}
