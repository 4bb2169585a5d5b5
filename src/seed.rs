//! Reference data for development databases.

use crate::error::StoreError;
use crate::model::{NewPlant, Plant};
use crate::store::{Filter, PlantStore};

/// The six reference plants. Categories keep the comma-joined single-string
/// shape the catalog has always stored.
pub fn sample_plants() -> Vec<NewPlant> {
    vec![
        NewPlant::new("Monstera Deliciosa", "₹2499.99", vec!["Indoor,Large,Air Purifying".into()])
            .description("A stunning tropical plant with iconic split leaves that brings a jungle vibe to any space."),
        NewPlant::new("Jade Plant", "₹899.99", vec!["Succulent,Indoor,Small,Low Light".into()])
            .description("Lucky jade plant with thick, glossy leaves. Perfect for beginners and brings good fortune."),
        NewPlant::new("Snake Plant", "₹1499.50", vec!["Indoor,Low Light,Air Purifying,Pet Safe".into()])
            .in_stock(false)
            .description("Virtually indestructible plant with striking upright leaves. Perfect for low-light spaces."),
        NewPlant::new("Golden Pothos", "₹1199.99", vec!["Indoor,Hanging,Low Light,Air Purifying".into()])
            .description("Beautiful trailing plant with heart-shaped leaves. Great for hanging baskets or shelves."),
        NewPlant::new("Fiddle Leaf Fig", "₹3999.99", vec!["Indoor,Large".into()])
            .description("Statement plant with large, violin-shaped leaves. A stunning centerpiece for any room."),
        NewPlant::new("Peace Lily", "₹1299.99", vec!["Indoor,Flowering,Air Purifying,Low Light".into()])
            .description("Elegant plant with glossy leaves and beautiful white flowers. Excellent air purifier."),
    ]
}

/// Replace the whole collection with [`sample_plants`].
pub async fn seed<S: PlantStore + ?Sized>(store: &S) -> Result<Vec<Plant>, StoreError> {
    let cleared = store.delete_many(&Filter::All).await?;
    tracing::info!(cleared, "cleared existing plants");

    let plants = store.insert_many(sample_plants()).await?;
    tracing::info!(seeded = plants.len(), "seeded plants");
    Ok(plants)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{InMemoryPlantStore, Query};

    #[tokio::test]
    async fn seed_replaces_existing_documents() {
        let store = InMemoryPlantStore::new();
        store
            .insert(NewPlant::new("Stray", "₹1", vec!["Outdoor".into()]))
            .await
            .unwrap();

        let seeded = seed(&store).await.unwrap();
        assert_eq!(seeded.len(), 6);

        let all = store.find(&Query::default()).await.unwrap();
        assert_eq!(all.len(), 6);
        assert!(all.iter().all(|p| p.name != "Stray"));
        assert_eq!(all.iter().filter(|p| !p.in_stock).count(), 1);
    }

    #[test]
    fn sample_plants_pass_the_schema() {
        for plant in sample_plants() {
            assert_eq!(plant.categories.len(), 1);
            assert!(plant.description.as_deref().is_some_and(|d| d.chars().count() <= 500));
        }
    }
}
