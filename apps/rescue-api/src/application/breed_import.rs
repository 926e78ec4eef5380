use core_lib::{BreedRepository, BreedSource, CoreError};
use std::sync::Arc;
use tracing::{debug, info};

/// Copies the external breed catalogue into the local breed store.
pub struct BreedImporter {
    source: Arc<dyn BreedSource>,
    breeds: Arc<dyn BreedRepository>,
}

impl BreedImporter {
    pub fn new(source: Arc<dyn BreedSource>, breeds: Arc<dyn BreedRepository>) -> Self {
        Self { source, breeds }
    }

    /// Saves every fetched breed that is not stored yet and returns how many
    /// were added. Already known ids are left untouched.
    pub async fn import(&self) -> Result<usize, CoreError> {
        let fetched = self.source.fetch_breeds().await?;
        let total = fetched.len();

        let mut added = 0;
        for breed in fetched {
            if self.breeds.find_by_id(&breed.id).await?.is_some() {
                debug!(breed_id = %breed.id, "Breed already stored, skipping");
                continue;
            }
            self.breeds.save(breed).await?;
            added += 1;
        }

        info!("Imported {} new breeds ({} fetched)", added, total);
        Ok(added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use core_lib::{adapters::InMemoryBreedRepository, domain::breed::Breed};

    struct StaticSource(Vec<Breed>);

    #[async_trait]
    impl BreedSource for StaticSource {
        async fn fetch_breeds(&self) -> Result<Vec<Breed>, CoreError> {
            Ok(self.0.clone())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl BreedSource for FailingSource {
        async fn fetch_breeds(&self) -> Result<Vec<Breed>, CoreError> {
            Err(CoreError::Configuration("catalogue unreachable".into()))
        }
    }

    #[tokio::test]
    async fn test_import_only_adds_missing_breeds() {
        let repo = Arc::new(InMemoryBreedRepository::default());
        repo.save(Breed::new("abys", "Abyssinian (local)")).await.unwrap();

        let source = StaticSource(vec![
            Breed::new("abys", "Abyssinian"),
            Breed::new("beng", "Bengal"),
        ]);
        let importer = BreedImporter::new(Arc::new(source), repo.clone());

        assert_eq!(importer.import().await.unwrap(), 1);
        assert_eq!(repo.count().await.unwrap(), 2);
        let kept = repo.find_by_id("abys").await.unwrap().unwrap();
        assert_eq!(kept.name, "Abyssinian (local)");

        // Second run finds nothing new
        assert_eq!(importer.import().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_import_propagates_source_failure() {
        let repo = Arc::new(InMemoryBreedRepository::default());
        let importer = BreedImporter::new(Arc::new(FailingSource), repo.clone());

        assert!(importer.import().await.is_err());
        assert_eq!(repo.count().await.unwrap(), 0);
    }
}
