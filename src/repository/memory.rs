//! In-process repository with the same contract as [`super::MongoRepository`]. Records keep
//! insertion order, which matches `_id` order because ids are minted on insert.

use crate::error::AppError;
use crate::record::Record;
use crate::repository::{Page, Repository};
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
pub struct MemoryRepository {
    records: RwLock<Vec<Record>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.read_guard().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read_guard(&self) -> Result<RwLockReadGuard<'_, Vec<Record>>, AppError> {
        self.records
            .read()
            .map_err(|_| AppError::Storage("memory store lock poisoned".into()))
    }

    fn write_guard(&self) -> Result<RwLockWriteGuard<'_, Vec<Record>>, AppError> {
        self.records
            .write()
            .map_err(|_| AppError::Storage("memory store lock poisoned".into()))
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn create(&self, record: Record) -> Result<Record, AppError> {
        let created = record.with_id(ObjectId::new());
        self.write_guard()?.push(created.clone());
        Ok(created)
    }

    async fn read(&self, id: ObjectId) -> Result<Record, AppError> {
        self.read_guard()?
            .iter()
            .find(|r| r.id == Some(id))
            .cloned()
            .ok_or_else(|| AppError::NotFound(id.to_hex()))
    }

    async fn update(&self, id: ObjectId, record: Record) -> Result<Record, AppError> {
        let updated = record.with_id(id);
        let mut records = self.write_guard()?;
        if let Some(slot) = records.iter_mut().find(|r| r.id == Some(id)) {
            *slot = updated.clone();
        }
        Ok(updated)
    }

    async fn delete(&self, id: ObjectId) -> Result<(), AppError> {
        self.write_guard()?.retain(|r| r.id != Some(id));
        Ok(())
    }

    async fn list_page(&self, page: Page) -> Result<Vec<Record>, AppError> {
        let offset = usize::try_from(page.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit).unwrap_or(usize::MAX);
        Ok(self
            .read_guard()?
            .iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.read_guard().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::PlantProfile;

    fn named(name: &str) -> Record {
        Record {
            id: None,
            profile: PlantProfile {
                name: Some(name.to_string()),
                ..Default::default()
            },
        }
    }

    #[tokio::test]
    async fn should_read_back_created_record() {
        let repo = MemoryRepository::new();
        let created = repo.create(named("Apple")).await.unwrap();
        let id = created.id.expect("create assigns an id");
        assert_eq!(repo.read(id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn should_ignore_caller_supplied_id_on_create() {
        let repo = MemoryRepository::new();
        let supplied = ObjectId::new();
        let created = repo.create(named("Pear").with_id(supplied)).await.unwrap();
        assert_ne!(created.id, Some(supplied));
    }

    #[tokio::test]
    async fn should_report_not_found_for_unknown_id() {
        let repo = MemoryRepository::new();
        let err = repo.read(ObjectId::new()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn should_overwrite_all_fields_on_update() {
        let repo = MemoryRepository::new();
        let mut original = named("Apple");
        original.profile.harvest = Some("autumn".into());
        let id = repo.create(original).await.unwrap().id.unwrap();

        repo.update(id, named("Green Apple")).await.unwrap();

        let stored = repo.read(id).await.unwrap();
        assert_eq!(stored.profile.name.as_deref(), Some("Green Apple"));
        assert_eq!(stored.profile.harvest, None);
        assert_eq!(stored.id, Some(id));
    }

    #[tokio::test]
    async fn should_not_insert_on_update_of_missing_id() {
        let repo = MemoryRepository::new();
        let id = ObjectId::new();
        let returned = repo.update(id, named("Ghost")).await.unwrap();
        assert_eq!(returned.id, Some(id));
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn should_treat_delete_of_missing_id_as_success() {
        let repo = MemoryRepository::new();
        repo.create(named("Kale")).await.unwrap();
        repo.delete(ObjectId::new()).await.unwrap();
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn should_partition_consecutive_pages() {
        let repo = MemoryRepository::new();
        for name in ["a", "b", "c", "d", "e"] {
            repo.create(named(name)).await.unwrap();
        }
        let first = repo.list_page(Page { limit: 2, offset: 0 }).await.unwrap();
        let second = repo.list_page(Page { limit: 3, offset: 2 }).await.unwrap();
        let all = repo.list_page(Page { limit: 5, offset: 0 }).await.unwrap();

        let joined: Vec<_> = first.into_iter().chain(second).collect();
        assert_eq!(joined, all);
    }

    #[tokio::test]
    async fn should_pass_huge_limit_through() {
        let repo = MemoryRepository::new();
        repo.create(named("Chard")).await.unwrap();
        let page = repo
            .list_page(Page { limit: u64::MAX, offset: 0 })
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        let past_end = repo.list_page(Page { limit: 10, offset: 10 }).await.unwrap();
        assert!(past_end.is_empty());
    }
}
