//! MongoDB-backed repository: one instance per collection.

use crate::error::AppError;
use crate::record::{EntityKind, Record, RecordDocument};
use crate::repository::{Page, Repository};
use async_trait::async_trait;
use futures_util::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::options::FindOptions;
use mongodb::{Collection, Database};

#[derive(Clone, Debug)]
pub struct MongoRepository {
    kind: EntityKind,
    database: Database,
    collection: Collection<RecordDocument>,
}

impl MongoRepository {
    pub fn new(database: &Database, kind: EntityKind) -> Self {
        MongoRepository {
            kind,
            database: database.clone(),
            collection: database.collection::<RecordDocument>(kind.collection()),
        }
    }
}

/// The stored shape of a new record. The identifier is left to the store.
fn insertable(record: Record) -> RecordDocument {
    let mut document = RecordDocument::from(record);
    document.id = None;
    document
}

/// Sort, skip and limit for one page in `_id` order, or `None` for an empty page since the
/// driver reads a limit of 0 as "no limit". Both bounds saturate at `i64::MAX`.
fn find_options(page: Page) -> Option<FindOptions> {
    if page.limit == 0 {
        return None;
    }
    let max = i64::MAX as u64;
    Some(
        FindOptions::builder()
            .sort(doc! { "_id": 1 })
            .skip(page.offset.min(max))
            .limit(page.limit.min(max) as i64)
            .build(),
    )
}

#[async_trait]
impl Repository for MongoRepository {
    async fn create(&self, record: Record) -> Result<Record, AppError> {
        let mut document = insertable(record);
        let result = self.collection.insert_one(&document).await?;
        let id = result.inserted_id.as_object_id().ok_or_else(|| {
            AppError::Storage(format!("{}: inserted id is not an ObjectId", self.kind))
        })?;
        tracing::debug!(collection = %self.kind, id = %id, "insert_one");
        document.id = Some(id);
        Ok(document.into())
    }

    async fn read(&self, id: ObjectId) -> Result<Record, AppError> {
        tracing::debug!(collection = %self.kind, id = %id, "find_one");
        let document = self
            .collection
            .find_one(doc! { "_id": id })
            .await?
            .ok_or_else(|| AppError::NotFound(id.to_hex()))?;
        Ok(document.into())
    }

    async fn update(&self, id: ObjectId, record: Record) -> Result<Record, AppError> {
        let result = self
            .collection
            .update_one(doc! { "_id": id }, record.profile.to_update_document())
            .await?;
        tracing::debug!(
            collection = %self.kind,
            id = %id,
            matched = result.matched_count,
            "update_one"
        );
        Ok(record.with_id(id))
    }

    async fn delete(&self, id: ObjectId) -> Result<(), AppError> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        tracing::debug!(
            collection = %self.kind,
            id = %id,
            deleted = result.deleted_count,
            "delete_one"
        );
        Ok(())
    }

    async fn list_page(&self, page: Page) -> Result<Vec<Record>, AppError> {
        let Some(options) = find_options(page) else {
            return Ok(Vec::new());
        };
        tracing::debug!(collection = %self.kind, limit = page.limit, offset = page.offset, "find");
        let cursor = self.collection.find(doc! {}).with_options(options).await?;
        let documents: Vec<RecordDocument> = cursor.try_collect().await?;
        Ok(documents.into_iter().map(Record::from).collect())
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}
