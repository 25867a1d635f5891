//! Repository contract shared by every collection, plus its MongoDB and in-process implementations.

mod memory;
mod mongo;

pub use memory::MemoryRepository;
pub use mongo::MongoRepository;

use crate::error::AppError;
use crate::record::Record;
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

/// Window into a collection: skip `offset` records, return at most `limit`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Page {
    pub limit: u64,
    pub offset: u64,
}

/// One collection of records. Each method maps to a single store round-trip.
#[async_trait]
pub trait Repository: Send + Sync + 'static {
    /// Insert `record` and return it with the store-assigned id. Any id on the input is ignored.
    async fn create(&self, record: Record) -> Result<Record, AppError>;

    /// Fetch one record. Missing ids yield [`AppError::NotFound`].
    async fn read(&self, id: ObjectId) -> Result<Record, AppError>;

    /// Overwrite every settable field of the record with `id`. Matching nothing is not an error and
    /// never inserts. Returns `record` carrying `id`.
    async fn update(&self, id: ObjectId, record: Record) -> Result<Record, AppError>;

    /// Remove the record with `id`. Matching nothing is not an error.
    async fn delete(&self, id: ObjectId) -> Result<(), AppError>;

    /// Records in `_id` order, windowed by `page`.
    async fn list_page(&self, page: Page) -> Result<Vec<Record>, AppError>;

    /// Liveness probe against the backing store.
    async fn ping(&self) -> Result<(), AppError>;
}
