//! harvest-api: REST backend for fruit, vegetable and greens growing guides stored in MongoDB.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod record;
pub mod repository;
pub mod routes;
pub mod server;
pub mod state;
pub mod store;

pub use config::{Settings, DEFAULT_LOG_FILTER};
pub use error::{AppError, ConfigError, StartupError};
pub use record::{EntityKind, PlantProfile, Record};
pub use repository::{MemoryRepository, MongoRepository, Page, Repository};
pub use routes::{collection_routes, common_routes, record_routes};
pub use server::{bootstrap, build_router, serve_until, Application};
pub use state::{AppState, CollectionState};
pub use store::Database;
