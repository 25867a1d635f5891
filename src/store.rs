//! MongoDB connection holder: opened once at startup, probed, then shared by every repository.

use crate::config::Settings;
use crate::error::StartupError;
use crate::record::EntityKind;
use crate::repository::MongoRepository;
use crate::state::AppState;
use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::Client;
use std::time::Duration;

const SERVER_SELECTION_TIMEOUT: Duration = Duration::from_secs(10);

pub struct Database {
    client: Client,
    database: mongodb::Database,
}

impl Database {
    /// Connect with `settings.mongo_uri` and ping the configured database.
    pub async fn connect(settings: &Settings) -> Result<Self, StartupError> {
        let mut options = ClientOptions::parse(&settings.mongo_uri)
            .await
            .map_err(StartupError::Connect)?;
        options.app_name.get_or_insert_with(|| env!("CARGO_PKG_NAME").to_string());
        options.server_selection_timeout.get_or_insert(SERVER_SELECTION_TIMEOUT);

        let client = Client::with_options(options).map_err(StartupError::Connect)?;
        let database = client.database(&settings.database_name);
        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(StartupError::Ping)?;
        tracing::info!(database = %settings.database_name, "connected to MongoDB");

        Ok(Database { client, database })
    }

    /// One repository per collection in this database.
    pub fn repositories(&self) -> AppState<MongoRepository> {
        AppState::from_fn(|kind: EntityKind| MongoRepository::new(&self.database, kind))
    }

    pub async fn close(self) {
        self.client.shutdown().await;
        tracing::info!("disconnected from MongoDB");
    }
}
