//! harvest-server: reads settings from the environment, connects to MongoDB and serves the
//! fruits, vegetables and greens API until SIGINT/SIGTERM.

use harvest_api::{bootstrap, Application, Settings, StartupError, DEFAULT_LOG_FILTER};
use tracing_subscriber::EnvFilter;

async fn startup() -> Result<Application, StartupError> {
    let settings = Settings::from_env()?;
    bootstrap(settings).await
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let app = match startup().await {
        Ok(app) => app,
        Err(e) => {
            tracing::error!(error = %e, "startup failed");
            return Err(e.into());
        }
    };
    app.run().await?;
    Ok(())
}
