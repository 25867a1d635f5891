//! Common routes: health, readiness, version.

use crate::record::EntityKind;
use crate::repository::Repository;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
}

#[derive(Serialize)]
struct ReadyBody {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    database: Option<&'static str>,
}

async fn health() -> Json<HealthBody> {
    Json(HealthBody { status: "ok" })
}

async fn ready<R: Repository>(
    State(state): State<AppState<R>>,
) -> Result<Json<ReadyBody>, (StatusCode, Json<ReadyBody>)> {
    for kind in EntityKind::ALL {
        if let Err(e) = state.repository(kind).ping().await {
            tracing::warn!(collection = %kind, error = %e, "readiness probe failed");
            return Err((
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadyBody {
                    status: "degraded",
                    database: Some("unavailable"),
                }),
            ));
        }
    }
    Ok(Json(ReadyBody {
        status: "ok",
        database: Some("ok"),
    }))
}

async fn version() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// GET /health, GET /ready (pings every repository), GET /version.
pub fn common_routes<R: Repository>(state: AppState<R>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready::<R>))
        .route("/version", get(version))
        .with_state(state)
}
