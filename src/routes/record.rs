//! Record CRUD routes, one set per collection:
//! `/api/{kind}` (GET list, POST create) and `/api/{kind}/:id` (GET, PUT, DELETE).

use crate::handlers::record::{create, delete, list, read, update};
use crate::record::EntityKind;
use crate::repository::Repository;
use crate::state::{AppState, CollectionState};
use axum::{routing::get, Router};

pub fn collection_routes<R: Repository>(state: CollectionState<R>) -> Router {
    let base = format!("/api/{}", state.kind.collection());
    Router::new()
        .route(&base, get(list::<R>).post(create::<R>))
        .route(
            &format!("{}/:id", base),
            get(read::<R>).put(update::<R>).delete(delete::<R>),
        )
        .with_state(state)
}

/// Routes for every collection in `state`.
pub fn record_routes<R: Repository>(state: &AppState<R>) -> Router {
    EntityKind::ALL
        .into_iter()
        .fold(Router::new(), |router, kind| {
            router.merge(collection_routes(state.collection(kind)))
        })
}
