//! Record CRUD handlers: create, read, update, delete, list. Shared by every collection; the
//! collection comes from [`CollectionState`].

use crate::error::AppError;
use crate::extractors::{JsonBody, PageParams, RecordId};
use crate::record::Record;
use crate::repository::Repository;
use crate::state::CollectionState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

pub async fn create<R: Repository>(
    State(state): State<CollectionState<R>>,
    JsonBody(record): JsonBody<Record>,
) -> Result<impl IntoResponse, AppError> {
    let created = state.repo.create(record).await?;
    tracing::info!(collection = %state.kind, id = ?created.id, "record created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn read<R: Repository>(
    State(state): State<CollectionState<R>>,
    RecordId(id): RecordId,
) -> Result<impl IntoResponse, AppError> {
    let record = state.repo.read(id).await?;
    Ok((StatusCode::OK, Json(record)))
}

/// The path id always wins over any `id` in the body.
pub async fn update<R: Repository>(
    State(state): State<CollectionState<R>>,
    RecordId(id): RecordId,
    JsonBody(record): JsonBody<Record>,
) -> Result<impl IntoResponse, AppError> {
    let updated = state.repo.update(id, record.with_id(id)).await?;
    tracing::info!(collection = %state.kind, id = %id, "record updated");
    Ok((StatusCode::OK, Json(updated)))
}

pub async fn delete<R: Repository>(
    State(state): State<CollectionState<R>>,
    RecordId(id): RecordId,
) -> Result<impl IntoResponse, AppError> {
    state.repo.delete(id).await?;
    tracing::info!(collection = %state.kind, id = %id, "record deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list<R: Repository>(
    State(state): State<CollectionState<R>>,
    PageParams(page): PageParams,
) -> Result<impl IntoResponse, AppError> {
    let records = state.repo.list_page(page).await?;
    Ok((StatusCode::OK, Json(records)))
}
