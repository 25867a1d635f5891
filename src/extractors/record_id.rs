//! Parse the `:id` path segment into an ObjectId.

use crate::error::AppError;
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use mongodb::bson::oid::ObjectId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordId(pub ObjectId);

#[async_trait]
impl<S> FromRequestParts<S> for RecordId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        ObjectId::parse_str(&raw)
            .map(RecordId)
            .map_err(|e| AppError::BadRequest(format!("invalid id '{}': {}", raw, e)))
    }
}
