//! `limit` / `offset` query parameters. Both are required; no defaults are substituted.

use crate::error::AppError;
use crate::repository::Page;
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageParams(pub Page);

fn required(params: &HashMap<String, String>, name: &str) -> Result<u64, AppError> {
    let raw = params
        .get(name)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| {
            AppError::BadRequest("query parameters 'limit' and 'offset' are required".into())
        })?;
    raw.parse()
        .map_err(|e| AppError::BadRequest(format!("invalid value for '{}': {}", name, e)))
}

impl PageParams {
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, AppError> {
        Ok(PageParams(Page {
            limit: required(params, "limit")?,
            offset: required(params, "offset")?,
        }))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for PageParams
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        Self::from_params(&params)
    }
}
