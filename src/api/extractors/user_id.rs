//! Typed path extractor for user ids.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::errors::AppError;

/// Extracts the `:id` path segment as a base-10 unsigned integer.
///
/// Anything that does not parse (non-numeric text, negative numbers,
/// values past `i64::MAX`) rejects the request with 400 before any
/// store call is made.
pub struct UserId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::bad_request("id path parameter is missing"))?;

        let id: u64 = raw
            .parse()
            .map_err(|_| AppError::bad_request("id must be an unsigned integer"))?;

        let id = i64::try_from(id)
            .map_err(|_| AppError::bad_request("id is out of range"))?;

        Ok(UserId(id))
    }
}
