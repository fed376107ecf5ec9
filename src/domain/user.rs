//! User record and request payload types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// A user record.
///
/// The shared vocabulary between JSON payloads and store rows: the same
/// shape serializes to responses and maps to the `users` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// Store-assigned identifier, immutable once assigned
    #[schema(example = 1)]
    pub id: i64,
    /// Display name, non-empty
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    /// Email address, unique across all records
    #[schema(example = "ada@example.com")]
    pub email: String,
    /// Age in years, no range constraint
    #[schema(example = 30)]
    pub age: i32,
}

/// Request payload shared by create and update.
///
/// Update uses whole-record overwrite semantics, so the payload always
/// states every field. Unknown fields are rejected rather than ignored.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UserPayload {
    /// Display name
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    /// Email address
    #[schema(example = "ada@example.com")]
    pub email: String,
    /// Age in years
    #[schema(example = 30)]
    pub age: i32,
}
