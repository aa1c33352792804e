//! Physical book copy model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// One physical, individually scannable copy of a book.
///
/// Invariant kept by the copies repository (and a database CHECK):
/// `is_available` is true exactly when `current_request_id` is null.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookCopy {
    pub id: i32,
    /// Externally scanned identifier, e.g. "105-01"
    pub copy_code: String,
    pub book_id: i32,
    pub is_available: bool,
    /// Request currently holding this copy, if any (non-owning reference)
    pub current_request_id: Option<i32>,
}
