//! Student model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Student model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Student {
    pub id: i32,
    pub full_name: String,
    pub group_id: i32,
}

/// Student with the name of their group, for search results
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct StudentWithGroup {
    pub id: i32,
    pub full_name: String,
    pub group_id: i32,
    pub group_name: String,
}
