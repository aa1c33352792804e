//! Groups repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::Group,
};

#[derive(Clone)]
pub struct GroupsRepository {
    pool: Pool<Postgres>,
}

impl GroupsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get group by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Group> {
        sqlx::query_as::<_, Group>("SELECT * FROM groups WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Group with id {} not found", id)))
    }

    /// List all groups, ordered by name
    pub async fn list(&self) -> AppResult<Vec<Group>> {
        let groups = sqlx::query_as::<_, Group>("SELECT * FROM groups ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        Ok(groups)
    }
}
