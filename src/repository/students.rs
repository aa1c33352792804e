//! Students repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{Student, StudentWithGroup},
};

#[derive(Clone)]
pub struct StudentsRepository {
    pool: Pool<Postgres>,
}

impl StudentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get student by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Student> {
        sqlx::query_as::<_, Student>("SELECT * FROM students WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Student with id {} not found", id)))
    }

    /// List students of a group, ordered by name
    pub async fn list_by_group(&self, group_id: i32) -> AppResult<Vec<Student>> {
        let students = sqlx::query_as::<_, Student>(
            "SELECT * FROM students WHERE group_id = $1 ORDER BY full_name",
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(students)
    }

    /// List students with their group name, optionally narrowed to one
    /// group. Used as the relational half of the student search; the
    /// word-prefix filter is applied in memory on top of this.
    pub async fn list_with_group(&self, group_id: Option<i32>) -> AppResult<Vec<StudentWithGroup>> {
        let students = sqlx::query_as::<_, StudentWithGroup>(
            r#"
            SELECT s.id, s.full_name, s.group_id, g.name as group_name
            FROM students s
            JOIN groups g ON g.id = s.group_id
            WHERE $1::int IS NULL OR s.group_id = $1
            ORDER BY s.full_name
            "#,
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(students)
    }
}
