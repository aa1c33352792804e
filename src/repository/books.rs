//! Books repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{Book, BookSummary, Group},
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// List books matching a group's language and course, with the derived
    /// count of available copies. Books marked for both languages match
    /// every group of the course.
    pub async fn list_for_group(&self, group: &Group) -> AppResult<Vec<BookSummary>> {
        let books = sqlx::query_as::<_, BookSummary>(
            r#"
            SELECT b.id, b.name, b.author, b.year, b.publisher,
                   b.total_quantity, b.language, b.course,
                   COUNT(c.id) FILTER (WHERE c.is_available) AS available
            FROM books b
            LEFT JOIN book_copies c ON c.book_id = b.id
            WHERE b.course = $1
              AND (b.language::text = $2 OR b.language = 'both')
            GROUP BY b.id
            ORDER BY b.name
            "#,
        )
        .bind(group.course)
        .bind(group.language.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }
}
