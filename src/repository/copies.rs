//! Copies repository: the inventory ledger over physical book copies.
//!
//! Availability is never a stored counter; it is the `is_available` flag on
//! each copy row, and per-book counts are derived with COUNT. Mutations
//! (`reserve`, `release_for_request`) only ever run inside the transaction
//! of the lifecycle operation that owns them.

use sqlx::{Pool, Postgres, Transaction};

use crate::{
    error::{AppError, AppResult},
    models::BookCopy,
};

#[derive(Clone)]
pub struct CopiesRepository {
    pool: Pool<Postgres>,
}

impl CopiesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Derived count of available copies of a book
    pub async fn available_count(&self, book_id: i32) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM book_copies WHERE book_id = $1 AND is_available",
        )
        .bind(book_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Find a copy by code, scoped to a book. A code that exists under a
    /// different book is reported as not found for this one.
    pub async fn find_for_book(&self, book_id: i32, copy_code: &str) -> AppResult<BookCopy> {
        sqlx::query_as::<_, BookCopy>(
            "SELECT * FROM book_copies WHERE book_id = $1 AND copy_code = $2",
        )
        .bind(book_id)
        .bind(copy_code)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Copy {} not found for this book", copy_code))
        })
    }

    /// Lock the copy rows for the given codes of a book (`FOR UPDATE`).
    /// Rows come back ordered by copy_code so concurrent confirmations
    /// acquire locks in the same order. Codes with no matching row are
    /// simply absent from the result.
    pub async fn lock_for_codes(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book_id: i32,
        copy_codes: &[String],
    ) -> AppResult<Vec<BookCopy>> {
        let copies = sqlx::query_as::<_, BookCopy>(
            r#"
            SELECT * FROM book_copies
            WHERE book_id = $1 AND copy_code = ANY($2)
            ORDER BY copy_code
            FOR UPDATE
            "#,
        )
        .bind(book_id)
        .bind(copy_codes)
        .fetch_all(&mut **tx)
        .await?;

        Ok(copies)
    }

    /// Reserve a copy for a request: unavailable, back-reference set.
    /// The caller must hold the row lock and have verified availability.
    pub async fn reserve(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        copy_id: i32,
        request_id: i32,
    ) -> AppResult<()> {
        sqlx::query(
            "UPDATE book_copies SET is_available = FALSE, current_request_id = $1 WHERE id = $2",
        )
        .bind(request_id)
        .bind(copy_id)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    /// Release every copy held by a request: available again, back-reference
    /// cleared. Returns the number of copies released.
    pub async fn release_for_request(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        request_id: i32,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE book_copies
            SET is_available = TRUE, current_request_id = NULL
            WHERE current_request_id = $1
            "#,
        )
        .bind(request_id)
        .execute(&mut **tx)
        .await?;

        Ok(result.rows_affected())
    }
}
