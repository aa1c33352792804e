//! Requests repository: the checkout request lifecycle engine.
//!
//! Every state transition runs as one transaction: read current state under
//! a row lock, validate, write all mutations, commit. Concurrent
//! confirmations against overlapping copy codes are resolved optimistically:
//! the loser gets a conflict error naming the offending codes instead of
//! waiting on an advisory lock.

use std::collections::{BTreeSet, HashMap};

use chrono::{Duration, Utc};
use sqlx::{Pool, Postgres, Transaction};

use crate::{
    error::{AppError, AppResult},
    models::{
        request::LOAN_TERM_DAYS, BookRequest, RequestDetails, RequestStatus,
    },
    repository::copies::CopiesRepository,
};

/// Attempts before giving up on a request-number collision
const MAX_NUMBER_RETRIES: u32 = 5;

#[derive(Clone)]
pub struct RequestsRepository {
    pool: Pool<Postgres>,
}

impl RequestsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get request by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<BookRequest> {
        sqlx::query_as::<_, BookRequest>("SELECT * FROM book_requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Request with id {} not found", id)))
    }

    /// Get request by its human-facing number
    pub async fn get_by_number(&self, number: &str) -> AppResult<Option<BookRequest>> {
        let request = sqlx::query_as::<_, BookRequest>(
            "SELECT * FROM book_requests WHERE request_number = $1",
        )
        .bind(number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    /// List all requests with student/book details, newest first
    pub async fn list_details(&self) -> AppResult<Vec<RequestDetails>> {
        let requests = sqlx::query_as::<_, RequestDetails>(
            r#"
            SELECT r.id, r.request_number, r.student_id, s.full_name as student_name,
                   g.name as group_name, r.book_id, b.name as book_name,
                   r.quantity, r.status, r.request_date, r.issue_date,
                   r.planned_return_date, r.actual_return_date,
                   r.requested_copy_codes, r.issued_copy_codes
            FROM book_requests r
            JOIN students s ON s.id = r.student_id
            JOIN groups g ON g.id = s.group_id
            JOIN books b ON b.id = r.book_id
            ORDER BY r.request_date DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    /// Create a pending request. Copies are not reserved at submission;
    /// conflicts surface at confirm time.
    ///
    /// The daily-sequential number is derived from existing rows, so two
    /// concurrent submissions can compute the same one. Whichever commits
    /// first claims it; the loser hits the unique constraint and retries
    /// with a fresh number.
    pub async fn create(
        &self,
        student_id: i32,
        book_id: i32,
        quantity: i32,
        copy_codes: &[String],
    ) -> AppResult<BookRequest> {
        for _ in 0..MAX_NUMBER_RETRIES {
            match self.try_insert(student_id, book_id, quantity, copy_codes).await {
                Err(e) if e.is_unique_violation("book_requests_request_number_key") => continue,
                other => return other,
            }
        }

        Err(AppError::Conflict(
            "Could not allocate a request number, please retry".to_string(),
        ))
    }

    async fn try_insert(
        &self,
        student_id: i32,
        book_id: i32,
        quantity: i32,
        copy_codes: &[String],
    ) -> AppResult<BookRequest> {
        let now = Utc::now();
        let prefix = now.format("%d%m%y").to_string();

        // Highest number already allocated today. The suffix is compared
        // numerically: past -999 the sequence grows a digit and a
        // lexicographic scan would keep returning -999 forever.
        let last: Option<String> = sqlx::query_scalar(
            r#"
            SELECT request_number FROM book_requests
            WHERE request_number LIKE $1 || '-%'
            ORDER BY split_part(request_number, '-', 2)::int DESC
            LIMIT 1
            "#,
        )
        .bind(&prefix)
        .fetch_optional(&self.pool)
        .await?;

        let number = next_request_number(&prefix, last.as_deref());

        let request = sqlx::query_as::<_, BookRequest>(
            r#"
            INSERT INTO book_requests
                (request_number, student_id, book_id, quantity, status,
                 request_date, requested_copy_codes)
            VALUES ($1, $2, $3, $4, 'pending', $5, $6)
            RETURNING *
            "#,
        )
        .bind(&number)
        .bind(student_id)
        .bind(book_id)
        .bind(quantity)
        .bind(now)
        .bind(copy_codes)
        .fetch_one(&self.pool)
        .await?;

        Ok(request)
    }

    /// Confirm issue: pending -> issued.
    ///
    /// Re-resolves every requested code under row locks and reserves all of
    /// them, or none: a single conflicting copy aborts the whole
    /// transaction with an error naming each offending code and, when
    /// discoverable, the student holding it.
    pub async fn confirm_issue(
        &self,
        copies: &CopiesRepository,
        id: i32,
    ) -> AppResult<BookRequest> {
        let mut tx = self.pool.begin().await?;

        let request = self.lock_by_id(&mut tx, id).await?;
        if request.status != RequestStatus::Pending {
            return Err(AppError::StateConflict(format!(
                "Request {} already processed (status: {})",
                request.request_number, request.status
            )));
        }

        let locked = copies
            .lock_for_codes(&mut tx, request.book_id, &request.requested_copy_codes)
            .await?;
        let by_code: HashMap<&str, _> =
            locked.iter().map(|c| (c.copy_code.as_str(), c)).collect();

        let mut conflicts = Vec::new();
        for code in &request.requested_copy_codes {
            match by_code.get(code.as_str()) {
                None => conflicts.push(format!("{} (no such copy)", code)),
                Some(copy) if !copy.is_available => {
                    let holder = self
                        .holder_name(&mut tx, copy.current_request_id)
                        .await?;
                    conflicts.push(match holder {
                        Some(name) => format!("{} (held by {})", code, name),
                        None => format!("{} (not available)", code),
                    });
                }
                Some(_) => {}
            }
        }

        if !conflicts.is_empty() {
            // Dropping the transaction rolls everything back
            return Err(AppError::ConflictAvailability(format!(
                "Copies not available: {}",
                conflicts.join(", ")
            )));
        }

        for copy in &locked {
            copies.reserve(&mut tx, copy.id, request.id).await?;
        }

        let now = Utc::now();
        let updated = sqlx::query_as::<_, BookRequest>(
            r#"
            UPDATE book_requests
            SET status = 'issued', issue_date = $1, planned_return_date = $2,
                issued_copy_codes = requested_copy_codes
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(now)
        .bind(now + Duration::days(LOAN_TERM_DAYS))
        .bind(request.id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Mark returned: issued -> returned.
    ///
    /// When scanned codes are supplied they must equal the issued codes as
    /// a set (order and duplicates ignored), otherwise nothing is mutated.
    pub async fn mark_returned(
        &self,
        copies: &CopiesRepository,
        id: i32,
        scanned_codes: Option<&[String]>,
    ) -> AppResult<BookRequest> {
        let mut tx = self.pool.begin().await?;

        let request = self.lock_by_id(&mut tx, id).await?;
        match request.status {
            RequestStatus::Issued => {}
            RequestStatus::Pending => {
                return Err(AppError::StateConflict(format!(
                    "Request {} has not been issued",
                    request.request_number
                )));
            }
            RequestStatus::Returned => {
                return Err(AppError::StateConflict(format!(
                    "Request {} already returned",
                    request.request_number
                )));
            }
        }

        if let Some(scanned) = scanned_codes {
            let issued = request.issued_copy_codes.as_deref().unwrap_or(&[]);
            check_code_sets(issued, scanned)?;
        }

        let released = copies.release_for_request(&mut tx, request.id).await?;
        tracing::debug!(request_id = request.id, released, "released copies on return");

        let updated = sqlx::query_as::<_, BookRequest>(
            r#"
            UPDATE book_requests
            SET status = 'returned', actual_return_date = $1
            WHERE id = $2
            RETURNING *
            "#,
        )
        .bind(Utc::now())
        .bind(request.id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Reject: pending -> deleted. The row is removed permanently.
    pub async fn reject(&self, copies: &CopiesRepository, id: i32) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let request = self.lock_by_id(&mut tx, id).await?;
        if request.status != RequestStatus::Pending {
            return Err(AppError::StateConflict(format!(
                "Request {} already processed (status: {})",
                request.request_number, request.status
            )));
        }

        // Normally nothing is reserved before issue; release defensively
        let released = copies.release_for_request(&mut tx, request.id).await?;
        if released > 0 {
            tracing::warn!(
                request_id = request.id,
                released,
                "pending request held copies at rejection"
            );
        }

        sqlx::query("DELETE FROM book_requests WHERE id = $1")
            .bind(request.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Fetch a request under a row lock inside the given transaction
    async fn lock_by_id(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: i32,
    ) -> AppResult<BookRequest> {
        sqlx::query_as::<_, BookRequest>(
            "SELECT * FROM book_requests WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Request with id {} not found", id)))
    }

    /// Full name of the student behind the request holding a copy, if any
    async fn holder_name(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        request_id: Option<i32>,
    ) -> AppResult<Option<String>> {
        let Some(request_id) = request_id else {
            return Ok(None);
        };

        let name: Option<String> = sqlx::query_scalar(
            r#"
            SELECT s.full_name
            FROM book_requests r
            JOIN students s ON s.id = r.student_id
            WHERE r.id = $1
            "#,
        )
        .bind(request_id)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(name)
    }
}

/// Next daily-sequential number: one past the highest existing suffix for
/// the day, or 001 when the day has none
fn next_request_number(prefix: &str, last: Option<&str>) -> String {
    let next = last
        .and_then(|n| n.rsplit('-').next())
        .and_then(|suffix| suffix.parse::<u32>().ok())
        .map(|n| n + 1)
        .unwrap_or(1);

    format!("{}-{:03}", prefix, next)
}

/// Compare scanned codes with issued codes as sets. Reports codes still
/// missing and codes that were never part of the issue.
fn check_code_sets(issued: &[String], scanned: &[String]) -> AppResult<()> {
    let issued: BTreeSet<&str> = issued.iter().map(String::as_str).collect();
    let scanned: BTreeSet<&str> = scanned.iter().map(String::as_str).collect();

    if issued == scanned {
        return Ok(());
    }

    let missing: Vec<&str> = issued.difference(&scanned).copied().collect();
    let unexpected: Vec<&str> = scanned.difference(&issued).copied().collect();

    let mut parts = Vec::new();
    if !missing.is_empty() {
        parts.push(format!("missing: {}", missing.join(", ")));
    }
    if !unexpected.is_empty() {
        parts.push(format!("unexpected: {}", unexpected.join(", ")));
    }

    Err(AppError::Validation(format!(
        "Scanned codes do not match issued copies ({})",
        parts.join("; ")
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_number_of_the_day() {
        assert_eq!(next_request_number("231025", None), "231025-001");
    }

    #[test]
    fn test_number_increments() {
        assert_eq!(
            next_request_number("231025", Some("231025-001")),
            "231025-002"
        );
        assert_eq!(
            next_request_number("231025", Some("231025-099")),
            "231025-100"
        );
    }

    #[test]
    fn test_number_sequence_continues_past_999() {
        assert_eq!(
            next_request_number("231025", Some("231025-999")),
            "231025-1000"
        );
        assert_eq!(
            next_request_number("231025", Some("231025-1000")),
            "231025-1001"
        );
    }

    #[test]
    fn test_unparseable_suffix_restarts_sequence() {
        assert_eq!(
            next_request_number("231025", Some("231025-xyz")),
            "231025-001"
        );
    }

    #[test]
    fn test_code_sets_equal_regardless_of_order() {
        let issued = vec!["1-01".to_string(), "1-02".to_string()];
        let scanned = vec!["1-02".to_string(), "1-01".to_string()];
        assert!(check_code_sets(&issued, &scanned).is_ok());
    }

    #[test]
    fn test_code_sets_ignore_duplicates() {
        let issued = vec!["1-01".to_string(), "1-02".to_string()];
        let scanned = vec![
            "1-01".to_string(),
            "1-01".to_string(),
            "1-02".to_string(),
        ];
        assert!(check_code_sets(&issued, &scanned).is_ok());
    }

    #[test]
    fn test_code_sets_mismatch_names_codes() {
        let issued = vec!["1-01".to_string(), "1-02".to_string()];
        let scanned = vec!["1-01".to_string(), "1-03".to_string()];

        let err = check_code_sets(&issued, &scanned).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("1-02"));
        assert!(message.contains("1-03"));
    }
}
