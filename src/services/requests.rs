//! Request lifecycle service: submission, issue, return and rejection

use std::collections::HashSet;

use validator::Validate;

use crate::{
    eligibility,
    error::{AppError, AppResult},
    models::{request::SubmitRequest, BookRequest, RequestDetails},
    repository::Repository,
};

#[derive(Clone)]
pub struct RequestsService {
    repository: Repository,
}

impl RequestsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List all requests with details, newest first
    pub async fn list(&self) -> AppResult<Vec<RequestDetails>> {
        self.repository.requests.list_details().await
    }

    /// Submit a new request on behalf of a student.
    ///
    /// Validation order: student, book, quantity, code count, eligibility,
    /// code resolution, availability. Any failure leaves no trace. The
    /// created request is pending and holds no copies yet; two students may
    /// submit requests naming the same copy code, and the conflict is
    /// settled at confirm time.
    pub async fn submit(&self, submit: SubmitRequest) -> AppResult<BookRequest> {
        let student = self.repository.students.get_by_id(submit.student_id).await?;
        let book = self.repository.books.get_by_id(submit.book_id).await?;

        submit
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if submit.copy_codes.len() != submit.quantity as usize {
            return Err(AppError::Validation(format!(
                "Expected {} copy codes, got {}",
                submit.quantity,
                submit.copy_codes.len()
            )));
        }

        let mut seen = HashSet::new();
        for code in &submit.copy_codes {
            if !seen.insert(code.as_str()) {
                return Err(AppError::Validation(format!(
                    "Copy code {} listed more than once",
                    code
                )));
            }
        }

        let group = self.repository.groups.get_by_id(student.group_id).await?;
        if !eligibility::is_eligible(book.language, book.course, &group) {
            return Err(AppError::Ineligible(format!(
                "Book \"{}\" is not intended for group {}",
                book.name, group.name
            )));
        }

        let available = self.repository.copies.available_count(book.id).await?;
        if i64::from(submit.quantity) > available {
            return Err(AppError::ConflictAvailability(format!(
                "Only {} copies of \"{}\" are available",
                available, book.name
            )));
        }

        for code in &submit.copy_codes {
            let copy = self.repository.copies.find_for_book(book.id, code).await?;
            if !copy.is_available {
                return Err(AppError::ConflictAvailability(format!(
                    "Copy {} is not available",
                    code
                )));
            }
        }

        let request = self
            .repository
            .requests
            .create(student.id, book.id, submit.quantity, &submit.copy_codes)
            .await?;

        tracing::info!(
            request_number = %request.request_number,
            student_id = student.id,
            book_id = book.id,
            quantity = submit.quantity,
            "request submitted"
        );

        Ok(request)
    }

    /// Confirm physical handout of the requested copies
    pub async fn confirm_issue(&self, request_id: i32) -> AppResult<BookRequest> {
        let request = self
            .repository
            .requests
            .confirm_issue(&self.repository.copies, request_id)
            .await?;

        tracing::info!(request_number = %request.request_number, "request issued");
        Ok(request)
    }

    /// Mark an issued request returned, releasing its copies
    pub async fn mark_returned(
        &self,
        request_id: i32,
        scanned_codes: Option<&[String]>,
    ) -> AppResult<BookRequest> {
        let request = self
            .repository
            .requests
            .mark_returned(&self.repository.copies, request_id, scanned_codes)
            .await?;

        tracing::info!(request_number = %request.request_number, "request returned");
        Ok(request)
    }

    /// Reject a pending request, deleting it permanently
    pub async fn reject(&self, request_id: i32) -> AppResult<()> {
        self.repository
            .requests
            .reject(&self.repository.copies, request_id)
            .await?;

        tracing::info!(request_id, "request rejected");
        Ok(())
    }

    /// Find a request by its human-facing number or internal numeric id.
    /// The number may carry a leading `#`.
    pub async fn find(&self, query: &str) -> AppResult<BookRequest> {
        let trimmed = query.trim().trim_start_matches('#');
        if trimmed.is_empty() {
            return Err(AppError::Validation("Empty request lookup".to_string()));
        }

        if let Some(request) = self.repository.requests.get_by_number(trimmed).await? {
            return Ok(request);
        }

        if let Ok(id) = trimmed.parse::<i32>() {
            return self.repository.requests.get_by_id(id).await;
        }

        Err(AppError::NotFound(format!("Request {} not found", query)))
    }
}
