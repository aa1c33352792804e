//! Book checkout request model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Loan term stamped at issue time
pub const LOAN_TERM_DAYS: i64 = 14;

/// Lifecycle status of a checkout request.
///
/// Rejected requests are deleted outright, not stored as a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "request_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Issued,
    Returned,
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Issued => "issued",
            RequestStatus::Returned => "returned",
        };
        write!(f, "{}", label)
    }
}

/// Checkout request model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookRequest {
    pub id: i32,
    /// Human-facing daily-sequential number, e.g. "231025-001"
    pub request_number: String,
    pub student_id: i32,
    pub book_id: i32,
    pub quantity: i32,
    pub status: RequestStatus,
    pub request_date: DateTime<Utc>,
    pub issue_date: Option<DateTime<Utc>>,
    pub planned_return_date: Option<DateTime<Utc>>,
    pub actual_return_date: Option<DateTime<Utc>>,
    /// Codes the student asked to attach, set at submission
    pub requested_copy_codes: Vec<String>,
    /// Codes actually handed out, frozen at issue time so history
    /// survives copy release
    pub issued_copy_codes: Option<Vec<String>>,
}

/// Request with student/book names joined in, for the librarian journal
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RequestDetails {
    pub id: i32,
    pub request_number: String,
    pub student_id: i32,
    pub student_name: String,
    pub group_name: String,
    pub book_id: i32,
    pub book_name: String,
    pub quantity: i32,
    pub status: RequestStatus,
    pub request_date: DateTime<Utc>,
    pub issue_date: Option<DateTime<Utc>>,
    pub planned_return_date: Option<DateTime<Utc>>,
    pub actual_return_date: Option<DateTime<Utc>>,
    pub requested_copy_codes: Vec<String>,
    pub issued_copy_codes: Option<Vec<String>>,
}

/// Submit request payload
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SubmitRequest {
    pub student_id: i32,
    pub book_id: i32,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
    /// Copy codes to attach; length must equal quantity
    pub copy_codes: Vec<String>,
}

/// Return payload. When scanned codes are supplied they must match the
/// issued codes exactly as a set.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ReturnRequest {
    pub scanned_codes: Option<Vec<String>>,
}
