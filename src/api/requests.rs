//! Checkout request endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::{AppError, AppResult},
    models::{
        request::{ReturnRequest, SubmitRequest},
        BookRequest, RequestDetails,
    },
};

use super::Operator;

/// Response for a created or transitioned request
#[derive(Serialize, ToSchema)]
pub struct RequestResponse {
    /// The request in its new state
    pub request: BookRequest,
    /// Status message
    pub message: String,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FindQuery {
    /// Request number (optionally `#`-prefixed) or numeric id
    pub query: String,
}

/// Submit a new checkout request (student-facing)
#[utoipa::path(
    post,
    path = "/requests",
    tag = "requests",
    request_body = SubmitRequest,
    responses(
        (status = 201, description = "Request created", body = RequestResponse),
        (status = 400, description = "Bad quantity or copy codes"),
        (status = 404, description = "Student, book or copy not found"),
        (status = 409, description = "A requested copy is unavailable"),
        (status = 422, description = "Book not intended for the student's group")
    )
)]
pub async fn submit_request(
    State(state): State<crate::AppState>,
    Json(payload): Json<SubmitRequest>,
) -> AppResult<(StatusCode, Json<RequestResponse>)> {
    let request = state.services.requests.submit(payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(RequestResponse {
            message: format!("Request {} submitted, awaiting confirmation", request.request_number),
            request,
        }),
    ))
}

/// List all requests, newest first (librarian journal)
#[utoipa::path(
    get,
    path = "/requests",
    tag = "requests",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All requests with details", body = Vec<RequestDetails>),
        (status = 401, description = "Not an operator")
    )
)]
pub async fn list_requests(
    State(state): State<crate::AppState>,
    _operator: Operator,
) -> AppResult<Json<Vec<RequestDetails>>> {
    let requests = state.services.requests.list().await?;
    Ok(Json(requests))
}

/// Find a request by number or id
#[utoipa::path(
    get,
    path = "/requests/find",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(FindQuery),
    responses(
        (status = 200, description = "Request found", body = BookRequest),
        (status = 404, description = "No such request")
    )
)]
pub async fn find_request(
    State(state): State<crate::AppState>,
    _operator: Operator,
    Query(query): Query<FindQuery>,
) -> AppResult<Json<BookRequest>> {
    let request = state.services.requests.find(&query.query).await?;
    Ok(Json(request))
}

/// Confirm physical handout of the requested copies
#[utoipa::path(
    post,
    path = "/requests/{id}/confirm",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Request ID")
    ),
    responses(
        (status = 200, description = "Request issued", body = RequestResponse),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Not pending, or a copy is held by another request")
    )
)]
pub async fn confirm_issue(
    State(state): State<crate::AppState>,
    _operator: Operator,
    Path(request_id): Path<i32>,
) -> AppResult<Json<RequestResponse>> {
    let request = state.services.requests.confirm_issue(request_id).await?;

    Ok(Json(RequestResponse {
        message: format!("Request {} issued", request.request_number),
        request,
    }))
}

/// Mark an issued request as returned
#[utoipa::path(
    post,
    path = "/requests/{id}/return",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Request ID")
    ),
    request_body = ReturnRequest,
    responses(
        (status = 200, description = "Request returned", body = RequestResponse),
        (status = 400, description = "Scanned codes do not match issued copies"),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Request was not issued")
    )
)]
pub async fn mark_returned(
    State(state): State<crate::AppState>,
    _operator: Operator,
    Path(request_id): Path<i32>,
    payload: Result<Json<ReturnRequest>, JsonRejection>,
) -> AppResult<Json<RequestResponse>> {
    // A request without a JSON body is a codeless return; a body that
    // fails to parse must not silently skip the reconciliation.
    let scanned = match payload {
        Ok(Json(p)) => p.scanned_codes,
        Err(JsonRejection::MissingJsonContentType(_)) => None,
        Err(rejection) => {
            return Err(AppError::Validation(rejection.body_text()));
        }
    };
    let request = state
        .services
        .requests
        .mark_returned(request_id, scanned.as_deref())
        .await?;

    Ok(Json(RequestResponse {
        message: format!("Request {} returned", request.request_number),
        request,
    }))
}

/// Reject a pending request (deletes it)
#[utoipa::path(
    post,
    path = "/requests/{id}/reject",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Request ID")
    ),
    responses(
        (status = 204, description = "Request rejected and deleted"),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Request already processed")
    )
)]
pub async fn reject_request(
    State(state): State<crate::AppState>,
    _operator: Operator,
    Path(request_id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.requests.reject(request_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
