//! Group endpoints: listing, eligible books and students

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::AppResult,
    models::{BookSummary, Group, Student},
};

/// List all groups
#[utoipa::path(
    get,
    path = "/groups",
    tag = "groups",
    responses(
        (status = 200, description = "List of groups", body = Vec<Group>)
    )
)]
pub async fn list_groups(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<Group>>> {
    let groups = state.services.catalog.list_groups().await?;
    Ok(Json(groups))
}

/// List books a group may borrow, with available copy counts.
/// Only books with at least one available copy are returned.
#[utoipa::path(
    get,
    path = "/groups/{id}/books",
    tag = "groups",
    params(
        ("id" = i32, Path, description = "Group ID")
    ),
    responses(
        (status = 200, description = "Eligible books with availability", body = Vec<BookSummary>),
        (status = 404, description = "Group not found")
    )
)]
pub async fn list_group_books(
    State(state): State<crate::AppState>,
    Path(group_id): Path<i32>,
) -> AppResult<Json<Vec<BookSummary>>> {
    let books = state.services.catalog.list_eligible_books(group_id).await?;
    Ok(Json(books))
}

/// List all students of a group
#[utoipa::path(
    get,
    path = "/groups/{id}/students",
    tag = "groups",
    params(
        ("id" = i32, Path, description = "Group ID")
    ),
    responses(
        (status = 200, description = "Students of the group", body = Vec<Student>),
        (status = 404, description = "Group not found")
    )
)]
pub async fn list_group_students(
    State(state): State<crate::AppState>,
    Path(group_id): Path<i32>,
) -> AppResult<Json<Vec<Student>>> {
    let students = state.services.catalog.group_students(group_id).await?;
    Ok(Json(students))
}
