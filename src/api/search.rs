//! Interactive word-prefix search endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    error::AppResult,
    models::{BookSummary, StudentWithGroup},
};

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StudentSearchQuery {
    /// Search text; matches the start of any word of the full name
    pub q: String,
    /// Narrow the search to one group
    pub group_id: Option<i32>,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookSearchQuery {
    /// Search text; matches the start of any word of title or author
    pub q: String,
    /// Group whose eligible books are searched
    pub group_id: i32,
}

/// Search students by name prefix
#[utoipa::path(
    get,
    path = "/search/students",
    tag = "search",
    params(StudentSearchQuery),
    responses(
        (status = 200, description = "Matching students (capped)", body = Vec<StudentWithGroup>)
    )
)]
pub async fn search_students(
    State(state): State<crate::AppState>,
    Query(query): Query<StudentSearchQuery>,
) -> AppResult<Json<Vec<StudentWithGroup>>> {
    let students = state
        .services
        .catalog
        .search_students(&query.q, query.group_id)
        .await?;

    Ok(Json(students))
}

/// Search a group's eligible books by title or author prefix
#[utoipa::path(
    get,
    path = "/search/books",
    tag = "search",
    params(BookSearchQuery),
    responses(
        (status = 200, description = "Matching books (capped)", body = Vec<BookSummary>),
        (status = 404, description = "Group not found")
    )
)]
pub async fn search_books(
    State(state): State<crate::AppState>,
    Query(query): Query<BookSearchQuery>,
) -> AppResult<Json<Vec<BookSummary>>> {
    let books = state
        .services
        .catalog
        .search_books(&query.q, query.group_id)
        .await?;

    Ok(Json(books))
}
