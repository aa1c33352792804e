//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{groups, health, requests, search};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Kitaphana API",
        version = "0.3.0",
        description = "College Textbook Checkout REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Groups
        groups::list_groups,
        groups::list_group_books,
        groups::list_group_students,
        // Search
        search::search_students,
        search::search_books,
        // Requests
        requests::submit_request,
        requests::list_requests,
        requests::find_request,
        requests::confirm_issue,
        requests::mark_returned,
        requests::reject_request,
    ),
    components(
        schemas(
            // Groups
            crate::models::group::Group,
            crate::models::group::GroupLang,
            // Students
            crate::models::student::Student,
            crate::models::student::StudentWithGroup,
            // Books
            crate::models::book::Book,
            crate::models::book::BookLang,
            crate::models::book::BookSummary,
            // Copies
            crate::models::copy::BookCopy,
            // Requests
            crate::models::request::BookRequest,
            crate::models::request::RequestDetails,
            crate::models::request::RequestStatus,
            crate::models::request::SubmitRequest,
            crate::models::request::ReturnRequest,
            requests::RequestResponse,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "groups", description = "Groups, eligible books and students"),
        (name = "search", description = "Interactive word-prefix search"),
        (name = "requests", description = "Checkout request lifecycle")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
