//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, borrows, health, references, stats, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Libris API",
        version = "1.0.0",
        description = "Library Management System REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        // References
        references::list_authors,
        references::list_categories,
        references::list_publishers,
        references::delete_author,
        references::delete_category,
        references::delete_publisher,
        // Users
        users::list_users,
        users::get_user,
        users::create_user,
        // Borrows
        borrows::create_borrow,
        borrows::return_borrow,
        borrows::get_user_borrows,
        borrows::get_user_history,
        borrows::list_borrows,
        // Stats
        stats::get_dashboard,
    ),
    components(
        schemas(
            // Books
            crate::models::book::BookDetails,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            books::DeleteResponse,
            // References
            crate::models::reference::Author,
            crate::models::reference::Category,
            crate::models::reference::Publisher,
            crate::models::reference::AuthorBookCount,
            crate::models::reference::CategoryBookCount,
            references::CascadeDeleteResponse,
            // Users
            crate::models::user::User,
            crate::models::user::CreateUser,
            // Borrows
            crate::models::borrow::BorrowRecord,
            crate::models::borrow::BorrowDetails,
            borrows::CreateBorrowRequest,
            borrows::BorrowResponse,
            borrows::ReturnResponse,
            // Stats
            stats::DashboardStats,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "books", description = "Book catalog management"),
        (name = "references", description = "Authors, categories and publishers"),
        (name = "users", description = "User management"),
        (name = "borrows", description = "Borrow ledger"),
        (name = "stats", description = "Statistics")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
