//! Statistics endpoints

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{
    book::BookDetails,
    borrow::BorrowDetails,
    reference::{AuthorBookCount, CategoryBookCount},
};

use super::AuthenticatedUser;

/// Dashboard statistics response
#[derive(Serialize, ToSchema)]
pub struct DashboardStats {
    /// Total number of books
    pub total_books: i64,
    /// Total number of authors
    pub total_authors: i64,
    /// Total number of categories
    pub total_categories: i64,
    /// Total number of publishers
    pub total_publishers: i64,
    /// Total number of users
    pub total_users: i64,
    /// Open borrow records
    pub open_borrows: i64,
    /// Returned borrow records
    pub returned_borrows: i64,
    /// Open records past their due date
    pub overdue_borrows: i64,
    /// Records borrowed in the last 30 days
    pub borrows_last_30_days: i64,
    /// Mean borrow duration of returned records, in days (one decimal)
    pub average_borrow_days: f64,
    /// Latest 5 books by descending identifier
    pub latest_books: Vec<BookDetails>,
    /// 5 most recent open borrows by descending borrow date
    pub recent_borrows: Vec<BorrowDetails>,
    /// Top 5 authors by book count
    pub top_authors: Vec<AuthorBookCount>,
    /// Book counts for every category, descending
    pub category_counts: Vec<CategoryBookCount>,
    /// Set when aggregation degraded; all figures are zero-filled then
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DashboardStats {
    /// Zero-filled response reported when the underlying store fails
    pub fn degraded(message: String) -> Self {
        Self {
            total_books: 0,
            total_authors: 0,
            total_categories: 0,
            total_publishers: 0,
            total_users: 0,
            open_borrows: 0,
            returned_borrows: 0,
            overdue_borrows: 0,
            borrows_last_30_days: 0,
            average_borrow_days: 0.0,
            latest_books: Vec::new(),
            recent_borrows: Vec::new(),
            top_authors: Vec::new(),
            category_counts: Vec::new(),
            error: Some(message),
        }
    }
}

/// Get dashboard statistics
#[utoipa::path(
    get,
    path = "/stats/dashboard",
    tag = "stats",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Dashboard statistics (zero-filled with an error field when the store is unavailable)", body = DashboardStats)
    )
)]
pub async fn get_dashboard(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> Json<DashboardStats> {
    Json(state.services.stats.dashboard().await)
}
