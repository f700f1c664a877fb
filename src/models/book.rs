//! Book model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Book model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author_id: i32,
    pub category_id: i32,
    pub publisher_id: i32,
    pub publish_date: Option<NaiveDate>,
    pub isbn: Option<String>,
}

/// Book with resolved reference names for display
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookDetails {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub category: String,
    pub publisher: String,
    pub publish_date: Option<NaiveDate>,
    pub isbn: Option<String>,
}

/// Create book request. Author/category/publisher are given by name and
/// resolved with get-or-create semantics.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "Author name must not be empty"))]
    pub author: String,
    #[validate(length(min = 1, message = "Category name must not be empty"))]
    pub category: String,
    #[validate(length(min = 1, message = "Publisher name must not be empty"))]
    pub publisher: String,
    pub publish_date: Option<NaiveDate>,
    #[validate(length(max = 13, message = "ISBN must be at most 13 characters"))]
    pub isbn: Option<String>,
}

/// Update book request; absent fields keep their current value
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Author name must not be empty"))]
    pub author: Option<String>,
    #[validate(length(min = 1, message = "Category name must not be empty"))]
    pub category: Option<String>,
    #[validate(length(min = 1, message = "Publisher name must not be empty"))]
    pub publisher: Option<String>,
    pub publish_date: Option<NaiveDate>,
    #[validate(length(max = 13, message = "ISBN must be at most 13 characters"))]
    pub isbn: Option<String>,
}

/// Book query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct BookQuery {
    /// Case-insensitive substring match across title, author name and ISBN
    pub search: Option<String>,
    /// Exact category name filter
    pub category: Option<String>,
}
