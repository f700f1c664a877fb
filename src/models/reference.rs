//! Reference data models: authors, categories, publishers
//!
//! All three are flat name tables with a one-to-many relation into books.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Author {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Category {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Publisher {
    pub id: i32,
    pub name: String,
}

/// Author with its number of books, for listings and the dashboard
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AuthorBookCount {
    pub id: i32,
    pub name: String,
    pub book_count: i64,
}

/// Category with its number of books
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CategoryBookCount {
    pub id: i32,
    pub name: String,
    pub book_count: i64,
}
