//! Author, category and publisher endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::reference::{AuthorBookCount, Category, Publisher},
};

use super::AuthenticatedUser;

/// Cascade delete response
#[derive(Serialize, ToSchema)]
pub struct CascadeDeleteResponse {
    /// Status message
    pub message: String,
    /// Number of books removed by the cascade
    pub books_deleted: u64,
}

/// List authors with book counts
#[utoipa::path(
    get,
    path = "/authors",
    tag = "references",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All authors", body = Vec<AuthorBookCount>)
    )
)]
pub async fn list_authors(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<AuthorBookCount>>> {
    let authors = state.services.catalog.list_authors().await?;
    Ok(Json(authors))
}

/// List categories
#[utoipa::path(
    get,
    path = "/categories",
    tag = "references",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All categories", body = Vec<Category>)
    )
)]
pub async fn list_categories(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Category>>> {
    let categories = state.services.catalog.list_categories().await?;
    Ok(Json(categories))
}

/// List publishers
#[utoipa::path(
    get,
    path = "/publishers",
    tag = "references",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All publishers", body = Vec<Publisher>)
    )
)]
pub async fn list_publishers(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Publisher>>> {
    let publishers = state.services.catalog.list_publishers().await?;
    Ok(Json(publishers))
}

/// Delete an author and cascade to their books
#[utoipa::path(
    delete,
    path = "/authors/{id}",
    tag = "references",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Author ID")
    ),
    responses(
        (status = 200, description = "Author deleted", body = CascadeDeleteResponse),
        (status = 404, description = "Author not found")
    )
)]
pub async fn delete_author(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<CascadeDeleteResponse>> {
    claims.require_admin()?;

    let books_deleted = state.services.catalog.delete_author(id).await?;
    Ok(Json(CascadeDeleteResponse {
        message: format!("Author {} deleted", id),
        books_deleted,
    }))
}

/// Delete a category and cascade to its books
#[utoipa::path(
    delete,
    path = "/categories/{id}",
    tag = "references",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category deleted", body = CascadeDeleteResponse),
        (status = 404, description = "Category not found")
    )
)]
pub async fn delete_category(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<CascadeDeleteResponse>> {
    claims.require_admin()?;

    let books_deleted = state.services.catalog.delete_category(id).await?;
    Ok(Json(CascadeDeleteResponse {
        message: format!("Category {} deleted", id),
        books_deleted,
    }))
}

/// Delete a publisher and cascade to its books
#[utoipa::path(
    delete,
    path = "/publishers/{id}",
    tag = "references",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Publisher ID")
    ),
    responses(
        (status = 200, description = "Publisher deleted", body = CascadeDeleteResponse),
        (status = 404, description = "Publisher not found")
    )
)]
pub async fn delete_publisher(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<CascadeDeleteResponse>> {
    claims.require_admin()?;

    let books_deleted = state.services.catalog.delete_publisher(id).await?;
    Ok(Json(CascadeDeleteResponse {
        message: format!("Publisher {} deleted", id),
        books_deleted,
    }))
}
