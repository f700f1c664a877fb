//! Book catalog endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::book::{BookDetails, BookQuery, CreateBook, UpdateBook},
};

use super::AuthenticatedUser;

/// Delete response
#[derive(Serialize, ToSchema)]
pub struct DeleteResponse {
    /// Status message
    pub message: String,
}

/// List books with optional search and category filter
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    params(BookQuery),
    responses(
        (status = 200, description = "Matching books", body = Vec<BookDetails>)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<Vec<BookDetails>>> {
    let books = state.services.catalog.search_books(&query).await?;
    Ok(Json(books))
}

/// Get a single book
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = BookDetails),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<BookDetails>> {
    let book = state.services.catalog.get_book(id).await?;
    Ok(Json(book))
}

/// Create a new book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = BookDetails),
        (status = 400, description = "Invalid request"),
        (status = 403, description = "Administrator privileges required")
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateBook>,
) -> AppResult<(StatusCode, Json<BookDetails>)> {
    claims.require_admin()?;

    let book = state.services.catalog.create_book(request).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Update a book
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = BookDetails),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<UpdateBook>,
) -> AppResult<Json<BookDetails>> {
    claims.require_admin()?;

    let book = state.services.catalog.update_book(id, request).await?;
    Ok(Json(book))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book deleted", body = DeleteResponse),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<DeleteResponse>> {
    claims.require_admin()?;

    state.services.catalog.delete_book(id).await?;
    Ok(Json(DeleteResponse {
        message: format!("Book {} deleted", id),
    }))
}
