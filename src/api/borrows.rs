//! Borrow ledger endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{error::AppResult, models::borrow::BorrowDetails};

use super::AuthenticatedUser;

/// Borrow request
#[derive(Deserialize, ToSchema)]
pub struct CreateBorrowRequest {
    /// Book ID to borrow for the calling user
    pub book_id: i32,
}

/// Borrow response with calculated due date
#[derive(Serialize, ToSchema)]
pub struct BorrowResponse {
    /// Borrow record ID
    pub id: i32,
    /// Due date (ISO 8601 format)
    pub due_date: DateTime<Utc>,
    /// Status message
    pub message: String,
}

/// Return response with derived overdue figures
#[derive(Serialize, ToSchema)]
pub struct ReturnResponse {
    /// Borrow record ID
    pub id: i32,
    /// Return timestamp
    pub return_date: DateTime<Utc>,
    /// Whether the return happened past the due date
    pub is_overdue: bool,
    /// Whole days past due at return time
    pub overdue_days: i64,
    /// Status message
    pub message: String,
}

/// History query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct HistoryQuery {
    /// Maximum number of records to return (default: 50, max: 1000)
    pub limit: Option<i64>,
}

/// Borrow a book for the authenticated user
#[utoipa::path(
    post,
    path = "/borrows",
    tag = "borrows",
    security(("bearer_auth" = [])),
    request_body = CreateBorrowRequest,
    responses(
        (status = 201, description = "Borrow record created", body = BorrowResponse),
        (status = 404, description = "Book not found"),
        (status = 409, description = "Book already borrowed by this user")
    )
)]
pub async fn create_borrow(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateBorrowRequest>,
) -> AppResult<(StatusCode, Json<BorrowResponse>)> {
    let record = state
        .services
        .borrows
        .borrow(claims.user_id, request.book_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(BorrowResponse {
            id: record.id,
            due_date: record.due_date,
            message: "Book borrowed successfully".to_string(),
        }),
    ))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/borrows/{id}/return",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Borrow record ID")
    ),
    responses(
        (status = 200, description = "Book returned", body = ReturnResponse),
        (status = 403, description = "Record belongs to another user"),
        (status = 404, description = "Borrow record not found"),
        (status = 409, description = "Already returned")
    )
)]
pub async fn return_borrow(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(record_id): Path<i32>,
) -> AppResult<Json<ReturnResponse>> {
    let returned = state
        .services
        .borrows
        .return_borrow(claims.user_id, record_id)
        .await?;

    let message = if returned.is_overdue {
        format!("Book returned {} day(s) late", returned.overdue_days)
    } else {
        "Book returned on time".to_string()
    };

    Ok(Json(ReturnResponse {
        id: returned.record.id,
        return_date: returned.record.return_date.unwrap_or_else(Utc::now),
        is_overdue: returned.is_overdue,
        overdue_days: returned.overdue_days,
        message,
    }))
}

/// Get open borrows for a user
#[utoipa::path(
    get,
    path = "/users/{id}/borrows",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User's open borrows", body = Vec<BorrowDetails>),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_borrows(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(user_id): Path<i32>,
) -> AppResult<Json<Vec<BorrowDetails>>> {
    claims.require_self_or_admin(user_id)?;

    let borrows = state.services.borrows.list_open(user_id).await?;
    Ok(Json(borrows))
}

/// Get borrow history for a user
#[utoipa::path(
    get,
    path = "/users/{id}/borrows/history",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "User ID"),
        HistoryQuery
    ),
    responses(
        (status = 200, description = "User's returned borrows, newest first", body = Vec<BorrowDetails>),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_history(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(user_id): Path<i32>,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<Vec<BorrowDetails>>> {
    claims.require_self_or_admin(user_id)?;

    let limit = query.limit.unwrap_or(50);
    let history = state.services.borrows.list_history(user_id, limit).await?;
    Ok(Json(history))
}

/// List the full borrow ledger
#[utoipa::path(
    get,
    path = "/borrows",
    tag = "borrows",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All borrow records", body = Vec<BorrowDetails>),
        (status = 403, description = "Administrator privileges required")
    )
)]
pub async fn list_borrows(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<BorrowDetails>>> {
    claims.require_admin()?;

    let records = state.services.borrows.list_all().await?;
    Ok(Json(records))
}
