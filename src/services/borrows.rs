//! Borrow ledger service

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::borrow::{BorrowDetails, BorrowRecord, ReturnedBorrow},
    repository::Repository,
};

#[derive(Clone)]
pub struct BorrowsService {
    repository: Repository,
}

impl BorrowsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Borrow a book for `user_id`. Fails with `AlreadyBorrowed` when the
    /// user already holds an open record for this book.
    pub async fn borrow(&self, user_id: i32, book_id: i32) -> AppResult<BorrowRecord> {
        // Verify both ends exist so a missing id surfaces as NotFound
        // rather than a foreign-key error
        self.repository.users.get_by_id(user_id).await?;
        self.repository.books.get_by_id(book_id).await?;

        let record = self.repository.borrows.create(user_id, book_id).await?;
        tracing::info!(
            "Ledger: user {} borrowed book {} (due {})",
            user_id,
            book_id,
            record.due_date
        );
        Ok(record)
    }

    /// Return a borrow record on behalf of `caller_user_id`. The owner check
    /// runs before the returned-state check.
    pub async fn return_borrow(
        &self,
        caller_user_id: i32,
        record_id: i32,
    ) -> AppResult<ReturnedBorrow> {
        let record = self.repository.borrows.get_by_id(record_id).await?;

        if record.user_id != caller_user_id {
            return Err(AppError::NotOwner);
        }
        if record.return_date.is_some() {
            return Err(AppError::AlreadyReturned);
        }

        let returned = self.repository.borrows.mark_returned(record_id).await?;

        let now = returned.return_date.unwrap_or_else(Utc::now);
        let is_overdue = now > returned.due_date;
        let overdue_days = (now.date_naive() - returned.due_date.date_naive())
            .num_days()
            .max(0);

        tracing::info!(
            "Ledger: user {} returned record {} (overdue: {})",
            caller_user_id,
            record_id,
            is_overdue
        );

        Ok(ReturnedBorrow {
            record: returned,
            is_overdue,
            overdue_days,
        })
    }

    /// Open records for a user
    pub async fn list_open(&self, user_id: i32) -> AppResult<Vec<BorrowDetails>> {
        self.repository.users.get_by_id(user_id).await?;
        self.repository.borrows.list_open(user_id).await
    }

    /// Returned records for a user, most recent first
    pub async fn list_history(&self, user_id: i32, limit: i64) -> AppResult<Vec<BorrowDetails>> {
        self.repository.users.get_by_id(user_id).await?;
        let limit = limit.clamp(1, 1000);
        self.repository.borrows.list_history(user_id, limit).await
    }

    /// The whole ledger, newest borrow first
    pub async fn list_all(&self) -> AppResult<Vec<BorrowDetails>> {
        self.repository.borrows.list_all().await
    }
}
