//! Borrow ledger repository
//!
//! One row per borrow event. The at-most-one-open-record invariant per
//! (user, book) is enforced by a partial unique index, so creation is a
//! single atomic conditional insert rather than a read-then-write check.

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::borrow::{BorrowDetails, BorrowRecord},
};

const BORROW_DETAILS_SELECT: &str = r#"
    SELECT r.id, r.user_id, r.book_id, r.borrow_date, r.due_date, r.return_date,
           u.username, b.title as book_title, a.name as author_name
    FROM borrow_records r
    JOIN users u ON r.user_id = u.id
    JOIN books b ON r.book_id = b.id
    JOIN authors a ON b.author_id = a.id
"#;

fn details_from_row(row: &sqlx::postgres::PgRow, now: DateTime<Utc>) -> BorrowDetails {
    let record = BorrowRecord {
        id: row.get("id"),
        user_id: row.get("user_id"),
        book_id: row.get("book_id"),
        borrow_date: row.get("borrow_date"),
        due_date: row.get("due_date"),
        return_date: row.get("return_date"),
    };
    BorrowDetails {
        is_overdue: record.is_overdue_at(now),
        overdue_days: record.overdue_days_at(now),
        id: record.id,
        user_id: record.user_id,
        username: row.get("username"),
        book_id: record.book_id,
        book_title: row.get("book_title"),
        author_name: row.get("author_name"),
        borrow_date: record.borrow_date,
        due_date: record.due_date,
        return_date: record.return_date,
    }
}

#[derive(Clone)]
pub struct BorrowsRepository {
    pool: Pool<Postgres>,
}

impl BorrowsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get borrow record by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<BorrowRecord> {
        sqlx::query_as::<_, BorrowRecord>("SELECT * FROM borrow_records WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Borrow record with id {} not found", id)))
    }

    /// Create an open borrow record. The insert is conditional on the partial
    /// unique open-record index; a conflicting open record yields
    /// `AlreadyBorrowed` without a separate existence check.
    pub async fn create(&self, user_id: i32, book_id: i32) -> AppResult<BorrowRecord> {
        let now = Utc::now();
        let due_date = BorrowRecord::due_date_for(now);

        let record = sqlx::query_as::<_, BorrowRecord>(
            r#"
            INSERT INTO borrow_records (user_id, book_id, borrow_date, due_date)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, book_id) WHERE return_date IS NULL DO NOTHING
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .bind(now)
        .bind(due_date)
        .fetch_optional(&self.pool)
        .await?;

        record.ok_or(AppError::AlreadyBorrowed)
    }

    /// Stamp the return timestamp on an open record. The guard on
    /// `return_date IS NULL` makes a concurrent double return lose cleanly.
    pub async fn mark_returned(&self, id: i32) -> AppResult<BorrowRecord> {
        let now = Utc::now();

        let record = sqlx::query_as::<_, BorrowRecord>(
            r#"
            UPDATE borrow_records
            SET return_date = $2
            WHERE id = $1 AND return_date IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        record.ok_or(AppError::AlreadyReturned)
    }

    /// Open records for a user, soonest due first
    pub async fn list_open(&self, user_id: i32) -> AppResult<Vec<BorrowDetails>> {
        let query = format!(
            "{} WHERE r.user_id = $1 AND r.return_date IS NULL ORDER BY r.due_date, r.id",
            BORROW_DETAILS_SELECT
        );
        let rows = sqlx::query(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        let now = Utc::now();
        Ok(rows.iter().map(|row| details_from_row(row, now)).collect())
    }

    /// Returned records for a user, most recently returned first
    pub async fn list_history(&self, user_id: i32, limit: i64) -> AppResult<Vec<BorrowDetails>> {
        let query = format!(
            "{} WHERE r.user_id = $1 AND r.return_date IS NOT NULL
             ORDER BY r.return_date DESC, r.id DESC LIMIT $2",
            BORROW_DETAILS_SELECT
        );
        let rows = sqlx::query(&query)
            .bind(user_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        let now = Utc::now();
        Ok(rows.iter().map(|row| details_from_row(row, now)).collect())
    }

    /// Every record in the ledger, newest borrow first
    pub async fn list_all(&self) -> AppResult<Vec<BorrowDetails>> {
        let query = format!(
            "{} ORDER BY r.borrow_date DESC, r.id DESC",
            BORROW_DETAILS_SELECT
        );
        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;

        let now = Utc::now();
        Ok(rows.iter().map(|row| details_from_row(row, now)).collect())
    }

    /// Most recent open records, newest borrow first
    pub async fn recent_open(&self, limit: i64) -> AppResult<Vec<BorrowDetails>> {
        let query = format!(
            "{} WHERE r.return_date IS NULL ORDER BY r.borrow_date DESC, r.id DESC LIMIT $1",
            BORROW_DETAILS_SELECT
        );
        let rows = sqlx::query(&query)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        let now = Utc::now();
        Ok(rows.iter().map(|row| details_from_row(row, now)).collect())
    }

    /// Count open records
    pub async fn count_open(&self) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM borrow_records WHERE return_date IS NULL")
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// Count returned records
    pub async fn count_returned(&self) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM borrow_records WHERE return_date IS NOT NULL")
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// Count open records whose due date has passed
    pub async fn count_overdue(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM borrow_records WHERE return_date IS NULL AND due_date < NOW()",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Count records borrowed within the trailing window
    pub async fn count_borrowed_since(&self, cutoff: DateTime<Utc>) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM borrow_records WHERE borrow_date >= $1")
                .bind(cutoff)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// Per-record borrow durations of returned records, in whole days
    /// truncated toward zero.
    pub async fn returned_durations_days(&self) -> AppResult<Vec<i64>> {
        let durations: Vec<i64> = sqlx::query_scalar(
            r#"
            SELECT FLOOR(EXTRACT(EPOCH FROM (return_date - borrow_date)) / 86400)::BIGINT
            FROM borrow_records
            WHERE return_date IS NOT NULL
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(durations)
    }
}
