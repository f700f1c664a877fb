//! Borrow record model and related types

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Fixed borrow period applied to every new record
pub const BORROW_PERIOD_DAYS: i64 = 30;

/// Borrow record from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BorrowRecord {
    pub id: i32,
    pub user_id: i32,
    pub book_id: i32,
    pub borrow_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
}

impl BorrowRecord {
    /// Due date for a record created at `borrow_date`
    pub fn due_date_for(borrow_date: DateTime<Utc>) -> DateTime<Utc> {
        borrow_date + Duration::days(BORROW_PERIOD_DAYS)
    }

    /// Whether the record is past due at `now`. Records already returned are
    /// never overdue, whatever their return timestamp was.
    pub fn is_overdue_at(&self, now: DateTime<Utc>) -> bool {
        self.return_date.is_none() && now > self.due_date
    }

    /// Days past due at `now`, as whole calendar days.
    ///
    /// Computed by date subtraction (`now.date - due.date`), so partial days
    /// truncate toward zero; never negative.
    pub fn overdue_days_at(&self, now: DateTime<Utc>) -> i64 {
        (now.date_naive() - self.due_date.date_naive()).num_days().max(0)
    }
}

/// Borrow record with book and user context for display
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BorrowDetails {
    pub id: i32,
    pub user_id: i32,
    pub username: String,
    pub book_id: i32,
    pub book_title: String,
    pub author_name: String,
    pub borrow_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
    pub is_overdue: bool,
    pub overdue_days: i64,
}

/// Outcome of a return operation. The overdue figures are derived for
/// reporting and never persisted.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReturnedBorrow {
    pub record: BorrowRecord,
    pub is_overdue: bool,
    pub overdue_days: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(borrow_date: DateTime<Utc>) -> BorrowRecord {
        BorrowRecord {
            id: 1,
            user_id: 1,
            book_id: 1,
            borrow_date,
            due_date: BorrowRecord::due_date_for(borrow_date),
            return_date: None,
        }
    }

    #[test]
    fn due_date_is_thirty_days_out() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let rec = record(t0);
        assert_eq!(rec.due_date, t0 + Duration::days(30));
    }

    #[test]
    fn not_overdue_before_due_date() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let rec = record(t0);
        let now = t0 + Duration::days(29);
        assert!(!rec.is_overdue_at(now));
        assert_eq!(rec.overdue_days_at(now), 0);
    }

    #[test]
    fn one_day_overdue_after_thirty_one_days() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let rec = record(t0);
        let now = t0 + Duration::days(31);
        assert!(rec.is_overdue_at(now));
        assert_eq!(rec.overdue_days_at(now), 1);
    }

    #[test]
    fn partial_days_truncate() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let rec = record(t0);
        // Same calendar date as the due date, a few hours past it
        let now = rec.due_date + Duration::hours(3);
        assert!(rec.is_overdue_at(now));
        assert_eq!(rec.overdue_days_at(now), 0);
    }

    #[test]
    fn returned_record_is_never_overdue() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let mut rec = record(t0);
        rec.return_date = Some(t0 + Duration::days(40));
        assert!(!rec.is_overdue_at(t0 + Duration::days(45)));
    }
}
