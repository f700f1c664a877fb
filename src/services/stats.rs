//! Statistics service
//!
//! Every figure is computed fresh per invocation; nothing is cached or
//! maintained incrementally.

use chrono::{Duration, Utc};

use crate::{
    api::stats::DashboardStats,
    error::AppResult,
    repository::Repository,
};

const TOP_LIST_SIZE: i64 = 5;
const TREND_WINDOW_DAYS: i64 = 30;

/// Mean of per-record whole-day durations, rounded to one decimal.
/// Defined as 0.0 when there are no returned records.
fn average_days(durations: &[i64]) -> f64 {
    if durations.is_empty() {
        return 0.0;
    }
    let total: i64 = durations.iter().sum();
    let mean = total as f64 / durations.len() as f64;
    (mean * 10.0).round() / 10.0
}

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Dashboard statistics. A data-access failure degrades to a zero-filled
    /// response carrying an error message instead of propagating; the
    /// dashboard never takes a request down.
    pub async fn dashboard(&self) -> DashboardStats {
        match self.collect().await {
            Ok(stats) => stats,
            Err(e) => {
                tracing::error!("Dashboard aggregation failed: {}", e);
                DashboardStats::degraded(format!("Statistics unavailable: {}", e))
            }
        }
    }

    async fn collect(&self) -> AppResult<DashboardStats> {
        let repo = &self.repository;

        let total_books = repo.books.count().await?;
        let total_authors = repo.references.count_authors().await?;
        let total_categories = repo.references.count_categories().await?;
        let total_publishers = repo.references.count_publishers().await?;
        let total_users = repo.users.count().await?;

        let open_borrows = repo.borrows.count_open().await?;
        let returned_borrows = repo.borrows.count_returned().await?;
        let overdue_borrows = repo.borrows.count_overdue().await?;

        let trend_cutoff = Utc::now() - Duration::days(TREND_WINDOW_DAYS);
        let borrows_last_30_days = repo.borrows.count_borrowed_since(trend_cutoff).await?;

        let durations = repo.borrows.returned_durations_days().await?;
        let average_borrow_days = average_days(&durations);

        let latest_books = repo.books.latest(TOP_LIST_SIZE).await?;
        let recent_borrows = repo.borrows.recent_open(TOP_LIST_SIZE).await?;
        let top_authors = repo.references.top_authors(TOP_LIST_SIZE).await?;
        let category_counts = repo.references.category_counts().await?;

        Ok(DashboardStats {
            total_books,
            total_authors,
            total_categories,
            total_publishers,
            total_users,
            open_borrows,
            returned_borrows,
            overdue_borrows,
            borrows_last_30_days,
            average_borrow_days,
            latest_books,
            recent_borrows,
            top_authors,
            category_counts,
            error: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_of_no_durations_is_zero() {
        assert_eq!(average_days(&[]), 0.0);
    }

    #[test]
    fn average_of_two_four_six_is_four() {
        assert_eq!(average_days(&[2, 4, 6]), 4.0);
    }

    #[test]
    fn average_rounds_to_one_decimal() {
        assert_eq!(average_days(&[1, 2]), 1.5);
        assert_eq!(average_days(&[1, 1, 2]), 1.3);
        assert_eq!(average_days(&[1, 2, 2]), 1.7);
    }
}
