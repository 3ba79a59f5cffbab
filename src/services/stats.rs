//! Statistics reports

use crate::{
    error::AppResult,
    models::stats::{CategoryMonthlyStat, MonthlyBorrowCount, TopBorrowedBook, YearSummary},
    repository::Repository,
};

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Ten most borrowed books
    pub async fn top_borrowed(&self) -> AppResult<Vec<TopBorrowedBook>> {
        self.repository.stats.top_borrowed().await
    }

    /// Borrow counts per calendar month name across all years
    pub async fn monthly_borrowed(&self) -> AppResult<Vec<MonthlyBorrowCount>> {
        self.repository.stats.monthly_borrowed().await
    }

    /// Activity summary for one year
    pub async fn year_summary(&self, year: i32) -> AppResult<YearSummary> {
        self.repository.stats.year_summary(year).await
    }

    /// Per-category average borrows per active day, bucketed by month
    pub async fn category_monthly_average(&self) -> AppResult<Vec<CategoryMonthlyStat>> {
        self.repository.stats.category_monthly_average().await
    }
}
