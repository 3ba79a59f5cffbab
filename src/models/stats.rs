//! Statistics report types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// One row of the top-borrowed report
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TopBorrowedBook {
    pub book_id: i32,
    pub title: String,
    pub author: String,
    pub borrow_count: i64,
}

/// Borrow traffic for one calendar month, all years collapsed.
/// "January" counts every January in the ledger.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MonthlyBorrowCount {
    pub month: String,
    pub borrow_count: i64,
}

/// Lending activity summary for one calendar year.
/// The title is None when every qualifying ledger row lost its book
/// reference (the FK nullifies on hard removal).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct YearSummary {
    pub year: i32,
    pub total_borrows: i64,
    pub most_borrowed_book_title: Option<String>,
}

/// Average borrows per active day within one (year-month, category)
/// bucket. The denominator is the number of distinct borrow dates in
/// the bucket, not the number of days in the month.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CategoryMonthlyStat {
    pub month: String,
    pub category: Option<String>,
    pub average_borrows_per_month: f64,
}
