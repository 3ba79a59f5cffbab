//! Read-only statistics queries over the lend ledger

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::stats::{CategoryMonthlyStat, MonthlyBorrowCount, TopBorrowedBook, YearSummary},
};

#[derive(Clone)]
pub struct StatsRepository {
    pool: Pool<Postgres>,
}

impl StatsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Ten most borrowed books over the whole ledger. An empty ledger
    /// yields an empty list, not an error.
    pub async fn top_borrowed(&self) -> AppResult<Vec<TopBorrowedBook>> {
        let rows = sqlx::query_as::<_, TopBorrowedBook>(
            r#"
            SELECT b.id AS book_id, b.title, b.author, COUNT(l.id) AS borrow_count
            FROM lendings l
            JOIN books b ON b.id = l.book_id
            GROUP BY b.id
            ORDER BY borrow_count DESC, b.title ASC
            LIMIT 10
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Borrow counts per calendar month name, busiest months first.
    /// Years collapse into the same bucket: the report answers which
    /// month of the year historically sees the most traffic.
    pub async fn monthly_borrowed(&self) -> AppResult<Vec<MonthlyBorrowCount>> {
        let rows = sqlx::query_as::<_, MonthlyBorrowCount>(
            r#"
            SELECT TRIM(TO_CHAR(borrowed_date, 'Month')) AS month,
                   COUNT(*) AS borrow_count
            FROM lendings
            GROUP BY month
            ORDER BY borrow_count DESC, month ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Total borrows and the most borrowed title for one calendar year
    pub async fn year_summary(&self, year: i32) -> AppResult<YearSummary> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM lendings
            WHERE EXTRACT(YEAR FROM borrowed_date)::int = $1
              AND status IN ('borrowed', 'returned')
            "#,
        )
        .bind(year)
        .fetch_one(&self.pool)
        .await?;

        if total == 0 {
            return Err(AppError::NoData(format!(
                "No lending activity recorded for year {}",
                year
            )));
        }

        // The join drops rows whose book was hard-removed (book_id NULL),
        // so the title can be absent even when the total is positive.
        let most_borrowed_book_title: Option<String> = sqlx::query_scalar(
            r#"
            SELECT b.title
            FROM lendings l
            JOIN books b ON b.id = l.book_id
            WHERE EXTRACT(YEAR FROM l.borrowed_date)::int = $1
              AND l.status IN ('borrowed', 'returned')
            GROUP BY b.id
            ORDER BY COUNT(l.id) DESC, b.title ASC
            LIMIT 1
            "#,
        )
        .bind(year)
        .fetch_optional(&self.pool)
        .await?;

        Ok(YearSummary {
            year,
            total_borrows: total,
            most_borrowed_book_title,
        })
    }

    /// Average borrows per active day for each (year-month, category)
    /// bucket. The denominator counts distinct borrow dates in the
    /// bucket, so a month with loans on only two days divides by two.
    pub async fn category_monthly_average(&self) -> AppResult<Vec<CategoryMonthlyStat>> {
        let rows = sqlx::query_as::<_, CategoryMonthlyStat>(
            r#"
            SELECT TO_CHAR(l.borrowed_date, 'YYYY-MM') AS month,
                   b.category,
                   COUNT(l.id)::float8 / COUNT(DISTINCT l.borrowed_date)::float8
                       AS average_borrows_per_month
            FROM lendings l
            JOIN books b ON b.id = l.book_id
            GROUP BY month, b.category
            ORDER BY month DESC, b.category ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
