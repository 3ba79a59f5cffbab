//! Lend transactions repository
//!
//! The lend and return paths each run in a single database transaction
//! holding a row lock on the book, so inventory arithmetic and the
//! single-active-loan rule stay correct under concurrent requests.

use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult, ErrorCode},
    models::{
        book::BookSummary,
        lend::{BookHistoryEntry, CreateLend, LendTransaction, ReturnBook, UserHistoryEntry},
        user::UserSummary,
    },
};

use super::books::BooksRepository;

#[derive(Clone)]
pub struct LendsRepository {
    pool: Pool<Postgres>,
    books: BooksRepository,
}

impl LendsRepository {
    pub fn new(pool: Pool<Postgres>, books: BooksRepository) -> Self {
        Self { pool, books }
    }

    /// Borrow a book: lock the book row, verify stock and the
    /// single-active-loan rule, insert the ledger entry and decrement
    /// the shelf count, all in one transaction.
    pub async fn create(&self, user_id: Uuid, input: &CreateLend) -> AppResult<LendTransaction> {
        let mut tx = self.pool.begin().await?;

        let book = self
            .books
            .lock_for_lend(&mut tx, input.book_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(
                    ErrorCode::NoSuchBook,
                    format!("Book with id {} not found", input.book_id),
                )
            })?;

        let user_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
                .bind(user_id)
                .fetch_one(&mut *tx)
                .await?;

        if !user_exists {
            return Err(AppError::NotFound(
                ErrorCode::NoSuchUser,
                format!("User with id {} not found", user_id),
            ));
        }

        if book.quantity <= 0 {
            return Err(AppError::OutOfStock(format!(
                "No copies of book {} available",
                input.book_id
            )));
        }

        let has_active: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM lendings
                WHERE user_id = $1 AND book_id = $2 AND status = 'borrowed'
            )
            "#,
        )
        .bind(user_id)
        .bind(input.book_id)
        .fetch_one(&mut *tx)
        .await?;

        if has_active {
            return Err(AppError::Conflict(
                ErrorCode::DuplicateActiveLoan,
                format!(
                    "User already has an active loan for book {}",
                    input.book_id
                ),
            ));
        }

        let lend = sqlx::query_as::<_, LendTransaction>(
            r#"
            INSERT INTO lendings (book_id, user_id, borrowed_date, status)
            VALUES ($1, $2, $3, 'borrowed')
            RETURNING *
            "#,
        )
        .bind(input.book_id)
        .bind(user_id)
        .bind(input.borrowed_date)
        .fetch_one(&mut *tx)
        .await?;

        self.books.take_copy(&mut tx, input.book_id).await?;

        tx.commit().await?;

        Ok(lend)
    }

    /// Return a book: close the caller's active loan for it and put the
    /// copy back on the shelf, in one transaction. Works for soft-deleted
    /// books so outstanding copies can still come home.
    pub async fn return_book(
        &self,
        user_id: Uuid,
        input: &ReturnBook,
    ) -> AppResult<LendTransaction> {
        let mut tx = self.pool.begin().await?;

        let locked: Option<i32> =
            sqlx::query_scalar("SELECT id FROM books WHERE id = $1 FOR UPDATE")
                .bind(input.book_id)
                .fetch_optional(&mut *tx)
                .await?;

        if locked.is_none() {
            return Err(AppError::NotFound(
                ErrorCode::NoSuchBook,
                format!("Book with id {} not found", input.book_id),
            ));
        }

        let user_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
                .bind(user_id)
                .fetch_one(&mut *tx)
                .await?;

        if !user_exists {
            return Err(AppError::NotFound(
                ErrorCode::NoSuchUser,
                format!("User with id {} not found", user_id),
            ));
        }

        let active = sqlx::query_as::<_, LendTransaction>(
            r#"
            SELECT * FROM lendings
            WHERE user_id = $1 AND book_id = $2 AND status = 'borrowed'
            ORDER BY id DESC
            "#,
        )
        .bind(user_id)
        .bind(input.book_id)
        .fetch_all(&mut *tx)
        .await?;

        if active.len() > 1 {
            tracing::warn!(
                user_id = %user_id,
                book_id = input.book_id,
                count = active.len(),
                "multiple active loans for the same user and book"
            );
        }

        let lend = match active.into_iter().next() {
            Some(lend) => lend,
            None => {
                let was_returned: bool = sqlx::query_scalar(
                    r#"
                    SELECT EXISTS(
                        SELECT 1 FROM lendings
                        WHERE user_id = $1 AND book_id = $2 AND status = 'returned'
                    )
                    "#,
                )
                .bind(user_id)
                .bind(input.book_id)
                .fetch_one(&mut *tx)
                .await?;

                if was_returned {
                    return Err(AppError::Conflict(
                        ErrorCode::AlreadyReturned,
                        format!("Book {} was already returned", input.book_id),
                    ));
                }
                return Err(AppError::NotFound(
                    ErrorCode::NoActiveLoan,
                    format!("No active loan for book {} by this user", input.book_id),
                ));
            }
        };

        let closed = sqlx::query_as::<_, LendTransaction>(
            r#"
            UPDATE lendings SET returned_date = $2, status = 'returned'
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(lend.id)
        .bind(input.return_date)
        .fetch_one(&mut *tx)
        .await?;

        self.books.put_copy_back(&mut tx, input.book_id).await?;

        tx.commit().await?;

        Ok(closed)
    }

    /// List the whole ledger in insertion order
    pub async fn get_all(&self) -> AppResult<Vec<LendTransaction>> {
        let lends = sqlx::query_as::<_, LendTransaction>("SELECT * FROM lendings ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(lends)
    }

    /// Get one ledger entry by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<LendTransaction> {
        sqlx::query_as::<_, LendTransaction>("SELECT * FROM lendings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(ErrorCode::NoSuchLend, format!("Lend with id {} not found", id)))
    }

    /// Remove a ledger entry. This is a record correction: it does not
    /// touch book inventory.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM lendings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(ErrorCode::NoSuchLend, format!("Lend with id {} not found", id)));
        }

        Ok(())
    }

    /// All ledger entries for one book, oldest first, with borrower snapshots
    pub async fn history_for_book(&self, book_id: i32) -> AppResult<Vec<BookHistoryEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT l.id AS lend_id, l.borrowed_date, l.returned_date, l.status,
                   u.id AS user_id, u.name, u.email, u.phone
            FROM lendings l
            JOIN users u ON u.id = l.user_id
            WHERE l.book_id = $1
            ORDER BY l.id ASC
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|r| book_history_from_row(r).map_err(AppError::from))
            .collect()
    }

    /// All ledger entries for one user, oldest first, with book snapshots.
    /// Entries whose book was hard-removed keep a null book.
    pub async fn history_for_user(&self, user_id: Uuid) -> AppResult<Vec<UserHistoryEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT l.id AS lend_id, l.borrowed_date, l.returned_date, l.status,
                   b.id AS book_id, b.title, b.author, b.category,
                   b.publication_year, b.language
            FROM lendings l
            LEFT JOIN books b ON b.id = l.book_id
            WHERE l.user_id = $1
            ORDER BY l.id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|r| user_history_from_row(r).map_err(AppError::from))
            .collect()
    }
}

fn book_history_from_row(row: &PgRow) -> Result<BookHistoryEntry, sqlx::Error> {
    Ok(BookHistoryEntry {
        lend_id: row.try_get("lend_id")?,
        user: UserSummary {
            id: row.try_get("user_id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
        },
        borrowed_date: row.try_get("borrowed_date")?,
        returned_date: row.try_get("returned_date")?,
        status: row.try_get("status")?,
    })
}

fn user_history_from_row(row: &PgRow) -> Result<UserHistoryEntry, sqlx::Error> {
    let book_id: Option<i32> = row.try_get("book_id")?;
    let book = match book_id {
        Some(id) => Some(BookSummary {
            id,
            title: row.try_get("title")?,
            author: row.try_get("author")?,
            category: row.try_get("category")?,
            publication_year: row.try_get("publication_year")?,
            language: row.try_get("language")?,
        }),
        None => None,
    };

    Ok(UserHistoryEntry {
        lend_id: row.try_get("lend_id")?,
        book,
        borrowed_date: row.try_get("borrowed_date")?,
        returned_date: row.try_get("returned_date")?,
        status: row.try_get("status")?,
    })
}
