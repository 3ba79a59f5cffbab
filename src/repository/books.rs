//! Books repository for database operations and inventory updates

use sqlx::postgres::PgRow;
use sqlx::{PgConnection, Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult, ErrorCode},
    models::{
        book::{Book, BookAvailability, BookDetails, BookIn},
        publisher::PublisherSummary,
    },
};

const DETAILS_SELECT: &str = r#"
    SELECT b.id, b.title, b.author, b.epoch, b.genre, b.kind, b.language,
           b.publication_year, b.category, b.quantity, b.borrowed_count, b.is_deleted,
           p.id AS publisher_id, p.company_name, p.contact_email
    FROM books b
    JOIN publishers p ON p.id = b.publisher_id
"#;

fn details_from_row(row: &PgRow) -> Result<BookDetails, sqlx::Error> {
    Ok(BookDetails {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        author: row.try_get("author")?,
        epoch: row.try_get("epoch")?,
        genre: row.try_get("genre")?,
        kind: row.try_get("kind")?,
        language: row.try_get("language")?,
        publication_year: row.try_get("publication_year")?,
        category: row.try_get("category")?,
        publisher: PublisherSummary {
            id: row.try_get("publisher_id")?,
            company_name: row.try_get("company_name")?,
            contact_email: row.try_get("contact_email")?,
        },
        quantity: row.try_get("quantity")?,
        borrowed_count: row.try_get("borrowed_count")?,
        is_deleted: row.try_get("is_deleted")?,
    })
}

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get a live (not soft-deleted) book row by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1 AND is_deleted = FALSE")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(ErrorCode::NoSuchBook, format!("Book with id {} not found", id)))
    }

    /// Get book details with publisher embedded. Soft-deleted rows are
    /// included so history lookups keep working after a catalog removal.
    pub async fn get_details(&self, id: i32, include_deleted: bool) -> AppResult<BookDetails> {
        let sql = if include_deleted {
            format!("{} WHERE b.id = $1", DETAILS_SELECT)
        } else {
            format!("{} WHERE b.id = $1 AND b.is_deleted = FALSE", DETAILS_SELECT)
        };

        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(ErrorCode::NoSuchBook, format!("Book with id {} not found", id)))?;

        Ok(details_from_row(&row)?)
    }

    /// List the live catalog ordered by title
    pub async fn get_all(&self) -> AppResult<Vec<BookDetails>> {
        let sql = format!("{} WHERE b.is_deleted = FALSE ORDER BY b.title ASC", DETAILS_SELECT);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        rows.iter()
            .map(|r| details_from_row(r).map_err(AppError::from))
            .collect()
    }

    /// Case-insensitive substring search on title, live books only
    pub async fn search_by_title(&self, title: &str) -> AppResult<Vec<BookDetails>> {
        let sql = format!(
            "{} WHERE b.is_deleted = FALSE AND b.title ILIKE $1 ORDER BY b.title ASC",
            DETAILS_SELECT
        );
        let rows = sqlx::query(&sql)
            .bind(format!("%{}%", title))
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|r| details_from_row(r).map_err(AppError::from))
            .collect()
    }

    /// Case-insensitive substring search on author, live books only
    pub async fn search_by_author(&self, author: &str) -> AppResult<Vec<BookDetails>> {
        let sql = format!(
            "{} WHERE b.is_deleted = FALSE AND b.author ILIKE $1 ORDER BY b.title ASC",
            DETAILS_SELECT
        );
        let rows = sqlx::query(&sql)
            .bind(format!("%{}%", author))
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|r| details_from_row(r).map_err(AppError::from))
            .collect()
    }

    /// Insert a new book under the given publisher
    pub async fn create(&self, input: &BookIn, publisher_id: i32) -> AppResult<Book> {
        let book = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, author, epoch, genre, kind, language,
                               publication_year, category, publisher_id, quantity)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(&input.title)
        .bind(&input.author)
        .bind(&input.epoch)
        .bind(&input.genre)
        .bind(&input.kind)
        .bind(&input.language)
        .bind(&input.publication_year)
        .bind(&input.category)
        .bind(publisher_id)
        .bind(input.quantity)
        .fetch_one(&self.pool)
        .await?;

        Ok(book)
    }

    /// Replace the descriptive fields of a book. Quantity is updated too;
    /// borrowed_count and is_deleted are owned by the lend workflow.
    pub async fn update(&self, id: i32, input: &BookIn) -> AppResult<Book> {
        let book = sqlx::query_as::<_, Book>(
            r#"
            UPDATE books SET
                title = $2, author = $3, epoch = $4, genre = $5, kind = $6,
                language = $7, publication_year = $8, category = $9, quantity = $10
            WHERE id = $1 AND is_deleted = FALSE
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&input.title)
        .bind(&input.author)
        .bind(&input.epoch)
        .bind(&input.genre)
        .bind(&input.kind)
        .bind(&input.language)
        .bind(&input.publication_year)
        .bind(&input.category)
        .bind(input.quantity)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(ErrorCode::NoSuchBook, format!("Book with id {} not found", id)))?;

        Ok(book)
    }

    /// Soft-delete a book; the lend ledger keeps pointing at the row
    pub async fn soft_delete(&self, id: i32) -> AppResult<()> {
        let result =
            sqlx::query("UPDATE books SET is_deleted = TRUE WHERE id = $1 AND is_deleted = FALSE")
                .bind(id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(ErrorCode::NoSuchBook, format!("Book with id {} not found", id)));
        }

        Ok(())
    }

    /// Availability report for the live catalog: shelf copies, copies out
    /// on active loans, and the lifetime borrow counter
    pub async fn availability(&self) -> AppResult<Vec<BookAvailability>> {
        let report = sqlx::query_as::<_, BookAvailability>(
            r#"
            SELECT b.id AS book_id, b.title,
                   b.quantity AS available,
                   COUNT(l.id) FILTER (WHERE l.status = 'borrowed') AS borrowed,
                   b.quantity + COUNT(l.id) FILTER (WHERE l.status = 'borrowed') AS total_stock,
                   b.borrowed_count
            FROM books b
            LEFT JOIN lendings l ON l.book_id = b.id
            WHERE b.is_deleted = FALSE
            GROUP BY b.id
            ORDER BY b.title ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(report)
    }

    /// Lock a book row for the duration of a lend transaction.
    /// Returns None when the book does not exist or is soft-deleted.
    pub async fn lock_for_lend(
        &self,
        conn: &mut PgConnection,
        book_id: i32,
    ) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(
            "SELECT * FROM books WHERE id = $1 AND is_deleted = FALSE FOR UPDATE",
        )
        .bind(book_id)
        .fetch_optional(conn)
        .await?;

        Ok(book)
    }

    /// Take one copy off the shelf and bump the lifetime borrow counter.
    /// Must run inside the transaction that holds the row lock.
    pub async fn take_copy(&self, conn: &mut PgConnection, book_id: i32) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE books
            SET quantity = quantity - 1, borrowed_count = borrowed_count + 1
            WHERE id = $1 AND quantity > 0
            "#,
        )
        .bind(book_id)
        .execute(conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::OutOfStock(format!(
                "No copies of book {} available",
                book_id
            )));
        }

        Ok(())
    }

    /// Put one copy back on the shelf after a return
    pub async fn put_copy_back(&self, conn: &mut PgConnection, book_id: i32) -> AppResult<()> {
        sqlx::query("UPDATE books SET quantity = quantity + 1 WHERE id = $1")
            .bind(book_id)
            .execute(conn)
            .await?;

        Ok(())
    }
}
