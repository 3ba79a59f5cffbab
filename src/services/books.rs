//! Catalog management
//!
//! Book attribution always comes from the calling identity: a book is
//! created under the caller's own publisher, and only that publisher's
//! owner may update or remove it.

use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult, ErrorCode},
    models::{
        book::{Book, BookAvailability, BookDetails, BookIn},
        publisher::Publisher,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Add a book to the catalog under the caller's publisher
    pub async fn create(&self, user_id: Uuid, input: BookIn) -> AppResult<Book> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if input.quantity < 0 {
            return Err(AppError::Validation(
                "Quantity must not be negative".to_string(),
            ));
        }

        let publisher = self.caller_publisher(user_id).await?;
        self.repository.books.create(&input, publisher.id).await
    }

    /// List the live catalog
    pub async fn get_all(&self) -> AppResult<Vec<BookDetails>> {
        self.repository.books.get_all().await
    }

    /// Get a live book with its publisher embedded
    pub async fn get_details(&self, id: i32) -> AppResult<BookDetails> {
        self.repository.books.get_details(id, false).await
    }

    /// Search live books by title substring; empty matches are a 404
    pub async fn search_by_title(&self, title: &str) -> AppResult<Vec<BookDetails>> {
        let books = self.repository.books.search_by_title(title).await?;
        if books.is_empty() {
            return Err(AppError::NotFound(
                ErrorCode::NoSuchBook,
                format!("No book matching title '{}'", title),
            ));
        }
        Ok(books)
    }

    /// Search live books by author substring; empty matches are a 404
    pub async fn search_by_author(&self, author: &str) -> AppResult<Vec<BookDetails>> {
        let books = self.repository.books.search_by_author(author).await?;
        if books.is_empty() {
            return Err(AppError::NotFound(
                ErrorCode::NoSuchBook,
                format!("No book matching author '{}'", author),
            ));
        }
        Ok(books)
    }

    /// Availability report for the live catalog
    pub async fn availability(&self) -> AppResult<Vec<BookAvailability>> {
        self.repository.books.availability().await
    }

    /// Update a book owned by the caller's publisher
    pub async fn update(&self, user_id: Uuid, id: i32, input: BookIn) -> AppResult<Book> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if input.quantity < 0 {
            return Err(AppError::Validation(
                "Quantity must not be negative".to_string(),
            ));
        }

        self.check_ownership(user_id, id).await?;
        self.repository.books.update(id, &input).await
    }

    /// Soft-delete a book owned by the caller's publisher. The lend
    /// ledger and outstanding loans are untouched.
    pub async fn delete(&self, user_id: Uuid, id: i32) -> AppResult<()> {
        self.check_ownership(user_id, id).await?;
        self.repository.books.soft_delete(id).await
    }

    async fn caller_publisher(&self, user_id: Uuid) -> AppResult<Publisher> {
        self.repository
            .publishers
            .get_by_user(user_id)
            .await?
            .ok_or_else(|| {
                AppError::Authorization("No publisher registered for this user".to_string())
            })
    }

    async fn check_ownership(&self, user_id: Uuid, book_id: i32) -> AppResult<()> {
        let book = self.repository.books.get_by_id(book_id).await?;
        let publisher = self.caller_publisher(user_id).await?;

        if book.publisher_id != publisher.id {
            return Err(AppError::Authorization(
                "Book belongs to another publisher".to_string(),
            ));
        }

        Ok(())
    }
}
