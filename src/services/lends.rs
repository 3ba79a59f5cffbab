//! Lend workflow orchestration

use uuid::Uuid;

use crate::{
    error::AppResult,
    models::lend::{
        BookLendHistory, CreateLend, LendTransaction, ReturnBook, UserLendHistory,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct LendsService {
    repository: Repository,
}

impl LendsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Borrow a book for the calling user
    pub async fn create(&self, user_id: Uuid, input: CreateLend) -> AppResult<LendTransaction> {
        self.repository.lends.create(user_id, &input).await
    }

    /// Return a borrowed book. Returns the closed transaction together
    /// with the book title for the confirmation message.
    pub async fn return_book(
        &self,
        user_id: Uuid,
        input: ReturnBook,
    ) -> AppResult<(LendTransaction, String)> {
        let lend = self.repository.lends.return_book(user_id, &input).await?;
        let book = self.repository.books.get_details(input.book_id, true).await?;
        Ok((lend, book.title))
    }

    /// List the whole ledger
    pub async fn get_all(&self) -> AppResult<Vec<LendTransaction>> {
        self.repository.lends.get_all().await
    }

    /// Get one ledger entry
    pub async fn get_by_id(&self, id: i32) -> AppResult<LendTransaction> {
        self.repository.lends.get_by_id(id).await
    }

    /// Remove a ledger entry without touching inventory
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.lends.delete(id).await
    }

    /// Full lend history of a book. Fails only when the book row itself
    /// is missing; a book nobody ever borrowed yields an empty list.
    pub async fn book_history(&self, book_id: i32) -> AppResult<BookLendHistory> {
        let book = self.repository.books.get_details(book_id, true).await?;
        let history = self.repository.lends.history_for_book(book_id).await?;
        Ok(BookLendHistory { book, history })
    }

    /// Full lend history of a user. Fails only when the user row itself
    /// is missing; a user who never borrowed yields an empty list.
    pub async fn user_history(&self, user_id: Uuid) -> AppResult<UserLendHistory> {
        let user = self.repository.users.get_by_id(user_id).await?;
        let history = self.repository.lends.history_for_user(user_id).await?;
        Ok(UserLendHistory {
            user: user.into(),
            history,
        })
    }
}
