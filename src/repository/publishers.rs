//! Publishers repository for database operations

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult, ErrorCode},
    models::publisher::Publisher,
};

#[derive(Clone)]
pub struct PublishersRepository {
    pool: Pool<Postgres>,
}

impl PublishersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get publisher by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Publisher> {
        sqlx::query_as::<_, Publisher>("SELECT * FROM publishers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(
                ErrorCode::NoSuchPublisher,
                format!("Publisher with id {} not found", id),
            ))
    }

    /// Get the publisher owned by a user, if any
    pub async fn get_by_user(&self, user_id: Uuid) -> AppResult<Option<Publisher>> {
        let publisher =
            sqlx::query_as::<_, Publisher>("SELECT * FROM publishers WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(publisher)
    }

    /// List all publishers ordered by company name
    pub async fn get_all(&self) -> AppResult<Vec<Publisher>> {
        let publishers = sqlx::query_as::<_, Publisher>(
            "SELECT * FROM publishers ORDER BY company_name ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(publishers)
    }

    /// Register a publisher for a user; one publisher per user
    pub async fn create(
        &self,
        company_name: &str,
        contact_email: Option<&str>,
        user_id: Uuid,
    ) -> AppResult<Publisher> {
        if self.get_by_user(user_id).await?.is_some() {
            return Err(AppError::Conflict(
                ErrorCode::PublisherAlreadyExists,
                "User already has a registered publisher".to_string(),
            ));
        }

        let publisher = sqlx::query_as::<_, Publisher>(
            r#"
            INSERT INTO publishers (company_name, contact_email, user_id)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(company_name)
        .bind(contact_email)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(publisher)
    }

    /// Update the publisher owned by a user
    pub async fn update_for_user(
        &self,
        user_id: Uuid,
        company_name: &str,
        contact_email: Option<&str>,
    ) -> AppResult<Publisher> {
        let publisher = sqlx::query_as::<_, Publisher>(
            r#"
            UPDATE publishers SET company_name = $2, contact_email = $3
            WHERE user_id = $1
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(company_name)
        .bind(contact_email)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(
                ErrorCode::NoSuchPublisher,
                "No publisher registered for this user".to_string(),
            )
        })?;

        Ok(publisher)
    }

    /// Delete the publisher owned by a user; blocked while books reference it
    pub async fn delete_for_user(&self, user_id: Uuid) -> AppResult<()> {
        let publisher = self.get_by_user(user_id).await?.ok_or_else(|| {
            AppError::NotFound(
                ErrorCode::NoSuchPublisher,
                "No publisher registered for this user".to_string(),
            )
        })?;

        let has_books: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM books WHERE publisher_id = $1)",
        )
        .bind(publisher.id)
        .fetch_one(&self.pool)
        .await?;

        if has_books {
            return Err(AppError::Conflict(
                ErrorCode::PublisherHasBooks,
                "Cannot delete publisher: publisher has books".to_string(),
            ));
        }

        sqlx::query("DELETE FROM publishers WHERE id = $1")
            .bind(publisher.id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
