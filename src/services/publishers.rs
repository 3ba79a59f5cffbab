//! Publisher management

use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::publisher::{Publisher, PublisherIn},
    repository::Repository,
};

#[derive(Clone)]
pub struct PublishersService {
    repository: Repository,
}

impl PublishersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Register a publisher for the calling user
    pub async fn create(&self, user_id: Uuid, input: PublisherIn) -> AppResult<Publisher> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        self.repository
            .publishers
            .create(&input.company_name, input.contact_email.as_deref(), user_id)
            .await
    }

    /// List all publishers
    pub async fn get_all(&self) -> AppResult<Vec<Publisher>> {
        self.repository.publishers.get_all().await
    }

    /// Get publisher by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Publisher> {
        self.repository.publishers.get_by_id(id).await
    }

    /// Update the calling user's publisher
    pub async fn update_own(&self, user_id: Uuid, input: PublisherIn) -> AppResult<Publisher> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        self.repository
            .publishers
            .update_for_user(user_id, &input.company_name, input.contact_email.as_deref())
            .await
    }

    /// Delete the calling user's publisher; refused while books reference it
    pub async fn delete_own(&self, user_id: Uuid) -> AppResult<()> {
        self.repository.publishers.delete_for_user(user_id).await
    }
}
