//! User registration, authentication and account management

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult, ErrorCode},
    models::user::{CreateUser, UpdateUser, User, UserClaims},
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Register a new user with a hashed password
    pub async fn register(&self, input: CreateUser) -> AppResult<User> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if self.repository.users.email_exists(&input.email, None).await? {
            return Err(AppError::Conflict(
                ErrorCode::EmailAlreadyExists,
                "Email already registered".to_string(),
            ));
        }

        let hash = self.hash_password(&input.password)?;

        self.repository
            .users
            .create(&input.name, &input.email, input.phone.as_deref(), &hash)
            .await
    }

    /// Authenticate by email and password, returning a bearer token
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<String> {
        let user = self
            .repository
            .users
            .get_by_email(email)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid email or password".to_string()))?;

        if !self.verify_password(&user, password)? {
            return Err(AppError::Authentication(
                "Invalid email or password".to_string(),
            ));
        }

        let now = Utc::now().timestamp();
        let claims = UserClaims {
            sub: user.id.to_string(),
            iat: now,
            exp: now + self.config.jwt_expiration_minutes * 60,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    /// List all users
    pub async fn get_all(&self) -> AppResult<Vec<User>> {
        self.repository.users.get_all().await
    }

    /// Update a user's own profile
    pub async fn update(&self, caller: Uuid, id: Uuid, input: UpdateUser) -> AppResult<User> {
        if caller != id {
            return Err(AppError::Authorization(
                "Users can only modify their own account".to_string(),
            ));
        }

        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if let Some(ref email) = input.email {
            if self.repository.users.email_exists(email, Some(id)).await? {
                return Err(AppError::Conflict(
                    ErrorCode::EmailAlreadyExists,
                    "Email already registered".to_string(),
                ));
            }
        }

        let hash = match input.password.as_deref() {
            Some(password) => Some(self.hash_password(password)?),
            None => None,
        };

        self.repository
            .users
            .update(
                id,
                input.name.as_deref(),
                input.email.as_deref(),
                input.phone.as_deref(),
                hash.as_deref(),
            )
            .await
    }

    /// Delete a user's own account; refused while lendings reference it
    pub async fn delete(&self, caller: Uuid, id: Uuid) -> AppResult<()> {
        if caller != id {
            return Err(AppError::Authorization(
                "Users can only modify their own account".to_string(),
            ));
        }

        self.repository.users.delete(id).await
    }

    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&user.password)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash a password using Argon2
    fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }
}
