//! User directory service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::user::{CreateUser, User},
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
}

impl UsersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a new user. Username and email must be unique.
    pub async fn create_user(&self, request: CreateUser) -> AppResult<User> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if self.repository.users.username_exists(&request.username).await? {
            return Err(AppError::Conflict(format!(
                "Username '{}' is already taken",
                request.username
            )));
        }
        if self.repository.users.email_exists(&request.email).await? {
            return Err(AppError::Conflict(format!(
                "Email '{}' is already registered",
                request.email
            )));
        }

        let user = self.repository.users.create(&request).await?;
        tracing::info!("Users: created user id={} '{}'", user.id, user.username);
        Ok(user)
    }

    /// Get user by ID
    pub async fn get_user(&self, id: i32) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    /// List all users
    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        self.repository.users.list().await
    }
}
