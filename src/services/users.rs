//! User management service

use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::user::{CreateUser, UpdateUser, User, UserQuery},
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

    pub async fn search(&self, query: &UserQuery) -> AppResult<(Vec<User>, i64)> {
        self.repository.users.search(query).await
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    pub async fn create(&self, data: CreateUser) -> AppResult<User> {
        data.validate()?;
        let user = self.repository.users.create(&data).await?;
        tracing::info!(user_id = %user.id, "User created");
        Ok(user)
    }

    pub async fn update(&self, id: Uuid, data: UpdateUser) -> AppResult<User> {
        data.validate()?;
        self.repository.users.update(id, &data).await
    }

    /// Delete a user; refused while loans reference them
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.repository.users.delete(id).await.map_err(|e| match e {
            AppError::Conflict(_) => AppError::Conflict(format!("User {} still has loans", id)),
            other => other,
        })?;
        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }
}
