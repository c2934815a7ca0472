//! User service with role assignment and dynamic attribute handling.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::ENTITY_TYPE_USER;
use crate::domain::{EntityFields, Role, User};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{RoleRepository, UserRepository};
use crate::services::EavStore;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserService: Send + Sync {
    /// Get user by ID
    async fn get_user(&self, id: i64) -> AppResult<User>;

    /// Get user by email
    async fn get_user_by_email(&self, email: &str) -> AppResult<User>;

    /// List all users
    async fn list_users(&self) -> AppResult<Vec<User>>;

    /// Create a new user. Dynamic fields buffered on the unsaved user
    /// are flushed to the attribute store once the row exists.
    async fn create_user(&self, user: User) -> AppResult<User>;

    /// Update an existing user's native fields.
    async fn update_user(&self, user: &User) -> AppResult<User>;

    /// Delete a user together with its attribute values.
    async fn delete_user(&self, id: i64) -> AppResult<()>;

    /// Assign a role to a user by role code. Idempotent.
    async fn assign_role(&self, user_id: i64, role_code: &str) -> AppResult<()>;

    /// Remove a role from a user by role code.
    async fn remove_role(&self, user_id: i64, role_code: &str) -> AppResult<()>;

    /// List the roles assigned to a user.
    async fn user_roles(&self, user_id: i64) -> AppResult<Vec<Role>>;

    /// Check whether a user holds a role.
    async fn has_role(&self, user_id: i64, role_code: &str) -> AppResult<bool>;
}

/// Concrete implementation of UserService
pub struct UserManager {
    users: Arc<dyn UserRepository>,
    roles: Arc<dyn RoleRepository>,
    eav: Arc<dyn EavStore>,
}

impl UserManager {
    /// Create new service instance with its dependencies
    pub fn new(
        users: Arc<dyn UserRepository>,
        roles: Arc<dyn RoleRepository>,
        eav: Arc<dyn EavStore>,
    ) -> Self {
        Self { users, roles, eav }
    }

    async fn require_role(&self, role_code: &str) -> AppResult<Role> {
        self.roles
            .find_by_code(role_code)
            .await?
            .ok_or_not_found()
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn get_user(&self, id: i64) -> AppResult<User> {
        self.users.find_by_id(id).await?.ok_or_not_found()
    }

    async fn get_user_by_email(&self, email: &str) -> AppResult<User> {
        self.users.find_by_email(email).await?.ok_or_not_found()
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        self.users.list().await
    }

    async fn create_user(&self, mut user: User) -> AppResult<User> {
        if self.users.find_by_email(&user.email).await?.is_some() {
            return Err(AppError::conflict(format!(
                "user with email '{}'",
                user.email
            )));
        }

        let buffered = user.take_buffered();
        let created = self.users.create(&user).await?;
        let user_id = created
            .id
            .ok_or_else(|| AppError::internal("created user has no storage id"))?;

        for (field, value) in buffered {
            self.eav
                .set_attribute_value(ENTITY_TYPE_USER, user_id, &field, value)
                .await?;
        }

        tracing::info!(user_id, email = %created.email, "user created");
        Ok(created)
    }

    async fn update_user(&self, user: &User) -> AppResult<User> {
        let id = user.id.ok_or_not_found()?;

        if let Some(other) = self.users.find_by_email(&user.email).await? {
            if other.id != Some(id) {
                return Err(AppError::conflict(format!(
                    "user with email '{}'",
                    user.email
                )));
            }
        }

        self.users.update(user).await
    }

    async fn delete_user(&self, id: i64) -> AppResult<()> {
        self.users.delete(id).await?;
        let removed = self.eav.delete_entity_values(ENTITY_TYPE_USER, id).await?;
        tracing::info!(user_id = id, attribute_rows = removed, "user deleted");
        Ok(())
    }

    async fn assign_role(&self, user_id: i64, role_code: &str) -> AppResult<()> {
        let role = self.require_role(role_code).await?;
        let role_id = role
            .id
            .ok_or_else(|| AppError::internal("resolved role has no storage id"))?;

        self.users.assign_role(user_id, role_id).await?;
        tracing::info!(user_id, role = role_code, "role assigned");
        Ok(())
    }

    async fn remove_role(&self, user_id: i64, role_code: &str) -> AppResult<()> {
        let role = self.require_role(role_code).await?;
        let role_id = role
            .id
            .ok_or_else(|| AppError::internal("resolved role has no storage id"))?;

        self.users.remove_role(user_id, role_id).await
    }

    async fn user_roles(&self, user_id: i64) -> AppResult<Vec<Role>> {
        self.users.roles(user_id).await
    }

    async fn has_role(&self, user_id: i64, role_code: &str) -> AppResult<bool> {
        self.users.has_role(user_id, role_code).await
    }
}
