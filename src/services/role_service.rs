//! Role service for role catalog management.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::Role;
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::RoleRepository;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Role service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RoleService: Send + Sync {
    /// Get role by ID
    async fn get_role(&self, id: i64) -> AppResult<Role>;

    /// Get role by code
    async fn get_role_by_code(&self, code: &str) -> AppResult<Role>;

    /// List all roles
    async fn list_roles(&self) -> AppResult<Vec<Role>>;

    /// Create a new role
    async fn create_role(&self, role: &Role) -> AppResult<Role>;

    /// Update an existing role
    async fn update_role(&self, role: &Role) -> AppResult<Role>;

    /// Delete a role
    async fn delete_role(&self, id: i64) -> AppResult<()>;
}

/// Concrete implementation of RoleService
pub struct RoleManager {
    roles: Arc<dyn RoleRepository>,
}

impl RoleManager {
    /// Create new service instance with its repository
    pub fn new(roles: Arc<dyn RoleRepository>) -> Self {
        Self { roles }
    }
}

#[async_trait]
impl RoleService for RoleManager {
    async fn get_role(&self, id: i64) -> AppResult<Role> {
        self.roles.find_by_id(id).await?.ok_or_not_found()
    }

    async fn get_role_by_code(&self, code: &str) -> AppResult<Role> {
        self.roles.find_by_code(code).await?.ok_or_not_found()
    }

    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        self.roles.list().await
    }

    async fn create_role(&self, role: &Role) -> AppResult<Role> {
        if self.roles.find_by_code(&role.code).await?.is_some() {
            return Err(AppError::conflict(format!("role '{}'", role.code)));
        }

        let created = self.roles.create(role).await?;
        tracing::info!(role = %created.code, "role created");
        Ok(created)
    }

    async fn update_role(&self, role: &Role) -> AppResult<Role> {
        self.roles.update(role).await
    }

    async fn delete_role(&self, id: i64) -> AppResult<()> {
        self.roles.delete(id).await
    }
}
