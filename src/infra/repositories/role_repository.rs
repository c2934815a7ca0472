//! Role repository implementation.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use super::entities::role::{self, Entity as RoleEntity};
use crate::domain::Role;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Role repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Find role by primary key
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Role>>;

    /// Find role by its unique code
    async fn find_by_code(&self, code: &str) -> AppResult<Option<Role>>;

    /// List all roles
    async fn list(&self) -> AppResult<Vec<Role>>;

    /// Persist a new role
    async fn create(&self, role: &Role) -> AppResult<Role>;

    /// Update an existing role
    async fn update(&self, role: &Role) -> AppResult<Role>;

    /// Delete a role by id
    async fn delete(&self, id: i64) -> AppResult<()>;
}

/// Concrete implementation of RoleRepository
pub struct RoleStore {
    db: DatabaseConnection,
}

impl RoleStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RoleRepository for RoleStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Role>> {
        let result = RoleEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Role::from))
    }

    async fn find_by_code(&self, code: &str) -> AppResult<Option<Role>> {
        let result = RoleEntity::find()
            .filter(role::Column::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Role::from))
    }

    async fn list(&self) -> AppResult<Vec<Role>> {
        let models = RoleEntity::find()
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Role::from).collect())
    }

    async fn create(&self, role: &Role) -> AppResult<Role> {
        let now = chrono::Utc::now();
        let model = role::ActiveModel {
            code: Set(role.code.clone()),
            name: Set(role.name.clone()),
            description: Set(role.description.clone()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let saved = model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Role::from(saved))
    }

    async fn update(&self, role: &Role) -> AppResult<Role> {
        let id = role.id.ok_or(AppError::NotFound)?;

        let existing = RoleEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?
            .ok_or(AppError::NotFound)?;

        let mut active: role::ActiveModel = existing.into();
        active.code = Set(role.code.clone());
        active.name = Set(role.name.clone());
        active.description = Set(role.description.clone());
        active.updated_at = Set(chrono::Utc::now());

        let saved = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Role::from(saved))
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let result = RoleEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}
