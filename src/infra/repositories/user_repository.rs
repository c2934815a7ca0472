//! User repository implementation with role assignment support.

use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, ModelTrait,
    QueryFilter, Set,
};

use super::entities::role::{self, Entity as RoleEntity};
use super::entities::user::{self, Entity as UserEntity};
use super::entities::user_role::{self, Entity as UserRoleEntity};
use crate::domain::{Role, User};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>>;

    /// Find user by email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// List all users
    async fn list(&self) -> AppResult<Vec<User>>;

    /// Persist a new user
    async fn create(&self, user: &User) -> AppResult<User>;

    /// Update user fields
    async fn update(&self, user: &User) -> AppResult<User>;

    /// Delete user by ID
    async fn delete(&self, id: i64) -> AppResult<()>;

    /// List the roles assigned to a user
    async fn roles(&self, user_id: i64) -> AppResult<Vec<Role>>;

    /// Assign a role to a user (idempotent)
    async fn assign_role(&self, user_id: i64, role_id: i64) -> AppResult<()>;

    /// Remove a role from a user
    async fn remove_role(&self, user_id: i64, role_id: i64) -> AppResult<()>;

    /// Check whether a user carries a role with the given code
    async fn has_role(&self, user_id: i64, role_code: &str) -> AppResult<bool>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn require_user(&self, id: i64) -> AppResult<user::Model> {
        UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?
            .ok_or(AppError::NotFound)
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        result.map(user::Model::into_domain).transpose()
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        result.map(user::Model::into_domain).transpose()
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let models = UserEntity::find()
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        models.into_iter().map(user::Model::into_domain).collect()
    }

    async fn create(&self, user: &User) -> AppResult<User> {
        let now = chrono::Utc::now();
        let model = user::ActiveModel {
            name: Set(user.name.clone()),
            email: Set(user.email.clone()),
            phone: Set(user.phone.clone()),
            status: Set(user.status.as_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let saved = model.insert(&self.db).await.map_err(AppError::from)?;
        saved.into_domain()
    }

    async fn update(&self, user: &User) -> AppResult<User> {
        let id = user.id.ok_or(AppError::NotFound)?;
        let existing = self.require_user(id).await?;

        let mut active: user::ActiveModel = existing.into();
        active.name = Set(user.name.clone());
        active.email = Set(user.email.clone());
        active.phone = Set(user.phone.clone());
        active.status = Set(user.status.as_str().to_string());
        active.updated_at = Set(chrono::Utc::now());

        let saved = active.update(&self.db).await.map_err(AppError::from)?;
        saved.into_domain()
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let result = UserEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    async fn roles(&self, user_id: i64) -> AppResult<Vec<Role>> {
        let user = self.require_user(user_id).await?;
        let roles = user
            .find_related(RoleEntity)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(roles.into_iter().map(Role::from).collect())
    }

    async fn assign_role(&self, user_id: i64, role_id: i64) -> AppResult<()> {
        let model = user_role::ActiveModel {
            user_id: Set(user_id),
            role_id: Set(role_id),
        };

        let insert = UserRoleEntity::insert(model)
            .on_conflict(
                OnConflict::columns([user_role::Column::UserId, user_role::Column::RoleId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec(&self.db)
            .await;

        match insert {
            // Already assigned
            Err(DbErr::RecordNotInserted) => Ok(()),
            Err(e) => Err(AppError::from(e)),
            Ok(_) => Ok(()),
        }
    }

    async fn remove_role(&self, user_id: i64, role_id: i64) -> AppResult<()> {
        let result = UserRoleEntity::delete_many()
            .filter(user_role::Column::UserId.eq(user_id))
            .filter(user_role::Column::RoleId.eq(role_id))
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    async fn has_role(&self, user_id: i64, role_code: &str) -> AppResult<bool> {
        let user = self.require_user(user_id).await?;
        let matched = user
            .find_related(RoleEntity)
            .filter(role::Column::Code.eq(role_code))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(matched.is_some())
    }
}
