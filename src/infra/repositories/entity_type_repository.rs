//! Entity type repository implementation.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use super::entities::entity_type::{self, Entity as EntityTypeEntity};
use crate::domain::EntityType;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Entity type repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait EntityTypeRepository: Send + Sync {
    /// Find entity type by primary key
    async fn find_by_id(&self, id: i64) -> AppResult<Option<EntityType>>;

    /// Find entity type by its unique code
    async fn find_by_code(&self, code: &str) -> AppResult<Option<EntityType>>;

    /// List all entity types
    async fn list(&self) -> AppResult<Vec<EntityType>>;

    /// Persist a new entity type
    async fn create(&self, entity_type: &EntityType) -> AppResult<EntityType>;

    /// Update an existing entity type
    async fn update(&self, entity_type: &EntityType) -> AppResult<EntityType>;

    /// Delete an entity type by id (scoped attributes cascade at the
    /// storage layer)
    async fn delete(&self, id: i64) -> AppResult<()>;
}

/// Concrete implementation of EntityTypeRepository
pub struct EntityTypeStore {
    db: DatabaseConnection,
}

impl EntityTypeStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EntityTypeRepository for EntityTypeStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<EntityType>> {
        let result = EntityTypeEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(EntityType::from))
    }

    async fn find_by_code(&self, code: &str) -> AppResult<Option<EntityType>> {
        let result = EntityTypeEntity::find()
            .filter(entity_type::Column::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(EntityType::from))
    }

    async fn list(&self) -> AppResult<Vec<EntityType>> {
        let models = EntityTypeEntity::find()
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(EntityType::from).collect())
    }

    async fn create(&self, entity_type: &EntityType) -> AppResult<EntityType> {
        let now = chrono::Utc::now();
        let model = entity_type::ActiveModel {
            code: Set(entity_type.code.clone()),
            name: Set(entity_type.name.clone()),
            description: Set(entity_type.description.clone()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let saved = model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(EntityType::from(saved))
    }

    async fn update(&self, entity_type: &EntityType) -> AppResult<EntityType> {
        let id = entity_type.id.ok_or(AppError::NotFound)?;

        let existing = EntityTypeEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?
            .ok_or(AppError::NotFound)?;

        let mut active: entity_type::ActiveModel = existing.into();
        active.code = Set(entity_type.code.clone());
        active.name = Set(entity_type.name.clone());
        active.description = Set(entity_type.description.clone());
        active.updated_at = Set(chrono::Utc::now());

        let saved = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(EntityType::from(saved))
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let result = EntityTypeEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}
