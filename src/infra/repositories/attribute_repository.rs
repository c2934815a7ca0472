//! Attribute definition repository implementation.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use super::entities::attribute::{self, Entity as AttributeEntity};
use super::entities::entity_type::Entity as EntityTypeEntity;
use crate::domain::Attribute;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Attribute repository trait for dependency injection.
///
/// Lookups load the optional scoping entity type alongside the
/// attribute, so callers can enforce applicability without a second
/// query.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AttributeRepository: Send + Sync {
    /// Find attribute by primary key
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Attribute>>;

    /// Find attribute by its unique code
    async fn find_by_code(&self, code: &str) -> AppResult<Option<Attribute>>;

    /// List all attribute definitions
    async fn list(&self) -> AppResult<Vec<Attribute>>;

    /// Persist a new attribute definition
    async fn create(&self, attribute: &Attribute) -> AppResult<Attribute>;

    /// Update an existing attribute definition
    async fn update(&self, attribute: &Attribute) -> AppResult<Attribute>;

    /// Delete an attribute definition by id
    async fn delete(&self, id: i64) -> AppResult<()>;
}

/// Concrete implementation of AttributeRepository
pub struct AttributeStore {
    db: DatabaseConnection,
}

impl AttributeStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AttributeRepository for AttributeStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Attribute>> {
        let result = AttributeEntity::find_by_id(id)
            .find_also_related(EntityTypeEntity)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        result.map(|(model, et)| model.into_domain(et)).transpose()
    }

    async fn find_by_code(&self, code: &str) -> AppResult<Option<Attribute>> {
        let result = AttributeEntity::find()
            .filter(attribute::Column::Code.eq(code))
            .find_also_related(EntityTypeEntity)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        result.map(|(model, et)| model.into_domain(et)).transpose()
    }

    async fn list(&self) -> AppResult<Vec<Attribute>> {
        let rows = AttributeEntity::find()
            .find_also_related(EntityTypeEntity)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        rows.into_iter()
            .map(|(model, et)| model.into_domain(et))
            .collect()
    }

    async fn create(&self, attribute: &Attribute) -> AppResult<Attribute> {
        let now = chrono::Utc::now();
        let model = attribute::ActiveModel {
            code: Set(attribute.code.clone()),
            name: Set(attribute.name.clone()),
            value_type: Set(attribute.value_type.as_str().to_string()),
            description: Set(attribute.description.clone()),
            is_required: Set(attribute.is_required),
            entity_type_id: Set(attribute.entity_type.as_ref().and_then(|et| et.id)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let saved = model.insert(&self.db).await.map_err(AppError::from)?;
        let mut created = saved.into_domain(None)?;
        created.entity_type = attribute.entity_type.clone();
        Ok(created)
    }

    async fn update(&self, attribute: &Attribute) -> AppResult<Attribute> {
        let id = attribute.id.ok_or(AppError::NotFound)?;

        let existing = AttributeEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?
            .ok_or(AppError::NotFound)?;

        let mut active: attribute::ActiveModel = existing.into();
        active.code = Set(attribute.code.clone());
        active.name = Set(attribute.name.clone());
        active.value_type = Set(attribute.value_type.as_str().to_string());
        active.description = Set(attribute.description.clone());
        active.is_required = Set(attribute.is_required);
        active.entity_type_id = Set(attribute.entity_type.as_ref().and_then(|et| et.id));
        active.updated_at = Set(chrono::Utc::now());

        let saved = active.update(&self.db).await.map_err(AppError::from)?;
        let mut updated = saved.into_domain(None)?;
        updated.entity_type = attribute.entity_type.clone();
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let result = AttributeEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}
