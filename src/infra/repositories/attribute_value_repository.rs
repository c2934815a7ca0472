//! Attribute value repository implementation.
//!
//! Writes go through a single insert-or-update on the natural key
//! `(attribute_id, entity_type, entity_id)`, so concurrent writers
//! racing on the same key resolve to one surviving row.

use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};

use super::entities::attribute::Entity as AttributeEntity;
use super::entities::attribute_value::{self, Entity as AttributeValueEntity};
use crate::domain::AttributeValue;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Attribute value repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AttributeValueRepository: Send + Sync {
    /// Find a value row by primary key
    async fn find_by_id(&self, id: i64) -> AppResult<Option<AttributeValue>>;

    /// Find all value rows for one entity, attributes attached
    async fn find_by_entity(
        &self,
        entity_type: &str,
        entity_id: i64,
    ) -> AppResult<Vec<AttributeValue>>;

    /// Find the value row for one (entity, attribute) pair
    async fn find_by_entity_and_attribute(
        &self,
        entity_type: &str,
        entity_id: i64,
        attribute_id: i64,
    ) -> AppResult<Option<AttributeValue>>;

    /// Insert or overwrite the value for the natural key
    /// `(attribute_id, entity_type, entity_id)` in one atomic statement
    async fn upsert(
        &self,
        attribute_id: i64,
        entity_type: &str,
        entity_id: i64,
        value: &str,
    ) -> AppResult<()>;

    /// Delete a single value row; NotFound when the id no longer exists
    async fn delete(&self, id: i64) -> AppResult<()>;

    /// Delete all value rows for one entity (compensating action when
    /// the owning entity is removed). Returns the number of rows removed.
    async fn delete_by_entity(&self, entity_type: &str, entity_id: i64) -> AppResult<u64>;
}

/// Concrete implementation of AttributeValueRepository
pub struct AttributeValueStore {
    db: DatabaseConnection,
}

impl AttributeValueStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Attach the resolved attribute to a value row.
///
/// The attribute's own scoping entity type is not loaded here; value
/// reads only need the declared value type, matching how the rows are
/// consumed.
fn map_row(
    model: attribute_value::Model,
    attribute: Option<super::entities::attribute::Model>,
) -> AppResult<AttributeValue> {
    let attribute = attribute
        .ok_or_else(|| AppError::internal("attribute value row without attribute"))?
        .into_domain(None)?;
    Ok(model.into_domain(attribute))
}

#[async_trait]
impl AttributeValueRepository for AttributeValueStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<AttributeValue>> {
        let result = AttributeValueEntity::find_by_id(id)
            .find_also_related(AttributeEntity)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        result.map(|(model, attr)| map_row(model, attr)).transpose()
    }

    async fn find_by_entity(
        &self,
        entity_type: &str,
        entity_id: i64,
    ) -> AppResult<Vec<AttributeValue>> {
        let rows = AttributeValueEntity::find()
            .filter(attribute_value::Column::EntityType.eq(entity_type))
            .filter(attribute_value::Column::EntityId.eq(entity_id))
            .find_also_related(AttributeEntity)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        rows.into_iter()
            .map(|(model, attr)| map_row(model, attr))
            .collect()
    }

    async fn find_by_entity_and_attribute(
        &self,
        entity_type: &str,
        entity_id: i64,
        attribute_id: i64,
    ) -> AppResult<Option<AttributeValue>> {
        let result = AttributeValueEntity::find()
            .filter(attribute_value::Column::EntityType.eq(entity_type))
            .filter(attribute_value::Column::EntityId.eq(entity_id))
            .filter(attribute_value::Column::AttributeId.eq(attribute_id))
            .find_also_related(AttributeEntity)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        result.map(|(model, attr)| map_row(model, attr)).transpose()
    }

    async fn upsert(
        &self,
        attribute_id: i64,
        entity_type: &str,
        entity_id: i64,
        value: &str,
    ) -> AppResult<()> {
        let now = chrono::Utc::now();
        let model = attribute_value::ActiveModel {
            attribute_id: Set(attribute_id),
            entity_type: Set(entity_type.to_string()),
            entity_id: Set(entity_id),
            value: Set(value.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        AttributeValueEntity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    attribute_value::Column::AttributeId,
                    attribute_value::Column::EntityType,
                    attribute_value::Column::EntityId,
                ])
                .update_columns([
                    attribute_value::Column::Value,
                    attribute_value::Column::UpdatedAt,
                ])
                .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(())
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let result = AttributeValueEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    async fn delete_by_entity(&self, entity_type: &str, entity_id: i64) -> AppResult<u64> {
        let result = AttributeValueEntity::delete_many()
            .filter(attribute_value::Column::EntityType.eq(entity_type))
            .filter(attribute_value::Column::EntityId.eq(entity_id))
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected)
    }
}
