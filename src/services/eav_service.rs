//! EAV service - the single entry point for dynamic attribute access.
//!
//! Orchestrates attribute resolution, value coercion and persistence.
//! Read-path coercion failures propagate as errors from this layer;
//! the `FieldAccess` boundary below is the one place that converts
//! them to "absent".

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::{EntityFields, TypedValue};
use crate::errors::{AppError, AppResult};
use crate::infra::{AttributeRepository, AttributeValueRepository};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Attribute store trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait EavStore: Send + Sync {
    /// Set an attribute value for an entity.
    ///
    /// Fails with `AttributeNotFound` when the code does not resolve,
    /// and with `AttributeNotApplicable` when the attribute is scoped
    /// to a different entity type. On success exactly one persisted
    /// row reflects the new value.
    async fn set_attribute_value(
        &self,
        entity_type: &str,
        entity_id: i64,
        attribute_code: &str,
        value: TypedValue,
    ) -> AppResult<()>;

    /// Get one attribute value for an entity, coerced to its declared
    /// type. A missing attribute or missing value row is absent, not
    /// an error.
    async fn get_attribute_value(
        &self,
        entity_type: &str,
        entity_id: i64,
        attribute_code: &str,
    ) -> AppResult<Option<TypedValue>>;

    /// Get all attribute values for an entity, keyed by attribute code.
    async fn get_attribute_values(
        &self,
        entity_type: &str,
        entity_id: i64,
    ) -> AppResult<HashMap<String, TypedValue>>;

    /// Delete every attribute value for an entity. Compensating action
    /// for owner deletion; returns the number of rows removed.
    async fn delete_entity_values(&self, entity_type: &str, entity_id: i64) -> AppResult<u64>;
}

/// Concrete implementation of EavStore
pub struct EavService {
    attributes: Arc<dyn AttributeRepository>,
    values: Arc<dyn AttributeValueRepository>,
}

impl EavService {
    /// Create new service instance with its repositories
    pub fn new(
        attributes: Arc<dyn AttributeRepository>,
        values: Arc<dyn AttributeValueRepository>,
    ) -> Self {
        Self { attributes, values }
    }
}

#[async_trait]
impl EavStore for EavService {
    async fn set_attribute_value(
        &self,
        entity_type: &str,
        entity_id: i64,
        attribute_code: &str,
        value: TypedValue,
    ) -> AppResult<()> {
        let attribute = self
            .attributes
            .find_by_code(attribute_code)
            .await?
            .ok_or_else(|| AppError::AttributeNotFound(attribute_code.to_string()))?;

        if !attribute.applies_to(entity_type) {
            return Err(AppError::AttributeNotApplicable {
                attribute: attribute_code.to_string(),
                entity_type: entity_type.to_string(),
            });
        }

        let attribute_id = attribute
            .id
            .ok_or_else(|| AppError::internal("resolved attribute has no storage id"))?;
        let stored = value.to_stored(attribute.value_type);

        self.values
            .upsert(attribute_id, entity_type, entity_id, &stored)
            .await?;

        tracing::debug!(
            entity_type,
            entity_id,
            attribute = attribute_code,
            "attribute value written"
        );
        Ok(())
    }

    async fn get_attribute_value(
        &self,
        entity_type: &str,
        entity_id: i64,
        attribute_code: &str,
    ) -> AppResult<Option<TypedValue>> {
        let Some(attribute) = self.attributes.find_by_code(attribute_code).await? else {
            return Ok(None);
        };
        let attribute_id = attribute
            .id
            .ok_or_else(|| AppError::internal("resolved attribute has no storage id"))?;

        let Some(row) = self
            .values
            .find_by_entity_and_attribute(entity_type, entity_id, attribute_id)
            .await?
        else {
            return Ok(None);
        };

        row.typed_value().map(Some)
    }

    async fn get_attribute_values(
        &self,
        entity_type: &str,
        entity_id: i64,
    ) -> AppResult<HashMap<String, TypedValue>> {
        let rows = self.values.find_by_entity(entity_type, entity_id).await?;

        let mut result = HashMap::with_capacity(rows.len());
        for row in rows {
            let typed = row.typed_value()?;
            result.insert(row.attribute.code, typed);
        }
        Ok(result)
    }

    async fn delete_entity_values(&self, entity_type: &str, entity_id: i64) -> AppResult<u64> {
        let removed = self.values.delete_by_entity(entity_type, entity_id).await?;
        tracing::debug!(entity_type, entity_id, removed, "attribute values deleted");
        Ok(removed)
    }
}

/// Generic field access over native columns plus dynamic attributes.
///
/// Reads are fail-open: a broken dynamic-attribute configuration must
/// not take native field access down with it, so store errors are
/// logged and reported as absent. Writes are caller-initiated and
/// propagate their errors.
#[async_trait]
pub trait FieldAccess: EntityFields {
    /// Get a field by name: native columns first, then the attribute
    /// store. Absent when the name resolves nowhere, the native column
    /// holds no value, or the entity has no storage identity yet.
    async fn get_field(&self, store: &dyn EavStore, name: &str) -> AppResult<Option<TypedValue>>;

    /// Set a field by name: native columns first, then the attribute
    /// store. Dynamic writes on an unsaved entity are buffered until
    /// it is persisted.
    async fn set_field(
        &mut self,
        store: &dyn EavStore,
        name: &str,
        value: TypedValue,
    ) -> AppResult<()>;
}

#[async_trait]
impl<T> FieldAccess for T
where
    T: EntityFields + Send + Sync,
{
    async fn get_field(&self, store: &dyn EavStore, name: &str) -> AppResult<Option<TypedValue>> {
        if let Some(native) = self.native_field(name) {
            return Ok(Some(native));
        }

        // A native column holding no value is still native: it answers
        // absent directly and is never shadowed by a dynamic attribute
        // of the same name.
        if self.is_native_field(name) {
            return Ok(None);
        }

        let Some(entity_id) = self.storage_id() else {
            return Ok(None);
        };

        match store
            .get_attribute_value(self.entity_type_code(), entity_id, name)
            .await
        {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::warn!(
                    entity_type = self.entity_type_code(),
                    entity_id,
                    field = name,
                    error = %e,
                    "dynamic field read failed, treating as absent"
                );
                Ok(None)
            }
        }
    }

    async fn set_field(
        &mut self,
        store: &dyn EavStore,
        name: &str,
        value: TypedValue,
    ) -> AppResult<()> {
        if self.set_native_field(name, &value)? {
            return Ok(());
        }

        match self.storage_id() {
            Some(entity_id) => {
                store
                    .set_attribute_value(self.entity_type_code(), entity_id, name, value)
                    .await
            }
            None => {
                self.buffer_dynamic(name, value);
                Ok(())
            }
        }
    }
}
