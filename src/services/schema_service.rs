//! Schema service: administration of entity types and attribute
//! definitions (the EAV catalog).

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{Attribute, EntityType};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{AttributeRepository, EntityTypeRepository};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Schema service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait SchemaService: Send + Sync {
    /// Get entity type by ID
    async fn get_entity_type(&self, id: i64) -> AppResult<EntityType>;

    /// Get entity type by code
    async fn get_entity_type_by_code(&self, code: &str) -> AppResult<EntityType>;

    /// List all entity types
    async fn list_entity_types(&self) -> AppResult<Vec<EntityType>>;

    /// Register a new entity type (code uniqueness enforced)
    async fn create_entity_type(&self, entity_type: &EntityType) -> AppResult<EntityType>;

    /// Update an existing entity type
    async fn update_entity_type(&self, entity_type: &EntityType) -> AppResult<EntityType>;

    /// Delete an entity type; its scoped attributes cascade away
    async fn delete_entity_type(&self, id: i64) -> AppResult<()>;

    /// Get attribute definition by ID
    async fn get_attribute(&self, id: i64) -> AppResult<Attribute>;

    /// Get attribute definition by code
    async fn get_attribute_by_code(&self, code: &str) -> AppResult<Attribute>;

    /// List all attribute definitions
    async fn list_attributes(&self) -> AppResult<Vec<Attribute>>;

    /// Register a new attribute definition (code uniqueness enforced;
    /// a declared scope must name a registered entity type)
    async fn create_attribute(&self, attribute: &Attribute) -> AppResult<Attribute>;

    /// Update an existing attribute definition
    async fn update_attribute(&self, attribute: &Attribute) -> AppResult<Attribute>;

    /// Delete an attribute definition; its values cascade away
    async fn delete_attribute(&self, id: i64) -> AppResult<()>;
}

/// Concrete implementation of SchemaService
pub struct SchemaManager {
    entity_types: Arc<dyn EntityTypeRepository>,
    attributes: Arc<dyn AttributeRepository>,
}

impl SchemaManager {
    /// Create new service instance with its repositories
    pub fn new(
        entity_types: Arc<dyn EntityTypeRepository>,
        attributes: Arc<dyn AttributeRepository>,
    ) -> Self {
        Self {
            entity_types,
            attributes,
        }
    }

    /// Resolve an attribute's declared scope against the registered
    /// entity types, returning the persisted scope (id filled in).
    async fn resolve_scope(&self, attribute: &Attribute) -> AppResult<Option<EntityType>> {
        let Some(scope) = attribute.entity_type.as_ref() else {
            return Ok(None);
        };

        let registered = self
            .entity_types
            .find_by_code(&scope.code)
            .await?
            .ok_or_else(|| {
                AppError::validation(format!(
                    "unknown entity type '{}' in attribute scope",
                    scope.code
                ))
            })?;
        Ok(Some(registered))
    }
}

#[async_trait]
impl SchemaService for SchemaManager {
    async fn get_entity_type(&self, id: i64) -> AppResult<EntityType> {
        self.entity_types.find_by_id(id).await?.ok_or_not_found()
    }

    async fn get_entity_type_by_code(&self, code: &str) -> AppResult<EntityType> {
        self.entity_types.find_by_code(code).await?.ok_or_not_found()
    }

    async fn list_entity_types(&self) -> AppResult<Vec<EntityType>> {
        self.entity_types.list().await
    }

    async fn create_entity_type(&self, entity_type: &EntityType) -> AppResult<EntityType> {
        if self
            .entity_types
            .find_by_code(&entity_type.code)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(format!(
                "entity type '{}'",
                entity_type.code
            )));
        }

        let created = self.entity_types.create(entity_type).await?;
        tracing::info!(code = %created.code, "entity type registered");
        Ok(created)
    }

    async fn update_entity_type(&self, entity_type: &EntityType) -> AppResult<EntityType> {
        self.entity_types.update(entity_type).await
    }

    async fn delete_entity_type(&self, id: i64) -> AppResult<()> {
        self.entity_types.delete(id).await
    }

    async fn get_attribute(&self, id: i64) -> AppResult<Attribute> {
        self.attributes.find_by_id(id).await?.ok_or_not_found()
    }

    async fn get_attribute_by_code(&self, code: &str) -> AppResult<Attribute> {
        self.attributes.find_by_code(code).await?.ok_or_not_found()
    }

    async fn list_attributes(&self) -> AppResult<Vec<Attribute>> {
        self.attributes.list().await
    }

    async fn create_attribute(&self, attribute: &Attribute) -> AppResult<Attribute> {
        if self
            .attributes
            .find_by_code(&attribute.code)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(format!(
                "attribute '{}'",
                attribute.code
            )));
        }

        let mut to_create = attribute.clone();
        to_create.entity_type = self.resolve_scope(attribute).await?;

        let created = self.attributes.create(&to_create).await?;
        tracing::info!(
            code = %created.code,
            value_type = %created.value_type,
            "attribute registered"
        );
        Ok(created)
    }

    async fn update_attribute(&self, attribute: &Attribute) -> AppResult<Attribute> {
        let mut to_update = attribute.clone();
        to_update.entity_type = self.resolve_scope(attribute).await?;
        self.attributes.update(&to_update).await
    }

    async fn delete_attribute(&self, id: i64) -> AppResult<()> {
        self.attributes.delete(id).await
    }
}
