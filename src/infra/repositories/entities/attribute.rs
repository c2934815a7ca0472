//! Attribute database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{self, AttributeType};
use crate::errors::AppResult;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "attributes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub code: String,
    pub name: String,
    /// Declared value type, stored as its lowercase name
    #[sea_orm(column_name = "type")]
    pub value_type: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub is_required: bool,
    pub entity_type_id: Option<i64>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::entity_type::Entity",
        from = "Column::EntityTypeId",
        to = "super::entity_type::Column::Id"
    )]
    EntityType,
    #[sea_orm(has_many = "super::attribute_value::Entity")]
    AttributeValue,
}

impl Related<super::entity_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EntityType.def()
    }
}

impl Related<super::attribute_value::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AttributeValue.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Convert to the domain entity, attaching the optional scoping
    /// entity type. Fails if the stored type name is outside the
    /// closed enum.
    pub fn into_domain(
        self,
        entity_type: Option<super::entity_type::Model>,
    ) -> AppResult<domain::Attribute> {
        Ok(domain::Attribute {
            id: Some(self.id),
            code: self.code,
            name: self.name,
            value_type: AttributeType::parse(&self.value_type)?,
            entity_type: entity_type.map(domain::EntityType::from),
            is_required: self.is_required,
            description: self.description,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
