//! Attribute value database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "attribute_values")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub attribute_id: i64,
    pub entity_type: String,
    pub entity_id: i64,
    #[sea_orm(column_type = "Text")]
    pub value: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::attribute::Entity",
        from = "Column::AttributeId",
        to = "super::attribute::Column::Id"
    )]
    Attribute,
}

impl Related<super::attribute::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attribute.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Convert to the domain entity with its resolved attribute
    pub fn into_domain(self, attribute: domain::Attribute) -> domain::AttributeValue {
        domain::AttributeValue {
            id: Some(self.id),
            attribute,
            entity_type: self.entity_type,
            entity_id: self.entity_id,
            value: self.value,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
