//! Migration: Create the EAV tables.
//!
//! The unique index over (attribute_id, entity_type, entity_id) is
//! what the attribute value upsert relies on; without it concurrent
//! writers could leave duplicate rows for one natural key.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EntityTypes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EntityTypes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EntityTypes::Code)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(EntityTypes::Name).string().not_null())
                    .col(ColumnDef::new(EntityTypes::Description).text().null())
                    .col(
                        ColumnDef::new(EntityTypes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EntityTypes::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Attributes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Attributes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Attributes::Code)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Attributes::Name).string().not_null())
                    .col(ColumnDef::new(Attributes::Type).string().not_null())
                    .col(ColumnDef::new(Attributes::Description).text().null())
                    .col(
                        ColumnDef::new(Attributes::IsRequired)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Attributes::EntityTypeId).big_integer().null())
                    .col(
                        ColumnDef::new(Attributes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Attributes::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attributes_entity_type")
                            .from(Attributes::Table, Attributes::EntityTypeId)
                            .to(EntityTypes::Table, EntityTypes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AttributeValues::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AttributeValues::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AttributeValues::AttributeId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttributeValues::EntityType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttributeValues::EntityId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AttributeValues::Value).text().not_null())
                    .col(
                        ColumnDef::new(AttributeValues::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttributeValues::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attribute_values_attribute")
                            .from(AttributeValues::Table, AttributeValues::AttributeId)
                            .to(Attributes::Table, Attributes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Secondary index for per-entity reads
        manager
            .create_index(
                Index::create()
                    .name("idx_attribute_values_entity")
                    .table(AttributeValues::Table)
                    .col(AttributeValues::EntityType)
                    .col(AttributeValues::EntityId)
                    .to_owned(),
            )
            .await?;

        // One value per (attribute, entity type, entity id)
        manager
            .create_index(
                Index::create()
                    .name("uq_attribute_values_natural_key")
                    .table(AttributeValues::Table)
                    .col(AttributeValues::AttributeId)
                    .col(AttributeValues::EntityType)
                    .col(AttributeValues::EntityId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AttributeValues::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Attributes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(EntityTypes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum EntityTypes {
    Table,
    Id,
    Code,
    Name,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Attributes {
    Table,
    Id,
    Code,
    Name,
    Type,
    Description,
    IsRequired,
    EntityTypeId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum AttributeValues {
    Table,
    Id,
    AttributeId,
    EntityType,
    EntityId,
    Value,
    CreatedAt,
    UpdatedAt,
}
