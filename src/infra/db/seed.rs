//! Default data seeder.
//!
//! Idempotent: codes are upserted, so re-running refreshes names and
//! descriptions without duplicating rows.

use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set};

use crate::config::{
    ENTITY_TYPE_CHATBOT, ENTITY_TYPE_DOCTOR, ENTITY_TYPE_PATIENT, ENTITY_TYPE_USER, ROLE_ADMIN,
};
use crate::errors::{AppError, AppResult};
use crate::infra::repositories::entities::{attribute, entity_type, role, user, user_role};

const DEFAULT_ROLES: &[(&str, &str, &str)] = &[
    (ROLE_ADMIN, "Administrator", "System administrator with full access"),
    ("doctor", "Doctor", "Medical doctor"),
    ("nurse", "Nurse", "Medical nurse"),
    ("patient", "Patient", "Patient user"),
    ("staff", "Staff", "General staff member"),
];

const DEFAULT_ENTITY_TYPES: &[(&str, &str, &str)] = &[
    (ENTITY_TYPE_USER, "User", "System user"),
    (ENTITY_TYPE_DOCTOR, "Doctor", "Doctor profile"),
    (ENTITY_TYPE_PATIENT, "Patient", "Patient profile"),
    (ENTITY_TYPE_CHATBOT, "Chatbot", "Chatbot instance"),
];

/// (code, name, type, description, is_required, entity type scope)
const DEFAULT_ATTRIBUTES: &[(&str, &str, &str, &str, bool, &str)] = &[
    (
        "specialty",
        "Specialty",
        "string",
        "Medical specialty",
        true,
        ENTITY_TYPE_DOCTOR,
    ),
    (
        "license_number",
        "License Number",
        "string",
        "Professional license number",
        true,
        ENTITY_TYPE_DOCTOR,
    ),
    (
        "blood_type",
        "Blood Type",
        "string",
        "Patient blood type",
        false,
        ENTITY_TYPE_PATIENT,
    ),
    (
        "date_of_birth",
        "Date of Birth",
        "date",
        "Patient date of birth",
        true,
        ENTITY_TYPE_PATIENT,
    ),
];

/// Seed default roles, entity types, attributes and the admin user.
pub async fn seed_defaults(db: &DatabaseConnection) -> AppResult<()> {
    let now = chrono::Utc::now();

    for (code, name, description) in DEFAULT_ROLES {
        let model = role::ActiveModel {
            code: Set(code.to_string()),
            name: Set(name.to_string()),
            description: Set(Some(description.to_string())),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        role::Entity::insert(model)
            .on_conflict(
                OnConflict::column(role::Column::Code)
                    .update_columns([
                        role::Column::Name,
                        role::Column::Description,
                        role::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(db)
            .await
            .map_err(AppError::from)?;
    }

    for (code, name, description) in DEFAULT_ENTITY_TYPES {
        let model = entity_type::ActiveModel {
            code: Set(code.to_string()),
            name: Set(name.to_string()),
            description: Set(Some(description.to_string())),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        entity_type::Entity::insert(model)
            .on_conflict(
                OnConflict::column(entity_type::Column::Code)
                    .update_columns([
                        entity_type::Column::Name,
                        entity_type::Column::Description,
                        entity_type::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(db)
            .await
            .map_err(AppError::from)?;
    }

    seed_admin_user(db, now).await?;
    seed_attributes(db, now).await?;

    tracing::info!("Default data seeded");
    Ok(())
}

async fn seed_admin_user(
    db: &DatabaseConnection,
    now: chrono::DateTime<chrono::Utc>,
) -> AppResult<()> {
    let existing = user::Entity::find()
        .filter(user::Column::Email.eq("admin@example.com"))
        .one(db)
        .await
        .map_err(AppError::from)?;

    let admin_id = match existing {
        Some(model) => model.id,
        None => {
            let model = user::ActiveModel {
                name: Set("System Admin".to_string()),
                email: Set("admin@example.com".to_string()),
                phone: Set(None),
                status: Set("active".to_string()),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            };
            user::Entity::insert(model)
                .exec(db)
                .await
                .map_err(AppError::from)?
                .last_insert_id
        }
    };

    let admin_role = role::Entity::find()
        .filter(role::Column::Code.eq(ROLE_ADMIN))
        .one(db)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::internal("admin role missing after seeding"))?;

    let link = user_role::ActiveModel {
        user_id: Set(admin_id),
        role_id: Set(admin_role.id),
    };
    match user_role::Entity::insert(link)
        .on_conflict(
            OnConflict::columns([user_role::Column::UserId, user_role::Column::RoleId])
                .do_nothing()
                .to_owned(),
        )
        .exec(db)
        .await
    {
        Ok(_) | Err(DbErr::RecordNotInserted) => Ok(()),
        Err(e) => Err(AppError::from(e)),
    }
}

async fn seed_attributes(
    db: &DatabaseConnection,
    now: chrono::DateTime<chrono::Utc>,
) -> AppResult<()> {
    for (code, name, type_name, description, is_required, scope) in DEFAULT_ATTRIBUTES {
        let scope_id = entity_type::Entity::find()
            .filter(entity_type::Column::Code.eq(*scope))
            .one(db)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::internal(format!("entity type '{scope}' missing")))?
            .id;

        let model = attribute::ActiveModel {
            code: Set(code.to_string()),
            name: Set(name.to_string()),
            value_type: Set(type_name.to_string()),
            description: Set(Some(description.to_string())),
            is_required: Set(*is_required),
            entity_type_id: Set(Some(scope_id)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        attribute::Entity::insert(model)
            .on_conflict(
                OnConflict::column(attribute::Column::Code)
                    .update_columns([
                        attribute::Column::Name,
                        attribute::Column::ValueType,
                        attribute::Column::Description,
                        attribute::Column::IsRequired,
                        attribute::Column::EntityTypeId,
                        attribute::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(db)
            .await
            .map_err(AppError::from)?;
    }

    Ok(())
}
