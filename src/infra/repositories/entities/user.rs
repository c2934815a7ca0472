//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{Status, User};
use crate::errors::AppResult;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub phone: Option<String>,
    pub status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl Related<super::role::Entity> for Entity {
    fn to() -> RelationDef {
        super::user_role::Relation::Role.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::user_role::Relation::User.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Convert to the domain entity. Fails if the stored status text
    /// is outside the known set.
    pub fn into_domain(self) -> AppResult<User> {
        Ok(User::from_storage(
            self.id,
            self.name,
            self.email,
            self.phone,
            Status::parse(&self.status)?,
            self.created_at,
            self.updated_at,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(status: &str) -> Model {
        let now = chrono::Utc::now();
        Model {
            id: 5,
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            phone: None,
            status: status.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn into_domain_maps_known_status() {
        let user = model("active").into_domain().unwrap();
        assert_eq!(user.status, Status::Active);
        assert_eq!(user.id, Some(5));
    }

    #[test]
    fn into_domain_rejects_corrupt_status() {
        assert!(model("archived").into_domain().is_err());
    }
}
