//! Service container wiring repositories into services.

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::infra::repositories::{
    AttributeStore, AttributeValueStore, EntityTypeStore, RoleStore, UserStore,
};
use crate::services::{
    EavService, EavStore, RoleManager, RoleService, SchemaManager, SchemaService, UserManager,
    UserService,
};

/// Holds all application services with their wired dependencies.
pub struct Services {
    eav: Arc<dyn EavStore>,
    schema: Arc<dyn SchemaService>,
    users: Arc<dyn UserService>,
    roles: Arc<dyn RoleService>,
}

impl Services {
    /// Wire repositories and services from a live database connection.
    pub fn from_connection(db: DatabaseConnection) -> Self {
        let entity_type_repo = Arc::new(EntityTypeStore::new(db.clone()));
        let attribute_repo = Arc::new(AttributeStore::new(db.clone()));
        let value_repo = Arc::new(AttributeValueStore::new(db.clone()));
        let user_repo = Arc::new(UserStore::new(db.clone()));
        let role_repo = Arc::new(RoleStore::new(db));

        let eav: Arc<dyn EavStore> =
            Arc::new(EavService::new(attribute_repo.clone(), value_repo));
        let schema: Arc<dyn SchemaService> =
            Arc::new(SchemaManager::new(entity_type_repo, attribute_repo));
        let users: Arc<dyn UserService> = Arc::new(UserManager::new(
            user_repo,
            role_repo.clone(),
            eav.clone(),
        ));
        let roles: Arc<dyn RoleService> = Arc::new(RoleManager::new(role_repo));

        Self {
            eav,
            schema,
            users,
            roles,
        }
    }

    pub fn eav(&self) -> Arc<dyn EavStore> {
        self.eav.clone()
    }

    pub fn schema(&self) -> Arc<dyn SchemaService> {
        self.schema.clone()
    }

    pub fn users(&self) -> Arc<dyn UserService> {
        self.users.clone()
    }

    pub fn roles(&self) -> Arc<dyn RoleService> {
        self.roles.clone()
    }
}
