//! Infrastructure concerns: database access and repositories.

pub mod db;
pub mod repositories;

pub use db::{Database, Migrator};
pub use repositories::{
    AttributeRepository, AttributeStore, AttributeValueRepository, AttributeValueStore,
    EntityTypeRepository, EntityTypeStore, RoleRepository, RoleStore, UserRepository, UserStore,
};
