//! Repository layer: SeaORM entities and repository implementations.

pub mod entities;

mod attribute_repository;
mod attribute_value_repository;
mod entity_type_repository;
mod role_repository;
mod user_repository;

pub use attribute_repository::{AttributeRepository, AttributeStore};
pub use attribute_value_repository::{AttributeValueRepository, AttributeValueStore};
pub use entity_type_repository::{EntityTypeRepository, EntityTypeStore};
pub use role_repository::{RoleRepository, RoleStore};
pub use user_repository::{UserRepository, UserStore};

#[cfg(any(test, feature = "test-utils"))]
pub use attribute_repository::MockAttributeRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use attribute_value_repository::MockAttributeValueRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use entity_type_repository::MockEntityTypeRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use role_repository::MockRoleRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
