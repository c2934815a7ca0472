//! Business logic services.

pub mod container;
pub mod eav_service;
pub mod role_service;
pub mod schema_service;
pub mod user_service;

pub use container::Services;
pub use eav_service::{EavService, EavStore, FieldAccess};
pub use role_service::{RoleManager, RoleService};
pub use schema_service::{SchemaManager, SchemaService};
pub use user_service::{UserManager, UserService};

#[cfg(any(test, feature = "test-utils"))]
pub use eav_service::MockEavStore;
#[cfg(any(test, feature = "test-utils"))]
pub use role_service::MockRoleService;
#[cfg(any(test, feature = "test-utils"))]
pub use schema_service::MockSchemaService;
#[cfg(any(test, feature = "test-utils"))]
pub use user_service::MockUserService;
