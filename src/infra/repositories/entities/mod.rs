//! SeaORM database entities.

pub mod attribute;
pub mod attribute_value;
pub mod entity_type;
pub mod role;
pub mod user;
pub mod user_role;
