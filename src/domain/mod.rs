//! Core business entities and logic.
//!
//! The EAV core lives here: the closed attribute type set with its
//! coercion rules, the attribute/entity-type/value entities, and the
//! field-access contract fixed-schema entities implement. User and
//! role entities round out the management side.

pub mod attribute;
pub mod attribute_value;
pub mod entity_type;
pub mod fields;
pub mod role;
pub mod user;
pub mod value;

pub use attribute::Attribute;
pub use attribute_value::AttributeValue;
pub use entity_type::EntityType;
pub use fields::EntityFields;
pub use role::Role;
pub use user::{Status, User};
pub use value::{AttributeType, TypedValue, DATETIME_FORMAT, DATE_FORMAT};

use crate::errors::{AppError, AppResult};

/// Normalize an identifying code: trimmed, lowercased, spaces
/// replaced with underscores. Empty input fails validation.
pub(crate) fn normalize_code(kind: &str, raw: &str) -> AppResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("{kind} cannot be empty")));
    }
    Ok(trimmed.to_lowercase().replace(' ', "_"))
}
