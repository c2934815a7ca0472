//! Generic field access contract for fixed-schema entities.
//!
//! A statically typed entity cannot intercept unknown property names
//! the way the dynamic original did, so the fallback is an explicit
//! two-tier lookup: native columns answer directly, anything else is
//! dispatched to the attribute store by the `FieldAccess` extension
//! in the services layer. Entities without a storage identity buffer
//! dynamic writes until they are persisted.

use crate::domain::TypedValue;
use crate::errors::AppResult;

/// Contract implemented by entities that expose dynamic attributes
/// alongside their native columns.
pub trait EntityFields {
    /// Fixed entity type code this entity stores attributes under
    /// (e.g. `"user"`)
    fn entity_type_code(&self) -> &'static str;

    /// Storage identity, if the entity has been persisted
    fn storage_id(&self) -> Option<i64>;

    /// Whether the name refers to a native column or derived property,
    /// regardless of whether it currently holds a value. Native names
    /// are never dispatched to the attribute store.
    fn is_native_field(&self, name: &str) -> bool;

    /// Look up a native column or derived property by name.
    /// Returns None when the name is not native or the column holds
    /// no value; `is_native_field` tells the two apart.
    fn native_field(&self, name: &str) -> Option<TypedValue>;

    /// Assign a native column by name.
    ///
    /// Returns Ok(true) when the name was handled natively, Ok(false)
    /// when it is not a native field, and an error when the value is
    /// invalid for the column.
    fn set_native_field(&mut self, name: &str, value: &TypedValue) -> AppResult<bool>;

    /// Buffer a dynamic write for an entity that has no storage
    /// identity yet.
    fn buffer_dynamic(&mut self, code: &str, value: TypedValue);

    /// Drain the buffered dynamic writes, in insertion order.
    fn take_buffered(&mut self) -> Vec<(String, TypedValue)>;
}
