//! Attribute value domain entity.
//!
//! One stored value of one attribute for one (entity type, entity id)
//! pair. The stored representation is always a string; the typed form
//! is derived on read through the attribute's declared type. The
//! owning entity is a weak reference: nothing here cascades against it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Attribute, TypedValue};
use crate::errors::AppResult;

/// Stored attribute value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeValue {
    /// Storage identity; None until persisted
    pub id: Option<i64>,
    pub attribute: Attribute,
    pub entity_type: String,
    pub entity_id: i64,
    /// Raw stored form
    pub value: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AttributeValue {
    pub fn new(attribute: Attribute, entity_type: &str, entity_id: i64, value: String) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            attribute,
            entity_type: entity_type.to_string(),
            entity_id,
            value,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the stored value
    pub fn set_value(&mut self, value: String) {
        self.value = value;
        self.updated_at = Utc::now();
    }

    /// Typed form of the stored value, per the attribute's declared type.
    ///
    /// Fails with a coercion error when the stored text cannot be
    /// interpreted as the declared type.
    pub fn typed_value(&self) -> AppResult<TypedValue> {
        TypedValue::from_stored(&self.value, self.attribute.value_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AttributeType;

    fn attribute(ty: AttributeType) -> Attribute {
        Attribute::new("sample", "Sample", ty, None, false, None).unwrap()
    }

    #[test]
    fn typed_value_follows_declared_type() {
        let row = AttributeValue::new(attribute(AttributeType::Integer), "user", 1, "7".into());
        assert_eq!(row.typed_value().unwrap(), TypedValue::Integer(7));
    }

    #[test]
    fn typed_value_surfaces_coercion_failure() {
        let row = AttributeValue::new(attribute(AttributeType::Integer), "user", 1, "x".into());
        assert!(row.typed_value().is_err());
    }
}
