//! Attribute domain entity.
//!
//! An attribute is a named, typed field definition that can be
//! dynamically attached to entities, optionally scoped to a single
//! entity type. Scoping is enforced when values are written, not by a
//! structural constraint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{normalize_code, AttributeType, EntityType};
use crate::errors::{AppError, AppResult};

/// Attribute definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    /// Storage identity; None until persisted
    pub id: Option<i64>,
    pub code: String,
    pub name: String,
    pub value_type: AttributeType,
    /// Optional scoping: when set, values may only be written for
    /// entities of this type
    pub entity_type: Option<EntityType>,
    pub is_required: bool,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Attribute {
    /// Create a new attribute definition.
    ///
    /// Fails with a validation error on an empty code/name; the type
    /// is already constrained to the closed enum by construction.
    pub fn new(
        code: &str,
        name: &str,
        value_type: AttributeType,
        entity_type: Option<EntityType>,
        is_required: bool,
        description: Option<String>,
    ) -> AppResult<Self> {
        let now = Utc::now();
        let mut attribute = Self {
            id: None,
            code: normalize_code("Attribute code", code)?,
            name: String::new(),
            value_type,
            entity_type,
            is_required,
            description,
            created_at: now,
            updated_at: now,
        };
        attribute.set_name(name)?;
        Ok(attribute)
    }

    /// Create a new attribute from a raw type name.
    ///
    /// Rejects any type outside the closed enum before persistence.
    pub fn with_type_name(
        code: &str,
        name: &str,
        type_name: &str,
        entity_type: Option<EntityType>,
        is_required: bool,
        description: Option<String>,
    ) -> AppResult<Self> {
        Self::new(
            code,
            name,
            AttributeType::parse(type_name)?,
            entity_type,
            is_required,
            description,
        )
    }

    /// Update the code (re-normalized; empty fails)
    pub fn set_code(&mut self, code: &str) -> AppResult<()> {
        self.code = normalize_code("Attribute code", code)?;
        self.touch();
        Ok(())
    }

    /// Update the display name (empty fails)
    pub fn set_name(&mut self, name: &str) -> AppResult<()> {
        if name.trim().is_empty() {
            return Err(AppError::validation("Attribute name cannot be empty"));
        }
        self.name = name.to_string();
        self.touch();
        Ok(())
    }

    /// Update the value type
    pub fn set_type(&mut self, value_type: AttributeType) {
        self.value_type = value_type;
        self.touch();
    }

    /// Update the entity type scoping
    pub fn set_entity_type(&mut self, entity_type: Option<EntityType>) {
        self.entity_type = entity_type;
        self.touch();
    }

    /// Update the required flag
    pub fn set_is_required(&mut self, is_required: bool) {
        self.is_required = is_required;
        self.touch();
    }

    /// Update the description
    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
        self.touch();
    }

    /// Code of the entity type this attribute is scoped to, if any
    pub fn scope_code(&self) -> Option<&str> {
        self.entity_type.as_ref().map(|et| et.code.as_str())
    }

    /// Whether values of this attribute may be written for the given
    /// entity type code. Unscoped attributes apply everywhere.
    pub fn applies_to(&self, entity_type_code: &str) -> bool {
        match self.scope_code() {
            Some(code) => code == entity_type_code,
            None => true,
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_is_trimmed_lowercased_and_underscored() {
        let attr = Attribute::new(
            " Blood Type ",
            "Blood Type",
            AttributeType::String,
            None,
            false,
            None,
        )
        .unwrap();
        assert_eq!(attr.code, "blood_type");
    }

    #[test]
    fn empty_code_is_rejected() {
        let err =
            Attribute::new("  ", "Blood Type", AttributeType::String, None, false, None)
                .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn unknown_type_name_is_rejected_before_persistence() {
        let err = Attribute::with_type_name("price", "Price", "currency", None, false, None)
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn unscoped_attribute_applies_to_any_entity_type() {
        let attr =
            Attribute::new("nickname", "Nickname", AttributeType::String, None, false, None)
                .unwrap();
        assert!(attr.applies_to("user"));
        assert!(attr.applies_to("doctor"));
    }

    #[test]
    fn scoped_attribute_applies_only_to_its_entity_type() {
        let doctor = EntityType::new("doctor", "Doctor", None).unwrap();
        let attr = Attribute::new(
            "specialty",
            "Specialty",
            AttributeType::String,
            Some(doctor),
            true,
            None,
        )
        .unwrap();
        assert!(attr.applies_to("doctor"));
        assert!(!attr.applies_to("patient"));
    }
}
