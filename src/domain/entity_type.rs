//! Entity type domain entity.
//!
//! An entity type is a named category of attribute owner (user,
//! doctor, patient, ...). It is long-lived administrative
//! configuration; its identity is the normalized `code`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::normalize_code;
use crate::errors::{AppError, AppResult};

/// Entity type domain entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityType {
    /// Storage identity; None until persisted
    pub id: Option<i64>,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EntityType {
    /// Create a new entity type, normalizing and validating its code.
    pub fn new(code: &str, name: &str, description: Option<String>) -> AppResult<Self> {
        let now = Utc::now();
        let mut entity_type = Self {
            id: None,
            code: normalize_code("Entity type code", code)?,
            name: String::new(),
            description,
            created_at: now,
            updated_at: now,
        };
        entity_type.set_name(name)?;
        Ok(entity_type)
    }

    /// Update the code (re-normalized; empty fails)
    pub fn set_code(&mut self, code: &str) -> AppResult<()> {
        self.code = normalize_code("Entity type code", code)?;
        self.touch();
        Ok(())
    }

    /// Update the display name (empty fails)
    pub fn set_name(&mut self, name: &str) -> AppResult<()> {
        if name.trim().is_empty() {
            return Err(AppError::validation("Entity type name cannot be empty"));
        }
        self.name = name.to_string();
        self.touch();
        Ok(())
    }

    /// Update the description
    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_is_normalized() {
        let et = EntityType::new("  Medical Doctor ", "Doctor", None).unwrap();
        assert_eq!(et.code, "medical_doctor");
    }

    #[test]
    fn empty_code_is_rejected() {
        let err = EntityType::new("   ", "Doctor", None).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn empty_name_is_rejected() {
        let err = EntityType::new("doctor", "", None).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn mutation_bumps_updated_at() {
        let mut et = EntityType::new("doctor", "Doctor", None).unwrap();
        let before = et.updated_at;
        et.set_description(Some("Doctor profile".to_string()));
        assert!(et.updated_at >= before);
    }
}
