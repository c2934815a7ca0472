//! User domain entity and related types.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::fields::EntityFields;
use super::TypedValue;
use crate::config::ENTITY_TYPE_USER;
use crate::errors::{AppError, AppResult};

static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

/// User account status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Active,
    Suspended,
    #[default]
    Pending,
}

impl Status {
    pub fn parse(raw: &str) -> AppResult<Self> {
        match raw {
            "active" => Ok(Status::Active),
            "suspended" => Ok(Status::Suspended),
            "pending" => Ok(Status::Pending),
            other => Err(AppError::validation(format!("Invalid status value: {other}"))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Active => "active",
            Status::Suspended => "suspended",
            Status::Pending => "pending",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Status::Active)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Storage identity; None until persisted
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub status: Status,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Dynamic writes buffered while the user has no storage identity
    #[serde(skip)]
    pending_fields: Vec<(String, TypedValue)>,
}

impl User {
    /// Create a new, not yet persisted user
    pub fn new(name: &str, email: &str, phone: Option<String>, status: Status) -> AppResult<Self> {
        let now = Utc::now();
        let mut user = Self {
            id: None,
            name: String::new(),
            email: String::new(),
            phone,
            status,
            created_at: now,
            updated_at: now,
            pending_fields: Vec::new(),
        };
        user.set_name(name)?;
        user.set_email(email)?;
        Ok(user)
    }

    /// Rebuild a user from already persisted storage columns.
    ///
    /// Storage rows passed domain validation on the way in, so this
    /// constructor does not re-validate.
    pub fn from_storage(
        id: i64,
        name: String,
        email: String,
        phone: Option<String>,
        status: Status,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Some(id),
            name,
            email,
            phone,
            status,
            created_at,
            updated_at,
            pending_fields: Vec::new(),
        }
    }

    /// Update the display name (empty fails)
    pub fn set_name(&mut self, name: &str) -> AppResult<()> {
        if name.trim().is_empty() {
            return Err(AppError::validation("Name cannot be empty"));
        }
        self.name = name.to_string();
        self.touch();
        Ok(())
    }

    /// Update the email address (format-checked)
    pub fn set_email(&mut self, email: &str) -> AppResult<()> {
        if !EMAIL_REGEX.is_match(email) {
            return Err(AppError::validation("Invalid email format"));
        }
        self.email = email.to_string();
        self.touch();
        Ok(())
    }

    pub fn set_phone(&mut self, phone: Option<String>) {
        self.phone = phone;
        self.touch();
    }

    pub fn set_status(&mut self, status: Status) {
        self.status = status;
        self.touch();
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl EntityFields for User {
    fn entity_type_code(&self) -> &'static str {
        ENTITY_TYPE_USER
    }

    fn storage_id(&self) -> Option<i64> {
        self.id
    }

    fn is_native_field(&self, name: &str) -> bool {
        matches!(
            name,
            "id" | "name" | "email" | "phone" | "status" | "created_at" | "updated_at"
        )
    }

    fn native_field(&self, name: &str) -> Option<TypedValue> {
        match name {
            "id" => self.id.map(TypedValue::Integer),
            "name" => Some(TypedValue::String(self.name.clone())),
            "email" => Some(TypedValue::String(self.email.clone())),
            "phone" => self.phone.clone().map(TypedValue::String),
            "status" => Some(TypedValue::String(self.status.to_string())),
            "created_at" => Some(TypedValue::DateTime(self.created_at.naive_utc())),
            "updated_at" => Some(TypedValue::DateTime(self.updated_at.naive_utc())),
            _ => None,
        }
    }

    fn set_native_field(&mut self, name: &str, value: &TypedValue) -> AppResult<bool> {
        match name {
            "name" => {
                self.set_name(&value.render())?;
                Ok(true)
            }
            "email" => {
                self.set_email(&value.render())?;
                Ok(true)
            }
            "phone" => {
                self.set_phone(Some(value.render()));
                Ok(true)
            }
            "status" => {
                let status = Status::parse(&value.render())?;
                self.set_status(status);
                Ok(true)
            }
            // Identity and timestamps are not assignable by name
            "id" | "created_at" | "updated_at" => Err(AppError::validation(format!(
                "field '{name}' cannot be assigned"
            ))),
            _ => Ok(false),
        }
    }

    fn buffer_dynamic(&mut self, code: &str, value: TypedValue) {
        // Last write wins, matching the upsert semantics after save
        self.pending_fields.retain(|(c, _)| c != code);
        self.pending_fields.push((code.to_string(), value));
    }

    fn take_buffered(&mut self) -> Vec<(String, TypedValue)> {
        std::mem::take(&mut self.pending_fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_user_validates_name_and_email() {
        assert!(User::new("", "a@b.com", None, Status::Pending).is_err());
        assert!(User::new("Ada", "not-an-email", None, Status::Pending).is_err());
        assert!(User::new("Ada", "ada@example.com", None, Status::Pending).is_ok());
    }

    #[test]
    fn native_fields_resolve_by_name() {
        let user = User::new("Ada", "ada@example.com", None, Status::Active).unwrap();
        assert_eq!(
            user.native_field("email"),
            Some(TypedValue::String("ada@example.com".into()))
        );
        assert_eq!(
            user.native_field("status"),
            Some(TypedValue::String("active".into()))
        );
        assert_eq!(user.native_field("blood_type"), None);
    }

    #[test]
    fn native_membership_is_independent_of_the_current_value() {
        let user = User::new("Ada", "ada@example.com", None, Status::Pending).unwrap();
        // phone is unset and id is unassigned, yet both stay native
        assert_eq!(user.native_field("phone"), None);
        assert!(user.is_native_field("phone"));
        assert!(user.is_native_field("id"));
        assert!(!user.is_native_field("blood_type"));
    }

    #[test]
    fn buffered_writes_keep_last_value_per_code() {
        let mut user = User::new("Ada", "ada@example.com", None, Status::Pending).unwrap();
        user.buffer_dynamic("blood_type", TypedValue::from("A+"));
        user.buffer_dynamic("blood_type", TypedValue::from("O+"));
        let buffered = user.take_buffered();
        assert_eq!(buffered, vec![("blood_type".to_string(), TypedValue::from("O+"))]);
        assert!(user.take_buffered().is_empty());
    }

    #[test]
    fn status_parse_rejects_unknown_values() {
        assert!(Status::parse("archived").is_err());
        assert_eq!(Status::parse("active").unwrap(), Status::Active);
    }
}
