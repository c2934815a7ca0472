//! Role domain entity.

use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

/// Role domain entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    /// Storage identity; None until persisted
    pub id: Option<i64>,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
}

impl Role {
    pub fn new(code: &str, name: &str, description: Option<String>) -> AppResult<Self> {
        if code.trim().is_empty() {
            return Err(AppError::validation("Role code cannot be empty"));
        }
        if name.trim().is_empty() {
            return Err(AppError::validation("Role name cannot be empty"));
        }
        Ok(Self {
            id: None,
            code: code.trim().to_string(),
            name: name.to_string(),
            description,
        })
    }
}
