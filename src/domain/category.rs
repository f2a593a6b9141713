// src/domain/category.rs
use crate::domain::error::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::fmt;

pub type CategoryId = i64;

/// A named, user-orderable group of bookmarks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

impl Category {
    pub fn new<S: AsRef<str>>(id: CategoryId, name: S) -> DomainResult<Self> {
        Ok(Self {
            id,
            name: validate_name(name)?,
        })
    }

    pub fn rename<S: AsRef<str>>(&mut self, name: S) -> DomainResult<()> {
        self.name = validate_name(name)?;
        Ok(())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.id, self.name)
    }
}

/// Trims the name; empty names are rejected
pub(crate) fn validate_name<S: AsRef<str>>(name: S) -> DomainResult<String> {
    let name = name.as_ref().trim();
    if name.is_empty() {
        return Err(DomainError::InvalidName("Name cannot be empty".to_string()));
    }
    Ok(name.to_string())
}
