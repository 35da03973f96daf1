//! Author payload validation

use chrono::NaiveDate;

use super::ValidationError;

/// Validated payload for creating an author
#[derive(Debug, Clone)]
pub struct AuthorDraft {
    pub name: String,
    pub biography: Option<String>,
    pub birth_date: NaiveDate,
}

impl AuthorDraft {
    /// Validate a create payload. Name must be non-empty; biography is
    /// optional.
    pub fn new(
        name: String,
        biography: Option<String>,
        birth_date: NaiveDate,
    ) -> Result<Self, ValidationError> {
        if name.trim().is_empty() {
            return Err(ValidationError::Empty { field: "name" });
        }
        Ok(Self {
            name,
            biography,
            birth_date,
        })
    }
}

/// Partial update for an author; absent fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct AuthorPatch {
    pub name: Option<String>,
    pub biography: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

impl AuthorPatch {
    /// Reject patches that would blank out a required field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(ValidationError::Empty { field: "name" });
            }
        }
        Ok(())
    }
}
