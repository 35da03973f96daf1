//! Book payload validation

use super::ValidationError;

/// Validated payload for creating a book.
///
/// The author reference is checked against the database inside the
/// repository transaction; this type only enforces field constraints.
#[derive(Debug, Clone)]
pub struct BookDraft {
    pub title: String,
    pub isbn: String,
    pub publication_year: i32,
    pub description: Option<String>,
    pub author_id: i64,
}

impl BookDraft {
    pub fn new(
        title: String,
        isbn: String,
        publication_year: i32,
        description: Option<String>,
        author_id: i64,
    ) -> Result<Self, ValidationError> {
        if title.trim().is_empty() {
            return Err(ValidationError::Empty { field: "title" });
        }
        if isbn.trim().is_empty() {
            return Err(ValidationError::Empty { field: "isbn" });
        }
        Ok(Self {
            title,
            isbn,
            publication_year,
            description,
            author_id,
        })
    }
}

/// Partial update for a book
#[derive(Debug, Clone, Default)]
pub struct BookPatch {
    pub title: Option<String>,
    pub isbn: Option<String>,
    pub publication_year: Option<i32>,
    pub description: Option<String>,
    pub author_id: Option<i64>,
}

impl BookPatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(ValidationError::Empty { field: "title" });
            }
        }
        if let Some(isbn) = &self.isbn {
            if isbn.trim().is_empty() {
                return Err(ValidationError::Empty { field: "isbn" });
            }
        }
        Ok(())
    }
}
