//! School domain model.
//!
//! # Responsibility
//! - Define Student, Course and Grade records with identity and
//!   relationship fields.
//! - Own the functions that mutate both sides of a relationship at once.
//!
//! # Invariants
//! - Identity is `None` until the store assigns one; assigned ids are `> 0`.
//! - Relationship sets hold identities, never owning references, so the
//!   object graph stays acyclic.
//! - Enrollment is symmetric: a student lists a course iff the course lists
//!   the student.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod course;
pub mod grade;
pub(crate) mod relation;
pub mod student;

/// Store-assigned row identity shared by all entities.
pub type RecordId = i64;

/// Longest accepted name column value, in characters.
pub const MAX_NAME_CHARS: usize = 50;

/// Field-level validation failure raised before any write reaches the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required text field is empty after trimming.
    BlankField(&'static str),
    /// Text field exceeds [`MAX_NAME_CHARS`].
    FieldTooLong { field: &'static str, chars: usize },
    /// Student index numbers start at 1.
    ZeroIndexNumber,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField(field) => write!(f, "`{field}` must not be blank"),
            Self::FieldTooLong { field, chars } => write!(
                f,
                "`{field}` has {chars} characters; at most {MAX_NAME_CHARS} are allowed"
            ),
            Self::ZeroIndexNumber => write!(f, "index number must be positive"),
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn validate_name(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::BlankField(field));
    }
    let chars = value.chars().count();
    if chars > MAX_NAME_CHARS {
        return Err(ValidationError::FieldTooLong { field, chars });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{validate_name, ValidationError, MAX_NAME_CHARS};

    #[test]
    fn validate_name_rejects_whitespace_only() {
        assert_eq!(
            validate_name("name", "   "),
            Err(ValidationError::BlankField("name"))
        );
    }

    #[test]
    fn validate_name_counts_chars_not_bytes() {
        let at_limit = "ł".repeat(MAX_NAME_CHARS);
        assert!(validate_name("name", &at_limit).is_ok());

        let over = "ł".repeat(MAX_NAME_CHARS + 1);
        assert_eq!(
            validate_name("name", &over),
            Err(ValidationError::FieldTooLong {
                field: "name",
                chars: MAX_NAME_CHARS + 1
            })
        );
    }
}
