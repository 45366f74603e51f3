//! Core type definitions with validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// The weekday string was not recognized.
    #[error("unknown day: {value}")]
    UnknownDay { value: String },

    /// The clock time string could not be parsed.
    #[error("invalid clock time (expected HH:MM): {value}")]
    InvalidClockTime { value: String },

    /// The window's start time was not strictly before its end time.
    #[error("time window must start before it ends: {start}..{end}")]
    WindowOrder { start: String, end: String },
}

/// Generates a validated string ID newtype with common trait implementations.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident, $field_name:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new ID after validation.
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                if id.is_empty() {
                    return Err(ValidationError::Empty { field: $field_name });
                }
                Ok(Self(id))
            }

            /// Returns the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_string_id!(
    /// A validated course identifier.
    ///
    /// Course IDs must be non-empty strings (e.g., "MATH101"). They name a
    /// unit of study and key the course→section picks in an assignment.
    CourseId, "course ID"
);

define_string_id!(
    /// A validated section identifier.
    ///
    /// Section IDs must be non-empty strings. They are stable identities used
    /// to reference a chosen section in results, independent of the section's
    /// position in its course's list.
    SectionId, "section ID"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_id_rejects_empty() {
        assert!(CourseId::new("").is_err());
        assert!(CourseId::new("MATH101").is_ok());
    }

    #[test]
    fn section_id_rejects_empty() {
        assert!(SectionId::new("").is_err());
        assert!(SectionId::new("S1").is_ok());
    }

    #[test]
    fn course_id_serde_roundtrip() {
        let id = CourseId::new("PHYS210").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"PHYS210\"");
        let parsed: CourseId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn section_id_serde_rejects_empty() {
        let result: Result<SectionId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }

    #[test]
    fn section_id_as_ref() {
        let id = SectionId::new("S3").unwrap();
        let s: &str = id.as_ref();
        assert_eq!(s, "S3");
    }
}
