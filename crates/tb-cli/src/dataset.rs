//! Course dataset loading and validation.
//!
//! The dataset is a JSON array of courses. Window validity (start before
//! end, known day names) is enforced by the core model during
//! deserialization; this module adds the cross-entry checks serde cannot
//! express: duplicate course IDs and duplicate section IDs within a course.

use std::collections::HashSet;
use std::path::Path;

use thiserror::Error;

use tb_core::Course;

/// Errors from loading a course dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The JSON was malformed or failed model validation.
    #[error("invalid dataset: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two courses share an ID.
    #[error("duplicate course ID: {0}")]
    DuplicateCourse(String),

    /// Two sections of one course share an ID.
    #[error("duplicate section ID {section} in course {course}")]
    DuplicateSection { course: String, section: String },
}

/// Loads and validates a course dataset from a JSON file.
pub fn load_courses(path: &Path) -> Result<Vec<Course>, DatasetError> {
    let raw = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let courses: Vec<Course> = serde_json::from_str(&raw)?;
    validate(&courses)?;
    tracing::debug!(courses = courses.len(), "dataset loaded");
    Ok(courses)
}

fn validate(courses: &[Course]) -> Result<(), DatasetError> {
    let mut course_ids = HashSet::new();
    for course in courses {
        if !course_ids.insert(course.id.as_str()) {
            return Err(DatasetError::DuplicateCourse(course.id.to_string()));
        }
        let mut section_ids = HashSet::new();
        for section in &course.sections {
            if !section_ids.insert(section.id.as_str()) {
                return Err(DatasetError::DuplicateSection {
                    course: course.id.to_string(),
                    section: section.id.to_string(),
                });
            }
        }
    }
    Ok(())
}
