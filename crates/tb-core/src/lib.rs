//! Schedule-generation engine for the timetable builder.
//!
//! This crate contains the fundamental types and logic for:
//! - The course/section data model with validated IDs and time windows
//! - The conflict predicate over weekly time windows
//! - Exhaustive backtracking enumeration of conflict-free schedules
//!
//! The engine is a pure, synchronous computation: it borrows course data
//! read-only, performs no I/O, and reports "no solution" as an empty result
//! list rather than an error.

pub mod course;
pub mod search;
pub mod types;
pub mod window;

pub use course::{Course, Section};
pub use search::{Assignment, LockError, Pick, apply_locks, enumerate, enumerate_parallel};
pub use types::{CourseId, SectionId, ValidationError};
pub use window::{Day, DaySet, TimeWindow, parse_clock};
