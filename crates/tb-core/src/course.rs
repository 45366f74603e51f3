//! Courses and their alternative sections.

use serde::{Deserialize, Serialize};

use crate::types::{CourseId, SectionId};
use crate::window::TimeWindow;

/// One selectable offering of a course.
///
/// A section owns one primary lecture window and optionally a lab window.
/// Its ID is the stable identity used to reference it in results,
/// independent of its position in the course's section list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: SectionId,
    pub lecture: TimeWindow,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lab: Option<TimeWindow>,
}

impl Section {
    /// Iterates the section's windows: lecture first, then lab if present.
    pub fn windows(&self) -> impl Iterator<Item = &TimeWindow> {
        std::iter::once(&self.lecture).chain(self.lab.as_ref())
    }

    /// Returns true if the section's own lecture and lab overlap.
    ///
    /// A self-conflicting section is not a data error, but it can never
    /// appear in any schedule, even standing alone.
    #[must_use]
    pub fn is_self_conflicting(&self) -> bool {
        self.lab
            .as_ref()
            .is_some_and(|lab| lab.conflicts_with(&self.lecture))
    }

    /// Returns true if any window of `self` overlaps any window of `other`.
    #[must_use]
    pub fn conflicts_with(&self, other: &Self) -> bool {
        self.windows()
            .any(|a| other.windows().any(|b| a.conflicts_with(b)))
    }
}

/// A named unit of study offering alternative sections.
///
/// Section order is preserved: it drives the deterministic order of search
/// results. A course with zero sections does not participate in the search
/// at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    #[serde(default)]
    pub sections: Vec<Section>,
}
