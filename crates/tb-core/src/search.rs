//! Exhaustive enumeration of conflict-free schedules.
//!
//! A depth-first backtracking walk over courses (one tree level per
//! participating course) and sections (the choices at each level). A partial
//! schedule is abandoned as soon as the newest pick conflicts with itself or
//! with any committed pick, so the subtree below it is never explored. Every
//! complete, conflict-free combination is collected; absence of solutions is
//! an empty list, not an error.
//!
//! Both the course visit order (input order) and the section try order (list
//! order) are deterministic, and so is the order of results. Downstream code
//! may rely on "first schedule" semantics, which makes that ordering a hard
//! contract rather than an accident.

use std::collections::HashMap;

use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;

use crate::course::{Course, Section};
use crate::types::{CourseId, SectionId};

/// One course→section pick inside an assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pick {
    pub course: CourseId,
    pub section: SectionId,
}

/// A complete, conflict-free choice of one section per participating course.
///
/// Picks are stored in course visit order, which keeps rendering and
/// comparison deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct Assignment {
    picks: Vec<Pick>,
}

impl Assignment {
    fn from_committed(courses: &[&Course], chosen: &[&Section]) -> Self {
        let picks = courses
            .iter()
            .zip(chosen)
            .map(|(course, section)| Pick {
                course: course.id.clone(),
                section: section.id.clone(),
            })
            .collect();
        Self { picks }
    }

    /// The picks in course visit order.
    #[must_use]
    pub fn picks(&self) -> &[Pick] {
        &self.picks
    }

    /// Looks up the chosen section for a course.
    #[must_use]
    pub fn section_for(&self, course: &CourseId) -> Option<&SectionId> {
        self.picks
            .iter()
            .find(|pick| pick.course == *course)
            .map(|pick| &pick.section)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.picks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }
}

/// Enumerates every conflict-free combination of one section per course.
///
/// Courses with no sections are excluded from the search space entirely:
/// they are neither "always satisfied" nor "impossible". When no courses
/// participate, the result is a single empty assignment (the base case is
/// reached immediately — vacuously, the one way to schedule nothing).
///
/// The worst case is the full Cartesian product of section counts; pruning
/// bounds it in practice, but completeness of the result set is part of the
/// contract and is never traded for speed.
#[must_use]
pub fn enumerate(courses: &[Course]) -> Vec<Assignment> {
    let active = participating(courses);
    let mut results = Vec::new();
    let mut chosen: Vec<&Section> = Vec::with_capacity(active.len());
    extend(&active, &mut chosen, &mut results);
    tracing::debug!(
        courses = active.len(),
        schedules = results.len(),
        "enumeration complete"
    );
    results
}

/// Branch-parallel variant of [`enumerate`] with identical output.
///
/// Depth-0 branches (the first course's sections) are independent, so each
/// runs on its own rayon task with its own result buffer; buffers are then
/// concatenated in branch order, preserving the sequential ordering
/// contract. No other shared state exists.
#[must_use]
pub fn enumerate_parallel(courses: &[Course]) -> Vec<Assignment> {
    let active = participating(courses);
    let Some(first) = active.first() else {
        return vec![Assignment::default()];
    };

    let branches: Vec<Vec<Assignment>> = first
        .sections
        .par_iter()
        .map(|section| {
            let mut results = Vec::new();
            if compatible(section, &[]) {
                let mut chosen = vec![section];
                extend(&active, &mut chosen, &mut results);
            }
            results
        })
        .collect();

    let results: Vec<Assignment> = branches.into_iter().flatten().collect();
    tracing::debug!(
        courses = active.len(),
        schedules = results.len(),
        "parallel enumeration complete"
    );
    results
}

/// Courses that actually participate in the search.
fn participating(courses: &[Course]) -> Vec<&Course> {
    courses
        .iter()
        .filter(|course| !course.sections.is_empty())
        .collect()
}

/// Recursive tree walk; depth is the number of committed picks.
fn extend<'a>(courses: &[&'a Course], chosen: &mut Vec<&'a Section>, out: &mut Vec<Assignment>) {
    let depth = chosen.len();
    if depth == courses.len() {
        out.push(Assignment::from_committed(courses, chosen));
        return;
    }
    for section in &courses[depth].sections {
        if !compatible(section, chosen) {
            continue;
        }
        chosen.push(section);
        extend(courses, chosen, out);
        chosen.pop();
    }
}

/// Pruning oracle: the candidate must not conflict with itself or with any
/// committed section.
fn compatible(candidate: &Section, committed: &[&Section]) -> bool {
    !candidate.is_self_conflicting()
        && committed
            .iter()
            .all(|section| !section.conflicts_with(candidate))
}

/// Errors from applying section locks.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LockError {
    /// A lock referenced a course that is not in the dataset.
    #[error("unknown course in lock: {0}")]
    UnknownCourse(CourseId),

    /// A lock referenced a section the course does not offer.
    #[error("course {course} has no section {section}")]
    UnknownSection {
        course: CourseId,
        section: SectionId,
    },
}

/// Pins specific sections before searching.
///
/// A locked course's candidate list is restricted to the pinned section: the
/// lock changes the input, not the algorithm. The caller's courses are left
/// untouched; the returned list is an independent copy.
pub fn apply_locks(
    courses: &[Course],
    locks: &HashMap<CourseId, SectionId>,
) -> Result<Vec<Course>, LockError> {
    for course_id in locks.keys() {
        if !courses.iter().any(|course| course.id == *course_id) {
            return Err(LockError::UnknownCourse(course_id.clone()));
        }
    }

    courses
        .iter()
        .map(|course| {
            let Some(section_id) = locks.get(&course.id) else {
                return Ok(course.clone());
            };
            let section = course
                .sections
                .iter()
                .find(|section| section.id == *section_id)
                .ok_or_else(|| LockError::UnknownSection {
                    course: course.id.clone(),
                    section: section_id.clone(),
                })?;
            Ok(Course {
                id: course.id.clone(),
                sections: vec![section.clone()],
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::{Day, TimeWindow, parse_clock};

    fn window(days: &[Day], start: &str, end: &str) -> TimeWindow {
        TimeWindow::new(
            days.iter().copied().collect(),
            parse_clock(start).unwrap(),
            parse_clock(end).unwrap(),
        )
        .unwrap()
    }

    fn section(id: &str, lecture: TimeWindow) -> Section {
        Section {
            id: SectionId::new(id).unwrap(),
            lecture,
            lab: None,
        }
    }

    fn section_with_lab(id: &str, lecture: TimeWindow, lab: TimeWindow) -> Section {
        Section {
            id: SectionId::new(id).unwrap(),
            lecture,
            lab: Some(lab),
        }
    }

    fn course(id: &str, sections: Vec<Section>) -> Course {
        Course {
            id: CourseId::new(id).unwrap(),
            sections,
        }
    }

    fn pick_ids(assignment: &Assignment) -> Vec<(&str, &str)> {
        assignment
            .picks()
            .iter()
            .map(|pick| (pick.course.as_str(), pick.section.as_str()))
            .collect()
    }

    #[test]
    fn disjoint_courses_yield_one_schedule() {
        let courses = vec![
            course("A", vec![section("A1", window(&[Day::Monday], "09:00", "10:00"))]),
            course("B", vec![section("B1", window(&[Day::Tuesday], "09:00", "10:00"))]),
        ];
        let results = enumerate(&courses);
        assert_eq!(results.len(), 1);
        assert_eq!(pick_ids(&results[0]), vec![("A", "A1"), ("B", "B1")]);
    }

    #[test]
    fn overlapping_courses_yield_nothing() {
        let courses = vec![
            course("A", vec![section("A1", window(&[Day::Monday], "09:00", "10:00"))]),
            course("B", vec![section("B1", window(&[Day::Monday], "09:30", "10:30"))]),
        ];
        assert!(enumerate(&courses).is_empty());
    }

    #[test]
    fn conflicting_section_is_pruned_not_fatal() {
        let courses = vec![
            course(
                "A",
                vec![
                    section("S1", window(&[Day::Monday], "09:00", "10:00")),
                    section("S2", window(&[Day::Monday], "11:00", "12:00")),
                ],
            ),
            course("B", vec![section("B1", window(&[Day::Monday], "09:00", "10:00"))]),
        ];
        let results = enumerate(&courses);
        assert_eq!(results.len(), 1);
        assert_eq!(pick_ids(&results[0]), vec![("A", "S2"), ("B", "B1")]);
    }

    #[test]
    fn self_conflicting_section_never_appears() {
        let broken = section_with_lab(
            "S1",
            window(&[Day::Monday], "09:00", "10:00"),
            window(&[Day::Monday], "09:30", "10:30"),
        );
        // Standing alone it produces nothing.
        let alone = vec![course("A", vec![broken.clone()])];
        assert!(enumerate(&alone).is_empty());

        // Alongside a valid sibling the course still has that sibling to try.
        let courses = vec![course(
            "A",
            vec![broken, section("S2", window(&[Day::Tuesday], "09:00", "10:00"))],
        )];
        let results = enumerate(&courses);
        assert_eq!(results.len(), 1);
        assert_eq!(pick_ids(&results[0]), vec![("A", "S2")]);
    }

    #[test]
    fn non_conflicting_courses_give_full_cartesian_product() {
        let spread = |day: Day| {
            vec![
                section("S1", window(&[day], "08:00", "09:00")),
                section("S2", window(&[day], "10:00", "11:00")),
                section("S3", window(&[day], "12:00", "13:00")),
            ]
        };
        let courses = vec![
            course("A", spread(Day::Monday)),
            course("B", spread(Day::Tuesday)),
        ];
        let results = enumerate(&courses);
        assert_eq!(results.len(), 9);
        for (i, a) in results.iter().enumerate() {
            for b in &results[i + 1..] {
                assert_ne!(a, b, "each combination must appear exactly once");
            }
        }
    }

    #[test]
    fn empty_course_list_yields_one_empty_assignment() {
        let results = enumerate(&[]);
        assert_eq!(results.len(), 1);
        assert!(results[0].is_empty());
    }

    #[test]
    fn sectionless_courses_are_excluded_not_fatal() {
        let courses = vec![
            course("A", vec![section("A1", window(&[Day::Monday], "09:00", "10:00"))]),
            course("EMPTY", vec![]),
        ];
        let results = enumerate(&courses);
        assert_eq!(results.len(), 1);
        let empty_id = CourseId::new("EMPTY").unwrap();
        assert!(results[0].section_for(&empty_id).is_none());
        assert_eq!(pick_ids(&results[0]), vec![("A", "A1")]);

        // A list of only sectionless courses degenerates to the empty base case.
        let all_empty = vec![course("X", vec![]), course("Y", vec![])];
        let results = enumerate(&all_empty);
        assert_eq!(results.len(), 1);
        assert!(results[0].is_empty());
    }

    #[test]
    fn results_follow_input_order() {
        let courses = vec![
            course(
                "A",
                vec![
                    section("S1", window(&[Day::Monday], "08:00", "09:00")),
                    section("S2", window(&[Day::Monday], "10:00", "11:00")),
                ],
            ),
            course(
                "B",
                vec![
                    section("T1", window(&[Day::Tuesday], "08:00", "09:00")),
                    section("T2", window(&[Day::Tuesday], "10:00", "11:00")),
                ],
            ),
        ];
        let results = enumerate(&courses);
        let order: Vec<Vec<(&str, &str)>> = results.iter().map(pick_ids).collect();
        assert_eq!(
            order,
            vec![
                vec![("A", "S1"), ("B", "T1")],
                vec![("A", "S1"), ("B", "T2")],
                vec![("A", "S2"), ("B", "T1")],
                vec![("A", "S2"), ("B", "T2")],
            ]
        );

        // Identical input, identical output.
        assert_eq!(enumerate(&courses), results);
    }

    #[test]
    fn labs_are_checked_against_committed_sections() {
        let courses = vec![
            course(
                "A",
                vec![section_with_lab(
                    "A1",
                    window(&[Day::Monday], "09:00", "10:00"),
                    window(&[Day::Wednesday], "14:00", "16:00"),
                )],
            ),
            course(
                "B",
                vec![
                    // Lecture clashes with A1's lab.
                    section("B1", window(&[Day::Wednesday], "15:00", "17:00")),
                    section("B2", window(&[Day::Wednesday], "16:00", "18:00")),
                ],
            ),
        ];
        let results = enumerate(&courses);
        assert_eq!(results.len(), 1);
        assert_eq!(pick_ids(&results[0]), vec![("A", "A1"), ("B", "B2")]);
    }

    #[test]
    fn parallel_enumeration_matches_sequential() {
        let courses = vec![
            course(
                "A",
                vec![
                    section("S1", window(&[Day::Monday], "09:00", "10:00")),
                    section("S2", window(&[Day::Monday], "11:00", "12:00")),
                    section_with_lab(
                        "S3",
                        window(&[Day::Monday], "13:00", "14:00"),
                        window(&[Day::Monday], "13:30", "14:30"),
                    ),
                ],
            ),
            course(
                "B",
                vec![
                    section("T1", window(&[Day::Monday], "09:30", "10:30")),
                    section("T2", window(&[Day::Tuesday], "09:00", "10:00")),
                ],
            ),
            course("EMPTY", vec![]),
            course(
                "C",
                vec![
                    section("U1", window(&[Day::Monday], "11:30", "12:30")),
                    section("U2", window(&[Day::Friday], "09:00", "10:00")),
                ],
            ),
        ];
        assert_eq!(enumerate_parallel(&courses), enumerate(&courses));

        // Including the degenerate base case.
        assert_eq!(enumerate_parallel(&[]), enumerate(&[]));
    }

    #[test]
    fn lock_restricts_candidates() {
        let courses = vec![
            course(
                "A",
                vec![
                    section("S1", window(&[Day::Monday], "08:00", "09:00")),
                    section("S2", window(&[Day::Monday], "10:00", "11:00")),
                ],
            ),
            course("B", vec![section("T1", window(&[Day::Tuesday], "08:00", "09:00"))]),
        ];
        let locks = HashMap::from([(
            CourseId::new("A").unwrap(),
            SectionId::new("S2").unwrap(),
        )]);
        let locked = apply_locks(&courses, &locks).unwrap();
        let results = enumerate(&locked);
        assert_eq!(results.len(), 1);
        assert_eq!(pick_ids(&results[0]), vec![("A", "S2"), ("B", "T1")]);

        // Inputs are untouched.
        assert_eq!(courses[0].sections.len(), 2);
    }

    #[test]
    fn lock_on_unknown_course_errors() {
        let courses = vec![course("A", vec![section("S1", window(&[Day::Monday], "08:00", "09:00"))])];
        let locks = HashMap::from([(
            CourseId::new("NOPE").unwrap(),
            SectionId::new("S1").unwrap(),
        )]);
        assert_eq!(
            apply_locks(&courses, &locks).unwrap_err(),
            LockError::UnknownCourse(CourseId::new("NOPE").unwrap())
        );
    }

    #[test]
    fn lock_on_unknown_section_errors() {
        let courses = vec![course("A", vec![section("S1", window(&[Day::Monday], "08:00", "09:00"))])];
        let locks = HashMap::from([(
            CourseId::new("A").unwrap(),
            SectionId::new("S9").unwrap(),
        )]);
        assert!(matches!(
            apply_locks(&courses, &locks).unwrap_err(),
            LockError::UnknownSection { .. }
        ));
    }

    #[test]
    fn assignments_serialize_as_pick_lists() {
        let courses = vec![course("A", vec![section("A1", window(&[Day::Monday], "09:00", "10:00"))])];
        let results = enumerate(&courses);
        let json = serde_json::to_string(&results[0]).unwrap();
        assert_eq!(json, r#"[{"course":"A","section":"A1"}]"#);
    }
}
