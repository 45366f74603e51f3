//! Solve command implementation.

use std::collections::HashMap;

use anyhow::{Context, Result};

use tb_core::{
    Assignment, Course, CourseId, Section, SectionId, apply_locks, enumerate, enumerate_parallel,
};

/// Run the solve command.
///
/// Zero resulting schedules is a normal outcome, not a failure: the process
/// still exits 0 and the human-readable path prints a notice instead.
pub fn run(courses: &[Course], lock_args: &[String], parallel: bool, json: bool) -> Result<()> {
    let locks = parse_locks(lock_args)?;
    let courses = apply_locks(courses, &locks).context("failed to apply section locks")?;

    let schedules = if parallel {
        enumerate_parallel(&courses)
    } else {
        enumerate(&courses)
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&schedules)?);
        return Ok(());
    }

    print!("{}", render_schedules(&courses, &schedules));
    if schedules.is_empty() {
        println!("Hint: run 'tb advise' to get suggestions for resolving the conflicts.");
    }
    Ok(())
}

/// Parse `COURSE=SECTION` lock arguments.
fn parse_locks(args: &[String]) -> Result<HashMap<CourseId, SectionId>> {
    let mut locks = HashMap::new();
    for arg in args {
        let (course, section) = arg
            .split_once('=')
            .with_context(|| format!("lock '{arg}' must have the form COURSE=SECTION"))?;
        let course = CourseId::new(course).with_context(|| format!("invalid lock '{arg}'"))?;
        let section = SectionId::new(section).with_context(|| format!("invalid lock '{arg}'"))?;
        locks.insert(course, section);
    }
    Ok(locks)
}

/// Render schedules for human consumption.
fn render_schedules(courses: &[Course], schedules: &[Assignment]) -> String {
    if schedules.is_empty() {
        return "No conflict-free combination exists.\n".to_string();
    }

    let mut out = String::new();
    for (index, schedule) in schedules.iter().enumerate() {
        out.push_str(&format!("Schedule {}:\n", index + 1));
        if schedule.is_empty() {
            out.push_str("  (no participating courses)\n");
        }
        for pick in schedule.picks() {
            match find_section(courses, &pick.course, &pick.section) {
                Some(section) => {
                    out.push_str(&format!(
                        "  {} -> {}  {}",
                        pick.course, pick.section, section.lecture
                    ));
                    if let Some(lab) = &section.lab {
                        out.push_str(&format!(" (lab {lab})"));
                    }
                    out.push('\n');
                }
                None => out.push_str(&format!("  {} -> {}\n", pick.course, pick.section)),
            }
        }
    }
    out.push_str(&format!("{} schedule(s) found.\n", schedules.len()));
    out
}

fn find_section<'a>(
    courses: &'a [Course],
    course_id: &CourseId,
    section_id: &SectionId,
) -> Option<&'a Section> {
    courses
        .iter()
        .find(|course| course.id == *course_id)?
        .sections
        .iter()
        .find(|section| section.id == *section_id)
}
