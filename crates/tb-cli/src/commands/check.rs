//! Check command implementation.
//!
//! Loading already enforces window validity and ID uniqueness; this command
//! reports what the search will see, including conditions that are legal but
//! surprising (sectionless courses, self-conflicting sections).

use anyhow::Result;

use tb_core::Course;

/// Run the check command.
pub fn run(courses: &[Course]) -> Result<()> {
    print!("{}", render_report(courses));
    Ok(())
}

fn render_report(courses: &[Course]) -> String {
    let mut out = String::new();
    let mut total_sections = 0;
    for course in courses {
        total_sections += course.sections.len();
        out.push_str(&format!(
            "{}: {} section(s)\n",
            course.id,
            course.sections.len()
        ));
        if course.sections.is_empty() {
            out.push_str("  note: no sections, excluded from search\n");
        }
        for section in &course.sections {
            if section.is_self_conflicting() {
                out.push_str(&format!(
                    "  warning: section {} conflicts with its own lab and can never be chosen\n",
                    section.id
                ));
            }
        }
    }
    out.push_str(&format!(
        "{} course(s), {} section(s) total.\n",
        courses.len(),
        total_sections
    ));
    out
}
