//! Plain-text report rendering.
//!
//! Two reports are produced from in-memory records:
//! - a report card for one student (course table, overall average, pass/fail)
//! - a class report (class average, pass rate, top performers, grade distribution)
//!
//! Column widths are fixed: labels and names take 20 columns, left-aligned; numeric
//! columns take 10, right-aligned. Saved reports are compared line-by-line, so the
//! layout must stay stable.
//!
//! Rendering is pure. The timestamp is supplied by the caller.

use chrono::NaiveDateTime;
use gradebook_types::{Course, Grade, Student};
use std::collections::BTreeMap;

/// Width of the text/label column.
pub const NAME_WIDTH: usize = 20;

/// Width of each numeric column.
pub const NUMBER_WIDTH: usize = 10;

/// How many students the class report ranks.
pub const TOP_PERFORMER_COUNT: usize = 3;

/// The whole class report when there are no students.
pub const EMPTY_CLASS_REPORT: &str = "No students available for class report.";

const RULE_WIDTH: usize = NAME_WIDTH + 2 * NUMBER_WIDTH;
const ID_WIDTH: usize = 10;
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ============================================================================
// CLASS STATISTICS
// ============================================================================

/// One entry in the top performers list.
#[derive(Clone, Debug, PartialEq)]
pub struct RankedStudent {
    /// 1-based position.
    pub rank: usize,
    pub name: String,
    pub average: f64,
    pub grade: Grade,
}

/// Number of students holding one grade.
#[derive(Clone, Debug, PartialEq)]
pub struct GradeBucket {
    pub grade: Grade,
    pub count: usize,
    /// Share of the class, 0 to 100.
    pub percentage: f64,
}

/// Aggregates behind the class report.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassStatistics {
    pub total: usize,
    /// Mean of the per-student averages.
    pub class_average: f64,
    /// Percentage of students who passed.
    pub pass_rate: f64,
    /// Best averages first; ties keep input order.
    pub top_performers: Vec<RankedStudent>,
    /// One bucket per grade in [`Grade::ALL`] order, empty buckets included.
    pub distribution: Vec<GradeBucket>,
}

impl ClassStatistics {
    /// Compute class aggregates. Returns `None` for an empty class.
    pub fn compute(students: &[Student]) -> Option<Self> {
        if students.is_empty() {
            return None;
        }

        let total = students.len();
        let averages: Vec<f64> = students.iter().map(Student::average).collect();
        let class_average = averages.iter().sum::<f64>() / total as f64;
        let passed = students.iter().filter(|s| s.passed()).count();
        let pass_rate = passed as f64 / total as f64 * 100.0;

        let mut ranked: Vec<(&Student, f64)> = students.iter().zip(averages).collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        let top_performers = ranked
            .into_iter()
            .take(TOP_PERFORMER_COUNT)
            .enumerate()
            .map(|(i, (student, average))| RankedStudent {
                rank: i + 1,
                name: student.name().to_string(),
                average,
                grade: Grade::from_average(average),
            })
            .collect();

        let mut counts: BTreeMap<Grade, usize> = BTreeMap::new();
        for student in students {
            *counts.entry(student.grade()).or_default() += 1;
        }
        let distribution = Grade::ALL
            .iter()
            .map(|&grade| {
                let count = counts.get(&grade).copied().unwrap_or(0);
                GradeBucket {
                    grade,
                    count,
                    percentage: count as f64 / total as f64 * 100.0,
                }
            })
            .collect();

        Some(Self {
            total,
            class_average,
            pass_rate,
            top_performers,
            distribution,
        })
    }
}

// ============================================================================
// RENDERERS
// ============================================================================

/// Render the report card for one student.
pub fn render_report_card(student: &Student, generated_at: NaiveDateTime) -> String {
    let mut out = String::new();

    push_header(&mut out, "STUDENT REPORT CARD", generated_at);
    push_line(&mut out, &format!("Student ID: {}", student.id()));
    push_line(&mut out, &format!("Name:       {}", student.name()));
    push_line(&mut out, &format!("Age:        {}", student.age()));
    push_rule(&mut out, '-');
    push_line(
        &mut out,
        &format!(
            "{:<NAME_WIDTH$}{:>NUMBER_WIDTH$}{:>NUMBER_WIDTH$}",
            "Subject", "Marks", "Grade"
        ),
    );
    push_rule(&mut out, '-');

    for course in student.courses() {
        push_line(&mut out, &render_course_row(course));
    }

    push_rule(&mut out, '-');
    push_line(
        &mut out,
        &format!(
            "{:<NAME_WIDTH$}{:>NUMBER_WIDTH$.2}{:>NUMBER_WIDTH$}",
            "Overall Average",
            student.average(),
            student.grade()
        ),
    );
    push_rule(&mut out, '-');
    let result = if student.passed() { "PASSED" } else { "FAILED" };
    push_line(&mut out, &format!("Result: {result}"));

    out
}

/// Render the class report.
///
/// An empty class yields [`EMPTY_CLASS_REPORT`] and nothing else.
pub fn render_class_report(students: &[Student], generated_at: NaiveDateTime) -> String {
    let Some(stats) = ClassStatistics::compute(students) else {
        return EMPTY_CLASS_REPORT.to_string();
    };

    let mut out = String::new();

    push_header(&mut out, "CLASS REPORT", generated_at);
    push_line(
        &mut out,
        &format!("{:<NAME_WIDTH$}{:>NUMBER_WIDTH$}", "Total Students:", stats.total),
    );
    push_line(
        &mut out,
        &format!(
            "{:<NAME_WIDTH$}{:>NUMBER_WIDTH$.2}",
            "Class Average:", stats.class_average
        ),
    );
    push_line(
        &mut out,
        &format!("{:<NAME_WIDTH$}{:>NUMBER_WIDTH$.1}%", "Pass Rate:", stats.pass_rate),
    );

    push_section(&mut out, "TOP PERFORMERS");
    for entry in &stats.top_performers {
        let label = format!("{}. {}", entry.rank, entry.name);
        push_line(
            &mut out,
            &format!(
                "{:<NAME_WIDTH$}{:>NUMBER_WIDTH$.2}{:>NUMBER_WIDTH$}",
                label, entry.average, entry.grade
            ),
        );
    }

    push_section(&mut out, "GRADE DISTRIBUTION");
    push_line(
        &mut out,
        &format!(
            "{:<NAME_WIDTH$}{:>NUMBER_WIDTH$}{:>NUMBER_WIDTH$}",
            "Grade", "Count", "Percent"
        ),
    );
    for bucket in &stats.distribution {
        push_line(
            &mut out,
            &format!(
                "{:<NAME_WIDTH$}{:>NUMBER_WIDTH$}{:>NUMBER_WIDTH$.1}%",
                bucket.grade, bucket.count, bucket.percentage
            ),
        );
    }

    out
}

/// Render one course as a `name  marks  grade` row in the report card columns.
pub fn render_course_row(course: &Course) -> String {
    format!(
        "{:<NAME_WIDTH$}{:>NUMBER_WIDTH$.2}{:>NUMBER_WIDTH$}",
        course.name(),
        course.marks(),
        course.grade()
    )
}

/// Render a one-row-per-student listing used by the list and search views.
pub fn render_student_table(students: &[Student]) -> String {
    let mut out = String::new();
    push_line(
        &mut out,
        &format!(
            "{:<ID_WIDTH$}{:<NAME_WIDTH$}{:>NUMBER_WIDTH$}{:>NUMBER_WIDTH$}{:>NUMBER_WIDTH$}",
            "ID", "Name", "Age", "Average", "Grade"
        ),
    );
    for student in students {
        push_line(
            &mut out,
            &format!(
                "{:<ID_WIDTH$}{:<NAME_WIDTH$}{:>NUMBER_WIDTH$}{:>NUMBER_WIDTH$.2}{:>NUMBER_WIDTH$}",
                student.id(),
                student.name(),
                student.age(),
                student.average(),
                student.grade()
            ),
        );
    }
    out
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

fn push_rule(out: &mut String, ch: char) {
    push_line(out, &ch.to_string().repeat(RULE_WIDTH));
}

fn push_header(out: &mut String, title: &str, generated_at: NaiveDateTime) {
    push_rule(out, '=');
    push_line(out, title);
    push_line(
        out,
        &format!("Generated: {}", generated_at.format(TIMESTAMP_FORMAT)),
    );
    push_rule(out, '=');
}

fn push_section(out: &mut String, title: &str) {
    push_rule(out, '-');
    push_line(out, title);
    push_rule(out, '-');
}
