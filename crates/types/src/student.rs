//! Student record model.
//!
//! A [`Student`] owns an ordered list of [`Course`] results. Average, grade and pass
//! status are derived on demand and never stored. Values are immutable once built;
//! the `with_*` methods return a new record.

use crate::grading::{self, Grade};

/// A single course result.
#[derive(Clone, Debug, PartialEq)]
pub struct Course {
    name: String,
    marks: f64,
}

impl Course {
    pub fn new(name: impl Into<String>, marks: f64) -> Self {
        Self {
            name: name.into(),
            marks,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn marks(&self) -> f64 {
        self.marks
    }

    /// Grade for this course on its own.
    pub fn grade(&self) -> Grade {
        Grade::from_average(self.marks)
    }
}

/// A student's academic record.
#[derive(Clone, Debug, PartialEq)]
pub struct Student {
    id: String,
    name: String,
    age: u32,
    courses: Vec<Course>,
}

impl Student {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        age: u32,
        courses: Vec<Course>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            age,
            courses,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// Returns a copy of this record under a different id.
    pub fn with_id(&self, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..self.clone()
        }
    }

    /// Returns a copy of this record with a different name.
    pub fn with_name(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    /// Returns a copy of this record with a different age.
    pub fn with_age(&self, age: u32) -> Self {
        Self { age, ..self.clone() }
    }

    /// Returns a copy of this record with its courses replaced.
    pub fn with_courses(&self, courses: Vec<Course>) -> Self {
        Self {
            courses,
            ..self.clone()
        }
    }

    /// Mean of all course marks, `0.0` when there are no courses.
    pub fn average(&self) -> f64 {
        average(&self.courses)
    }

    pub fn grade(&self) -> Grade {
        Grade::from_average(self.average())
    }

    pub fn passed(&self) -> bool {
        grading::passed(self.average())
    }
}

/// Arithmetic mean of the marks in `courses`.
///
/// An empty slice yields `0.0`.
pub fn average(courses: &[Course]) -> f64 {
    if courses.is_empty() {
        return 0.0;
    }
    let total: f64 = courses.iter().map(Course::marks).sum();
    total / courses.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student_with_marks(marks: &[f64]) -> Student {
        let courses = marks
            .iter()
            .enumerate()
            .map(|(i, m)| Course::new(format!("Subject {i}"), *m))
            .collect();
        Student::new("S100", "Test Student", 18, courses)
    }

    #[test]
    fn average_of_no_courses_is_zero() {
        assert_eq!(average(&[]), 0.0);

        let student = student_with_marks(&[]);
        assert_eq!(student.average(), 0.0);
        assert_eq!(student.grade(), Grade::F);
        assert!(!student.passed());
    }

    #[test]
    fn average_is_sum_over_count() {
        let student = student_with_marks(&[70.0, 80.0, 95.5]);
        assert!((student.average() - 245.5 / 3.0).abs() < 1e-9);
        assert_eq!(student.grade(), Grade::A);
        assert!(student.passed());
    }

    #[test]
    fn pass_status_follows_average_boundary() {
        assert!(student_with_marks(&[40.0, 40.0]).passed());
        assert!(!student_with_marks(&[39.0, 40.98]).passed());
    }

    #[test]
    fn course_grade_uses_its_own_marks() {
        assert_eq!(Course::new("Art", 91.0).grade(), Grade::APlus);
        assert_eq!(Course::new("Art", 12.0).grade(), Grade::F);
    }

    #[test]
    fn with_methods_leave_the_original_untouched() {
        let original = student_with_marks(&[50.0]);
        let renamed = original.with_name("Renamed").with_age(30);
        let regraded = original.with_courses(vec![Course::new("Maths", 99.0)]);

        assert_eq!(original.name(), "Test Student");
        assert_eq!(original.age(), 18);
        assert_eq!(renamed.name(), "Renamed");
        assert_eq!(renamed.age(), 30);
        assert_eq!(renamed.id(), original.id());
        assert_eq!(regraded.courses().len(), 1);
        assert_eq!(original.courses()[0].marks(), 50.0);

        let rekeyed = original.with_id("S999");
        assert_eq!(rekeyed.id(), "S999");
        assert_eq!(rekeyed.name(), original.name());
        assert_ne!(original.id(), "S999");
    }
}
