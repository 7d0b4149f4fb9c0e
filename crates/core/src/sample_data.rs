//! Sample class used for demonstrations and first-run seeding.

use gradebook_types::{Course, Student};

/// Three students spanning the top, middle and lower grade bands.
///
/// Averages: 85.33 (A), 91.17 (A+) and 58.50 (D, passing).
pub fn sample_students() -> Vec<Student> {
    vec![
        Student::new(
            "S001",
            "Alice Johnson",
            20,
            vec![
                Course::new("Mathematics", 85.0),
                Course::new("Physics", 90.0),
                Course::new("Chemistry", 81.0),
            ],
        ),
        Student::new(
            "S002",
            "Bob Smith",
            21,
            vec![
                Course::new("Mathematics", 92.0),
                Course::new("Physics", 88.0),
                Course::new("Chemistry", 95.0),
                Course::new("Biology", 90.0),
                Course::new("English", 91.0),
                Course::new("History", 91.0),
            ],
        ),
        Student::new(
            "S003",
            "Charlie Brown",
            19,
            vec![
                Course::new("Mathematics", 60.0),
                Course::new("Physics", 55.0),
                Course::new("Chemistry", 62.0),
                Course::new("Biology", 57.0),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use gradebook_types::Grade;

    fn round2(value: f64) -> f64 {
        (value * 100.0).round() / 100.0
    }

    #[test]
    fn sample_students_classify_as_documented() {
        let students = sample_students();

        let averages: Vec<f64> = students.iter().map(|s| round2(s.average())).collect();
        assert_eq!(averages, vec![85.33, 91.17, 58.5]);

        assert!((students[0].average() - 256.0 / 3.0).abs() < 1e-9);
        assert!((students[1].average() - 547.0 / 6.0).abs() < 1e-9);
        assert_eq!(students[2].average(), 58.5);

        let grades: Vec<Grade> = students.iter().map(Student::grade).collect();
        assert_eq!(grades, vec![Grade::A, Grade::APlus, Grade::D]);

        assert!(students.iter().all(Student::passed));
    }
}
