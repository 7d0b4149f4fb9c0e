//! Numbered console menu over [`StudentService`].
//!
//! Every prompt re-asks on invalid input. Service errors are printed and the loop
//! returns to the menu; only I/O failures on the console end it.

use std::io::{BufRead, ErrorKind, Write};

use chrono::{Local, NaiveDateTime};
use gradebook_core::validation::{parse_age, parse_marks};
use gradebook_core::{
    Course, GradebookResult, MatchMode, NameQuery, NonEmptyText, Student, StudentService, report,
};

const MENU: &str = "\
========== STUDENT RECORDS ==========
1. Add student
2. View student
3. Search students by name
4. List all students
5. Update student
6. Delete student
7. Report card
8. Class report
9. Load sample data
0. Exit";

/// Interactive menu reading from `input` and writing to `output`.
pub struct Menu<R, W> {
    service: StudentService,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(service: StudentService, input: R, output: W) -> Self {
        Self {
            service,
            input,
            output,
        }
    }

    /// Runs until the user chooses exit or input ends.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            writeln!(self.output)?;
            writeln!(self.output, "{MENU}")?;
            let Some(choice) = self.prompt("Choose an option: ")? else {
                return Ok(());
            };

            let keep_going = match choice.as_str() {
                "1" => self.add_student().await?,
                "2" => self.view_student().await?,
                "3" => self.search_students().await?,
                "4" => self.list_students().await?,
                "5" => self.update_student().await?,
                "6" => self.delete_student().await?,
                "7" => self.report_card().await?,
                "8" => self.class_report().await?,
                "9" => self.load_sample_data().await?,
                "0" => {
                    writeln!(self.output, "Goodbye.")?;
                    return Ok(());
                }
                other => {
                    writeln!(self.output, "Unknown option '{other}'.")?;
                    true
                }
            };

            if !keep_going {
                return Ok(());
            }
        }
    }

    // Each action returns Ok(false) when input ended mid-way.

    async fn add_student(&mut self) -> anyhow::Result<bool> {
        let Some(id) = self.prompt_parsed("Student ID: ", |s: &str| NonEmptyText::new(s))? else {
            return Ok(false);
        };
        let Some(name) = self.prompt_parsed("Name: ", |s: &str| NonEmptyText::new(s))? else {
            return Ok(false);
        };
        let Some(age) = self.prompt_parsed("Age: ", parse_age)? else {
            return Ok(false);
        };
        let Some(courses) = self.prompt_courses()? else {
            return Ok(false);
        };

        let student = Student::new(id.into_string(), name.into_string(), age, courses);
        match self.service.add_student(&student).await {
            Ok(()) => writeln!(self.output, "Student {} added.", student.id())?,
            Err(e) => self.report_error(&e)?,
        }
        Ok(true)
    }

    async fn view_student(&mut self) -> anyhow::Result<bool> {
        let Some(id) = self.prompt("Student ID: ")? else {
            return Ok(false);
        };
        match self.service.find_student(&id).await {
            Ok(Some(student)) => {
                write!(self.output, "{}", report::render_student_table(&[student.clone()]))?;
                for course in student.courses() {
                    writeln!(self.output, "{}", report::render_course_row(course))?;
                }
            }
            Ok(None) => writeln!(self.output, "No student with ID {id}.")?,
            Err(e) => self.report_error(&e)?,
        }
        Ok(true)
    }

    async fn search_students(&mut self) -> anyhow::Result<bool> {
        let Some(text) = self.prompt("Name to search for: ")? else {
            return Ok(false);
        };
        let Some(anywhere) = self.confirm("Match anywhere in the name? (y/N): ")? else {
            return Ok(false);
        };
        let Some(ignore_case) = self.confirm("Ignore case? (y/N): ")? else {
            return Ok(false);
        };

        let mode = if anywhere {
            MatchMode::Substring
        } else {
            MatchMode::Prefix
        };
        let query = NameQuery::new(text, mode, ignore_case);
        match self.service.search_students(&query).await {
            Ok(students) if students.is_empty() => {
                writeln!(self.output, "No matching students.")?
            }
            Ok(students) => write!(self.output, "{}", report::render_student_table(&students))?,
            Err(e) => self.report_error(&e)?,
        }
        Ok(true)
    }

    async fn list_students(&mut self) -> anyhow::Result<bool> {
        match self.service.list_students().await {
            Ok(students) if students.is_empty() => writeln!(self.output, "No students found.")?,
            Ok(students) => write!(self.output, "{}", report::render_student_table(&students))?,
            Err(e) => self.report_error(&e)?,
        }
        Ok(true)
    }

    async fn update_student(&mut self) -> anyhow::Result<bool> {
        let Some(id) = self.prompt("Student ID: ")? else {
            return Ok(false);
        };
        let existing = match self.service.find_student(&id).await {
            Ok(Some(student)) => student,
            Ok(None) => {
                writeln!(self.output, "No student with ID {id}.")?;
                return Ok(true);
            }
            Err(e) => {
                self.report_error(&e)?;
                return Ok(true);
            }
        };

        let mut updated = existing.clone();

        let label = format!("Name [{}]: ", existing.name());
        let Some(name) = self.prompt_optional(&label, |s: &str| NonEmptyText::new(s))? else {
            return Ok(false);
        };
        if let Some(name) = name {
            updated = updated.with_name(name.into_string());
        }

        let label = format!("Age [{}]: ", existing.age());
        let Some(age) = self.prompt_optional(&label, parse_age)? else {
            return Ok(false);
        };
        if let Some(age) = age {
            updated = updated.with_age(age);
        }

        let Some(replace) = self.confirm("Replace courses? (y/N): ")? else {
            return Ok(false);
        };
        if replace {
            let Some(courses) = self.prompt_courses()? else {
                return Ok(false);
            };
            updated = updated.with_courses(courses);
        }

        match self.service.update_student(existing.id(), &updated).await {
            Ok(()) => writeln!(self.output, "Student {} updated.", existing.id())?,
            Err(e) => self.report_error(&e)?,
        }
        Ok(true)
    }

    async fn delete_student(&mut self) -> anyhow::Result<bool> {
        let Some(id) = self.prompt("Student ID: ")? else {
            return Ok(false);
        };
        let Some(sure) = self.confirm(&format!("Delete student {id}? (y/N): "))? else {
            return Ok(false);
        };
        if !sure {
            writeln!(self.output, "Nothing deleted.")?;
            return Ok(true);
        }
        match self.service.delete_student(&id).await {
            Ok(()) => writeln!(self.output, "Student {id} deleted.")?,
            Err(e) => self.report_error(&e)?,
        }
        Ok(true)
    }

    async fn report_card(&mut self) -> anyhow::Result<bool> {
        let Some(id) = self.prompt("Student ID: ")? else {
            return Ok(false);
        };
        match self.service.report_card(&id, now()).await {
            Ok(Some(card)) => {
                write!(self.output, "{card}")?;
                self.offer_save(&card)
            }
            Ok(None) => {
                writeln!(self.output, "No student with ID {id}.")?;
                Ok(true)
            }
            Err(e) => {
                self.report_error(&e)?;
                Ok(true)
            }
        }
    }

    async fn class_report(&mut self) -> anyhow::Result<bool> {
        match self.service.class_report(now()).await {
            Ok(text) => {
                writeln!(self.output, "{}", text.trim_end())?;
                self.offer_save(&text)
            }
            Err(e) => {
                self.report_error(&e)?;
                Ok(true)
            }
        }
    }

    async fn load_sample_data(&mut self) -> anyhow::Result<bool> {
        match self.service.load_sample_data().await {
            Ok(summary) => writeln!(
                self.output,
                "Sample data loaded: {} inserted, {} already present.",
                summary.inserted.len(),
                summary.skipped.len()
            )?,
            Err(e) => self.report_error(&e)?,
        }
        Ok(true)
    }

    fn offer_save(&mut self, contents: &str) -> anyhow::Result<bool> {
        let Some(filename) = self.prompt("Save to file (blank to skip): ")? else {
            return Ok(false);
        };
        if filename.is_empty() {
            return Ok(true);
        }
        match self.service.save_report(&filename, contents) {
            Ok(path) => writeln!(self.output, "Report saved to {}.", path.display())?,
            Err(e) => self.report_error(&e)?,
        }
        Ok(true)
    }

    fn prompt_courses(&mut self) -> anyhow::Result<Option<Vec<Course>>> {
        let Some(count) = self.prompt_parsed("Number of courses: ", parse_count)? else {
            return Ok(None);
        };
        let mut courses = Vec::with_capacity(count);
        for n in 1..=count {
            let label = format!("Course {n} name: ");
            let Some(name) = self.prompt_parsed(&label, |s: &str| NonEmptyText::new(s))? else {
                return Ok(None);
            };
            let label = format!("Course {n} marks: ");
            let Some(marks) = self.prompt_parsed(&label, parse_marks)? else {
                return Ok(None);
            };
            courses.push(Course::new(name.into_string(), marks));
        }
        Ok(Some(courses))
    }

    /// Reads one trimmed line. `None` means input ended.
    ///
    /// A line that is not valid UTF-8 is consumed and asked for again.
    fn prompt(&mut self, label: &str) -> anyhow::Result<Option<String>> {
        loop {
            write!(self.output, "{label}")?;
            self.output.flush()?;
            let mut line = String::new();
            match self.input.read_line(&mut line) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(line.trim().to_string())),
                Err(e) if e.kind() == ErrorKind::InvalidData => {
                    writeln!(self.output, "Invalid input: text must be UTF-8")?;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Re-prompts until `parse` accepts the line.
    fn prompt_parsed<T, E, F>(&mut self, label: &str, parse: F) -> anyhow::Result<Option<T>>
    where
        E: std::fmt::Display,
        F: Fn(&str) -> Result<T, E>,
    {
        loop {
            let Some(line) = self.prompt(label)? else {
                return Ok(None);
            };
            match parse(&line) {
                Ok(value) => return Ok(Some(value)),
                Err(e) => writeln!(self.output, "Invalid input: {e}")?,
            }
        }
    }

    /// Like [`Self::prompt_parsed`], but a blank line keeps the current value.
    fn prompt_optional<T, E, F>(
        &mut self,
        label: &str,
        parse: F,
    ) -> anyhow::Result<Option<Option<T>>>
    where
        E: std::fmt::Display,
        F: Fn(&str) -> Result<T, E>,
    {
        self.prompt_parsed(label, |line| {
            if line.is_empty() {
                Ok(None)
            } else {
                parse(line).map(Some)
            }
        })
    }

    fn confirm(&mut self, label: &str) -> anyhow::Result<Option<bool>> {
        Ok(self
            .prompt(label)?
            .map(|answer| matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes")))
    }

    fn report_error(&mut self, err: &gradebook_core::GradebookError) -> anyhow::Result<()> {
        tracing::debug!("menu action failed: {:?}", err);
        writeln!(self.output, "Error: {err}")?;
        Ok(())
    }
}

fn parse_count(input: &str) -> GradebookResult<usize> {
    input.parse::<usize>().map_err(|_| {
        gradebook_core::GradebookError::InvalidInput(format!(
            "'{input}' is not a whole number of courses"
        ))
    })
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}
