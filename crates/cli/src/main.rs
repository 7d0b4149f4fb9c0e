use clap::{Parser, Subcommand};
use gradebook_core::constants::{DATA_DIR_ENV, REPORTS_DIR_ENV, STORE_TIMEOUT_ENV};
use gradebook_core::validation::{parse_age, parse_marks};
use gradebook_core::{
    report, CoreConfig, Course, GradebookResult, MatchMode, NameQuery, NonEmptyText, Student,
    StudentService,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "gradebook")]
#[command(about = "Gradebook student record system CLI")]
struct Cli {
    /// Data directory (overrides GRADEBOOK_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<String>,
    /// Reports directory (overrides GRADEBOOK_REPORTS_DIR)
    #[arg(long, global = true)]
    reports_dir: Option<String>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a student
    Add {
        /// Student ID
        id: String,
        /// Full name
        name: String,
        /// Age in years
        age: String,
        /// Course as NAME=MARKS (repeatable)
        #[arg(long = "course")]
        courses: Vec<String>,
    },
    /// Show one student
    Show {
        /// Student ID
        id: String,
    },
    /// Search students by name
    Search {
        /// Name text to look for
        text: String,
        /// Match anywhere in the name instead of at the start
        #[arg(long)]
        substring: bool,
        /// Ignore letter case
        #[arg(long)]
        ignore_case: bool,
    },
    /// List all students
    List,
    /// Update a student; omitted fields keep their value
    Update {
        /// Student ID
        id: String,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New age
        #[arg(long)]
        age: Option<String>,
        /// Replacement course as NAME=MARKS (repeatable)
        #[arg(long = "course")]
        courses: Vec<String>,
    },
    /// Delete a student
    Delete {
        /// Student ID
        id: String,
    },
    /// Print a student's report card
    ReportCard {
        /// Student ID
        id: String,
        /// Also save the report under this file name
        #[arg(long)]
        save: Option<String>,
    },
    /// Print the class report
    ClassReport {
        /// Also save the report under this file name
        #[arg(long)]
        save: Option<String>,
    },
    /// Load the sample class
    Seed,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gradebook=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let cfg = CoreConfig::from_env_values(
        cli.data_dir.or_else(|| std::env::var(DATA_DIR_ENV).ok()),
        cli.reports_dir.or_else(|| std::env::var(REPORTS_DIR_ENV).ok()),
        std::env::var(STORE_TIMEOUT_ENV).ok(),
    )?;
    let service = StudentService::new(Arc::new(cfg));

    match cli.command {
        Some(Commands::Add {
            id,
            name,
            age,
            courses,
        }) => match build_student(&id, &name, &age, &courses) {
            Ok(student) => match service.add_student(&student).await {
                Ok(()) => println!("Added student {}", student.id()),
                Err(e) => eprintln!("Error adding student: {}", e),
            },
            Err(e) => eprintln!("Error adding student: {}", e),
        },
        Some(Commands::Show { id }) => match service.find_student(&id).await {
            Ok(Some(student)) => print!("{}", describe(&student)),
            Ok(None) => println!("No student with ID {}", id),
            Err(e) => eprintln!("Error reading student: {}", e),
        },
        Some(Commands::Search {
            text,
            substring,
            ignore_case,
        }) => {
            let mode = if substring {
                MatchMode::Substring
            } else {
                MatchMode::Prefix
            };
            match service
                .search_students(&NameQuery::new(text, mode, ignore_case))
                .await
            {
                Ok(students) if students.is_empty() => println!("No matching students."),
                Ok(students) => print!("{}", report::render_student_table(&students)),
                Err(e) => eprintln!("Error searching students: {}", e),
            }
        }
        Some(Commands::List) => match service.list_students().await {
            Ok(students) if students.is_empty() => println!("No students found."),
            Ok(students) => print!("{}", report::render_student_table(&students)),
            Err(e) => eprintln!("Error listing students: {}", e),
        },
        Some(Commands::Update {
            id,
            name,
            age,
            courses,
        }) => match service.find_student(&id).await {
            Ok(Some(existing)) => {
                match apply_changes(&existing, name.as_deref(), age.as_deref(), &courses) {
                    Ok(updated) => match service.update_student(&id, &updated).await {
                        Ok(()) => println!("Updated student {}", id),
                        Err(e) => eprintln!("Error updating student: {}", e),
                    },
                    Err(e) => eprintln!("Error updating student: {}", e),
                }
            }
            Ok(None) => println!("No student with ID {}", id),
            Err(e) => eprintln!("Error reading student: {}", e),
        },
        Some(Commands::Delete { id }) => match service.delete_student(&id).await {
            Ok(()) => println!("Deleted student {}", id),
            Err(e) => eprintln!("Error deleting student: {}", e),
        },
        Some(Commands::ReportCard { id, save }) => {
            match service.report_card(&id, now()).await {
                Ok(Some(card)) => {
                    print!("{}", card);
                    save_if_requested(&service, save.as_deref(), &card);
                }
                Ok(None) => println!("No student with ID {}", id),
                Err(e) => eprintln!("Error building report card: {}", e),
            }
        }
        Some(Commands::ClassReport { save }) => match service.class_report(now()).await {
            Ok(text) => {
                println!("{}", text.trim_end());
                save_if_requested(&service, save.as_deref(), &text);
            }
            Err(e) => eprintln!("Error building class report: {}", e),
        },
        Some(Commands::Seed) => match service.load_sample_data().await {
            Ok(summary) => {
                for id in &summary.inserted {
                    println!("Inserted {}", id);
                }
                for id in &summary.skipped {
                    println!("Skipped {} (already present)", id);
                }
            }
            Err(e) => eprintln!("Error loading sample data: {}", e),
        },
        None => {
            println!("Use 'gradebook --help' for commands");
        }
    }

    Ok(())
}

fn now() -> chrono::NaiveDateTime {
    chrono::Local::now().naive_local()
}

fn save_if_requested(service: &StudentService, filename: Option<&str>, contents: &str) {
    if let Some(filename) = filename {
        match service.save_report(filename, contents) {
            Ok(path) => println!("Saved report to {}", path.display()),
            Err(e) => eprintln!("Error saving report: {}", e),
        }
    }
}

fn describe(student: &Student) -> String {
    let mut out = format!(
        "ID:      {}\nName:    {}\nAge:     {}\n",
        student.id(),
        student.name(),
        student.age()
    );
    for course in student.courses() {
        out.push_str(&report::render_course_row(course));
        out.push('\n');
    }
    out.push_str(&format!(
        "Average: {:.2} ({})\n",
        student.average(),
        student.grade()
    ));
    out
}

/// Parses a `NAME=MARKS` course argument.
fn parse_course(arg: &str) -> GradebookResult<Course> {
    let (name, marks) = arg.rsplit_once('=').ok_or_else(|| {
        gradebook_core::GradebookError::InvalidInput(format!(
            "course '{arg}' must look like NAME=MARKS"
        ))
    })?;
    let name = NonEmptyText::new(name)?;
    Ok(Course::new(name.into_string(), parse_marks(marks)?))
}

fn parse_courses(args: &[String]) -> GradebookResult<Vec<Course>> {
    args.iter().map(|arg| parse_course(arg)).collect()
}

fn build_student(id: &str, name: &str, age: &str, courses: &[String]) -> GradebookResult<Student> {
    let id = NonEmptyText::new(id)?;
    let name = NonEmptyText::new(name)?;
    Ok(Student::new(
        id.into_string(),
        name.into_string(),
        parse_age(age)?,
        parse_courses(courses)?,
    ))
}

fn apply_changes(
    existing: &Student,
    name: Option<&str>,
    age: Option<&str>,
    courses: &[String],
) -> GradebookResult<Student> {
    let mut updated = existing.clone();
    if let Some(name) = name {
        updated = updated.with_name(NonEmptyText::new(name)?.into_string());
    }
    if let Some(age) = age {
        updated = updated.with_age(parse_age(age)?);
    }
    if !courses.is_empty() {
        updated = updated.with_courses(parse_courses(courses)?);
    }
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gradebook_core::GradebookError;

    #[test]
    fn parses_course_arguments() {
        let course = parse_course("Further Maths=72.5").expect("valid course");
        assert_eq!(course.name(), "Further Maths");
        assert_eq!(course.marks(), 72.5);
    }

    #[test]
    fn rejects_course_without_marks() {
        let err = parse_course("Physics").expect_err("missing marks");
        assert!(matches!(err, GradebookError::InvalidInput(_)));
    }

    #[test]
    fn rejects_out_of_range_marks() {
        assert!(parse_course("Physics=101").is_err());
    }

    #[test]
    fn update_keeps_omitted_fields() {
        let existing = Student::new("S001", "Alice", 20, vec![Course::new("Art", 70.0)]);
        let updated = apply_changes(&existing, None, Some("21"), &[]).expect("valid update");
        assert_eq!(updated.name(), "Alice");
        assert_eq!(updated.age(), 21);
        assert_eq!(updated.courses(), existing.courses());
    }

    #[test]
    fn describe_lists_courses_in_report_columns() {
        let student = Student::new("S001", "Alice", 20, vec![Course::new("Art", 70.0)]);
        let text = describe(&student);
        assert!(text.contains("\nArt                      70.00         B\n"));
        assert!(text.ends_with("Average: 70.00 (B)\n"));
    }

    #[test]
    fn cli_parses_report_card_with_save() {
        let cli = Cli::try_parse_from(["gradebook", "report-card", "S001", "--save", "alice"])
            .expect("valid arguments");
        assert!(matches!(
            cli.command,
            Some(Commands::ReportCard { ref id, save: Some(ref name) }) if id == "S001" && name == "alice"
        ));
    }
}
