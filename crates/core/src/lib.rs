//! # Gradebook Core
//!
//! Core business logic for the gradebook student record system.
//!
//! This crate contains:
//! - the student collection ([`repositories::students`]) and its repository contract
//! - report rendering ([`report`]) and saving ([`report_files`])
//! - startup configuration ([`config`]) and input validation ([`validation`])
//! - [`StudentService`], the facade the front ends call
//!
//! **No front-end concerns**: menus, argument parsing and terminal output belong in the
//! `gradebook-run` and `gradebook-cli` binaries.

pub mod config;
pub mod constants;
pub mod error;
pub mod report;
pub mod report_files;
pub mod repositories;
pub mod sample_data;
pub mod validation;

pub use config::CoreConfig;
pub use error::{GradebookError, GradebookResult, StoreError, StoreResult};
pub use report_files::ReportFiles;
pub use repositories::students::{MatchMode, NameQuery, StudentRepository, YamlStudentStore};

// Re-export the record model so front ends need only this crate.
pub use gradebook_types::{Course, Grade, NonEmptyText, Student, TextError};

use chrono::NaiveDateTime;
use std::path::PathBuf;
use std::sync::Arc;

/// Outcome of loading the sample class.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedSummary {
    /// Ids that were inserted.
    pub inserted: Vec<String>,
    /// Ids that already existed and were left alone.
    pub skipped: Vec<String>,
}

/// Student record operations for the front ends.
#[derive(Clone)]
pub struct StudentService {
    repository: Arc<dyn StudentRepository>,
    report_files: ReportFiles,
}

impl StudentService {
    /// Creates a service over the YAML student collection described by `cfg`.
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        let report_files = ReportFiles::new(cfg.reports_dir());
        Self {
            repository: Arc::new(YamlStudentStore::new(cfg)),
            report_files,
        }
    }

    /// Creates a service over any repository implementation.
    pub fn with_repository(
        repository: Arc<dyn StudentRepository>,
        report_files: ReportFiles,
    ) -> Self {
        Self {
            repository,
            report_files,
        }
    }

    /// Adds a new student.
    ///
    /// # Errors
    ///
    /// Returns `GradebookError::Text` if the name is blank, or
    /// `GradebookError::Store(StoreError::Conflict)` if the id is already taken.
    pub async fn add_student(&self, student: &Student) -> GradebookResult<()> {
        NonEmptyText::new(student.name())?;
        self.repository.create(student).await?;
        Ok(())
    }

    pub async fn find_student(&self, id: &str) -> GradebookResult<Option<Student>> {
        Ok(self.repository.get_by_id(id.trim()).await?)
    }

    pub async fn search_students(&self, query: &NameQuery) -> GradebookResult<Vec<Student>> {
        Ok(self.repository.search_by_name(query).await?)
    }

    pub async fn list_students(&self) -> GradebookResult<Vec<Student>> {
        Ok(self.repository.get_all().await?)
    }

    /// Replaces the record stored under `id`.
    pub async fn update_student(&self, id: &str, student: &Student) -> GradebookResult<()> {
        NonEmptyText::new(student.name())?;
        self.repository.update(id.trim(), student).await?;
        Ok(())
    }

    pub async fn delete_student(&self, id: &str) -> GradebookResult<()> {
        self.repository.delete(id.trim()).await?;
        Ok(())
    }

    /// Renders the report card for `id`, or `None` if there is no such student.
    pub async fn report_card(
        &self,
        id: &str,
        generated_at: NaiveDateTime,
    ) -> GradebookResult<Option<String>> {
        let student = self.find_student(id).await?;
        Ok(student.map(|s| report::render_report_card(&s, generated_at)))
    }

    /// Renders the class report over every stored student.
    pub async fn class_report(&self, generated_at: NaiveDateTime) -> GradebookResult<String> {
        let students = self.list_students().await?;
        Ok(report::render_class_report(&students, generated_at))
    }

    /// Saves rendered report text under the configured reports directory.
    pub fn save_report(&self, filename: &str, contents: &str) -> GradebookResult<PathBuf> {
        self.report_files.write(filename, contents)
    }

    /// Inserts the sample class, leaving existing students untouched.
    pub async fn load_sample_data(&self) -> GradebookResult<SeedSummary> {
        let mut summary = SeedSummary::default();
        for student in sample_data::sample_students() {
            match self.repository.create(&student).await {
                Ok(()) => summary.inserted.push(student.id().to_string()),
                Err(StoreError::Conflict(id)) => summary.skipped.push(id),
                Err(e) => return Err(e.into()),
            }
        }
        Ok(summary)
    }
}
