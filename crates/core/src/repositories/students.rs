//! Student collection storage.
//!
//! The collection is a directory of YAML documents, one per student:
//!
//! ```text
//! <data_dir>/
//!   students/
//!     S001.yaml
//!     S002.yaml
//! ```
//!
//! The filename stem is the student id, which is the natural key for every lookup,
//! update and delete. Documents are translated through [`StudentDocument`], so
//! hand-edited or legacy documents still load with defaulted fields. A document that is
//! not a record at all is skipped (with a warning) when scanning the collection, and
//! reported as an error when fetched directly.
//!
//! Each operation is one store round trip bounded by [`CoreConfig::store_timeout`].

use crate::config::CoreConfig;
use crate::constants::STUDENT_FILE_EXTENSION;
use crate::repositories::helpers::{round_trip, write_replacing};
use crate::validation::validate_student_id;
use crate::{StoreError, StoreResult};
use async_trait::async_trait;
use gradebook_documents::StudentDocument;
use gradebook_types::Student;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

// ============================================================================
// NAME QUERIES
// ============================================================================

/// How a name query matches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchMode {
    /// Name starts with the query text.
    Prefix,
    /// Name contains the query text anywhere.
    Substring,
}

/// A search over student names.
#[derive(Clone, Debug)]
pub struct NameQuery {
    text: String,
    mode: MatchMode,
    case_insensitive: bool,
}

impl NameQuery {
    pub fn new(text: impl Into<String>, mode: MatchMode, case_insensitive: bool) -> Self {
        Self {
            text: text.into(),
            mode,
            case_insensitive,
        }
    }

    /// Whether `name` satisfies this query.
    pub fn matches(&self, name: &str) -> bool {
        let (name, text) = if self.case_insensitive {
            (name.to_lowercase(), self.text.to_lowercase())
        } else {
            (name.to_string(), self.text.clone())
        };

        match self.mode {
            MatchMode::Prefix => name.starts_with(&text),
            MatchMode::Substring => name.contains(&text),
        }
    }
}

// ============================================================================
// REPOSITORY CONTRACT
// ============================================================================

/// CRUD operations over the student collection.
///
/// Store failures (I/O, timeouts, unreadable documents) are reported distinctly from
/// "not found": reads return `Ok(None)` for a missing id, while mutations of a missing
/// id fail with [`StoreError::NotFound`].
#[async_trait]
pub trait StudentRepository: Send + Sync {
    /// Insert a new student; fails with [`StoreError::Conflict`] if the id is taken.
    async fn create(&self, student: &Student) -> StoreResult<()>;

    /// Fetch a student by id.
    async fn get_by_id(&self, id: &str) -> StoreResult<Option<Student>>;

    /// Students whose name matches `query`, ordered by id.
    async fn search_by_name(&self, query: &NameQuery) -> StoreResult<Vec<Student>>;

    /// Every readable student, ordered by id.
    async fn get_all(&self) -> StoreResult<Vec<Student>>;

    /// Replace the stored record for `id`.
    async fn update(&self, id: &str, student: &Student) -> StoreResult<()>;

    /// Remove the stored record for `id`.
    async fn delete(&self, id: &str) -> StoreResult<()>;
}

// ============================================================================
// YAML DOCUMENT STORE
// ============================================================================

/// [`StudentRepository`] backed by a directory of YAML documents.
#[derive(Clone, Debug)]
pub struct YamlStudentStore {
    cfg: Arc<CoreConfig>,
}

impl YamlStudentStore {
    /// Creates a store over `<data_dir>/students`.
    ///
    /// No I/O happens here; the directory is created on first write.
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self { cfg }
    }

    fn students_dir(&self) -> PathBuf {
        self.cfg.students_dir()
    }

    fn document_path(&self, id: &str) -> PathBuf {
        self.students_dir()
            .join(format!("{id}.{STUDENT_FILE_EXTENSION}"))
    }

    async fn ensure_students_dir(&self) -> StoreResult<()> {
        tokio::fs::create_dir_all(self.students_dir())
            .await
            .map_err(StoreError::StorageDirCreation)
    }

    /// Reads the document stored under `id`. The id is the document key, so it wins
    /// over whatever id the document body records.
    async fn read_document(path: &Path, id: &str) -> StoreResult<Option<Student>> {
        let contents = match tokio::fs::read_to_string(path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::FileRead(e)),
        };
        let student = StudentDocument::parse(&contents)?;
        if student.id() == id {
            return Ok(Some(student));
        }
        tracing::warn!(
            "student document {} records id '{}', using '{id}' from its filename",
            path.display(),
            student.id()
        );
        Ok(Some(student.with_id(id)))
    }

    async fn write_document(&self, path: &Path, student: &Student) -> StoreResult<()> {
        let yaml = StudentDocument::render(student)?;
        write_replacing(path, &yaml)
            .await
            .map_err(StoreError::FileWrite)
    }

    async fn scan(&self) -> StoreResult<Vec<Student>> {
        let students_dir = self.students_dir();
        let mut entries = match tokio::fs::read_dir(&students_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::FileRead(e)),
        };

        let mut students = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(StoreError::FileRead)? {
            let path = entry.path();
            let is_document = path
                .extension()
                .is_some_and(|ext| ext == STUDENT_FILE_EXTENSION);
            let is_file = entry.file_type().await.is_ok_and(|t| t.is_file());
            if !is_document || !is_file {
                continue;
            }

            let Some(id) = path.file_stem().and_then(|stem| stem.to_str()) else {
                tracing::warn!("skipping student document {}: filename is not UTF-8", path.display());
                continue;
            };
            if let Err(e) = validate_student_id(id) {
                tracing::warn!("skipping student document {}: {}", path.display(), e);
                continue;
            }

            match Self::read_document(&path, id).await {
                Ok(Some(student)) => students.push(student),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!("skipping student document {}: {}", path.display(), e);
                }
            }
        }

        students.sort_by(|a, b| a.id().cmp(b.id()));
        Ok(students)
    }

    async fn exists(path: &Path) -> StoreResult<bool> {
        tokio::fs::try_exists(path)
            .await
            .map_err(StoreError::FileRead)
    }
}

#[async_trait]
impl StudentRepository for YamlStudentStore {
    async fn create(&self, student: &Student) -> StoreResult<()> {
        let id = student.id();
        validate_student_id(id)?;
        let path = self.document_path(id);

        round_trip("create", self.cfg.store_timeout(), async {
            self.ensure_students_dir().await?;
            if Self::exists(&path).await? {
                return Err(StoreError::Conflict(id.to_string()));
            }
            self.write_document(&path, student).await
        })
        .await?;

        tracing::info!("created student {id}");
        Ok(())
    }

    async fn get_by_id(&self, id: &str) -> StoreResult<Option<Student>> {
        if validate_student_id(id).is_err() {
            tracing::debug!("lookup for unusable student id {id:?}");
            return Ok(None);
        }
        let path = self.document_path(id);

        round_trip(
            "get_by_id",
            self.cfg.store_timeout(),
            Self::read_document(&path, id),
        )
        .await
    }

    async fn search_by_name(&self, query: &NameQuery) -> StoreResult<Vec<Student>> {
        let students = round_trip("search_by_name", self.cfg.store_timeout(), self.scan()).await?;
        Ok(students
            .into_iter()
            .filter(|s| query.matches(s.name()))
            .collect())
    }

    async fn get_all(&self) -> StoreResult<Vec<Student>> {
        round_trip("get_all", self.cfg.store_timeout(), self.scan()).await
    }

    async fn update(&self, id: &str, student: &Student) -> StoreResult<()> {
        validate_student_id(id)?;
        if student.id() != id {
            return Err(StoreError::InvalidInput(format!(
                "student id cannot change on update ('{id}' -> '{}')",
                student.id()
            )));
        }
        let path = self.document_path(id);

        round_trip("update", self.cfg.store_timeout(), async {
            if !Self::exists(&path).await? {
                return Err(StoreError::NotFound(id.to_string()));
            }
            self.write_document(&path, student).await
        })
        .await?;

        tracing::info!("updated student {id}");
        Ok(())
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        validate_student_id(id)?;
        let path = self.document_path(id);

        round_trip("delete", self.cfg.store_timeout(), async {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    Err(StoreError::NotFound(id.to_string()))
                }
                Err(e) => Err(StoreError::FileDelete(e)),
            }
        })
        .await?;

        tracing::info!("deleted student {id}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gradebook_types::Course;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    fn test_cfg(data_dir: &Path) -> Arc<CoreConfig> {
        Arc::new(
            CoreConfig::new(data_dir.to_path_buf(), None, Duration::from_secs(5))
                .expect("CoreConfig::new should succeed"),
        )
    }

    fn student(id: &str, name: &str, marks: &[f64]) -> Student {
        let courses = marks
            .iter()
            .enumerate()
            .map(|(i, m)| Course::new(format!("Course {}", i + 1), *m))
            .collect();
        Student::new(id, name, 20, courses)
    }

    #[tokio::test]
    async fn test_create_then_get_returns_same_student() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = YamlStudentStore::new(test_cfg(temp_dir.path()));
        let alice = student("S001", "Alice Johnson", &[85.0, 90.0]);

        store.create(&alice).await.expect("create should succeed");

        let fetched = store
            .get_by_id("S001")
            .await
            .expect("get should succeed")
            .expect("student should exist");
        assert_eq!(fetched, alice);
        assert!(
            temp_dir.path().join("students").join("S001.yaml").is_file(),
            "document file should exist"
        );
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_id() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = YamlStudentStore::new(test_cfg(temp_dir.path()));

        store
            .create(&student("S001", "Alice", &[70.0]))
            .await
            .expect("first create should succeed");
        let err = store
            .create(&student("S001", "Impostor", &[10.0]))
            .await
            .expect_err("duplicate create should fail");

        assert!(matches!(err, StoreError::Conflict(ref id) if id == "S001"));
        let kept = store.get_by_id("S001").await.expect("get").expect("exists");
        assert_eq!(kept.name(), "Alice", "original record should be untouched");
    }

    #[tokio::test]
    async fn test_create_rejects_unsafe_id() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = YamlStudentStore::new(test_cfg(temp_dir.path()));

        let err = store
            .create(&student("../escape", "Mallory", &[50.0]))
            .await
            .expect_err("unsafe id should be rejected");
        assert!(matches!(err, StoreError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_get_missing_student_returns_none() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = YamlStudentStore::new(test_cfg(temp_dir.path()));

        assert!(store.get_by_id("S404").await.expect("get").is_none());
        assert!(store.get_by_id("not/valid").await.expect("get").is_none());
    }

    #[tokio::test]
    async fn test_get_all_returns_empty_for_nonexistent_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = YamlStudentStore::new(test_cfg(temp_dir.path()));

        let students = store.get_all().await.expect("get_all should succeed");
        assert!(students.is_empty());
    }

    #[tokio::test]
    async fn test_get_all_is_sorted_and_skips_non_records() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = YamlStudentStore::new(test_cfg(temp_dir.path()));

        store.create(&student("S002", "Bob", &[60.0])).await.expect("create");
        store.create(&student("S001", "Alice", &[80.0])).await.expect("create");

        let students_dir = temp_dir.path().join("students");
        fs::write(students_dir.join("broken.yaml"), "- not\n- a record\n")
            .expect("write broken document");
        fs::write(students_dir.join("garbage.yaml"), "invalid: yaml: [[[")
            .expect("write invalid yaml");
        fs::write(students_dir.join("notes.txt"), "ignored").expect("write stray file");

        let students = store.get_all().await.expect("get_all should succeed");
        let ids: Vec<&str> = students.iter().map(Student::id).collect();
        assert_eq!(ids, vec!["S001", "S002"]);
    }

    #[tokio::test]
    async fn test_get_all_decodes_legacy_documents_defensively() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let students_dir = temp_dir.path().join("students");
        fs::create_dir_all(&students_dir).expect("create students dir");
        fs::write(
            students_dir.join("L001.yaml"),
            "id: L001\nname: Legacy Learner\nage: unknown\n",
        )
        .expect("write legacy document");

        let store = YamlStudentStore::new(test_cfg(temp_dir.path()));
        let students = store.get_all().await.expect("get_all should succeed");

        assert_eq!(students.len(), 1);
        assert_eq!(students[0].age(), 0);
        assert_eq!(students[0].courses(), &[Course::new("Unknown", 0.0)]);
    }

    #[tokio::test]
    async fn test_filename_is_authoritative_for_document_ids() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let students_dir = temp_dir.path().join("students");
        fs::create_dir_all(&students_dir).expect("create students dir");
        let body = "id: S777\nname: Copied Record\nage: 20\ncourses: []\n";
        fs::write(students_dir.join("L001.yaml"), body).expect("write first document");
        fs::write(students_dir.join("L002.yaml"), body).expect("write second document");
        fs::write(students_dir.join("L003.yaml"), "name: No Id\nage: 30\n")
            .expect("write document without id");

        let store = YamlStudentStore::new(test_cfg(temp_dir.path()));
        let students = store.get_all().await.expect("get_all should succeed");
        let ids: Vec<&str> = students.iter().map(Student::id).collect();
        assert_eq!(ids, vec!["L001", "L002", "L003"]);

        assert!(store.get_by_id("S777").await.expect("get").is_none());
        let fetched = store
            .get_by_id("L001")
            .await
            .expect("get should succeed")
            .expect("student should exist");
        assert_eq!(fetched.id(), "L001");

        store
            .update("L001", &fetched.with_age(21))
            .await
            .expect("update through the listed id should succeed");
        let updated = store.get_by_id("L001").await.expect("get").expect("exists");
        assert_eq!(updated.age(), 21);

        let no_id = store.get_by_id("L003").await.expect("get").expect("exists");
        assert_eq!(no_id.id(), "L003");
        store.delete("L003").await.expect("delete through the listed id");
    }

    #[tokio::test]
    async fn test_get_all_skips_documents_with_unusable_filenames() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let students_dir = temp_dir.path().join("students");
        fs::create_dir_all(&students_dir).expect("create students dir");
        fs::write(students_dir.join("has space.yaml"), "id: S1\nname: Spacey\n")
            .expect("write document");

        let store = YamlStudentStore::new(test_cfg(temp_dir.path()));
        let students = store.get_all().await.expect("get_all should succeed");
        assert!(students.is_empty());
    }

    #[tokio::test]
    async fn test_get_by_id_reports_structurally_broken_document() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let students_dir = temp_dir.path().join("students");
        fs::create_dir_all(&students_dir).expect("create students dir");
        fs::write(students_dir.join("S013.yaml"), "just a string\n").expect("write document");

        let store = YamlStudentStore::new(test_cfg(temp_dir.path()));
        let err = store
            .get_by_id("S013")
            .await
            .expect_err("non-record document should be an error");
        assert!(matches!(err, StoreError::Document(_)));
    }

    #[tokio::test]
    async fn test_search_by_name_prefix_and_substring() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = YamlStudentStore::new(test_cfg(temp_dir.path()));
        store.create(&student("S001", "Alice Johnson", &[80.0])).await.expect("create");
        store.create(&student("S002", "Bob Allison", &[60.0])).await.expect("create");
        store.create(&student("S003", "alan Brown", &[50.0])).await.expect("create");

        let prefix_ci = store
            .search_by_name(&NameQuery::new("al", MatchMode::Prefix, true))
            .await
            .expect("search");
        let ids: Vec<&str> = prefix_ci.iter().map(Student::id).collect();
        assert_eq!(ids, vec!["S001", "S003"]);

        let prefix_cs = store
            .search_by_name(&NameQuery::new("Al", MatchMode::Prefix, false))
            .await
            .expect("search");
        let ids: Vec<&str> = prefix_cs.iter().map(Student::id).collect();
        assert_eq!(ids, vec!["S001"]);

        let substring = store
            .search_by_name(&NameQuery::new("ALLI", MatchMode::Substring, true))
            .await
            .expect("search");
        let ids: Vec<&str> = substring.iter().map(Student::id).collect();
        assert_eq!(ids, vec!["S002"]);
    }

    #[tokio::test]
    async fn test_update_replaces_record() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = YamlStudentStore::new(test_cfg(temp_dir.path()));
        let original = student("S001", "Alice", &[50.0]);
        store.create(&original).await.expect("create");

        let updated = original
            .with_name("Alice Cooper")
            .with_courses(vec![Course::new("Music", 95.0)]);
        store.update("S001", &updated).await.expect("update should succeed");

        let fetched = store.get_by_id("S001").await.expect("get").expect("exists");
        assert_eq!(fetched, updated);
    }

    #[tokio::test]
    async fn test_update_missing_student_is_not_found() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = YamlStudentStore::new(test_cfg(temp_dir.path()));

        let err = store
            .update("S404", &student("S404", "Nobody", &[]))
            .await
            .expect_err("update of missing student should fail");
        assert!(matches!(err, StoreError::NotFound(ref id) if id == "S404"));
        assert!(store.get_by_id("S404").await.expect("get").is_none());
    }

    #[tokio::test]
    async fn test_update_rejects_id_change() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = YamlStudentStore::new(test_cfg(temp_dir.path()));
        store.create(&student("S001", "Alice", &[50.0])).await.expect("create");

        let err = store
            .update("S001", &student("S999", "Alice", &[50.0]))
            .await
            .expect_err("id change should be rejected");
        assert!(matches!(err, StoreError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_delete_removes_record_and_reports_missing() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = YamlStudentStore::new(test_cfg(temp_dir.path()));
        store.create(&student("S001", "Alice", &[50.0])).await.expect("create");

        store.delete("S001").await.expect("delete should succeed");
        assert!(store.get_by_id("S001").await.expect("get").is_none());

        let err = store
            .delete("S001")
            .await
            .expect_err("second delete should fail");
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}
