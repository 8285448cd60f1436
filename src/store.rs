//! Persistent storage for the user graph.
//!
//! The whole graph lives in one pretty-printed JSON file:
//!
//! ```text
//! data/
//!   users.json          # array of users, each with nested projects and tasks
//!   users.json.backup   # copy written by `projman backup`
//! ```
//!
//! Id counters are not stored; they are re-derived from the largest ids in
//! the file every time it is loaded.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::ids::{ProjectId, TaskId, UserId};
use crate::project::Project;
use crate::registry::Registry;
use crate::task::{Task, TaskStatus};
use crate::user::User;
use crate::validate::ValidationError;

/// Suffix appended to the store path for backups
pub const BACKUP_SUFFIX: &str = ".backup";

// =============================================================================
// On-disk records
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub user_id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub projects: Vec<ProjectRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub project_id: ProjectId,
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub owner_email: String,
    #[serde(default)]
    pub tasks: Vec<TaskRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub task_id: TaskId,
    pub title: String,
    pub status: TaskStatus,
    /// Always written; `null` when unassigned. Missing on read means `null`.
    #[serde(default)]
    pub assigned_to: Option<String>,
}

impl From<&Task> for TaskRecord {
    fn from(task: &Task) -> Self {
        Self {
            task_id: task.id(),
            title: task.title().to_string(),
            status: task.status(),
            assigned_to: task.assigned_to().map(str::to_string),
        }
    }
}

impl From<&Project> for ProjectRecord {
    fn from(project: &Project) -> Self {
        Self {
            project_id: project.id(),
            title: project.title().to_string(),
            description: project.description().to_string(),
            due_date: project.due_date().to_string(),
            owner_email: project.owner_email().to_string(),
            tasks: project.tasks().iter().map(TaskRecord::from).collect(),
        }
    }
}

impl From<&User> for UserRecord {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id(),
            name: user.name().to_string(),
            email: user.email().to_string(),
            projects: user.projects().iter().map(ProjectRecord::from).collect(),
        }
    }
}

impl TryFrom<TaskRecord> for Task {
    type Error = ValidationError;

    fn try_from(record: TaskRecord) -> std::result::Result<Self, Self::Error> {
        require_positive("task", record.task_id.get())?;
        let mut task = Task::new(record.task_id, &record.title, record.assigned_to)?;
        task.set_status(record.status);
        Ok(task)
    }
}

impl TryFrom<ProjectRecord> for Project {
    type Error = ValidationError;

    fn try_from(record: ProjectRecord) -> std::result::Result<Self, Self::Error> {
        require_positive("project", record.project_id.get())?;
        let mut project = Project::new(
            record.project_id,
            &record.title,
            &record.description,
            &record.due_date,
            &record.owner_email,
        )?;
        for task in record.tasks {
            project.add_task(Task::try_from(task)?);
        }
        Ok(project)
    }
}

impl TryFrom<UserRecord> for User {
    type Error = ValidationError;

    fn try_from(record: UserRecord) -> std::result::Result<Self, Self::Error> {
        require_positive("user", record.user_id.get())?;
        let mut user = User::new(record.user_id, &record.name, &record.email)?;
        for project in record.projects {
            user.add_project(Project::try_from(project)?);
        }
        Ok(user)
    }
}

fn require_positive(kind: &'static str, raw: u64) -> std::result::Result<(), ValidationError> {
    if raw == 0 {
        return Err(ValidationError::InvalidId {
            kind,
            value: raw.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Store
// =============================================================================

/// Result of a lenient load: the registry plus the error that was swallowed,
/// if any.
#[derive(Debug)]
pub struct Loaded {
    pub registry: Registry,
    pub warning: Option<Error>,
}

/// Handle on the JSON file holding every user.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling path used by [`Store::backup`]: `<path>.backup`
    pub fn backup_path(&self) -> PathBuf {
        let mut path = self.path.clone().into_os_string();
        path.push(BACKUP_SUFFIX);
        PathBuf::from(path)
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the full graph.
    ///
    /// A missing file is the first-run state and yields an empty registry.
    /// Malformed JSON, or a record that fails entity validation, yields
    /// [`Error::CorruptStore`].
    pub fn load(&self) -> Result<Registry> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no store file yet");
                return Ok(Registry::new());
            }
            Err(err) if err.kind() == io::ErrorKind::InvalidData => {
                return Err(self.corrupt(err));
            }
            Err(err) => return Err(Error::Io(err)),
        };

        let records: Vec<UserRecord> =
            serde_json::from_str(&content).map_err(|err| self.corrupt(err))?;
        let users = records
            .into_iter()
            .map(User::try_from)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|err| self.corrupt(err))?;

        debug!(path = %self.path.display(), users = users.len(), "loaded store");
        Ok(Registry::from_users(users))
    }

    /// Load the graph, degrading to an empty registry when the file cannot
    /// be read or parsed.
    ///
    /// Saving after a degraded load overwrites the unreadable file.
    pub fn load_lenient(&self) -> Loaded {
        match self.load() {
            Ok(registry) => Loaded {
                registry,
                warning: None,
            },
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "store unreadable, starting empty");
                Loaded {
                    registry: Registry::new(),
                    warning: Some(err),
                }
            }
        }
    }

    /// Overwrite the store with every user in `registry`.
    ///
    /// Writes to a temp file in the same directory and renames it into
    /// place, so readers never observe a half-written store.
    pub fn save(&self, registry: &Registry) -> Result<()> {
        let records: Vec<UserRecord> = registry.users().iter().map(UserRecord::from).collect();
        let json = serde_json::to_string_pretty(&records)?;
        write_atomic(&self.path, json.as_bytes())?;
        debug!(path = %self.path.display(), users = records.len(), "saved store");
        Ok(())
    }

    /// Copy the store file to [`Store::backup_path`].
    pub fn backup(&self) -> Result<PathBuf> {
        if !self.path.is_file() {
            return Err(Error::NothingToBackup(self.path.clone()));
        }
        let backup = self.backup_path();
        fs::copy(&self.path, &backup)?;
        debug!(from = %self.path.display(), to = %backup.display(), "backed up store");
        Ok(backup)
    }

    fn corrupt(&self, err: impl std::fmt::Display) -> Error {
        Error::CorruptStore {
            path: self.path.clone(),
            reason: err.to_string(),
        }
    }
}

fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(data)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|err| Error::Io(err.error))?;

    Ok(())
}
