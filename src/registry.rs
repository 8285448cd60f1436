//! The in-memory user → project → task graph.
//!
//! `Registry` owns the user list together with the [`IdAllocator`] that
//! numbers new entities. Every creating or editing operation validates its
//! input completely before touching the graph, so a failed call leaves both
//! the users and the counters as they were.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::error::{Error, Result};
use crate::ids::{IdAllocator, ProjectId, TaskId, UserId};
use crate::project::Project;
use crate::query;
use crate::task::Task;
use crate::user::User;
use crate::validate;

/// Addresses a user by email or by numeric id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserRef {
    Email(String),
    Id(UserId),
}

impl FromStr for UserRef {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if s.contains('@') {
            return Ok(UserRef::Email(s.to_string()));
        }
        s.parse::<UserId>().map(UserRef::Id).map_err(|_| {
            Error::InvalidArgument(format!(
                "'{s}' is neither an email address nor a user id"
            ))
        })
    }
}

impl fmt::Display for UserRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRef::Email(email) => f.write_str(email),
            UserRef::Id(id) => write!(f, "#{id}"),
        }
    }
}

/// Field changes for a user. `None` leaves the field alone.
#[derive(Debug, Clone, Default)]
pub struct UserEdit {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ProjectEdit {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<String>,
}

/// Field changes for a task. `assigned_to: Some(None)` clears the assignee.
#[derive(Debug, Clone, Default)]
pub struct TaskEdit {
    pub title: Option<String>,
    pub assigned_to: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    users: Vec<User>,
    ids: IdAllocator,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt an existing user list, resuming every counter above the
    /// largest id it contains.
    pub fn from_users(users: Vec<User>) -> Self {
        let ids = IdAllocator::seeded_from(&users);
        Self { users, ids }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn ids(&self) -> &IdAllocator {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    pub fn find_by_email(&self, email: &str) -> Option<&User> {
        query::find_by_email(&self.users, email)
    }

    pub fn find_by_id(&self, id: UserId) -> Option<&User> {
        query::find_by_id(&self.users, id)
    }

    pub fn find(&self, who: &UserRef) -> Option<&User> {
        match who {
            UserRef::Email(email) => self.find_by_email(email),
            UserRef::Id(id) => self.find_by_id(*id),
        }
    }

    pub fn find_mut(&mut self, who: &UserRef) -> Option<&mut User> {
        find_in_mut(&mut self.users, who)
    }

    /// Like [`Registry::find`], but a miss is an error.
    pub fn user(&self, who: &UserRef) -> Result<&User> {
        self.find(who)
            .ok_or_else(|| Error::UserNotFound(who.to_string()))
    }

    pub fn project(&self, who: &UserRef, id: ProjectId) -> Result<&Project> {
        self.user(who)?
            .project(id)
            .ok_or(Error::ProjectNotFound(id))
    }

    pub fn project_mut(&mut self, who: &UserRef, id: ProjectId) -> Result<&mut Project> {
        find_in_mut(&mut self.users, who)
            .ok_or_else(|| Error::UserNotFound(who.to_string()))?
            .project_mut(id)
            .ok_or(Error::ProjectNotFound(id))
    }

    pub fn task_mut(
        &mut self,
        who: &UserRef,
        project_id: ProjectId,
        task_id: TaskId,
    ) -> Result<&mut Task> {
        self.project_mut(who, project_id)?
            .task_mut(task_id)
            .ok_or(Error::TaskNotFound(task_id))
    }

    // =========================================================================
    // Creation
    // =========================================================================

    /// Create a user with a fresh id. Emails must be unique.
    pub fn create_user(&mut self, name: &str, email: &str) -> Result<&User> {
        if self.find_by_email(email).is_some() {
            return Err(Error::DuplicateEmail(email.to_string()));
        }

        let id = self.ids.peek_user().ok_or_else(|| exhausted("user"))?;
        let user = User::new(id, name, email)?;
        self.ids.observe_user(user.id());
        debug!(user_id = %user.id(), email = user.email(), "created user");

        let index = self.users.len();
        self.users.push(user);
        Ok(&self.users[index])
    }

    /// Create a project owned by `who`.
    pub fn create_project(
        &mut self,
        who: &UserRef,
        title: &str,
        description: &str,
        due_date: &str,
    ) -> Result<&Project> {
        let Self { users, ids } = self;
        let user =
            find_in_mut(users, who).ok_or_else(|| Error::UserNotFound(who.to_string()))?;

        let id = ids.peek_project().ok_or_else(|| exhausted("project"))?;
        let project = Project::new(id, title, description, due_date, user.email())?;
        ids.observe_project(project.id());
        debug!(project_id = %project.id(), owner = user.email(), "created project");

        let project: &Project = user.add_project(project);
        Ok(project)
    }

    /// Create a task inside one of `who`'s projects.
    pub fn create_task(
        &mut self,
        who: &UserRef,
        project_id: ProjectId,
        title: &str,
        assigned_to: Option<String>,
    ) -> Result<&Task> {
        let Self { users, ids } = self;
        let project = find_in_mut(users, who)
            .ok_or_else(|| Error::UserNotFound(who.to_string()))?
            .project_mut(project_id)
            .ok_or(Error::ProjectNotFound(project_id))?;

        let id = ids.peek_task().ok_or_else(|| exhausted("task"))?;
        let task = Task::new(id, title, assigned_to)?;
        ids.observe_task(task.id());
        debug!(task_id = %task.id(), project_id = %project_id, "created task");

        let task: &Task = project.add_task(task);
        Ok(task)
    }

    // =========================================================================
    // Edits
    // =========================================================================

    pub fn update_user(&mut self, who: &UserRef, edit: UserEdit) -> Result<&User> {
        let current = self.user(who)?;
        let current_id = current.id();

        let name = edit
            .name
            .as_deref()
            .map(|name| validate::title("Name", name))
            .transpose()?;
        let email = edit.email.as_deref().map(validate::email).transpose()?;

        if let Some(email) = email.as_deref() {
            // Projects record their owner's email at creation and never change it.
            if email != current.email() && !current.projects().is_empty() {
                return Err(Error::InvalidArgument(format!(
                    "{} owns {} project(s); their email cannot change",
                    current.email(),
                    current.projects().len()
                )));
            }
            if let Some(other) = self.find_by_email(email) {
                if other.id() != current_id {
                    return Err(Error::DuplicateEmail(email.to_string()));
                }
            }
        }

        let user = query::find_by_id_mut(&mut self.users, current_id)
            .ok_or_else(|| Error::UserNotFound(who.to_string()))?;
        if let Some(name) = name {
            user.set_name(&name)?;
        }
        if let Some(email) = email {
            user.set_email(&email)?;
        }
        debug!(user_id = %current_id, "updated user");
        Ok(&*user)
    }

    pub fn update_project(
        &mut self,
        who: &UserRef,
        id: ProjectId,
        edit: ProjectEdit,
    ) -> Result<&Project> {
        let title = edit
            .title
            .as_deref()
            .map(|title| validate::title("Project title", title))
            .transpose()?;
        let due_date = edit.due_date.as_deref().map(validate::due_date).transpose()?;

        let project = self.project_mut(who, id)?;
        if let Some(title) = title {
            project.set_title(&title)?;
        }
        if let Some(description) = edit.description {
            project.set_description(description);
        }
        if let Some(due_date) = due_date {
            project.set_due_date(&due_date)?;
        }
        debug!(project_id = %id, "updated project");
        Ok(&*project)
    }

    pub fn update_task(
        &mut self,
        who: &UserRef,
        project_id: ProjectId,
        task_id: TaskId,
        edit: TaskEdit,
    ) -> Result<&Task> {
        let title = edit
            .title
            .as_deref()
            .map(|title| validate::title("Task title", title))
            .transpose()?;

        let task = self.task_mut(who, project_id, task_id)?;
        if let Some(title) = title {
            task.set_title(&title)?;
        }
        if let Some(assigned_to) = edit.assigned_to {
            task.set_assigned_to(assigned_to);
        }
        debug!(task_id = %task_id, "updated task");
        Ok(&*task)
    }

    // =========================================================================
    // Removal
    // =========================================================================

    /// Remove a user together with all of its projects and tasks.
    pub fn remove_user(&mut self, who: &UserRef) -> Option<User> {
        let index = self.users.iter().position(|user| match who {
            UserRef::Email(email) => user.email() == email,
            UserRef::Id(id) => user.id() == *id,
        })?;
        let user = self.users.remove(index);
        debug!(user_id = %user.id(), projects = user.projects().len(), "removed user");
        Some(user)
    }

    pub fn remove_project(&mut self, who: &UserRef, id: ProjectId) -> Result<()> {
        let user = self
            .find_mut(who)
            .ok_or_else(|| Error::UserNotFound(who.to_string()))?;
        if !user.remove_project(id) {
            return Err(Error::ProjectNotFound(id));
        }
        debug!(project_id = %id, "removed project");
        Ok(())
    }
}

fn exhausted(kind: &str) -> Error {
    Error::OperationFailed(format!("{kind} id space exhausted"))
}

fn find_in_mut<'a>(users: &'a mut [User], who: &UserRef) -> Option<&'a mut User> {
    match who {
        UserRef::Email(email) => query::find_by_email_mut(users, email),
        UserRef::Id(id) => query::find_by_id_mut(users, *id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskStatus;
    use crate::validate::ValidationError;

    fn email(value: &str) -> UserRef {
        UserRef::Email(value.to_string())
    }

    fn registry_with_ann() -> Registry {
        let mut registry = Registry::new();
        registry.create_user("Ann", "ann@x.com").expect("user");
        registry
    }

    #[test]
    fn user_ref_parsing() {
        assert_eq!("ann@x.com".parse::<UserRef>().expect("ref"), email("ann@x.com"));
        assert_eq!(
            " 12 ".parse::<UserRef>().expect("ref"),
            UserRef::Id(UserId::new(12))
        );
        assert!("ann".parse::<UserRef>().is_err());
        assert!("0".parse::<UserRef>().is_err());
    }

    #[test]
    fn ids_are_sequential_per_kind() {
        let mut registry = Registry::new();
        let ann = registry.create_user("Ann", "ann@x.com").expect("ann").id();
        let bob = registry.create_user("Bob", "bob@x.com").expect("bob").id();
        assert_eq!((ann, bob), (UserId::new(1), UserId::new(2)));

        let p1 = registry
            .create_project(&email("ann@x.com"), "A", "", "2024-12-31")
            .expect("p1")
            .id();
        let p2 = registry
            .create_project(&email("bob@x.com"), "B", "", "2024-12-31")
            .expect("p2")
            .id();
        assert_eq!((p1, p2), (ProjectId::new(1), ProjectId::new(2)));

        let t1 = registry
            .create_task(&email("ann@x.com"), p1, "t", None)
            .expect("t1")
            .id();
        let t2 = registry
            .create_task(&email("bob@x.com"), p2, "t", None)
            .expect("t2")
            .id();
        assert_eq!((t1, t2), (TaskId::new(1), TaskId::new(2)));
    }

    #[test]
    fn duplicate_email_is_rejected_without_side_effects() {
        let mut registry = registry_with_ann();
        let before = registry.clone();

        let err = registry.create_user("Other", "ann@x.com").expect_err("duplicate");
        assert!(matches!(err, Error::DuplicateEmail(_)));
        assert_eq!(registry, before);
    }

    #[test]
    fn failed_construction_does_not_consume_ids() {
        let mut registry = registry_with_ann();
        let before = registry.clone();

        assert!(registry.create_user(" ", "x@x.com").is_err());
        assert!(registry
            .create_project(&email("ann@x.com"), "P", "", "2024-02-30")
            .is_err());
        assert_eq!(registry, before);

        let bob = registry.create_user("Bob", "bob@x.com").expect("bob");
        assert_eq!(bob.id(), UserId::new(2));
    }

    #[test]
    fn unknown_owner_and_project_are_reported() {
        let mut registry = registry_with_ann();
        assert!(matches!(
            registry.create_project(&email("nobody@x.com"), "P", "", "2024-12-31"),
            Err(Error::UserNotFound(_))
        ));
        assert!(matches!(
            registry.create_task(&email("ann@x.com"), ProjectId::new(9), "T", None),
            Err(Error::ProjectNotFound(_))
        ));
    }

    #[test]
    fn project_inherits_owner_email() {
        let mut registry = registry_with_ann();
        let project = registry
            .create_project(&UserRef::Id(UserId::new(1)), "P", "d", "2024-12-31")
            .expect("project");
        assert_eq!(project.owner_email(), "ann@x.com");
    }

    #[test]
    fn update_user_is_all_or_nothing() {
        let mut registry = registry_with_ann();
        registry.create_user("Bob", "bob@x.com").expect("bob");
        let before = registry.clone();

        let err = registry
            .update_user(
                &email("ann@x.com"),
                UserEdit {
                    name: Some("Annie".into()),
                    email: Some("bad".into()),
                },
            )
            .expect_err("invalid email");
        assert!(matches!(err, Error::Validation(ValidationError::InvalidEmail(_))));

        let err = registry
            .update_user(
                &email("ann@x.com"),
                UserEdit {
                    name: Some("Annie".into()),
                    email: Some("bob@x.com".into()),
                },
            )
            .expect_err("taken email");
        assert!(matches!(err, Error::DuplicateEmail(_)));
        assert_eq!(registry, before);

        let user = registry
            .update_user(
                &email("ann@x.com"),
                UserEdit {
                    name: Some(" Annie ".into()),
                    email: Some("ann@x.com".into()),
                },
            )
            .expect("same email is fine");
        assert_eq!(user.name(), "Annie");
    }

    #[test]
    fn project_owners_keep_their_email() {
        let mut registry = registry_with_ann();
        let ann = email("ann@x.com");
        registry
            .create_project(&ann, "P", "", "2024-12-31")
            .expect("project");
        let before = registry.clone();

        let err = registry
            .update_user(
                &ann,
                UserEdit {
                    name: Some("Annie".into()),
                    email: Some("ann@y.org".into()),
                },
            )
            .expect_err("owner email change");
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert_eq!(registry, before);

        let user = registry
            .update_user(
                &ann,
                UserEdit {
                    name: Some("Annie".into()),
                    ..UserEdit::default()
                },
            )
            .expect("rename");
        assert_eq!(user.projects()[0].owner_email(), user.email());
    }

    #[test]
    fn exhausted_id_space_is_an_error() {
        let max = User::new(UserId::new(u64::MAX), "Max", "max@x.com").expect("user");
        let mut registry = Registry::from_users(vec![max]);
        let before = registry.clone();

        let err = registry.create_user("Bob", "bob@x.com").expect_err("exhausted");
        assert!(matches!(err, Error::OperationFailed(_)));
        assert_eq!(registry, before);

        // other kinds are unaffected
        let project = registry
            .create_project(&email("max@x.com"), "P", "", "2024-12-31")
            .expect("project");
        assert_eq!(project.id(), ProjectId::new(1));
    }

    #[test]
    fn update_project_and_task() {
        let mut registry = registry_with_ann();
        let ann = email("ann@x.com");
        let pid = registry
            .create_project(&ann, "P", "", "2024-12-31")
            .expect("project")
            .id();
        let tid = registry
            .create_task(&ann, pid, "T", Some("bob@x.com".into()))
            .expect("task")
            .id();

        assert!(registry
            .update_project(
                &ann,
                pid,
                ProjectEdit {
                    title: Some("New".into()),
                    due_date: Some("2024-13-01".into()),
                    ..ProjectEdit::default()
                },
            )
            .is_err());
        assert_eq!(registry.project(&ann, pid).expect("project").title(), "P");

        let project = registry
            .update_project(
                &ann,
                pid,
                ProjectEdit {
                    description: Some("desc".into()),
                    due_date: Some("2025-03-01".into()),
                    ..ProjectEdit::default()
                },
            )
            .expect("edit");
        assert_eq!(project.description(), "desc");
        assert_eq!(project.due_date(), "2025-03-01");

        let task = registry
            .update_task(
                &ann,
                pid,
                tid,
                TaskEdit {
                    title: Some("Renamed".into()),
                    assigned_to: Some(None),
                },
            )
            .expect("edit");
        assert_eq!(task.title(), "Renamed");
        assert_eq!(task.assigned_to(), None);
        assert_eq!(task.status(), TaskStatus::Pending);
    }

    #[test]
    fn removing_a_user_takes_its_projects_along() {
        let mut registry = registry_with_ann();
        let ann = email("ann@x.com");
        let pid = registry
            .create_project(&ann, "P", "", "2024-12-31")
            .expect("project")
            .id();
        registry.create_task(&ann, pid, "T", None).expect("task");

        let removed = registry.remove_user(&ann).expect("removed");
        assert_eq!(removed.projects().len(), 1);
        assert!(registry.is_empty());
        assert!(registry.remove_user(&ann).is_none());

        // counters keep running after removal
        let bob = registry.create_user("Bob", "bob@x.com").expect("bob");
        assert_eq!(bob.id(), UserId::new(2));
    }

    #[test]
    fn remove_project_reports_misses() {
        let mut registry = registry_with_ann();
        let ann = email("ann@x.com");
        let pid = registry
            .create_project(&ann, "P", "", "2024-12-31")
            .expect("project")
            .id();

        assert!(matches!(
            registry.remove_project(&ann, ProjectId::new(99)),
            Err(Error::ProjectNotFound(_))
        ));
        registry.remove_project(&ann, pid).expect("remove");
        assert!(registry.project(&ann, pid).is_err());
    }
}
