//! Users: the roots of the ownership graph.

use std::fmt;

use crate::ids::{ProjectId, UserId};
use crate::project::Project;
use crate::validate::{self, ValidationError};

/// A user and the projects it owns.
///
/// Only the email *format* is checked here. Uniqueness across users is the
/// job of [`crate::registry::Registry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    name: String,
    email: String,
    projects: Vec<Project>,
}

impl User {
    pub fn new(id: UserId, name: &str, email: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            id,
            name: validate::title("Name", name)?,
            email: validate::email(email)?,
            projects: Vec::new(),
        })
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) -> Result<(), ValidationError> {
        self.name = validate::title("Name", name)?;
        Ok(())
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn set_email(&mut self, email: &str) -> Result<(), ValidationError> {
        self.email = validate::email(email)?;
        Ok(())
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// Append `project` and hand back the stored copy.
    pub fn add_project(&mut self, project: Project) -> &mut Project {
        let index = self.projects.len();
        self.projects.push(project);
        &mut self.projects[index]
    }

    /// Remove the first project with `id`, dropping its tasks with it.
    pub fn remove_project(&mut self, id: ProjectId) -> bool {
        match self.projects.iter().position(|project| project.id() == id) {
            Some(index) => {
                self.projects.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn project(&self, id: ProjectId) -> Option<&Project> {
        self.projects.iter().find(|project| project.id() == id)
    }

    pub fn project_mut(&mut self, id: ProjectId) -> Option<&mut Project> {
        self.projects.iter_mut().find(|project| project.id() == id)
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} ({}) - {} project(s)",
            self.id,
            self.name,
            self.email,
            self.projects.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User::new(UserId::new(1), "Ann", "ann@x.com").expect("user")
    }

    fn project(id: u64, title: &str) -> Project {
        Project::new(ProjectId::new(id), title, "", "2024-12-31", "ann@x.com").expect("project")
    }

    #[test]
    fn new_user_trims_name_and_keeps_email_verbatim() {
        let user = User::new(UserId::new(4), "  Ann Lee ", "Ann.Lee@Example.com").expect("user");
        assert_eq!(user.id(), UserId::new(4));
        assert_eq!(user.name(), "Ann Lee");
        assert_eq!(user.email(), "Ann.Lee@Example.com");
        assert!(user.projects().is_empty());
    }

    #[test]
    fn construction_rejects_bad_fields() {
        assert!(matches!(
            User::new(UserId::new(1), " ", "ann@x.com"),
            Err(ValidationError::EmptyField { .. })
        ));
        assert!(matches!(
            User::new(UserId::new(1), "Ann", "not-an-email"),
            Err(ValidationError::InvalidEmail(_))
        ));
    }

    #[test]
    fn failed_setters_leave_fields_unchanged() {
        let mut user = user();
        assert!(user.set_name("\t").is_err());
        assert!(user.set_email("ann@x").is_err());
        assert_eq!(user.name(), "Ann");
        assert_eq!(user.email(), "ann@x.com");

        user.set_email("ann@y.org").expect("valid email");
        assert_eq!(user.email(), "ann@y.org");
    }

    #[test]
    fn projects_are_looked_up_and_removed_by_id() {
        let mut user = user();
        user.add_project(project(3, "a"));
        user.add_project(project(5, "b"));
        user.add_project(project(8, "c"));

        assert_eq!(user.project(ProjectId::new(5)).map(Project::title), Some("b"));
        assert!(user.project(ProjectId::new(4)).is_none());

        assert!(user.remove_project(ProjectId::new(3)));
        assert!(!user.remove_project(ProjectId::new(3)));
        let titles: Vec<_> = user.projects().iter().map(Project::title).collect();
        assert_eq!(titles, vec!["b", "c"]);
    }

    #[test]
    fn display_counts_projects() {
        let mut user = user();
        assert_eq!(user.to_string(), "[1] Ann (ann@x.com) - 0 project(s)");
        user.add_project(project(1, "a"));
        assert_eq!(user.to_string(), "[1] Ann (ann@x.com) - 1 project(s)");
    }
}
