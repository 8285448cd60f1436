//! Projects and the tasks they own.
//!
//! A project keeps its tasks in insertion order. Removing a task leaves the
//! remaining tasks in their original relative order.

use std::fmt;

use crate::ids::{ProjectId, TaskId};
use crate::task::{Task, TaskStatus};
use crate::validate::{self, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    id: ProjectId,
    title: String,
    description: String,
    due_date: String,
    owner_email: String,
    tasks: Vec<Task>,
}

impl Project {
    /// Create a project with no tasks.
    ///
    /// Title and due date are validated; the description is free text.
    pub fn new(
        id: ProjectId,
        title: &str,
        description: &str,
        due_date: &str,
        owner_email: &str,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id,
            title: validate::title("Project title", title)?,
            description: description.to_string(),
            due_date: validate::due_date(due_date)?,
            owner_email: owner_email.to_string(),
            tasks: Vec::new(),
        })
    }

    pub fn id(&self) -> ProjectId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: &str) -> Result<(), ValidationError> {
        self.title = validate::title("Project title", title)?;
        Ok(())
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn due_date(&self) -> &str {
        &self.due_date
    }

    pub fn set_due_date(&mut self, due_date: &str) -> Result<(), ValidationError> {
        self.due_date = validate::due_date(due_date)?;
        Ok(())
    }

    /// Email of the user that created the project. Fixed at creation.
    pub fn owner_email(&self) -> &str {
        &self.owner_email
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn add_task(&mut self, task: Task) -> &mut Task {
        let index = self.tasks.len();
        self.tasks.push(task);
        &mut self.tasks[index]
    }

    /// Remove the first task with `id`. Returns whether one was found.
    pub fn remove_task(&mut self, id: TaskId) -> bool {
        match self.tasks.iter().position(|task| task.id() == id) {
            Some(index) => {
                self.tasks.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == id)
    }

    pub fn task_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id() == id)
    }

    pub fn tasks_by_status(&self, status: TaskStatus) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|task| task.status() == status)
            .collect()
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|task| task.is_completed()).count()
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[{}] {}", self.id, self.title)?;
        writeln!(f, "    Description: {}", self.description)?;
        writeln!(f, "    Due: {}", self.due_date)?;
        write!(
            f,
            "    Tasks: {}/{} completed",
            self.completed_count(),
            self.tasks.len()
        )
    }
}
