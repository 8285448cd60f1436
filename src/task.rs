//! Tasks: the leaves of the ownership graph.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ids::TaskId;
use crate::validate::{self, ValidationError};

/// Task lifecycle state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "in_progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            other => Err(ValidationError::InvalidStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    id: TaskId,
    title: String,
    status: TaskStatus,
    assigned_to: Option<String>,
}

impl Task {
    /// Create a pending task.
    ///
    /// `assigned_to` is free text; it is not checked against known users.
    pub fn new(
        id: TaskId,
        title: &str,
        assigned_to: Option<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id,
            title: validate::title("Task title", title)?,
            status: TaskStatus::Pending,
            assigned_to,
        })
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: &str) -> Result<(), ValidationError> {
        self.title = validate::title("Task title", title)?;
        Ok(())
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
    }

    pub fn assigned_to(&self) -> Option<&str> {
        self.assigned_to.as_deref()
    }

    pub fn set_assigned_to(&mut self, assigned_to: Option<String>) {
        self.assigned_to = assigned_to;
    }

    pub fn complete(&mut self) {
        self.status = TaskStatus::Completed;
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} - {} (Assigned to: {})",
            self.id,
            self.title,
            self.status,
            self.assigned_to.as_deref().unwrap_or("Unassigned")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(title: &str) -> Task {
        Task::new(TaskId::new(1), title, None).expect("task")
    }

    #[test]
    fn new_task_is_pending_and_trimmed() {
        let task = task("  Write docs ");
        assert_eq!(task.title(), "Write docs");
        assert_eq!(task.status(), TaskStatus::Pending);
        assert_eq!(task.assigned_to(), None);
    }

    #[test]
    fn blank_title_fails_and_keeps_previous_value() {
        assert!(Task::new(TaskId::new(1), "  ", None).is_err());

        let mut task = task("Original");
        assert!(task.set_title(" ").is_err());
        assert_eq!(task.title(), "Original");
    }

    #[test]
    fn complete_marks_completed_from_any_state() {
        let mut task = task("T1");
        task.set_status(TaskStatus::InProgress);
        task.complete();
        assert!(task.is_completed());
        task.complete();
        assert_eq!(task.status(), TaskStatus::Completed);
    }

    #[test]
    fn status_parsing() {
        for status in TaskStatus::ALL {
            assert_eq!(status.as_str().parse::<TaskStatus>(), Ok(status));
        }
        assert_eq!(
            "done".parse::<TaskStatus>(),
            Err(ValidationError::InvalidStatus("done".to_string()))
        );
        assert!("Completed".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn display_mentions_assignee_or_unassigned() {
        let mut task = task("T1");
        assert_eq!(task.to_string(), "[1] T1 - pending (Assigned to: Unassigned)");
        task.set_assigned_to(Some("bob@x.com".to_string()));
        task.set_status(TaskStatus::InProgress);
        assert_eq!(task.to_string(), "[1] T1 - in_progress (Assigned to: bob@x.com)");
    }
}
