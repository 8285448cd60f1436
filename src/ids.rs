//! Entity identifiers and the allocator that hands them out.
//!
//! Every entity kind draws from its own counter. Project and task counters
//! are shared across all owners, so a task id is unique within the whole
//! store rather than within its project. Counters are never persisted:
//! after a reload they are re-derived from the largest id present.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::user::User;
use crate::validate::ValidationError;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().parse::<u64>() {
                    Ok(raw) if raw > 0 => Ok(Self(raw)),
                    _ => Err(ValidationError::InvalidId {
                        kind: $label,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

entity_id!(
    /// Identifier of a [`User`].
    UserId,
    "user"
);
entity_id!(
    /// Identifier of a project, unique across every user.
    ProjectId,
    "project"
);
entity_id!(
    /// Identifier of a task, unique across every project.
    TaskId,
    "task"
);

/// Next-id counters for users, projects and tasks.
///
/// A counter of `None` means its id space is used up: an id of `u64::MAX`
/// has been observed and nothing can be issued above it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdAllocator {
    next_user: Option<u64>,
    next_project: Option<u64>,
    next_task: Option<u64>,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self {
            next_user: Some(1),
            next_project: Some(1),
            next_task: Some(1),
        }
    }
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an allocator whose counters sit above every id in `users`.
    pub fn seeded_from(users: &[User]) -> Self {
        let mut ids = Self::new();
        for user in users {
            ids.observe_user(user.id());
            for project in user.projects() {
                ids.observe_project(project.id());
                for task in project.tasks() {
                    ids.observe_task(task.id());
                }
            }
        }
        ids
    }

    /// Id the next user will receive, or `None` once exhausted.
    pub fn peek_user(&self) -> Option<UserId> {
        self.next_user.map(UserId)
    }

    pub fn peek_project(&self) -> Option<ProjectId> {
        self.next_project.map(ProjectId)
    }

    pub fn peek_task(&self) -> Option<TaskId> {
        self.next_task.map(TaskId)
    }

    /// Record an externally supplied id; later allocations will exceed it.
    pub fn observe_user(&mut self, id: UserId) {
        self.next_user = advance(self.next_user, id.0);
    }

    pub fn observe_project(&mut self, id: ProjectId) {
        self.next_project = advance(self.next_project, id.0);
    }

    pub fn observe_task(&mut self, id: TaskId) {
        self.next_task = advance(self.next_task, id.0);
    }
}

fn advance(next: Option<u64>, seen: u64) -> Option<u64> {
    Some(next?.max(seen.checked_add(1)?))
}
