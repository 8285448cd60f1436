//! Command-line interface for projman
//!
//! This module defines the CLI structure using clap derive macros.
//! Commands are grouped by the entity they act on, one submodule each.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::config::Config;
use crate::error::Result;
use crate::output::{format_date, truncate_text, HumanOutput, OutputOptions};
use crate::project::Project;
use crate::registry::Registry;
use crate::store::{Loaded, Store};
use crate::task::Task;
use crate::user::User;

mod backup;
mod project;
mod task;
mod user;

/// projman - track users, their projects, and the tasks inside them
#[derive(Parser, Debug)]
#[command(name = "projman")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true, arg_required_else_help = true)]
#[command(after_help = "Examples:
  projman add-user \"John Doe\" john@example.com
  projman add-project john@example.com \"Website Redesign\" \"Redesign company website\" 2024-12-31
  projman add-task john@example.com 1 \"Create homepage mockup\" --assigned-to jane@example.com
  projman complete-task john@example.com 1 1")]
pub struct Cli {
    /// Path to the store file (overrides the config file)
    #[arg(long, global = true, env = "PROJMAN_STORE")]
    pub store: Option<PathBuf>,

    /// Path to a configuration file
    #[arg(long, global = true, env = "PROJMAN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands. `USER` arguments take an email or a numeric id.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a new user
    AddUser {
        /// User full name
        name: String,
        /// User email address
        email: String,
    },

    /// List all users
    ListUsers,

    /// Delete a user and all of their projects
    DeleteUser {
        /// Email or id of the user to delete
        user: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Change a user's name or email
    ///
    /// The email of a user who owns projects cannot change.
    UpdateUser {
        user: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },

    /// Add a new project
    AddProject {
        /// Owner email or id
        user: String,
        /// Project title
        title: String,
        /// Project description
        description: String,
        /// Due date (YYYY-MM-DD)
        due_date: String,
    },

    /// List projects for a user
    ListProjects {
        user: String,
    },

    /// Delete a project and its tasks
    DeleteProject {
        user: String,
        project_id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Change a project's title, description or due date
    UpdateProject {
        user: String,
        project_id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// New due date (YYYY-MM-DD)
        #[arg(long)]
        due_date: Option<String>,
    },

    /// Add a new task
    AddTask {
        /// Project owner email or id
        user: String,
        project_id: String,
        /// Task title
        title: String,
        /// Email of assigned user
        #[arg(long)]
        assigned_to: Option<String>,
    },

    /// List tasks in a project
    ListTasks {
        user: String,
        project_id: String,
        /// Filter by status: pending, in_progress, completed
        #[arg(long)]
        status: Option<String>,
    },

    /// Mark a task as completed
    CompleteTask {
        user: String,
        project_id: String,
        task_id: String,
    },

    /// Set a task's status
    UpdateTaskStatus {
        user: String,
        project_id: String,
        task_id: String,
        /// New status: pending, in_progress, completed
        status: String,
    },

    /// Change a task's title or assignee
    UpdateTask {
        user: String,
        project_id: String,
        task_id: String,
        #[arg(long)]
        title: Option<String>,
        /// Email of the new assignee
        #[arg(long, conflicts_with = "unassign")]
        assigned_to: Option<String>,
        /// Clear the assignee
        #[arg(long)]
        unassign: bool,
    },

    /// Copy the store file to <store>.backup
    Backup,
}

/// Flags shared by every command.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    pub store: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

impl GlobalOptions {
    fn output(&self) -> OutputOptions {
        OutputOptions {
            json: self.json,
            quiet: self.quiet,
        }
    }
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let global = GlobalOptions {
            store: self.store,
            config: self.config,
            json: self.json,
            quiet: self.quiet,
        };

        match self.command {
            Commands::AddUser { name, email } => {
                user::run_add(user::AddOptions { name, email, global })
            }
            Commands::ListUsers => user::run_list(user::ListOptions { global }),
            Commands::DeleteUser { user, yes } => {
                user::run_delete(user::DeleteOptions { user, yes, global })
            }
            Commands::UpdateUser { user, name, email } => {
                user::run_update(user::UpdateOptions {
                    user,
                    name,
                    email,
                    global,
                })
            }
            Commands::AddProject { user, title, description, due_date } => {
                project::run_add(project::AddOptions {
                    user,
                    title,
                    description,
                    due_date,
                    global,
                })
            }
            Commands::ListProjects { user } => {
                project::run_list(project::ListOptions { user, global })
            }
            Commands::DeleteProject { user, project_id, yes } => {
                project::run_delete(project::DeleteOptions {
                    user,
                    project_id,
                    yes,
                    global,
                })
            }
            Commands::UpdateProject { user, project_id, title, description, due_date } => {
                project::run_update(project::UpdateOptions {
                    user,
                    project_id,
                    title,
                    description,
                    due_date,
                    global,
                })
            }
            Commands::AddTask { user, project_id, title, assigned_to } => {
                task::run_add(task::AddOptions {
                    user,
                    project_id,
                    title,
                    assigned_to,
                    global,
                })
            }
            Commands::ListTasks { user, project_id, status } => {
                task::run_list(task::ListOptions {
                    user,
                    project_id,
                    status,
                    global,
                })
            }
            Commands::CompleteTask { user, project_id, task_id } => {
                task::run_complete(task::CompleteOptions {
                    user,
                    project_id,
                    task_id,
                    global,
                })
            }
            Commands::UpdateTaskStatus { user, project_id, task_id, status } => {
                task::run_set_status(task::SetStatusOptions {
                    user,
                    project_id,
                    task_id,
                    status,
                    global,
                })
            }
            Commands::UpdateTask { user, project_id, task_id, title, assigned_to, unassign } => {
                task::run_update(task::UpdateOptions {
                    user,
                    project_id,
                    task_id,
                    title,
                    assigned_to,
                    unassign,
                    global,
                })
            }
            Commands::Backup => backup::run(backup::BackupOptions { global }),
        }
    }
}

// =============================================================================
// Shared command plumbing
// =============================================================================

/// Everything a command needs: resolved config, the store and the loaded
/// graph.
struct Context {
    config: Config,
    store: Store,
    registry: Registry,
    load_warning: Option<String>,
}

impl Context {
    fn load(global: &GlobalOptions) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let config = Config::discover(global.config.as_deref(), &cwd)?;
        let path = match &global.store {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => cwd.join(path),
            None => config.store_path(&cwd),
        };

        let store = Store::new(path);
        let Loaded { registry, warning } = store.load_lenient();
        Ok(Self {
            config,
            store,
            registry,
            load_warning: warning.map(|err| format!("{err}; continuing with an empty store")),
        })
    }

    fn save(&self) -> Result<()> {
        self.store.save(&self.registry)
    }

    /// Human output pre-filled with any warning raised while loading.
    fn human(&self, header: impl Into<String>) -> HumanOutput {
        let mut human = HumanOutput::new(header);
        if let Some(warning) = &self.load_warning {
            human.push_warning(warning.clone());
        }
        human
    }

    fn due(&self, project: &Project) -> String {
        format_date(project.due_date(), &self.config.display.date_format)
    }

    fn project_line(&self, project: &Project) -> String {
        let mut line = format!("[{}] {}", project.id(), project.title());
        if !project.description().is_empty() {
            line.push_str(" - ");
            line.push_str(&truncate_text(
                project.description(),
                self.config.display.description_width,
            ));
        }
        line.push_str(&format!(
            " (due {}, {}/{} tasks completed)",
            self.due(project),
            project.completed_count(),
            project.tasks().len()
        ));
        line
    }
}

/// Ask a yes/no question on stderr. Only "y" or "yes" confirms.
fn confirm(prompt: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    eprint!("{prompt} (y/n): ");
    io::stderr().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

// =============================================================================
// JSON views
// =============================================================================

#[derive(Debug, Serialize)]
struct UserView {
    id: u64,
    name: String,
    email: String,
    projects: usize,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().get(),
            name: user.name().to_string(),
            email: user.email().to_string(),
            projects: user.projects().len(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ProjectView {
    id: u64,
    title: String,
    description: String,
    due_date: String,
    owner_email: String,
    tasks_total: usize,
    tasks_completed: usize,
}

impl From<&Project> for ProjectView {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id().get(),
            title: project.title().to_string(),
            description: project.description().to_string(),
            due_date: project.due_date().to_string(),
            owner_email: project.owner_email().to_string(),
            tasks_total: project.tasks().len(),
            tasks_completed: project.completed_count(),
        }
    }
}

#[derive(Debug, Serialize)]
struct TaskView {
    id: u64,
    title: String,
    status: String,
    assigned_to: Option<String>,
}

impl From<&Task> for TaskView {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id().get(),
            title: task.title().to_string(),
            status: task.status().to_string(),
            assigned_to: task.assigned_to().map(str::to_string),
        }
    }
}

/// Result of a delete command; `deleted` is false when the prompt was
/// declined.
#[derive(Debug, Serialize)]
struct DeleteOutput {
    deleted: bool,
    id: u64,
    title: String,
}
