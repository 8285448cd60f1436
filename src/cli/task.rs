//! projman task command implementations.

use tracing::warn;

use crate::error::{Error, Result};
use crate::ids::{ProjectId, TaskId};
use crate::output::{emit_success, HumanOutput};
use crate::query;
use crate::registry::{TaskEdit, UserRef};
use crate::task::{Task, TaskStatus};
use crate::user::User;

use super::{Context, GlobalOptions, TaskView};

pub struct AddOptions {
    pub user: String,
    pub project_id: String,
    pub title: String,
    pub assigned_to: Option<String>,
    pub global: GlobalOptions,
}

pub struct ListOptions {
    pub user: String,
    pub project_id: String,
    pub status: Option<String>,
    pub global: GlobalOptions,
}

pub struct CompleteOptions {
    pub user: String,
    pub project_id: String,
    pub task_id: String,
    pub global: GlobalOptions,
}

pub struct SetStatusOptions {
    pub user: String,
    pub project_id: String,
    pub task_id: String,
    pub status: String,
    pub global: GlobalOptions,
}

pub struct UpdateOptions {
    pub user: String,
    pub project_id: String,
    pub task_id: String,
    pub title: Option<String>,
    pub assigned_to: Option<String>,
    pub unassign: bool,
    pub global: GlobalOptions,
}

#[derive(serde::Serialize)]
struct TaskListOutput {
    project_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<TaskStatus>,
    total: usize,
    tasks: Vec<TaskView>,
}

/// Parsed `<user> <project-id>` addressing.
struct Target {
    who: UserRef,
    project_id: ProjectId,
}

impl Target {
    fn parse(user: &str, project_id: &str) -> Result<Self> {
        Ok(Self {
            who: user.parse()?,
            project_id: project_id.parse()?,
        })
    }
}

/// Warn when a task points at an assignee no user has.
fn warn_unknown_assignee(users: &[User], task: &Task, human: &mut HumanOutput) {
    if !query::has_unknown_assignee(users, task) {
        return;
    }
    if let Some(email) = task.assigned_to() {
        warn!(task_id = %task.id(), assignee = email, "assignee matches no user");
        human.push_warning(format!(
            "User {email} not found, but the task was saved anyway"
        ));
    }
}

pub fn run_add(options: AddOptions) -> Result<()> {
    let mut ctx = Context::load(&options.global)?;
    let target = Target::parse(&options.user, &options.project_id)?;

    let task = ctx
        .registry
        .create_task(
            &target.who,
            target.project_id,
            &options.title,
            options.assigned_to,
        )?
        .clone();
    let project_title = ctx.registry.project(&target.who, target.project_id)?.title().to_string();
    ctx.save()?;

    let output = TaskView::from(&task);
    let mut human = ctx.human(format!("Task added to project '{project_title}'"));
    human.push_summary("ID", output.id.to_string());
    human.push_summary("Title", output.title.clone());
    human.push_summary("Status", output.status.clone());
    human.push_detail(task.to_string());
    warn_unknown_assignee(ctx.registry.users(), &task, &mut human);
    emit_success(options.global.output(), "add-task", &output, Some(&human))
}

pub fn run_list(options: ListOptions) -> Result<()> {
    let ctx = Context::load(&options.global)?;
    let target = Target::parse(&options.user, &options.project_id)?;
    let status = options
        .status
        .as_deref()
        .map(str::parse::<TaskStatus>)
        .transpose()?;
    let project = ctx.registry.project(&target.who, target.project_id)?;

    let tasks: Vec<&Task> = match status {
        Some(status) => project.tasks_by_status(status),
        None => project.tasks().iter().collect(),
    };
    let output = TaskListOutput {
        project_id: project.id().get(),
        status,
        total: tasks.len(),
        tasks: tasks.iter().copied().map(TaskView::from).collect(),
    };

    let header = match status {
        Some(status) => format!("Tasks in '{}' with status '{status}'", project.title()),
        None => format!("All Tasks in '{}'", project.title()),
    };
    let mut human = ctx.human(header);
    human.push_summary("Total", output.total.to_string());
    for task in &tasks {
        human.push_detail(task.to_string());
    }
    emit_success(options.global.output(), "list-tasks", &output, Some(&human))
}

pub fn run_complete(options: CompleteOptions) -> Result<()> {
    let mut ctx = Context::load(&options.global)?;
    let target = Target::parse(&options.user, &options.project_id)?;
    let task_id: TaskId = options.task_id.parse()?;

    let task = ctx.registry.task_mut(&target.who, target.project_id, task_id)?;
    task.complete();
    let output = TaskView::from(&*task);
    ctx.save()?;

    let human = ctx.human(format!("Task '{}' marked as completed", output.title));
    emit_success(options.global.output(), "complete-task", &output, Some(&human))
}

pub fn run_set_status(options: SetStatusOptions) -> Result<()> {
    let mut ctx = Context::load(&options.global)?;
    let target = Target::parse(&options.user, &options.project_id)?;
    let task_id: TaskId = options.task_id.parse()?;
    let status: TaskStatus = options.status.parse()?;

    let task = ctx.registry.task_mut(&target.who, target.project_id, task_id)?;
    task.set_status(status);
    let output = TaskView::from(&*task);
    ctx.save()?;

    let human = ctx.human(format!(
        "Task '{}' status updated to '{status}'",
        output.title
    ));
    emit_success(options.global.output(), "update-task-status", &output, Some(&human))
}

pub fn run_update(options: UpdateOptions) -> Result<()> {
    let assigned_to = match (options.assigned_to, options.unassign) {
        (Some(email), false) => Some(Some(email)),
        (None, true) => Some(None),
        (None, false) => None,
        (Some(_), true) => {
            return Err(Error::InvalidArgument(
                "--assigned-to and --unassign cannot be combined".to_string(),
            ))
        }
    };
    if options.title.is_none() && assigned_to.is_none() {
        return Err(Error::InvalidArgument(
            "nothing to update: pass --title, --assigned-to or --unassign".to_string(),
        ));
    }

    let mut ctx = Context::load(&options.global)?;
    let target = Target::parse(&options.user, &options.project_id)?;
    let task_id: TaskId = options.task_id.parse()?;

    let task = ctx
        .registry
        .update_task(
            &target.who,
            target.project_id,
            task_id,
            TaskEdit {
                title: options.title,
                assigned_to,
            },
        )?
        .clone();
    ctx.save()?;

    let output = TaskView::from(&task);
    let mut human = ctx.human("Task updated");
    human.push_detail(task.to_string());
    warn_unknown_assignee(ctx.registry.users(), &task, &mut human);
    emit_success(options.global.output(), "update-task", &output, Some(&human))
}
