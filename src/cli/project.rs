//! projman project command implementations.

use crate::error::{Error, Result};
use crate::ids::ProjectId;
use crate::output::{emit_success, format_date};
use crate::registry::{ProjectEdit, UserRef};

use super::{confirm, Context, DeleteOutput, GlobalOptions, ProjectView};

pub struct AddOptions {
    pub user: String,
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub global: GlobalOptions,
}

pub struct ListOptions {
    pub user: String,
    pub global: GlobalOptions,
}

pub struct DeleteOptions {
    pub user: String,
    pub project_id: String,
    pub yes: bool,
    pub global: GlobalOptions,
}

pub struct UpdateOptions {
    pub user: String,
    pub project_id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub global: GlobalOptions,
}

#[derive(serde::Serialize)]
struct ProjectListOutput {
    owner: String,
    total: usize,
    projects: Vec<ProjectView>,
}

pub fn run_add(options: AddOptions) -> Result<()> {
    let mut ctx = Context::load(&options.global)?;
    let who: UserRef = options.user.parse()?;
    let owner = ctx.registry.user(&who)?.name().to_string();

    let project = ctx.registry.create_project(
        &who,
        &options.title,
        &options.description,
        &options.due_date,
    )?;
    let output = ProjectView::from(project);
    let line = project.to_string();
    ctx.save()?;

    let mut human = ctx.human(format!("Project created for {owner}"));
    human.push_summary("ID", output.id.to_string());
    human.push_summary("Title", output.title.clone());
    human.push_summary(
        "Due",
        format_date(&output.due_date, &ctx.config.display.date_format),
    );
    human.push_detail(line);
    emit_success(options.global.output(), "add-project", &output, Some(&human))
}

pub fn run_list(options: ListOptions) -> Result<()> {
    let ctx = Context::load(&options.global)?;
    let who: UserRef = options.user.parse()?;
    let user = ctx.registry.user(&who)?;
    let output = ProjectListOutput {
        owner: user.email().to_string(),
        total: user.projects().len(),
        projects: user.projects().iter().map(ProjectView::from).collect(),
    };

    let mut human = ctx.human(format!("Projects for {}", user.name()));
    human.push_summary("Total", output.total.to_string());
    for project in user.projects() {
        human.push_detail(ctx.project_line(project));
    }
    if output.total == 0 {
        human.push_next_step(format!(
            "projman add-project {} <title> <description> <YYYY-MM-DD>",
            user.email()
        ));
    }
    emit_success(options.global.output(), "list-projects", &output, Some(&human))
}

pub fn run_delete(options: DeleteOptions) -> Result<()> {
    let mut ctx = Context::load(&options.global)?;
    let who: UserRef = options.user.parse()?;
    let project_id: ProjectId = options.project_id.parse()?;
    let project = ctx.registry.project(&who, project_id)?;
    let mut output = DeleteOutput {
        deleted: false,
        id: project_id.get(),
        title: project.title().to_string(),
    };
    let task_count = project.tasks().len();

    let prompt = format!("Delete project '{}'?", output.title);
    if !confirm(&prompt, options.yes)? {
        let human = ctx.human("Cancelled.");
        return emit_success(options.global.output(), "delete-project", &output, Some(&human));
    }

    ctx.registry.remove_project(&who, project_id)?;
    ctx.save()?;
    output.deleted = true;

    let mut human = ctx.human(format!("Project '{}' deleted", output.title));
    human.push_summary("Tasks removed", task_count.to_string());
    emit_success(options.global.output(), "delete-project", &output, Some(&human))
}

pub fn run_update(options: UpdateOptions) -> Result<()> {
    if options.title.is_none() && options.description.is_none() && options.due_date.is_none() {
        return Err(Error::InvalidArgument(
            "nothing to update: pass --title, --description and/or --due-date".to_string(),
        ));
    }

    let mut ctx = Context::load(&options.global)?;
    let who: UserRef = options.user.parse()?;
    let project_id: ProjectId = options.project_id.parse()?;
    let project = ctx.registry.update_project(
        &who,
        project_id,
        ProjectEdit {
            title: options.title,
            description: options.description,
            due_date: options.due_date,
        },
    )?;
    let output = ProjectView::from(project);
    let line = project.to_string();
    ctx.save()?;

    let mut human = ctx.human("Project updated");
    human.push_detail(line);
    emit_success(options.global.output(), "update-project", &output, Some(&human))
}
