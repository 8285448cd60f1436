//! projman user command implementations.

use crate::error::{Error, Result};
use crate::output::emit_success;
use crate::registry::{UserEdit, UserRef};

use super::{confirm, Context, DeleteOutput, GlobalOptions, UserView};

pub struct AddOptions {
    pub name: String,
    pub email: String,
    pub global: GlobalOptions,
}

pub struct ListOptions {
    pub global: GlobalOptions,
}

pub struct DeleteOptions {
    pub user: String,
    pub yes: bool,
    pub global: GlobalOptions,
}

pub struct UpdateOptions {
    pub user: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub global: GlobalOptions,
}

#[derive(serde::Serialize)]
struct UserListOutput {
    total: usize,
    users: Vec<UserView>,
}

pub fn run_add(options: AddOptions) -> Result<()> {
    let mut ctx = Context::load(&options.global)?;
    let user = ctx.registry.create_user(&options.name, &options.email)?;
    let output = UserView::from(user);
    let line = user.to_string();
    ctx.save()?;

    let mut human = ctx.human("User created");
    human.push_summary("ID", output.id.to_string());
    human.push_summary("Name", output.name.clone());
    human.push_summary("Email", output.email.clone());
    human.push_detail(line);
    emit_success(options.global.output(), "add-user", &output, Some(&human))
}

pub fn run_list(options: ListOptions) -> Result<()> {
    let ctx = Context::load(&options.global)?;
    let users: Vec<UserView> = ctx.registry.users().iter().map(UserView::from).collect();
    let output = UserListOutput {
        total: users.len(),
        users,
    };

    let mut human = ctx.human("All Users");
    human.push_summary("Total", output.total.to_string());
    for user in ctx.registry.users() {
        human.push_detail(user.to_string());
    }
    if ctx.registry.is_empty() {
        human.push_next_step("projman add-user <name> <email>");
    }
    emit_success(options.global.output(), "list-users", &output, Some(&human))
}

pub fn run_delete(options: DeleteOptions) -> Result<()> {
    let mut ctx = Context::load(&options.global)?;
    let who: UserRef = options.user.parse()?;
    let user = ctx.registry.user(&who)?;
    let mut output = DeleteOutput {
        deleted: false,
        id: user.id().get(),
        title: user.name().to_string(),
    };

    let prompt = format!("Delete user {} and all their projects?", user.name());
    if !confirm(&prompt, options.yes)? {
        let human = ctx.human("Cancelled.");
        return emit_success(options.global.output(), "delete-user", &output, Some(&human));
    }

    let removed = ctx
        .registry
        .remove_user(&who)
        .ok_or_else(|| Error::UserNotFound(who.to_string()))?;
    ctx.save()?;
    output.deleted = true;

    let mut human = ctx.human(format!("User {} deleted", removed.name()));
    human.push_summary("Email", removed.email().to_string());
    human.push_summary("Projects removed", removed.projects().len().to_string());
    emit_success(options.global.output(), "delete-user", &output, Some(&human))
}

pub fn run_update(options: UpdateOptions) -> Result<()> {
    if options.name.is_none() && options.email.is_none() {
        return Err(Error::InvalidArgument(
            "nothing to update: pass --name and/or --email".to_string(),
        ));
    }

    let mut ctx = Context::load(&options.global)?;
    let who: UserRef = options.user.parse()?;
    let user = ctx.registry.update_user(
        &who,
        UserEdit {
            name: options.name,
            email: options.email,
        },
    )?;
    let output = UserView::from(user);
    let line = user.to_string();
    ctx.save()?;

    let mut human = ctx.human("User updated");
    human.push_detail(line);
    emit_success(options.global.output(), "update-user", &output, Some(&human))
}
