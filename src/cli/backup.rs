//! projman backup command implementation.

use crate::error::Result;
use crate::output::emit_success;

use super::{Context, GlobalOptions};

pub struct BackupOptions {
    pub global: GlobalOptions,
}

#[derive(serde::Serialize)]
struct BackupOutput {
    source: String,
    backup: String,
}

pub fn run(options: BackupOptions) -> Result<()> {
    let ctx = Context::load(&options.global)?;
    let backup = ctx.store.backup()?;
    let output = BackupOutput {
        source: ctx.store.path().display().to_string(),
        backup: backup.display().to_string(),
    };

    let mut human = ctx.human("Backup created");
    human.push_summary("Source", output.source.clone());
    human.push_summary("Backup", output.backup.clone());
    emit_success(options.global.output(), "backup", &output, Some(&human))
}
