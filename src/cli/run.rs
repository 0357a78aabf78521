use anyhow::{Result, bail};

use super::{
    args::{Arguments, Command},
    commands::{plan::plan, translate::translate},
    exit_status::ExitStatus,
};

/// Dispatch to the command handler.
pub fn run(Arguments { command }: Arguments) -> Result<ExitStatus> {
    match command {
        Some(Command::Translate(cmd)) => translate(cmd),
        Some(Command::Plan(cmd)) => plan(cmd),
        None => bail!("No command provided. Use --help to see available commands."),
    }
}
