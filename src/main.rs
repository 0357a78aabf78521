use std::process::ExitCode;

use clap::Parser;
use doctrans::cli::{Arguments, ExitStatus, console};

fn main() -> ExitCode {
    let args = Arguments::parse();

    match doctrans::cli::run_cli(args) {
        Ok(status) => status.into(),
        Err(err) => {
            console::print_error(&err);
            ExitStatus::Error.into()
        }
    }
}
