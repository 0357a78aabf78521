use std::process::ExitCode;

/// Exit status for CLI commands.
///
/// - `Success` (0): the run completed, even if some files failed to translate
/// - `Error` (2): the run could not start or could not set up its branch
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}
