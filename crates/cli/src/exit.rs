/// Exit codes for the CLI application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success = 0,
    /// At least one item failed, or the batch stopped early.
    Failure = 1,
    /// Bad arguments, settings or selection; nothing was processed.
    Usage = 2,
}

impl ExitStatus {
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl From<ExitStatus> for std::process::ExitCode {
    fn from(status: ExitStatus) -> Self {
        std::process::ExitCode::from(status.as_u8())
    }
}
