//! CLI entry point for the playlist downloader.

use std::process::ExitCode;

mod app;
mod cli;
mod commands;
mod output;

/// Process exit outcome: 0 success, 1 failure, 2 partial success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProcessExit {
    Success,
    Partial,
    Failure,
}

impl ProcessExit {
    pub(crate) fn code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::Failure => 1,
            Self::Partial => 2,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    ExitCode::from(app::runtime::run().await.code())
}

#[cfg(test)]
mod tests {
    use super::ProcessExit;

    #[test]
    fn test_exit_codes() {
        assert_eq!(ProcessExit::Success.code(), 0);
        assert_eq!(ProcessExit::Failure.code(), 1);
        assert_eq!(ProcessExit::Partial.code(), 2);
    }
}
