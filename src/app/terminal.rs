//! Terminal capabilities and tracing setup.

use std::io::{self, IsTerminal};

use tracing_subscriber::EnvFilter;

/// HTTP internals stay quiet unless `RUST_LOG` asks for them.
const DEPENDENCY_DIRECTIVES: &str = "hyper_util=warn,reqwest=warn";

/// What the process learned about its terminal at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct TerminalEnv {
    pub(crate) no_color_env: bool,
    pub(crate) dumb: bool,
    pub(crate) stderr_is_terminal: bool,
}

impl TerminalEnv {
    pub(crate) fn detect() -> Self {
        Self {
            no_color_env: std::env::var_os("NO_COLOR").is_some_and(|value| !value.is_empty()),
            dumb: std::env::var("TERM").is_ok_and(|value| value.eq_ignore_ascii_case("dumb")),
            stderr_is_terminal: io::stderr().is_terminal(),
        }
    }

    pub(crate) fn color(self, no_color_flag: bool) -> bool {
        !(no_color_flag || self.no_color_env || self.dumb)
    }

    /// The spinner shares stderr with logs and yt-dlp failures, so it only
    /// runs on an interactive, non-dumb stderr.
    pub(crate) fn spinner(self, quiet: bool) -> bool {
        self.stderr_is_terminal && !quiet && !self.dumb
    }
}

fn log_filter(default_level: &str, force_cli_level: bool) -> EnvFilter {
    let fallback = || EnvFilter::new(format!("{default_level},{DEPENDENCY_DIRECTIVES}"));
    if force_cli_level {
        fallback()
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback())
    }
}

pub(crate) fn init_tracing(default_level: &str, force_cli_level: bool, color: bool) {
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_ansi(color)
        .with_target(false)
        .with_env_filter(log_filter(default_level, force_cli_level))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(no_color_env: bool, dumb: bool, stderr_is_terminal: bool) -> TerminalEnv {
        TerminalEnv {
            no_color_env,
            dumb,
            stderr_is_terminal,
        }
    }

    #[test]
    fn test_color_disabled_by_any_source() {
        assert!(env(false, false, true).color(false));
        assert!(!env(false, false, true).color(true));
        assert!(!env(true, false, true).color(false));
        assert!(!env(false, true, true).color(false));
    }

    #[test]
    fn test_spinner_needs_interactive_stderr() {
        assert!(env(false, false, true).spinner(false));
        assert!(!env(false, false, false).spinner(false));
        assert!(!env(false, false, true).spinner(true));
        assert!(!env(false, true, true).spinner(false));
    }

    #[test]
    fn test_cli_level_keeps_dependencies_quiet() {
        let filter = log_filter("debug", true).to_string();
        assert!(filter.contains("debug"), "{filter}");
        assert!(filter.contains("reqwest=warn"), "{filter}");
    }
}
