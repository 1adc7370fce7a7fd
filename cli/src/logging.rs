use std::io::IsTerminal;

use tracing::metadata::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

impl Verbosity {
    pub(crate) fn from_flags(quiet: bool, verbose: bool) -> Self {
        match (quiet, verbose) {
            (true, _) => Verbosity::Quiet,
            (false, true) => Verbosity::Verbose,
            (false, false) => Verbosity::Normal,
        }
    }
}

fn filter(verbosity: Verbosity, rust_log: Option<&str>) -> EnvFilter {
    let level = match verbosity {
        Verbosity::Quiet => LevelFilter::WARN,
        Verbosity::Verbose => LevelFilter::DEBUG,
        Verbosity::Normal => {
            // RUST_LOG only applies when no flag was given
            if let Some(directives) = rust_log {
                if let Ok(filter) = EnvFilter::try_new(directives) {
                    return filter;
                }
            }
            LevelFilter::INFO
        }
    };
    EnvFilter::default().add_directive(level.into())
}

/// Installs the stderr log subscriber. stdout is kept for command output.
pub(crate) fn init(verbosity: Verbosity) {
    let rust_log = std::env::var("RUST_LOG").ok();
    tracing_subscriber::fmt()
        .with_env_filter(filter(verbosity, rust_log.as_deref()))
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .init();
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use tracing::metadata::LevelFilter;

    use super::{Verbosity, filter};

    #[rstest(quiet, verbose, expected,
        case(false, false, Verbosity::Normal),
        case(true, false, Verbosity::Quiet),
        case(false, true, Verbosity::Verbose)
    )]
    fn test_verbosity_from_flags(quiet: bool, verbose: bool, expected: Verbosity) {
        assert_eq!(expected, Verbosity::from_flags(quiet, verbose));
    }

    #[rstest(verbosity, rust_log, expected,
        case(Verbosity::Normal, None, LevelFilter::INFO),
        case(Verbosity::Normal, Some("debug"), LevelFilter::DEBUG),
        case(Verbosity::Normal, Some("pkcs=trace"), LevelFilter::TRACE),
        case(Verbosity::Quiet, Some("debug"), LevelFilter::WARN),
        case(Verbosity::Verbose, None, LevelFilter::DEBUG)
    )]
    fn test_filter(verbosity: Verbosity, rust_log: Option<&str>, expected: LevelFilter) {
        assert_eq!(Some(expected), filter(verbosity, rust_log).max_level_hint());
    }
}
