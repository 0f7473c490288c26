//! Command-line interface for shell-relay.
//!
//! Uses lexopt for minimal binary size overhead.

use std::ffi::OsString;
use std::net::IpAddr;
use std::path::PathBuf;

use thiserror::Error;

/// Command-line arguments.
///
/// Options left unset fall back to the environment, the configuration file
/// and finally the built-in defaults.
#[derive(Debug, Clone, Default)]
pub struct Args {
    /// Host address to bind to.
    pub host: Option<IpAddr>,
    /// Port to listen on.
    pub port: Option<u16>,
    /// Path to configuration file.
    pub config: Option<PathBuf>,
    /// Initial working directory for new sessions.
    pub working_dir: Option<PathBuf>,
    /// Shell name or program path.
    pub shell: Option<String>,
    /// Per-command timeout in seconds (0 disables).
    pub timeout_secs: Option<u64>,
    /// Maximum history entries per session.
    pub history_limit: Option<usize>,
    /// Log level (error, warn, info, debug, trace).
    pub log_level: Option<String>,
    /// Show version and exit.
    pub version: bool,
    /// Show help and exit.
    pub help: bool,
}

/// Parse command-line arguments.
pub fn parse_args() -> Result<Args, ArgsError> {
    parse_args_from(std::env::args_os())
}

/// Parse arguments from an iterator (for testing).
pub fn parse_args_from<I>(args: I) -> Result<Args, ArgsError>
where
    I: IntoIterator<Item = OsString>,
{
    use lexopt::prelude::*;

    let mut result = Args::default();
    let mut parser = lexopt::Parser::from_iter(args);

    while let Some(arg) = parser.next()? {
        match arg {
            Short('h') | Long("help") => {
                result.help = true;
            }
            Short('V') | Long("version") => {
                result.version = true;
            }
            Short('H') | Long("host") => {
                let value: String = parser.value()?.parse()?;
                result.host = Some(
                    value
                        .parse()
                        .map_err(|_| ArgsError::InvalidValue("host", value))?,
                );
            }
            Short('p') | Long("port") => {
                let value: String = parser.value()?.parse()?;
                result.port = Some(
                    value
                        .parse()
                        .map_err(|_| ArgsError::InvalidValue("port", value))?,
                );
            }
            Short('c') | Long("config") => {
                result.config = Some(parser.value()?.parse()?);
            }
            Short('d') | Long("dir") => {
                result.working_dir = Some(parser.value()?.parse()?);
            }
            Short('s') | Long("shell") => {
                result.shell = Some(parser.value()?.parse()?);
            }
            Short('t') | Long("timeout") => {
                let value: String = parser.value()?.parse()?;
                result.timeout_secs = Some(
                    value
                        .parse()
                        .map_err(|_| ArgsError::InvalidValue("timeout", value))?,
                );
            }
            Long("history-limit") => {
                let value: String = parser.value()?.parse()?;
                result.history_limit = Some(
                    value
                        .parse()
                        .map_err(|_| ArgsError::InvalidValue("history-limit", value))?,
                );
            }
            Short('l') | Long("log-level") => {
                result.log_level = Some(parser.value()?.parse()?);
            }
            Value(val) => {
                return Err(ArgsError::UnexpectedArgument(val.to_string_lossy().into()));
            }
            _ => return Err(arg.unexpected().into()),
        }
    }

    Ok(result)
}

/// Print help message.
pub fn print_help() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        r#"shell-relay {version}
Multi-session remote shell command relay

USAGE:
    shell-relay [OPTIONS]

OPTIONS:
    -H, --host <ADDR>         Host address to bind [default: 127.0.0.1]
    -p, --port <PORT>         Port to listen on [default: 8001]
    -c, --config <FILE>       Path to configuration file (JSON)
    -d, --dir <DIR>           Initial working directory for new sessions
    -s, --shell <SHELL>       Shell: sh, cmd, powershell, or a program path
    -t, --timeout <SECS>      Per-command timeout, 0 for none [default: none]
        --history-limit <N>   Keep at most N history entries, 0 for no limit
    -l, --log-level <LVL>     Log level (error, warn, info, debug, trace)
    -h, --help                Print help
    -V, --version             Print version

ENVIRONMENT VARIABLES:
    SHELL_RELAY_HOST            Host address (overrides config)
    SHELL_RELAY_PORT            Port number (overrides config)
    SHELL_RELAY_SHELL           Shell (overrides config)
    SHELL_RELAY_TIMEOUT_SECS    Per-command timeout (overrides config)
    SHELL_RELAY_HISTORY_LIMIT   History limit (overrides config)
    SHELL_RELAY_LOG_LEVEL       Log level (overrides config)
    RUST_LOG                    Alternative log level setting

EXAMPLES:
    # Start with defaults (localhost:8001)
    shell-relay

    # Listen on all interfaces, kill commands after 5 minutes
    shell-relay -H 0.0.0.0 -p 8080 -t 300

    # Start with config file
    shell-relay -c /etc/shell-relay/config.json
"#
    );
}

/// Print version.
pub fn print_version() {
    println!("shell-relay {}", env!("CARGO_PKG_VERSION"));
}

/// Argument parsing errors.
#[derive(Debug, Error)]
pub enum ArgsError {
    /// Lexopt parsing error.
    #[error("{0}")]
    Lexopt(#[from] lexopt::Error),
    /// Invalid argument value.
    #[error("invalid value for --{0}: '{1}'")]
    InvalidValue(&'static str, String),
    /// Unexpected positional argument.
    #[error("unexpected argument: '{0}'")]
    UnexpectedArgument(String),
}
