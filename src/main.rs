//! shell-relay binary entry point.

use std::process::ExitCode;

use shell_relay::api::{serve_with_state, AppState};
use shell_relay::cli::{self, Args};
use shell_relay::{logging, Config};
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let args = match cli::parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("error: {}", e);
            eprintln!("Run with --help for usage.");
            return ExitCode::from(2);
        }
    };

    if args.help {
        cli::print_help();
        return ExitCode::SUCCESS;
    }
    if args.version {
        cli::print_version();
        return ExitCode::SUCCESS;
    }

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> shell_relay::Result<()> {
    let config = Config::load(&args)?;

    if let Err(e) = logging::init_with_filter(config.log_filter()) {
        eprintln!("warning: logging already initialized: {}", e);
    }

    info!("shell-relay v{}", env!("CARGO_PKG_VERSION"));

    let server_config = config.to_server_config()?;
    let executor = config.executor();
    info!(
        shell = %executor.shell(),
        timeout = ?executor.timeout(),
        history_limit = ?config.session.history_limit,
        "executor configured"
    );

    let state = AppState::with_parts(executor, config.session_config());
    serve_with_state(server_config, state).await
}
