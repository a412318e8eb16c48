use adev::cli::run_cli;
use adev::logging::{init_logging, LogConfig};
use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(err) = init_logging(&LogConfig::from_env()) {
        eprintln!("warning: {err:#}");
    }
    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:#}");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
