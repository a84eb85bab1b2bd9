//! sd binary entry point

mod cli;

use crate::cli::style::Stylize;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_env("SD_LOG"))
        .with_writer(std::io::stderr)
        .init();

    match cli::main() {
        Ok(code) => code,
        Err(e) => {
            anstream::eprintln!("{} {e}", "Error:".error());
            ExitCode::FAILURE
        }
    }
}
