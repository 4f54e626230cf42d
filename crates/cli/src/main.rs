//! rinku entry point.
//!
//! Prints exactly one JSON line to stdout. Logging goes to stderr so it never
//! mixes with the response; the level comes from `RUST_LOG` (default `warn`).

use std::io;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use crate::args::Parsed;
use crate::output::Response;

mod args;
mod commands;
mod output;

// The card renderer is only ever driven from this single-threaded runtime.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let response = match args::parse(std::env::args_os()) {
        Parsed::Run(invocation) => commands::execute(invocation).await,
        Parsed::Invalid(e) => Response::error(e.to_string()),
        Parsed::Info(info) => {
            return match info.print() {
                Ok(()) => ExitCode::SUCCESS,
                Err(_) => ExitCode::FAILURE,
            };
        }
    };

    response.emit(&mut io::stdout().lock())
}
