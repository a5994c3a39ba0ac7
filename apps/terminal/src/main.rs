//! # Event POS Terminal Entry Point
//!
//! ## Startup Sequence
//! 1. Parse flags
//! 2. Initialize tracing (logging)
//! 3. Hand over to [`eventpos_terminal::run`]
//!
//! Exit status is non-zero when startup fails, for example on a missing
//! config file or an invalid endpoint.

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use eventpos_terminal::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    eventpos_terminal::init_tracing();

    info!("Starting Event POS terminal");

    match eventpos_terminal::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Terminal stopped");
            eprintln!("{}", e.message);
            ExitCode::FAILURE
        }
    }
}
