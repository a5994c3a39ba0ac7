//! # Event POS Terminal Library
//!
//! Wires configuration, the API client, the capture device and the shell
//! into a running purchase terminal.
//!
//! ## Module Organization
//! ```text
//! eventpos_terminal/
//! ├── lib.rs          ◄─── You are here (flags, logging, startup)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   └── config.rs   ◄─── terminal.toml + env + flags
//! ├── camera.rs       ◄─── Capture device sessions
//! ├── controller.rs   ◄─── Workflow + API + camera glue
//! ├── shell/
//! │   ├── mod.rs      ◄─── Routes, commands, event loop
//! │   ├── home.rs     ◄─── Scan / manual entry / purchase list / modals
//! │   ├── history.rs  ◄─── Purchase history
//! │   └── mypage.rs   ◄─── Member page
//! └── error.rs        ◄─── Error type shown to the clerk
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Terminal Startup                                  │
//! │                                                                         │
//! │  1. Initialize Logging ───────────────────────────────────────────────► │
//! │     • tracing-subscriber with env filter, written to stderr            │
//! │     • Default: INFO, can be overridden with RUST_LOG                    │
//! │                                                                         │
//! │  2. Load Configuration ───────────────────────────────────────────────► │
//! │     • terminal.toml, then EVENTPOS_* variables, then flags             │
//! │                                                                         │
//! │  3. Build Collaborators ──────────────────────────────────────────────► │
//! │     • ApiClient for the configured endpoint                            │
//! │     • DeviceScanner if a device is set, else KeyboardWedge            │
//! │                                                                         │
//! │  4. Run Shell ────────────────────────────────────────────────────────► │
//! │     • Home screen, stdin commands, scans                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod camera;
pub mod controller;
pub mod error;
pub mod shell;
pub mod state;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use eventpos_client::ApiClient;

use camera::{BarcodeDecoder, DeviceScanner, KeyboardWedge};
use controller::WorkflowController;
use error::AppResult;
use shell::Shell;
use state::{CliOverrides, TerminalConfig};

/// Event POS purchase terminal.
#[derive(Debug, Clone, Parser)]
#[command(name = "eventpos-terminal", version, about)]
pub struct Cli {
    /// Path to terminal.toml (defaults to the platform config directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Base URL of the event API
    #[arg(short, long)]
    pub endpoint: Option<String>,

    /// Barcode device that writes one code per line
    #[arg(short, long)]
    pub scanner: Option<PathBuf>,
}

impl Cli {
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            config: self.config.clone(),
            endpoint: self.endpoint.clone(),
            scanner: self.scanner.clone(),
        }
    }
}

/// Runs the terminal until the clerk quits or stdin closes.
pub async fn run(cli: Cli) -> AppResult<()> {
    let config = TerminalConfig::load(&cli.overrides())?;

    let api = ApiClient::new(config.api_config()?)?;
    info!(endpoint = %api.config().endpoint(), "API client ready");

    let decoder: Box<dyn BarcodeDecoder> = match &config.scanner.device {
        Some(path) => Box::new(DeviceScanner::new(path)),
        None => Box::new(KeyboardWedge::new()),
    };
    info!(scanner = %decoder.describe(), "Barcode source selected");

    let controller = WorkflowController::new(Arc::new(api), config.identity(), decoder);
    Shell::new(config.title(), controller).run().await
}

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so they never interleave with the screen on stdout.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=eventpos=trace` - Show trace for eventpos crates only
/// - Default: INFO, DEBUG for eventpos crates
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,eventpos=debug,reqwest=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
