//! # State Module
//!
//! Startup state of the terminal. The purchase workflow itself lives in
//! [`crate::controller`]; this module only holds what is read once and never
//! changes while the terminal runs.

mod config;

pub use config::{
    ApiSettings, CliOverrides, EventSettings, RegisterSettings, ScannerSettings, TerminalConfig,
};
