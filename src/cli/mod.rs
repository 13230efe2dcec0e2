//! CLI module
//!
//! Command-line interface for the dashboard core.
//!
//! # Commands
//!
//! - `screens` - List the configured screens
//! - `show` - Fetch a screen, filter it and print one page
//! - `validate` - Check the configuration
//! - `serve` - Start HTTP server mode

mod commands;
mod runner;
mod server;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
pub use server::{router, serve, AppState};
