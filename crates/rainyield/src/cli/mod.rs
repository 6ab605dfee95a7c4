//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the rainyield binary.

mod commands;
mod serve;
mod tui;

pub use commands::{Cli, Commands};
pub use serve::handle_serve_command;
pub use tui::launch_tui;
