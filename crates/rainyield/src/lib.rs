//! Rainyield: rainfall to crop yield predictions from multiple LLM providers.
//!
//! This crate re-exports the workspace crates and hosts the `rainyield`
//! binary's command handlers.
//!
//! - [`core`]: data types, prompts, reply parsing and history
//! - [`models`]: provider clients and dispatch
//! - [`server`]: the HTTP API
//! - [`tui`]: the terminal client

pub mod cli;

pub use rainyield_core as core;
pub use rainyield_error as error;
pub use rainyield_models as models;
pub use rainyield_server as server;
pub use rainyield_tui as tui;

pub use rainyield_core::{PredictionHistory, PredictionPoint, Provider};
pub use rainyield_error::{RainyieldError, RainyieldResult};
