//! `roverlink-types` – shared protocol and domain types for the roverlink
//! relay.
//!
//! - [`wire`] – the JSON events exchanged with browser clients over the
//!   WebSocket.
//! - [`command`] – the typed [`RobotCommand`] parsed from `-`-delimited
//!   command strings, plus the named-constant table mapping symbolic tokens
//!   (`forward`, `left`, …) to servo degrees.

pub mod command;
pub mod wire;

pub use command::{AiTrigger, CommandError, RobotCommand};
pub use wire::{AiCommand, ClientEvent, HARDWARE_ATTACHED_KEY, ServerEvent};

use thiserror::Error;

/// Global error type spanning command rejections, servo faults, and relay
/// channel failures.
#[derive(Error, Debug)]
pub enum RoverError {
    #[error("Rejected Command: {0}")]
    Command(#[from] CommandError),

    #[error("Hardware Fault on {channel}: {details}")]
    HardwareFault { channel: String, details: String },

    #[error("Relay Channel Error: {0}")]
    Channel(String),

    #[error("Config Error: {0}")]
    Config(String),
}
