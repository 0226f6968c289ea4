//! JSON wire events exchanged with browser clients over the WebSocket.
//!
//! Events are internally tagged on `"event"` so a frame reads as
//! `{"event":"robot command","data":"manual-turn-left"}`. The event names
//! are part of the protocol the driving UI and the vision client already
//! speak; do not rename them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fixed key injected into every relayed status payload, carrying the
/// server's hardware-attached flag. Overwrites whatever the client sent
/// under the same key.
pub const HARDWARE_ATTACHED_KEY: &str = "hardwareAttached";

/// Client → server events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum ClientEvent {
    /// A `-`-delimited command string for the rover.
    #[serde(rename = "robot command")]
    Command { data: String },

    /// An opaque status payload to relay to the other clients.
    #[serde(rename = "robot update")]
    Update { data: Value },
}

/// Server → client events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum ServerEvent {
    /// Greeting on connect, and every relayed status update.
    #[serde(rename = "robot status")]
    Status { data: Value },

    /// A vision-subsystem trigger relayed from another client.
    #[serde(rename = "robot ai")]
    Ai { command: AiCommand },

    /// Echo of a rejected command or unparseable frame, sent only to the
    /// offending client.
    #[serde(rename = "robot error")]
    Error { data: String },
}

/// Payload of a `robot ai` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiCommand {
    #[serde(rename = "face-start")]
    FaceStart,
    #[serde(rename = "red-start")]
    RedStart,
    #[serde(rename = "ai-stop")]
    AiStop,
}

impl ServerEvent {
    /// The one-time `robot status` greeting sent to a client on connect.
    pub fn greeting() -> Self {
        ServerEvent::Status {
            data: Value::String("server connected".to_string()),
        }
    }
}
