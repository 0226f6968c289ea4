//! Dispatches parsed commands and status updates against the application
//! context.

use std::sync::Arc;

use roverlink_types::{
    AiCommand, AiTrigger, HARDWARE_ATTACHED_KEY, RobotCommand, RoverError, ServerEvent, command,
};
use serde_json::{Map, Value};
use tracing::{debug, info};
use uuid::Uuid;

use crate::context::AppContext;

/// Routes one client's parsed traffic into actuation and broadcasts.
pub struct CommandRouter {
    ctx: Arc<AppContext>,
}

impl CommandRouter {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self { ctx }
    }

    /// Route one parsed command from `origin`.
    ///
    /// While no servo driver is attached every command – manual and AI
    /// alike – is a silent no-op, as if the board never came up.
    ///
    /// # Errors
    ///
    /// Returns [`RoverError::HardwareFault`] when a servo command cannot be
    /// delivered.
    pub async fn route(&self, origin: Uuid, cmd: RobotCommand) -> Result<(), RoverError> {
        if !self.ctx.status.hardware_attached() {
            debug!(?cmd, "hardware not attached; command dropped");
            return Ok(());
        }

        match cmd {
            RobotCommand::Throttle { value, debounce } => {
                self.ctx.throttle.apply(value, debounce).await
            }
            RobotCommand::Turn { value } => self.ctx.bank.lock().await.set_steering(value),
            RobotCommand::AiTrigger { trigger, begin } => {
                let command = match (trigger, begin) {
                    (AiTrigger::Face, true) => AiCommand::FaceStart,
                    (AiTrigger::Red, true) => AiCommand::RedStart,
                    (_, false) => AiCommand::AiStop,
                };
                let peers = self.ctx.bus.publish_from(origin, ServerEvent::Ai { command });
                debug!(?command, peers, "ai trigger relayed");
                Ok(())
            }
            RobotCommand::Stop => {
                info!(%origin, "stop command");
                self.ctx
                    .bank
                    .lock()
                    .await
                    .set_steering(command::STEER_NEUTRAL)?;
                // Latched stop: bypasses the debounce path and cancels any
                // pending auto-stop.
                self.ctx.throttle.apply(command::THROTTLE_STOP, None).await
            }
        }
    }

    /// Merge the server's hardware flag into a client status payload and
    /// fan it out to the other clients.
    ///
    /// Runs whether or not hardware is attached – status relaying never
    /// depended on the board. Every other field passes through opaque; a
    /// non-object payload is replaced by an object holding only the
    /// injected flag.
    pub fn relay_status(&self, origin: Uuid, data: Value) {
        let mut merged = match data {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        merged.insert(
            HARDWARE_ATTACHED_KEY.to_string(),
            Value::Bool(self.ctx.status.hardware_attached()),
        );
        self.ctx.bus.publish_from(
            origin,
            ServerEvent::Status {
                data: Value::Object(merged),
            },
        );
    }
}
