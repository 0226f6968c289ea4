//! In-process simulated servo for headless development and tests.
//!
//! [`SimServo`] records the most recent commanded position and always
//! succeeds. This lets the full relay stack run without a serial link, in
//! `--no-hardware` mode and in CI.

use roverlink_types::RoverError;
use tracing::trace;

use crate::servo::{Servo, ServoConfig};

/// A simulated servo that records the most recent commanded position.
pub struct SimServo {
    config: ServoConfig,
    position: u8,
}

impl SimServo {
    /// Create a simulated servo resting at its configured start position.
    pub fn new(config: ServoConfig) -> Box<Self> {
        Box::new(Self {
            config,
            position: config.start_at,
        })
    }
}

impl Servo for SimServo {
    fn config(&self) -> &ServoConfig {
        &self.config
    }

    fn set_position(&mut self, degrees: u8) -> Result<(), RoverError> {
        self.position = self.config.clamp(degrees);
        trace!(channel = self.config.name, degrees = self.position, "sim servo moved");
        Ok(())
    }

    fn position(&self) -> u8 {
        self.position
    }
}
