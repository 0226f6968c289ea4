//! [`ServoBank`] – the two drive channels behind one handle.
//!
//! The bank is the only way the relay mutates actuator state. It owns a
//! boxed [`Servo`] per channel so a serial-backed bank and a simulated bank
//! look identical to the command router.

use roverlink_types::{RoverError, command};
use tracing::info;

use crate::servo::{Servo, ServoConfig};
use crate::sim::SimServo;

/// Owns the throttle and steering channels.
pub struct ServoBank {
    throttle: Box<dyn Servo>,
    steering: Box<dyn Servo>,
}

impl ServoBank {
    /// Build a bank and move both channels to their configured start
    /// positions (throttle to ESC neutral, steering straight ahead).
    ///
    /// # Errors
    ///
    /// Returns [`RoverError::HardwareFault`] when either startup command
    /// cannot be delivered.
    pub fn new(
        mut throttle: Box<dyn Servo>,
        mut steering: Box<dyn Servo>,
    ) -> Result<Self, RoverError> {
        throttle.set_position(throttle.config().start_at)?;
        steering.set_position(steering.config().start_at)?;
        Ok(Self { throttle, steering })
    }

    /// A bank backed by recording [`SimServo`]s, for `--no-hardware` runs
    /// and tests.
    pub fn simulated() -> Self {
        Self {
            throttle: SimServo::new(ServoConfig::THROTTLE),
            steering: SimServo::new(ServoConfig::STEERING),
        }
    }

    /// Command the throttle channel.
    pub fn set_throttle(&mut self, degrees: u8) -> Result<(), RoverError> {
        self.throttle.set_position(degrees)
    }

    /// Command the steering channel.
    pub fn set_steering(&mut self, degrees: u8) -> Result<(), RoverError> {
        self.steering.set_position(degrees)
    }

    /// Last commanded throttle position.
    pub fn throttle_position(&self) -> u8 {
        self.throttle.position()
    }

    /// Last commanded steering position.
    pub fn steering_position(&self) -> u8 {
        self.steering.position()
    }

    /// Steering to neutral, throttle to stop. Used by the `stop` catch-all
    /// command and the Ctrl-C shutdown path.
    pub fn emergency_stop(&mut self) -> Result<(), RoverError> {
        info!("emergency stop: steering neutral, throttle stop");
        self.steering.set_position(command::STEER_NEUTRAL)?;
        self.throttle.set_position(command::THROTTLE_STOP)?;
        Ok(())
    }
}
