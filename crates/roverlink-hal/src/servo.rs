//! Generic `Servo` trait for the position-controlled drive channels.

use roverlink_types::RoverError;

/// Static wiring and travel limits for one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServoConfig {
    /// Channel name used in logs and fault reports.
    pub name: &'static str,
    /// Microcontroller pin the servo signal lead is wired to.
    pub pin: u8,
    /// Inclusive degree range the horn may travel.
    pub range: (u8, u8),
    /// Position commanded at startup.
    pub start_at: u8,
}

impl ServoConfig {
    /// The ESC throttle channel. Neutral (stopped) is 90°.
    pub const THROTTLE: ServoConfig = ServoConfig {
        name: "throttle",
        pin: 9,
        range: (0, 180),
        start_at: 90,
    };

    /// The steering channel. Mechanically limited to 40°–100°.
    pub const STEERING: ServoConfig = ServoConfig {
        name: "steering",
        pin: 8,
        range: (40, 100),
        start_at: 75,
    };

    /// Clamp a requested position into this channel's travel range.
    pub fn clamp(&self, degrees: u8) -> u8 {
        degrees.clamp(self.range.0, self.range.1)
    }
}

/// A position-controlled servo on one drive channel.
///
/// Implementations clamp requests to their configured range, so an
/// out-of-range numeric command moves the horn to the nearest limit
/// instead of faulting.
pub trait Servo: Send {
    /// The channel's static configuration.
    fn config(&self) -> &ServoConfig;

    /// Command the servo to `degrees` (clamped to range).
    ///
    /// # Errors
    ///
    /// Returns [`RoverError::HardwareFault`] if the command cannot be
    /// delivered to the hardware link.
    fn set_position(&mut self, degrees: u8) -> Result<(), RoverError>;

    /// Most recently commanded position.
    fn position(&self) -> u8;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn throttle_config_matches_rig_wiring() {
        assert_eq!(ServoConfig::THROTTLE.pin, 9);
        assert_eq!(ServoConfig::THROTTLE.range, (0, 180));
        assert_eq!(ServoConfig::THROTTLE.start_at, 90);
    }

    #[test]
    fn steering_clamps_to_mechanical_limits() {
        assert_eq!(ServoConfig::STEERING.clamp(10), 40);
        assert_eq!(ServoConfig::STEERING.clamp(200), 100);
        assert_eq!(ServoConfig::STEERING.clamp(75), 75);
    }
}
