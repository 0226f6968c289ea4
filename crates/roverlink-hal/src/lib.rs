//! `roverlink-hal` – servo drivers for the rover's two drive channels.
//!
//! The relay only ever talks to the [`Servo`] trait and the [`ServoBank`]
//! that owns both channels, so drivers can be swapped without touching the
//! command routing:
//!
//! - [`SerialServo`] sends position frames over a UART link to the
//!   microcontroller that generates the actual servo pulses.
//! - [`SimServo`] records commands in process, for headless development
//!   (`--no-hardware`) and tests.

pub mod bank;
pub mod serial;
pub mod servo;
pub mod sim;

pub use bank::ServoBank;
pub use serial::{SerialLink, SerialServo};
pub use servo::{Servo, ServoConfig};
pub use sim::SimServo;
