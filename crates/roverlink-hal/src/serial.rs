//! Serial-link servo driver.
//!
//! A [`SerialLink`] owns the UART to the microcontroller through a single
//! writer task; each [`SerialServo`] handed out by the link queues 3-byte
//! position frames onto that task. The frame format is the one the rover's
//! firmware sketch expects: `[0xFF, pin, degrees]`.

use roverlink_types::RoverError;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio_serial::{SerialPortBuilderExt, SerialStream};
use tracing::{debug, error, info};

use crate::servo::{Servo, ServoConfig};

/// Start-of-frame marker; never a valid pin or degree value on the wire.
const FRAME_START: u8 = 0xFF;

/// Build the wire frame for one position command.
fn position_frame(pin: u8, degrees: u8) -> [u8; 3] {
    [FRAME_START, pin, degrees]
}

/// An open UART to the servo microcontroller.
///
/// Both channels share one link; the writer task serializes their frames in
/// submission order.
pub struct SerialLink {
    tx: mpsc::UnboundedSender<[u8; 3]>,
}

impl SerialLink {
    /// Open `path` at `baud` and spawn the writer task that owns the port.
    ///
    /// # Errors
    ///
    /// Returns [`RoverError::HardwareFault`] when the port cannot be opened
    /// (wrong path, missing permissions, board not plugged in). The caller
    /// decides whether to fall back to the simulated bank.
    pub fn open(path: &str, baud: u32) -> Result<Self, RoverError> {
        let stream = tokio_serial::new(path, baud)
            .open_native_async()
            .map_err(|e| RoverError::HardwareFault {
                channel: "serial".to_string(),
                details: format!("{path}: {e}"),
            })?;
        info!(path, baud, "serial link open");

        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(write_frames(stream, rx));
        Ok(Self { tx })
    }

    /// Hand out a servo driver bound to `config`'s pin on this link.
    pub fn servo(&self, config: ServoConfig) -> Box<SerialServo> {
        Box::new(SerialServo {
            config,
            position: config.start_at,
            tx: self.tx.clone(),
        })
    }
}

async fn write_frames(mut stream: SerialStream, mut rx: mpsc::UnboundedReceiver<[u8; 3]>) {
    while let Some(frame) = rx.recv().await {
        if let Err(e) = stream.write_all(&frame).await {
            error!(error = %e, "serial write failed; frame dropped");
        }
    }
    debug!("serial writer task finished");
}

/// One drive channel on a [`SerialLink`].
pub struct SerialServo {
    config: ServoConfig,
    position: u8,
    tx: mpsc::UnboundedSender<[u8; 3]>,
}

impl Servo for SerialServo {
    fn config(&self) -> &ServoConfig {
        &self.config
    }

    fn set_position(&mut self, degrees: u8) -> Result<(), RoverError> {
        let clamped = self.config.clamp(degrees);
        self.tx
            .send(position_frame(self.config.pin, clamped))
            .map_err(|_| RoverError::HardwareFault {
                channel: self.config.name.to_string(),
                details: "serial writer task is gone".to_string(),
            })?;
        self.position = clamped;
        Ok(())
    }

    fn position(&self) -> u8 {
        self.position
    }
}
