//! Application context shared by every connection handler.
//!
//! Everything a handler needs – servo bank, throttle control, fan-out bus,
//! server status – lives in one [`AppContext`] built once at startup and
//! passed around as an `Arc`. No module-level mutable state anywhere.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use roverlink_hal::ServoBank;
use tokio::sync::Mutex;

use crate::bus::RelayBus;
use crate::throttle::ThrottleControl;

/// Process-wide server flags.
#[derive(Debug, Default)]
pub struct ServerStatus {
    hardware_attached: AtomicBool,
}

impl ServerStatus {
    /// Whether a servo driver has reported ready.
    pub fn hardware_attached(&self) -> bool {
        self.hardware_attached.load(Ordering::Relaxed)
    }

    /// Single-writer update path: called once at startup when the selected
    /// driver (serial or simulated) is ready. There is no way to detach.
    pub fn mark_hardware_attached(&self) {
        self.hardware_attached.store(true, Ordering::Relaxed);
    }
}

/// Everything a connection handler needs, behind one `Arc`.
pub struct AppContext {
    pub status: ServerStatus,
    pub bank: Arc<Mutex<ServoBank>>,
    pub throttle: ThrottleControl,
    pub bus: RelayBus,
}

impl AppContext {
    /// Wrap a servo bank into a fresh context with a detached hardware flag.
    pub fn new(bank: ServoBank) -> Arc<Self> {
        let bank = Arc::new(Mutex::new(bank));
        Arc::new(Self {
            status: ServerStatus::default(),
            throttle: ThrottleControl::new(Arc::clone(&bank)),
            bank,
            bus: RelayBus::default(),
        })
    }
}
