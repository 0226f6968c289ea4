//! Throttle auto-stop debouncer.
//!
//! A throttle command applies its value immediately and arms a one-shot
//! timer that returns the channel to the stop position unless a newer
//! command supersedes it first. Newer commands always win: every apply
//! cancels whatever timer is pending before arming its own, so at most one
//! auto-stop is ever armed.

use std::sync::Arc;
use std::time::Duration;

use roverlink_hal::ServoBank;
use roverlink_types::{RoverError, command};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Owns the throttle channel's pending auto-stop timer.
///
/// Cloning shares the same timer slot and servo bank. Lock order is always
/// pending slot first, then bank.
#[derive(Clone)]
pub struct ThrottleControl {
    bank: Arc<Mutex<ServoBank>>,
    pending: Arc<Mutex<PendingStop>>,
}

#[derive(Default)]
struct PendingStop {
    handle: Option<JoinHandle<()>>,
    // Bumped on every apply; a fired timer that lost the race to a newer
    // command sees a stale generation and backs off.
    generation: u64,
}

impl ThrottleControl {
    pub fn new(bank: Arc<Mutex<ServoBank>>) -> Self {
        Self {
            bank,
            pending: Arc::new(Mutex::new(PendingStop::default())),
        }
    }

    /// Apply `value` to the throttle channel now.
    ///
    /// With `Some(delay)` an auto-stop fires after `delay` unless another
    /// apply lands first. With `None` the value latches: no auto-stop is
    /// armed and any pending one is cancelled.
    ///
    /// # Errors
    ///
    /// Returns [`RoverError::HardwareFault`] when the servo command cannot
    /// be delivered. The timer state is already updated by then; a fault
    /// does not leave a stale auto-stop armed.
    pub async fn apply(&self, value: u8, debounce: Option<Duration>) -> Result<(), RoverError> {
        let mut pending = self.pending.lock().await;
        if let Some(stale) = pending.handle.take() {
            stale.abort();
        }
        pending.generation = pending.generation.wrapping_add(1);

        if let Some(delay) = debounce {
            let armed = pending.generation;
            let control = self.clone();
            pending.handle = Some(tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                control.auto_stop(armed).await;
            }));
            debug!(value, delay_ms = delay.as_millis() as u64, "throttle set, auto-stop armed");
        } else {
            debug!(value, "throttle latched");
        }

        self.bank.lock().await.set_throttle(value)
    }

    /// Timer body: return the throttle to stop unless a newer command got
    /// here first. Terminal – never re-arms.
    async fn auto_stop(&self, armed: u64) {
        let mut pending = self.pending.lock().await;
        if pending.generation != armed {
            // Superseded between firing and taking the lock.
            return;
        }
        pending.handle = None;

        if let Err(e) = self.bank.lock().await.set_throttle(command::THROTTLE_STOP) {
            warn!(error = %e, "auto-stop could not command the throttle");
        } else {
            debug!("throttle auto-stop fired");
        }
    }

    /// Whether an auto-stop timer is currently armed.
    pub async fn auto_stop_armed(&self) -> bool {
        self.pending
            .lock()
            .await
            .handle
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }
}
