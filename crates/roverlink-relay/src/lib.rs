//! `roverlink-relay` – the browser-to-rover WebSocket relay.
//!
//! Boots a WebSocket server (default port `8080`) that:
//!
//! 1. **Accepts** persistent connections from browser clients and greets
//!    each new one with a `robot status` event.
//!
//! 2. **Routes** `robot command` strings through the typed
//!    [`RobotCommand`] parser into the [`CommandRouter`]: manual throttle
//!    commands pass through the [`ThrottleControl`] auto-stop debouncer,
//!    steering commands hit the servo bank directly, and AI trigger
//!    commands fan out as `robot ai` events to every *other* client.
//!
//! 3. **Relays** `robot update` status payloads to the other clients with
//!    the server's hardware-attached flag merged in.
//!
//! # Usage
//!
//! ```rust,no_run
//! use roverlink_hal::ServoBank;
//! use roverlink_relay::{AppContext, RelayServer};
//!
//! #[tokio::main]
//! async fn main() {
//!     let ctx = AppContext::new(ServoBank::simulated());
//!     ctx.status.mark_hardware_attached();
//!     RelayServer::new(ctx)
//!         .run()
//!         .await
//!         .expect("relay server failed");
//! }
//! ```
//!
//! [`RobotCommand`]: roverlink_types::RobotCommand

pub mod bus;
pub mod context;
pub mod router;
pub mod server;
pub mod throttle;

pub use bus::{Outbound, RelayBus};
pub use context::{AppContext, ServerStatus};
pub use router::CommandRouter;
pub use server::{DEFAULT_PORT, RelayServer};
pub use throttle::ThrottleControl;
