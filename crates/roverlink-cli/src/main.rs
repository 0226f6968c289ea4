//! `roverlink` – browser-to-RC-car relay entry point.
//!
//! This binary wires the stack together:
//!
//! 1. Initialises structured logging (`RUST_LOG` filter,
//!    `ROVERLINK_LOG_FORMAT=json` for log aggregators).
//! 2. Loads `~/.roverlink/config.toml` (written with defaults on first run).
//! 3. Selects the servo driver: the serial link from the config, or the
//!    simulated bank when `--no-hardware` is given. A serial port that
//!    fails to open keeps the relay serving with commands gated off, like
//!    a board that never came up.
//! 4. Serves the WebSocket relay until **Ctrl-C**, which emergency-stops
//!    both channels before exiting.

mod config;

use std::sync::Arc;

use colored::Colorize;
use roverlink_hal::{SerialLink, ServoBank, ServoConfig};
use roverlink_relay::{AppContext, RelayServer};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    init_tracing();
    print_banner();

    let no_hardware = std::env::args().skip(1).any(|arg| arg == "--no-hardware");

    let cfg = match config::load() {
        Ok(Some(cfg)) => {
            println!(
                "  Config loaded from {}",
                config::config_path().display().to_string().bold()
            );
            cfg
        }
        Ok(None) => {
            let cfg = config::Config::default();
            if let Err(e) = config::save(&cfg) {
                warn!(error = %e, "could not write default config");
            }
            println!(
                "  No config found – defaults written to {}",
                config::config_path().display().to_string().bold()
            );
            cfg
        }
        Err(e) => {
            println!("{}: {}", "Config error".red(), e);
            println!("  Using default configuration.");
            config::Config::default()
        }
    };

    let (bank, attached) = build_bank(&cfg, no_hardware);

    let ctx = AppContext::new(bank);
    if attached {
        ctx.status.mark_hardware_attached();
    } else {
        println!(
            "  {}",
            "Driving disabled: no servo driver attached.".yellow()
        );
    }

    let server = RelayServer::new(Arc::clone(&ctx)).with_port(cfg.listen_port);
    println!(
        "  Relay listening on {}\n",
        format!("ws://0.0.0.0:{}", server.port()).bold().cyan()
    );

    tokio::select! {
        result = server.run() => {
            if let Err(e) = result {
                error!(error = %e, "relay server failed");
            }
        }
        _ = tokio::signal::ctrl_c() => {
            println!();
            println!("{}", "⚠  Ctrl-C received – stopping the rover …".yellow().bold());
            if let Err(e) = ctx.bank.lock().await.emergency_stop() {
                error!(error = %e, "emergency stop on shutdown failed");
            } else {
                println!("{}", "  ✓ Steering neutral, throttle stopped.".green());
            }
            println!("{}", "  ✓ Exiting roverlink.".green());
        }
    }
}

/// Select and ready the servo driver.
///
/// Returns the bank plus whether it counts as attached hardware. The
/// simulated bank is always ready; the serial bank is attached only when
/// the port opens and both channels reach their start positions.
fn build_bank(cfg: &config::Config, no_hardware: bool) -> (ServoBank, bool) {
    if no_hardware {
        info!("hardware disabled by flag; using simulated servos");
        return (ServoBank::simulated(), true);
    }

    match SerialLink::open(&cfg.serial_port, cfg.baud_rate) {
        Ok(link) => {
            match ServoBank::new(
                link.servo(ServoConfig::THROTTLE),
                link.servo(ServoConfig::STEERING),
            ) {
                Ok(bank) => {
                    info!(port = %cfg.serial_port, "servo driver ready");
                    (bank, true)
                }
                Err(e) => {
                    error!(error = %e, "servo startup failed; commands will be ignored");
                    (ServoBank::simulated(), false)
                }
            }
        }
        Err(e) => {
            warn!(
                port = %cfg.serial_port,
                error = %e,
                "serial open failed; commands will be ignored (try --no-hardware for development)"
            );
            (ServoBank::simulated(), false)
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Logging
// ─────────────────────────────────────────────────────────────────────────────

/// Initialise tracing-subscriber using `RUST_LOG` (defaults to "info").
/// Set `ROVERLINK_LOG_FORMAT=json` to emit newline-delimited JSON logs
/// suitable for log aggregators. User-facing startup output still uses
/// `println!` for UX consistency.
fn init_tracing() {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    if std::env::var("ROVERLINK_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .compact()
            .init();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Banner
// ─────────────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("{}", r#"                             __   _       __  "#.bold().cyan());
    println!("{}", r#"   _______ _  _____  _____  / /  (_)___  / /__"#.bold().cyan());
    println!("{}", r#"  / __/ _ \ |/ / -_)/ __/ / / /  / / _ \/  '_/"#.bold().cyan());
    println!("{}", r#" /_/  \___/___/\__//_/    /_/___/_/_//_/_/\_\ "#.bold().cyan());
    println!();
    println!(
        "  {} {}",
        "roverlink".bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
    println!("  Browser-to-RC-car WebSocket relay");
    println!();
}
