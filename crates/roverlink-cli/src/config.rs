//! Configuration vault – reads/writes `~/.roverlink/config.toml`.

use roverlink_types::RoverError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Persisted user configuration stored in `~/.roverlink/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// TCP port the WebSocket relay listens on.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// Serial device the servo microcontroller is attached to.
    #[serde(default = "default_serial_port")]
    pub serial_port: String,

    /// Baud rate of the serial link.
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
}

fn default_listen_port() -> u16 {
    8080
}
fn default_serial_port() -> String {
    "/dev/ttyACM0".to_string()
}
fn default_baud_rate() -> u32 {
    57600
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_port: default_listen_port(),
            serial_port: default_serial_port(),
            baud_rate: default_baud_rate(),
        }
    }
}

/// Return the path to `~/.roverlink/config.toml`.
pub fn config_path() -> PathBuf {
    config_path_for_home(
        &std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string()),
    )
}

/// Build the config path relative to the given home directory.
/// Extracted for testability without mutating environment variables.
pub(crate) fn config_path_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".roverlink").join("config.toml")
}

/// Load the config from disk. Returns `None` if the file does not exist.
pub fn load() -> Result<Option<Config>, RoverError> {
    load_from(&config_path())
}

/// Load the config from a specific path.
pub(crate) fn load_from(path: &PathBuf) -> Result<Option<Config>, RoverError> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path).map_err(|e| {
        RoverError::Config(format!("failed to read config at {}: {e}", path.display()))
    })?;
    let mut cfg: Config =
        toml::from_str(&raw).map_err(|e| RoverError::Config(format!("failed to parse config: {e}")))?;
    apply_env_overrides(&mut cfg);
    Ok(Some(cfg))
}

/// Apply `ROVERLINK_*` environment variable overrides to `cfg`.
///
/// Supported variables:
///
/// | Variable | Config field |
/// |---|---|
/// | `ROVERLINK_LISTEN_PORT` | `listen_port` |
/// | `ROVERLINK_SERIAL_PORT` | `serial_port` |
/// | `ROVERLINK_BAUD_RATE` | `baud_rate` |
pub fn apply_env_overrides(cfg: &mut Config) {
    if let Ok(v) = std::env::var("ROVERLINK_LISTEN_PORT")
        && let Ok(port) = v.parse::<u16>()
    {
        cfg.listen_port = port;
    }
    if let Ok(v) = std::env::var("ROVERLINK_SERIAL_PORT") {
        cfg.serial_port = v;
    }
    if let Ok(v) = std::env::var("ROVERLINK_BAUD_RATE")
        && let Ok(baud) = v.parse::<u32>()
    {
        cfg.baud_rate = baud;
    }
}

/// Save the config to disk, creating `~/.roverlink/` if necessary.
pub fn save(cfg: &Config) -> Result<(), RoverError> {
    save_to(cfg, &config_path())
}

/// Save the config to a specific path.
pub(crate) fn save_to(cfg: &Config, path: &PathBuf) -> Result<(), RoverError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| RoverError::Config(format!("failed to create config directory: {e}")))?;
    }
    let raw = toml::to_string_pretty(cfg)
        .map_err(|e| RoverError::Config(format!("failed to serialize config: {e}")))?;
    fs::write(path, raw).map_err(|e| {
        RoverError::Config(format!("failed to write config at {}: {e}", path.display()))
    })?;
    Ok(())
}
