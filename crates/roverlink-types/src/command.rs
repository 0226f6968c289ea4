//! Parsing of `-`-delimited command strings into typed [`RobotCommand`]s.
//!
//! The browser UI sends commands such as `manual-throttle-forward-1000` or
//! `face-begin` as a single string. Splitting on `-` yields the token
//! sequence; every position is bounds-checked here so that a malformed
//! command becomes a [`CommandError`] instead of reaching an actuator.

use std::time::Duration;

use thiserror::Error;

// ────────────────────────────────────────────────────────────────────────────
// Named-constant table
// ────────────────────────────────────────────────────────────────────────────

/// Throttle servo degrees for full forward.
pub const THROTTLE_FORWARD: u8 = 65;
/// Throttle servo degrees for full reverse.
pub const THROTTLE_REVERSE: u8 = 105;
/// Throttle servo degrees for stopped (ESC neutral).
pub const THROTTLE_STOP: u8 = 90;
/// Steering servo degrees for full left.
pub const STEER_LEFT: u8 = 40;
/// Steering servo degrees for full right.
pub const STEER_RIGHT: u8 = 100;
/// Steering servo degrees for straight ahead.
pub const STEER_NEUTRAL: u8 = 75;

/// Auto-stop delay applied when a throttle command carries no duration token.
pub const DEFAULT_THROTTLE_DEBOUNCE: Duration = Duration::from_millis(500);

/// Resolve a symbolic value token to servo degrees.
///
/// One shared table serves both channels, matching the browser UI's
/// vocabulary. Symbolic lookup always wins over numeric parsing: `stop` is
/// 90 even though `"stop".parse::<u8>()` would fail anyway.
pub fn symbolic_value(token: &str) -> Option<u8> {
    match token {
        // throttle
        "forward" => Some(THROTTLE_FORWARD),
        "reverse" => Some(THROTTLE_REVERSE),
        "stop" => Some(THROTTLE_STOP),
        // steering
        "left" => Some(STEER_LEFT),
        "right" => Some(STEER_RIGHT),
        "neutral" => Some(STEER_NEUTRAL),
        _ => None,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Parsed commands
// ────────────────────────────────────────────────────────────────────────────

/// Which vision behavior a client wants started or stopped on its peers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiTrigger {
    /// Face/upper-body cascade tracking.
    Face,
    /// Red-object color tracking.
    Red,
}

/// A fully validated robot command, ready for routing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RobotCommand {
    /// Set the throttle channel. `debounce` is the auto-stop delay; `None`
    /// latches the value permanently (no auto-stop is scheduled).
    Throttle {
        value: u8,
        debounce: Option<Duration>,
    },
    /// Set the steering channel. Immediate, no timer.
    Turn { value: u8 },
    /// Relay a vision-subsystem start/stop request to the other clients.
    AiTrigger { trigger: AiTrigger, begin: bool },
    /// Emergency stop: steering to neutral, throttle to stop. Every
    /// unrecognized top-level token lands here, as does the literal `stop`.
    Stop,
}

/// Why a command string was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("'manual' command is missing its sub-action token")]
    MissingAction,

    #[error("unknown manual sub-action '{0}'")]
    UnknownAction(String),

    #[error("'manual-{0}' command is missing its value token")]
    MissingValue(String),

    #[error("'{0}' is neither a named position nor a number")]
    UnknownValue(String),

    #[error("'{0}' is not a duration in milliseconds")]
    InvalidDuration(String),
}

impl RobotCommand {
    /// Parse a raw `-`-delimited command string.
    ///
    /// # Errors
    ///
    /// Returns a [`CommandError`] for any `manual` command with missing or
    /// unparseable tokens. Unrecognized *top-level* tokens are not errors:
    /// they parse to [`RobotCommand::Stop`].
    pub fn parse(raw: &str) -> Result<Self, CommandError> {
        let mut tokens = raw.split('-');
        // `split` yields at least one item, even for the empty string.
        let head = tokens.next().unwrap_or_default();

        match head {
            "manual" => {
                let action = tokens.next().ok_or(CommandError::MissingAction)?;
                match action {
                    "throttle" => {
                        let value = parse_value(tokens.next(), action)?;
                        let debounce = match tokens.next() {
                            None => Some(DEFAULT_THROTTLE_DEBOUNCE),
                            Some(tok) => parse_debounce(tok)?,
                        };
                        Ok(RobotCommand::Throttle { value, debounce })
                    }
                    "turn" => {
                        let value = parse_value(tokens.next(), action)?;
                        Ok(RobotCommand::Turn { value })
                    }
                    other => Err(CommandError::UnknownAction(other.to_string())),
                }
            }
            "face" | "red" => {
                let trigger = if head == "face" {
                    AiTrigger::Face
                } else {
                    AiTrigger::Red
                };
                let begin = tokens.next() == Some("begin");
                Ok(RobotCommand::AiTrigger { trigger, begin })
            }
            _ => Ok(RobotCommand::Stop),
        }
    }
}

// Value token: symbolic lookup first, then a literal u8. Anything else is
// rejected rather than forwarded as a bogus position.
fn parse_value(token: Option<&str>, action: &str) -> Result<u8, CommandError> {
    let tok = token.ok_or_else(|| CommandError::MissingValue(action.to_string()))?;
    if let Some(degrees) = symbolic_value(tok) {
        return Ok(degrees);
    }
    tok.parse::<u8>()
        .map_err(|_| CommandError::UnknownValue(tok.to_string()))
}

// Duration token: milliseconds. An empty or zero token means "no debounce" –
// the value latches and no auto-stop is scheduled.
fn parse_debounce(token: &str) -> Result<Option<Duration>, CommandError> {
    if token.is_empty() {
        return Ok(None);
    }
    let ms: u64 = token
        .parse()
        .map_err(|_| CommandError::InvalidDuration(token.to_string()))?;
    Ok((ms > 0).then(|| Duration::from_millis(ms)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn throttle_symbolic_with_default_debounce() {
        let cmd = RobotCommand::parse("manual-throttle-forward").unwrap();
        assert_eq!(
            cmd,
            RobotCommand::Throttle {
                value: THROTTLE_FORWARD,
                debounce: Some(DEFAULT_THROTTLE_DEBOUNCE),
            }
        );
    }

    #[test]
    fn throttle_explicit_duration() {
        let cmd = RobotCommand::parse("manual-throttle-forward-1000").unwrap();
        assert_eq!(
            cmd,
            RobotCommand::Throttle {
                value: THROTTLE_FORWARD,
                debounce: Some(Duration::from_millis(1000)),
            }
        );
    }

    #[test]
    fn throttle_zero_duration_latches() {
        let cmd = RobotCommand::parse("manual-throttle-forward-0").unwrap();
        assert_eq!(
            cmd,
            RobotCommand::Throttle {
                value: THROTTLE_FORWARD,
                debounce: None,
            }
        );
    }

    #[test]
    fn throttle_empty_duration_token_latches() {
        // "manual-throttle-forward-" splits into a trailing empty token.
        let cmd = RobotCommand::parse("manual-throttle-forward-").unwrap();
        assert_eq!(
            cmd,
            RobotCommand::Throttle {
                value: THROTTLE_FORWARD,
                debounce: None,
            }
        );
    }

    #[test]
    fn throttle_numeric_literal() {
        let cmd = RobotCommand::parse("manual-throttle-120-250").unwrap();
        assert_eq!(
            cmd,
            RobotCommand::Throttle {
                value: 120,
                debounce: Some(Duration::from_millis(250)),
            }
        );
    }

    #[test]
    fn symbolic_lookup_wins_over_numeric_parse() {
        // `stop` resolves through the table, not through u8 parsing.
        let cmd = RobotCommand::parse("manual-throttle-stop").unwrap();
        assert!(matches!(
            cmd,
            RobotCommand::Throttle {
                value: THROTTLE_STOP,
                ..
            }
        ));
    }

    #[test]
    fn turn_symbolic_and_numeric() {
        assert_eq!(
            RobotCommand::parse("manual-turn-left").unwrap(),
            RobotCommand::Turn { value: STEER_LEFT }
        );
        assert_eq!(
            RobotCommand::parse("manual-turn-88").unwrap(),
            RobotCommand::Turn { value: 88 }
        );
    }

    #[test]
    fn unknown_value_is_rejected() {
        let err = RobotCommand::parse("manual-throttle-warp9").unwrap_err();
        assert_eq!(err, CommandError::UnknownValue("warp9".to_string()));
    }

    #[test]
    fn bad_duration_is_rejected() {
        let err = RobotCommand::parse("manual-throttle-forward-soon").unwrap_err();
        assert_eq!(err, CommandError::InvalidDuration("soon".to_string()));
    }

    #[test]
    fn missing_tokens_are_rejected() {
        assert_eq!(
            RobotCommand::parse("manual").unwrap_err(),
            CommandError::MissingAction
        );
        assert_eq!(
            RobotCommand::parse("manual-throttle").unwrap_err(),
            CommandError::MissingValue("throttle".to_string())
        );
        assert_eq!(
            RobotCommand::parse("manual-turn").unwrap_err(),
            CommandError::MissingValue("turn".to_string())
        );
    }

    #[test]
    fn unknown_sub_action_is_rejected() {
        let err = RobotCommand::parse("manual-dance-left").unwrap_err();
        assert_eq!(err, CommandError::UnknownAction("dance".to_string()));
    }

    #[test]
    fn ai_triggers() {
        assert_eq!(
            RobotCommand::parse("face-begin").unwrap(),
            RobotCommand::AiTrigger {
                trigger: AiTrigger::Face,
                begin: true,
            }
        );
        assert_eq!(
            RobotCommand::parse("red-begin").unwrap(),
            RobotCommand::AiTrigger {
                trigger: AiTrigger::Red,
                begin: true,
            }
        );
        // Any second token other than `begin` means stop, as does no token.
        assert_eq!(
            RobotCommand::parse("face-end").unwrap(),
            RobotCommand::AiTrigger {
                trigger: AiTrigger::Face,
                begin: false,
            }
        );
        assert_eq!(
            RobotCommand::parse("red").unwrap(),
            RobotCommand::AiTrigger {
                trigger: AiTrigger::Red,
                begin: false,
            }
        );
    }

    #[test]
    fn unrecognized_head_is_emergency_stop() {
        assert_eq!(RobotCommand::parse("stop").unwrap(), RobotCommand::Stop);
        assert_eq!(RobotCommand::parse("xyz-foo").unwrap(), RobotCommand::Stop);
        assert_eq!(RobotCommand::parse("").unwrap(), RobotCommand::Stop);
    }

    #[test]
    fn symbolic_table_matches_rig_calibration() {
        assert_eq!(symbolic_value("forward"), Some(65));
        assert_eq!(symbolic_value("reverse"), Some(105));
        assert_eq!(symbolic_value("stop"), Some(90));
        assert_eq!(symbolic_value("left"), Some(40));
        assert_eq!(symbolic_value("right"), Some(100));
        assert_eq!(symbolic_value("neutral"), Some(75));
        assert_eq!(symbolic_value("sideways"), None);
    }
}
