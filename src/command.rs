//! Validated control commands
//!
//! Raw `(action, parameters)` pairs from the control surface are turned into
//! a [`Command`] here, so the simulation only ever sees well-formed input.

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::consts::DEFAULT_COLOR;

/// Action names accepted by `manipulate`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Shrink,
    SpinOut,
    Drill,
    CornerTrap,
    Color,
    Opacity,
    GooglyEyes,
    Reset,
}

impl Action {
    pub const ALL: [Action; 8] = [
        Action::Shrink,
        Action::SpinOut,
        Action::Drill,
        Action::CornerTrap,
        Action::Color,
        Action::Opacity,
        Action::GooglyEyes,
        Action::Reset,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Shrink => "shrink",
            Action::SpinOut => "spin_out",
            Action::Drill => "drill",
            Action::CornerTrap => "corner_trap",
            Action::Color => "color",
            Action::Opacity => "opacity",
            Action::GooglyEyes => "googly_eyes",
            Action::Reset => "reset",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| CommandError::UnknownAction(s.to_string()))
    }
}

/// Why a command was rejected. No state is touched when this is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error("missing action parameter")]
    MissingAction,
    #[error("invalid action `{0}`, valid actions: {valid}", valid = valid_actions())]
    UnknownAction(String),
    #[error("invalid `{name}` for {action}: {reason}")]
    InvalidParameter {
        action: Action,
        name: &'static str,
        reason: String,
    },
}

fn valid_actions() -> String {
    Action::ALL.map(|a| a.as_str()).join(", ")
}

/// A validated manipulation
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Shrink,
    SpinOut,
    Drill,
    CornerTrap,
    /// Always `#`-prefixed
    Color(String),
    /// Always within [0, 1]
    Opacity(f64),
    GooglyEyes(bool),
    Reset,
}

impl Command {
    /// Parse an action name and its parameters
    pub fn parse(action: &str, params: &Map<String, Value>) -> Result<Self, CommandError> {
        let action: Action = action.parse()?;
        let command = match action {
            Action::Shrink => Command::Shrink,
            Action::SpinOut => Command::SpinOut,
            Action::Drill => Command::Drill,
            Action::CornerTrap => Command::CornerTrap,
            Action::Reset => Command::Reset,
            Action::Color => match params.get("color") {
                None | Some(Value::Null) => Command::Color(DEFAULT_COLOR.to_string()),
                Some(Value::String(s)) => Command::Color(normalize_color(s)),
                Some(other) => {
                    return Err(invalid(action, "color", format!("expected a string, got {other}")));
                }
            },
            Action::Opacity => match params.get("opacity") {
                None | Some(Value::Null) => Command::Opacity(1.0),
                Some(value) => {
                    let opacity = number_param(value)
                        .ok_or_else(|| invalid(action, "opacity", format!("not a number: {value}")))?;
                    Command::Opacity(opacity.clamp(0.0, 1.0))
                }
            },
            Action::GooglyEyes => match params.get("enabled") {
                None | Some(Value::Null) => Command::GooglyEyes(true),
                Some(value) => Command::GooglyEyes(
                    flag_param(value)
                        .ok_or_else(|| invalid(action, "enabled", format!("not a boolean: {value}")))?,
                ),
            },
        };
        Ok(command)
    }

    pub fn action(&self) -> Action {
        match self {
            Command::Shrink => Action::Shrink,
            Command::SpinOut => Action::SpinOut,
            Command::Drill => Action::Drill,
            Command::CornerTrap => Action::CornerTrap,
            Command::Color(_) => Action::Color,
            Command::Opacity(_) => Action::Opacity,
            Command::GooglyEyes(_) => Action::GooglyEyes,
            Command::Reset => Action::Reset,
        }
    }
}

fn invalid(action: Action, name: &'static str, reason: String) -> CommandError {
    CommandError::InvalidParameter {
        action,
        name,
        reason,
    }
}

/// Prefix `#` when missing
pub fn normalize_color(color: &str) -> String {
    let color = color.trim();
    if color.starts_with('#') {
        color.to_string()
    } else {
        format!("#{color}")
    }
}

/// Finite number from a JSON number or numeric string
fn number_param(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn flag_param(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|n| n != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "on" | "yes" | "1" => Some(true),
            "false" | "off" | "no" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}
