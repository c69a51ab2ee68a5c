use std::fmt;
use std::str::FromStr;

use thiserror::Error;

pub const NOT_SETUP: &str = "not_setup";
pub const INVALID: &str = "invalid";
pub const SETUP: &str = "setup";

/// Result of every "is X configured for this domain" check.
///
/// A record that cannot be found is always `NotSetup`, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetupState {
    /// No record is published.
    NotSetup,
    /// A record is published but fails parsing or a requested validation.
    Invalid,
    /// A usable record is published.
    Setup,
}

impl SetupState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SetupState::NotSetup => NOT_SETUP,
            SetupState::Invalid => INVALID,
            SetupState::Setup => SETUP,
        }
    }

    pub fn is_setup(&self) -> bool {
        matches!(self, SetupState::Setup)
    }
}

impl fmt::Display for SetupState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown setup state: {0}")]
pub struct ParseSetupStateError(String);

impl FromStr for SetupState {
    type Err = ParseSetupStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            NOT_SETUP => Ok(SetupState::NotSetup),
            INVALID => Ok(SetupState::Invalid),
            SETUP => Ok(SetupState::Setup),
            other => Err(ParseSetupStateError(other.to_string())),
        }
    }
}
