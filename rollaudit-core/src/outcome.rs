//! Roll outcomes and the die description sent with every request
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Qualitative grade the service attaches to a successful roll.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Grade {
    CriticalSuccess,
    Success,
    Failure,
    Fumble,
    /// Grade label outside the known vocabulary, kept verbatim
    #[serde(untagged)]
    Other(String),
}

impl Grade {
    /// Parse the wire label used by the roll API.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label {
            "CRITICAL_SUCCESS" => Self::CriticalSuccess,
            "SUCCESS" => Self::Success,
            "FAILURE" => Self::Failure,
            "FUMBLE" => Self::Fumble,
            other => Self::Other(other.to_string()),
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::CriticalSuccess => "CRITICAL_SUCCESS",
            Self::Success => "SUCCESS",
            Self::Failure => "FAILURE",
            Self::Fumble => "FUMBLE",
            Self::Other(label) => label,
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error category recorded for a roll that produced no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The response body carried a GraphQL error list
    Protocol,
    /// The response was well formed but held no roll payload
    MissingData,
    /// The endpoint answered with a non-success status
    Http(u16),
    /// Connection, timeout, or body decoding failure
    Transport,
    /// A sampler worker panicked or was aborted
    Worker,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Protocol => write!(f, "protocol"),
            Self::MissingData => write!(f, "missing data"),
            Self::Http(status) => write!(f, "HTTP {status}"),
            Self::Transport => write!(f, "transport"),
            Self::Worker => write!(f, "worker"),
        }
    }
}

/// One recorded result of asking the service for a roll.
///
/// A roll either produced a value with a grade, or failed with a category and
/// a description. The enum makes a half-filled outcome unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RollOutcome {
    Rolled { value: u32, grade: Grade },
    Failed { kind: FailureKind, detail: String },
}

impl RollOutcome {
    #[must_use]
    pub const fn rolled(value: u32, grade: Grade) -> Self {
        Self::Rolled { value, grade }
    }

    #[must_use]
    pub fn failed(kind: FailureKind, detail: impl Into<String>) -> Self {
        Self::Failed {
            kind,
            detail: detail.into(),
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Rolled { .. })
    }

    #[must_use]
    pub const fn value(&self) -> Option<u32> {
        match self {
            Self::Rolled { value, .. } => Some(*value),
            Self::Failed { .. } => None,
        }
    }

    #[must_use]
    pub const fn grade(&self) -> Option<&Grade> {
        match self {
            Self::Rolled { grade, .. } => Some(grade),
            Self::Failed { .. } => None,
        }
    }

    #[must_use]
    pub const fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Failed { kind, .. } => Some(*kind),
            Self::Rolled { .. } => None,
        }
    }

    #[must_use]
    pub fn error_detail(&self) -> Option<&str> {
        match self {
            Self::Failed { detail, .. } => Some(detail),
            Self::Rolled { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DieSpecError {
    #[error("die must have at least one face")]
    NoFaces,
    #[error("die type label must not be empty")]
    EmptyLabel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("value {value} outside 1..={faces}")]
pub struct ValueOutOfRange {
    pub value: i64,
    pub faces: u32,
}

/// Die description carried by every roll request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DieSpec {
    /// Die type label, e.g. `d100`
    pub label: String,
    pub faces: u32,
    /// Roll category understood by the service, e.g. `deltaGreen`
    pub roll_type: String,
    pub target: u32,
}

impl DieSpec {
    pub fn new(
        label: impl Into<String>,
        faces: u32,
        roll_type: impl Into<String>,
        target: u32,
    ) -> Result<Self, DieSpecError> {
        let label = label.into();
        if label.trim().is_empty() {
            return Err(DieSpecError::EmptyLabel);
        }
        if faces == 0 {
            return Err(DieSpecError::NoFaces);
        }
        Ok(Self {
            label,
            faces,
            roll_type: roll_type.into(),
            target,
        })
    }

    /// Accept a raw value reported by the service if it lies on the die.
    pub fn check_value(&self, value: i64) -> Result<u32, ValueOutOfRange> {
        u32::try_from(value)
            .ok()
            .filter(|v| (1..=self.faces).contains(v))
            .ok_or(ValueOutOfRange {
                value,
                faces: self.faces,
            })
    }
}

impl Default for DieSpec {
    fn default() -> Self {
        Self {
            label: "d100".to_string(),
            faces: 100,
            roll_type: "deltaGreen".to_string(),
            target: 50,
        }
    }
}
