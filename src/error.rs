//! Error types.
//!
//! Each failure domain gets its own enum so callers can treat them differently:
//! a [`DecodeError`] skips one poll cycle, a [`SelectionError`] aborts startup.

use thiserror::Error;

/// Failure decoding a single raw report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The buffer is shorter than the selected layout's minimum length.
    #[error("report too short: layout needs {expected} bytes, got {actual}")]
    TooShort { expected: usize, actual: usize },
}

/// Failure choosing an interface to bind to.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// Every candidate across every preference failed (or there were none).
    #[error("no suitable interface found ({tried} bind attempt(s) failed)")]
    NoSuitableInterface { tried: usize },
}

/// Failure reported by a transport backend.
///
/// The core never inspects these beyond "this candidate failed" or "no data this cycle".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("failed to open interface {path}: {reason}")]
    Open { path: String, reason: String },

    #[error("failed to read report: {0}")]
    Read(String),

    #[error("failed to write report: {0}")]
    Write(String),

    #[error("device disconnected")]
    Disconnected,
}

/// Failure loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("unknown layout id: {0}")]
    UnknownLayout(String),

    #[error("invalid layout {name}: {reason}")]
    InvalidLayout { name: String, reason: String },

    #[error("invalid threshold: {0}")]
    InvalidThreshold(String),

    #[error("preference_order must name at least one interface")]
    EmptyPreferenceOrder,
}

pub type DecodeResult<T> = Result<T, DecodeError>;
pub type SelectionResult<T> = Result<T, SelectionError>;
pub type ConfigResult<T> = Result<T, ConfigError>;
