//! Error types for auditscan.
//!
//! Uses `thiserror` for ergonomic error definitions. Only range validation
//! is fatal; every per-host error is contained within that host's job.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while validating an address range, before a scan starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    #[error("invalid range: start address {start} is above end address {end}")]
    InvalidRange { start: String, end: String },

    #[error("not a well-formed IPv4 address: {0}")]
    InvalidAddress(String),
}

/// Per-probe failures. Non-fatal: a probe that fails is a probe that
/// did not match.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("probe timed out")]
    Timeout,

    #[error("host unreachable: {0}")]
    Unreachable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Malformed payload from a device (BER, JSON, or XML). The affected
/// field is left unpopulated.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("truncated BER element")]
    Truncated,

    #[error("unexpected BER tag {0:#04x}")]
    UnexpectedTag(u8),

    #[error("BER length overflows the buffer")]
    BadLength,

    #[error("invalid OID encoding")]
    BadOid,

    #[error("malformed JSON body: {0}")]
    Json(#[from] serde_json::Error),
}

/// File-system failures in the persistence writer. Logged, never fatal
/// to the scan.
#[derive(Error, Debug)]
pub enum PersistError {
    #[error("cannot create directory {path}: {reason}")]
    CreateDir { path: PathBuf, reason: String },

    #[error("cannot write file {path}: {reason}")]
    WriteFile { path: PathBuf, reason: String },

    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Unexpected failure inside a driver's populate step, caught at the job
/// boundary.
#[derive(Error, Debug)]
#[error("driver for {address} failed: {reason}")]
pub struct DriverError {
    pub address: String,
    pub reason: String,
}

/// Errors surfaced to the CLI user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Range(#[from] RangeError),

    #[error(transparent)]
    Persist(#[from] PersistError),

    #[error("unknown device type: {0}")]
    UnknownDeviceType(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for probe operations.
pub type ProbeResult<T> = Result<T, ProbeError>;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;
