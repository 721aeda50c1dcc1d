//! Failures of the `wavefield` binary and the exit code each one maps to.
//!
//! - 0:  success
//! - 2:  rejected arguments (clap exits on its own before `run`)
//! - 10: the field could not be sampled (a zero render width or height)
//! - 11: a scene config, script file or PNG could not be read or written
//! - 12: user-supplied content was rejected: a scene config record with no
//!   sources, malformed `--params` JSON, or an unknown `--mode` name
//! - 13: the JSON report could not be produced
//!
//! Script statements never fail the process. The interpreter turns them
//! into feedback lines instead.

use std::fmt;

use wavefield_core::WaveError;

#[derive(Debug)]
pub enum CliError {
    /// Sampling or rendering the scene failed.
    Wave(WaveError),
    /// Filesystem failure, with the offending path in the message.
    Io(String),
    /// A config record, `--params` object or mode name the user supplied.
    Input(String),
    /// Writing the `--json` report failed.
    Serialization(String),
}

impl CliError {
    /// Wraps a `--params` value that is not valid JSON.
    pub fn bad_params(e: serde_json::Error) -> Self {
        CliError::Input(format!("invalid --params JSON: {e}"))
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Wave(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Wave(e) => write!(f, "cannot sample field: {e}"),
            CliError::Io(msg) | CliError::Input(msg) => write!(f, "{msg}"),
            CliError::Serialization(msg) => write!(f, "cannot write JSON report: {msg}"),
        }
    }
}

impl From<WaveError> for CliError {
    fn from(e: WaveError) -> Self {
        match e {
            WaveError::Io(msg) => CliError::Io(msg),
            WaveError::InvalidConfig(msg) => CliError::Input(format!("invalid scene config: {msg}")),
            WaveError::UnknownBlendMode(_) | WaveError::UnknownMapMode(_) => {
                CliError::Input(e.to_string())
            }
            other => CliError::Wave(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}
