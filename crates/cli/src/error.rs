//! Structured CLI errors with meaningful exit codes.
//!
//! Exit code scheme:
//! - 0:  success
//! - 2:  clap arg parse error (automatic, before our code runs)
//! - 10: model error (bad box configuration, unknown spectrum or model, unphysical field)
//! - 11: I/O error (reading a recipe, writing output)
//! - 12: input error (bad JSON params, malformed recipe file)
//! - 13: serialization error

use powerbox_core::PowerBoxError;
use std::fmt;

/// Failures of a `powerbox` invocation, each mapped to a distinct exit code.
#[derive(Debug)]
pub enum CliError {
    /// The box could not be built or realised.
    Model(PowerBoxError),
    /// A recipe could not be read or an artefact could not be written.
    Io(String),
    /// `--params` or a recipe file did not describe a valid box.
    Input(String),
    /// A field, catalogue or estimate could not be encoded as JSON.
    Serialization(String),
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Model(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Model(e) => write!(f, "{e}"),
            CliError::Io(msg) => write!(f, "{msg}"),
            CliError::Input(msg) => write!(f, "{msg}"),
            CliError::Serialization(msg) => write!(f, "{msg}"),
        }
    }
}

impl From<PowerBoxError> for CliError {
    fn from(e: PowerBoxError) -> Self {
        match e {
            PowerBoxError::Io(msg) => CliError::Io(msg),
            PowerBoxError::ParamTypeMismatch { .. } => CliError::Input(e.to_string()),
            other => CliError::Model(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}
