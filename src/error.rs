use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("`{command}` exited with {status}")]
    ToolFailed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("AWS client setup failed: {0}")]
    Client(String),
    #[error("invoking {function} failed: {message}")]
    Invoke { function: String, message: String },
    #[error("{function} returned no payload")]
    EmptyPayload { function: String },
}

impl Error {
    /// Captured stderr of a tool that exited non-zero, if any.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Error::ToolFailed { stderr, .. } if !stderr.is_empty() => Some(stderr),
            _ => None,
        }
    }
}
