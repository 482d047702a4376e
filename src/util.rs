use std::process::Command;

use crate::error::{Error, Result};

/// Stdout and stderr captured from a finished tool run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Captured {
    pub stdout: String,
    pub stderr: String,
}

pub trait CommandExt {
    /// Human readable `program arg arg` form, for logs and errors.
    fn display(&self) -> String;
    /// Runs with inherited stdio, failing on spawn errors and non-zero exits.
    fn status_checked(&mut self) -> Result<()>;
    /// Runs with captured stdio, failing on spawn errors and non-zero exits.
    fn output_checked(&mut self) -> Result<Captured>;
}

impl CommandExt for Command {
    fn display(&self) -> String {
        let mut parts = vec![self.get_program().to_string_lossy().into_owned()];
        parts.extend(self.get_args().map(|a| a.to_string_lossy().into_owned()));
        parts.join(" ")
    }

    fn status_checked(&mut self) -> Result<()> {
        let command = self.display();
        log::debug!("running {}", command);
        let status = self.status().map_err(|source| Error::Spawn {
            program: self.get_program().to_string_lossy().into_owned(),
            source,
        })?;
        if status.success() {
            Ok(())
        } else {
            Err(Error::ToolFailed {
                command,
                status,
                stderr: String::new(),
            })
        }
    }

    fn output_checked(&mut self) -> Result<Captured> {
        let command = self.display();
        log::debug!("running {}", command);
        let output = self.output().map_err(|source| Error::Spawn {
            program: self.get_program().to_string_lossy().into_owned(),
            source,
        })?;
        let captured = Captured {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        if output.status.success() {
            Ok(captured)
        } else {
            Err(Error::ToolFailed {
                command,
                status: output.status,
                stderr: captured.stderr,
            })
        }
    }
}
