use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use std::time::Duration;

use crate::config::SamConfig;
use crate::error::{Error, Result};
use crate::util::{Captured, CommandExt};

/// How long a local API gets to exit on its own after Ctrl-C.
const API_SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// How `start_api` came back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiExit {
    /// The server exited successfully on its own.
    Stopped,
    /// The operator hit Ctrl-C.
    Interrupted,
}

enum Outcome {
    Exited(io::Result<ExitStatus>),
    Interrupted(io::Result<()>),
}

/// The external build and local emulation tool.
pub trait LocalTool {
    fn build(&self) -> Result<()>;
    /// Blocks until the local API server exits or the operator interrupts.
    fn start_api(&self) -> Result<ApiExit>;
    fn invoke(&self, function_name: &str, event_path: &Path) -> Result<Captured>;
}

/// The AWS SAM CLI.
#[derive(Debug, Clone, PartialEq)]
pub struct SamCli {
    pub program: String,
    pub template: PathBuf,
    pub host: String,
    pub port: u16,
}

impl From<&SamConfig> for SamCli {
    fn from(config: &SamConfig) -> Self {
        SamCli {
            program: config.program.clone(),
            template: config.template.clone(),
            host: config.host.clone(),
            port: config.port,
        }
    }
}

impl SamCli {
    pub(crate) fn build_args(&self) -> Vec<String> {
        vec![
            "build".into(),
            "--template".into(),
            self.template.display().to_string(),
        ]
    }

    pub(crate) fn start_api_args(&self) -> Vec<String> {
        vec![
            "local".into(),
            "start-api".into(),
            "--template".into(),
            self.template.display().to_string(),
            "--port".into(),
            self.port.to_string(),
            "--host".into(),
            self.host.clone(),
        ]
    }

    pub(crate) fn invoke_args(&self, function_name: &str, event_path: &Path) -> Vec<String> {
        vec![
            "local".into(),
            "invoke".into(),
            function_name.into(),
            "--template".into(),
            self.template.display().to_string(),
            "--event".into(),
            event_path.display().to_string(),
        ]
    }

    fn command(&self, args: Vec<String>) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(args);
        cmd
    }

    async fn serve_until_interrupted(&self) -> Result<ApiExit> {
        let args = self.start_api_args();
        let command = format!("{} {}", self.program, args.join(" "));
        log::debug!("running {}", command);

        let mut child = tokio::process::Command::new(&self.program)
            .args(&args)
            .spawn()
            .map_err(|source| Error::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let outcome = tokio::select! {
            status = child.wait() => Outcome::Exited(status),
            signal = tokio::signal::ctrl_c() => Outcome::Interrupted(signal),
        };

        match outcome {
            Outcome::Exited(status) => {
                let status = status?;
                if status.success() {
                    Ok(ApiExit::Stopped)
                } else {
                    Err(Error::ToolFailed {
                        command,
                        status,
                        stderr: String::new(),
                    })
                }
            }
            Outcome::Interrupted(signal) => {
                signal?;
                // A terminal Ctrl-C reaches the child too. Anything else
                // gets a grace period and is then killed.
                if tokio::time::timeout(API_SHUTDOWN_GRACE, child.wait())
                    .await
                    .is_err()
                {
                    log::warn!("{} did not stop, killing it", self.program);
                    child.kill().await?;
                }
                Ok(ApiExit::Interrupted)
            }
        }
    }
}

impl LocalTool for SamCli {
    fn build(&self) -> Result<()> {
        self.command(self.build_args()).status_checked()
    }

    fn start_api(&self) -> Result<ApiExit> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(self.serve_until_interrupted())
    }

    fn invoke(&self, function_name: &str, event_path: &Path) -> Result<Captured> {
        self.command(self.invoke_args(function_name, event_path))
            .output_checked()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sam() -> SamCli {
        SamCli::from(&SamConfig::default())
    }

    #[test]
    fn build_uses_template() {
        assert_eq!(sam().build_args(), vec!["build", "--template", "template.yaml"]);
    }

    #[test]
    fn start_api_binds_configured_address() {
        let mut sam = sam();
        sam.port = 8080;
        sam.host = "127.0.0.1".into();
        assert_eq!(
            sam.start_api_args(),
            vec![
                "local",
                "start-api",
                "--template",
                "template.yaml",
                "--port",
                "8080",
                "--host",
                "127.0.0.1"
            ]
        );
    }

    #[test]
    fn invoke_passes_function_and_event() {
        assert_eq!(
            sam().invoke_args("MyEnterpriseLambda", Path::new("temp_event.json")),
            vec![
                "local",
                "invoke",
                "MyEnterpriseLambda",
                "--template",
                "template.yaml",
                "--event",
                "temp_event.json"
            ]
        );
    }

    #[test]
    fn missing_program_fails_to_spawn() {
        let mut sam = sam();
        sam.program = "definitely-not-sam-9b2e".into();
        match sam.build() {
            Err(Error::Spawn { program, .. }) => assert_eq!(program, "definitely-not-sam-9b2e"),
            other => panic!("expected spawn error, got {:?}", other),
        }
        match sam.start_api() {
            Err(Error::Spawn { .. }) => {}
            other => panic!("expected spawn error, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn api_exiting_cleanly_is_stopped() {
        let sam = SamCli {
            program: "true".into(),
            ..sam()
        };
        assert_eq!(sam.start_api().unwrap(), ApiExit::Stopped);
    }

    #[cfg(unix)]
    #[test]
    fn api_exiting_non_zero_is_reported() {
        let sam = SamCli {
            program: "false".into(),
            ..sam()
        };
        match sam.start_api() {
            Err(Error::ToolFailed { .. }) => {}
            other => panic!("expected tool failure, got {:?}", other),
        }
    }
}
