//! Local build / run / invoke operations on top of a [`LocalTool`].

use std::io::Write;
use std::path::{Path, PathBuf};

use structopt::StructOpt;

use crate::error::Result;
use crate::event::InvocationEvent;
use crate::sam::{ApiExit, LocalTool};
use crate::util::Captured;

#[derive(StructOpt, Debug, Clone, PartialEq)]
pub enum Operation {
    /// Build the SAM application
    Build,
    /// Start the local API and serve until Ctrl-C
    Api,
    /// Invoke one function locally with an event
    Test {
        /// Logical ID of the function in the template (e.g. MyEnterpriseLambda)
        #[structopt(name = "FUNCTION")]
        function_name: String,
        /// JSON event file; a default GET /api/enterprise event is used when
        /// missing or unreadable
        #[structopt(name = "EVENT_FILE", parse(from_os_str))]
        event_file: Option<PathBuf>,
    },
}

impl Operation {
    /// Whether a failure of this operation fails the process.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Operation::Build)
    }
}

pub struct Harness<T, W> {
    tool: T,
    out: W,
    scratch_dir: PathBuf,
}

impl<T: LocalTool, W: Write> Harness<T, W> {
    pub fn new(tool: T, out: W) -> Self {
        Harness {
            tool,
            out,
            scratch_dir: PathBuf::from("."),
        }
    }

    /// Directory the temporary event files are written to.
    pub fn scratch_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.scratch_dir = dir.into();
        self
    }

    pub fn tool(&self) -> &T {
        &self.tool
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// Runs `op` and returns the process exit code. Only a failed build is
    /// non-zero; anything else that goes wrong has already been reported.
    pub fn run(&mut self, op: &Operation) -> i32 {
        let result = match op {
            Operation::Build => self.build(),
            Operation::Api => self.api(),
            Operation::Test {
                function_name,
                event_file,
            } => self
                .test(function_name, event_file.as_deref())
                .map(|_| ()),
        };
        match result {
            Ok(()) => 0,
            Err(e) => {
                log::error!("{:?} failed: {}", op, e);
                if op.is_fatal() {
                    1
                } else {
                    0
                }
            }
        }
    }

    pub fn build(&mut self) -> Result<()> {
        writeln!(self.out, "Building SAM application...")?;
        match self.tool.build() {
            Ok(()) => {
                writeln!(self.out, "SAM build completed")?;
                Ok(())
            }
            Err(e) => {
                writeln!(self.out, "Error building SAM application: {}", e)?;
                Err(e)
            }
        }
    }

    /// Serves the local API. Tool failures are reported, not returned.
    pub fn api(&mut self) -> Result<()> {
        writeln!(self.out, "Starting SAM local API...")?;
        self.out.flush()?;
        match self.tool.start_api() {
            Ok(ApiExit::Interrupted) => writeln!(self.out, "\nStopping SAM local API...")?,
            Ok(ApiExit::Stopped) => writeln!(self.out, "SAM local API exited")?,
            Err(e) => {
                log::error!("local API failed: {}", e);
                writeln!(self.out, "Error starting SAM local API: {}", e)?;
            }
        }
        Ok(())
    }

    /// Invokes `function_name` locally with the event from `event_file` (or
    /// the default event). Returns whether the invocation succeeded; staging
    /// and tool failures are reported, not returned.
    pub fn test(&mut self, function_name: &str, event_file: Option<&Path>) -> Result<bool> {
        writeln!(self.out, "Testing {}...", function_name)?;

        let event = InvocationEvent::load_or_default(event_file);
        match self.invoke_staged(function_name, &event) {
            Ok(captured) => {
                writeln!(self.out, "{} test completed", function_name)?;
                writeln!(self.out, "Output: {}", captured.stdout)?;
                if !captured.stderr.is_empty() {
                    writeln!(self.out, "Logs: {}", captured.stderr)?;
                }
                Ok(true)
            }
            Err(e) => {
                log::error!("local invoke of {} failed: {}", function_name, e);
                writeln!(self.out, "Error testing {}: {}", function_name, e)?;
                writeln!(self.out, "Error output: {}", e.stderr().unwrap_or(""))?;
                Ok(false)
            }
        }
    }

    /// Stages `event` in a temporary file, removed however the invocation
    /// ends, and invokes the function with it.
    fn invoke_staged(&self, function_name: &str, event: &InvocationEvent) -> Result<Captured> {
        let mut staged = tempfile::Builder::new()
            .prefix(&format!("temp_event_{}_", file_safe(function_name)))
            .suffix(".json")
            .tempfile_in(&self.scratch_dir)?;
        serde_json::to_writer_pretty(staged.as_file_mut(), event)?;
        staged.as_file_mut().flush()?;
        log::debug!("staged event at {}", staged.path().display());

        let result = self.tool.invoke(function_name, staged.path());
        if let Err(e) = staged.close() {
            log::warn!("failed to remove staged event: {}", e);
        }
        result
    }
}

fn file_safe(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}
