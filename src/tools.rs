//! Invocation of external tools (drawio, cargo, the PDF converter, the viewer).

use crate::ReportError;
use std::{
    path::{Path, PathBuf},
    process::{Command, Output, Stdio},
};

/// A command line ready to run: program, arguments, extra environment, and working directory.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCommand {
    pub program: String,
    pub args: Vec<String>,
    pub envs: Vec<(String, String)>,
    pub cwd: Option<PathBuf>,
}

impl ToolCommand {
    /// Instantiates `template`, replacing `{input}` and `{output}` in every argument.
    ///
    /// # Errors
    /// [`ReportError::Config`] if `template` is empty.
    pub fn from_template(
        template: &[String],
        input: &Path,
        output: &Path,
    ) -> Result<Self, ReportError> {
        let input = input.to_string_lossy();
        let output = output.to_string_lossy();
        let mut parts = template
            .iter()
            .map(|arg| arg.replace("{input}", &input).replace("{output}", &output));
        let program = parts
            .next()
            .ok_or_else(|| ReportError::Config("empty command template".to_owned()))?;
        Ok(Self {
            program,
            args: parts.collect(),
            envs: Vec::new(),
            cwd: None,
        })
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// The command line as a single string, for messages.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn std_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .envs(self.envs.iter().map(|(k, v)| (k, v)))
            .stdin(Stdio::null());
        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }
        cmd
    }

    /// Runs the command to completion.
    ///
    /// # Errors
    /// [`ReportError::ExternalTool`] if the program cannot be started or exits non-zero.
    pub fn run(&self) -> Result<Output, ReportError> {
        log::debug!("running `{}`", self.display());
        let output = self
            .std_command()
            .output()
            .map_err(|e| ReportError::external_tool(&self.display(), None, e.to_string().as_bytes()))?;
        check(self, output)
    }

    /// Same as [`Self::run`] on tokio's process support.
    pub async fn run_async(&self) -> Result<Output, ReportError> {
        log::debug!("running `{}`", self.display());
        let output = tokio::process::Command::from(self.std_command())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| ReportError::external_tool(&self.display(), None, e.to_string().as_bytes()))?;
        check(self, output)
    }
}

fn check(cmd: &ToolCommand, output: Output) -> Result<Output, ReportError> {
    if output.status.success() {
        Ok(output)
    } else {
        Err(ReportError::external_tool(
            &cmd.display(),
            Some(output.status),
            &output.stderr,
        ))
    }
}
