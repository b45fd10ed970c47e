//! External command runner
//!
//! Runs a program inside a working directory with a fixed environment and
//! captures stdout, turning spawn failures and non-zero exits into
//! `CommandError`s that carry stderr.

use crate::error::CommandError;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Runs one program with a fixed working directory and environment
#[derive(Debug, Clone)]
pub struct CommandRunner {
    program: String,
    working_dir: PathBuf,
    env: Vec<(String, String)>,
}

impl CommandRunner {
    /// Create a runner for `program` in `working_dir`
    pub fn new(program: impl Into<String>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            working_dir: working_dir.into(),
            env: Vec::new(),
        }
    }

    /// Add an environment variable for every invocation
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// The program this runner invokes
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Working directory of every invocation
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Render a command line for messages
    pub fn describe(&self, args: &[&str]) -> String {
        let mut line = self.program.clone();
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }

    /// Run with `args` and return stdout on success
    pub async fn output(&self, args: &[&str]) -> Result<String, CommandError> {
        let mut command = Command::new(&self.program);
        command.args(args).current_dir(&self.working_dir);
        for (key, value) in &self.env {
            command.env(key, value);
        }

        let output = command
            .output()
            .await
            .map_err(|e| CommandError::spawn(&self.program, e))?;

        if !output.status.success() {
            return Err(CommandError::failed(
                self.describe(args),
                output.status.to_string(),
                String::from_utf8_lossy(&output.stderr),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
