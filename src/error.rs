//! Application error types using thiserror
//!
//! Error hierarchy:
//! - EnumerationError: The candidate list could not be produced (fatal)
//! - QueryError: One lookup failed (recoverable, per item)
//! - ApplyError: One upgrade failed (recoverable, per item)
//! - CommandError: An external command could not run or exited non-zero
//! - ConfigError: Issues with CLI configuration

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Candidate enumeration errors
    #[error(transparent)]
    Enumeration(#[from] EnumerationError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors raised while running an external command
#[derive(Error, Debug)]
pub enum CommandError {
    /// The program could not be started
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The program exited unsuccessfully
    #[error("{command} exited with {status}: {stderr}")]
    Failed {
        command: String,
        status: String,
        stderr: String,
    },
}

/// Errors that make the candidate list unavailable
#[derive(Error, Debug)]
pub enum EnumerationError {
    /// Listing modules failed
    #[error("failed to list modules: {source}")]
    Command {
        #[source]
        source: CommandError,
    },

    /// Listing output could not be understood
    #[error("unexpected module listing output: {message}")]
    InvalidOutput { message: String },
}

/// Errors for a single candidate lookup
#[derive(Error, Debug)]
pub enum QueryError {
    /// The lookup command failed
    #[error("lookup of '{identifier}' failed: {source}")]
    Command {
        identifier: String,
        #[source]
        source: CommandError,
    },

    /// The lookup produced output that could not be decoded
    #[error("invalid lookup response for '{identifier}': {message}")]
    InvalidResponse { identifier: String, message: String },
}

/// Errors for a single upgrade
#[derive(Error, Debug)]
pub enum ApplyError {
    /// The upgrade command failed
    #[error("upgrade of '{identifier}' failed: {source}")]
    Command {
        identifier: String,
        #[source]
        source: CommandError,
    },

    /// The post-upgrade hook failed
    #[error("hook {hook} failed for '{identifier}': {source}")]
    Hook {
        identifier: String,
        hook: PathBuf,
        #[source]
        source: CommandError,
    },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A count option was zero or not a number
    #[error("invalid value '{value}' for {option}: expected a positive integer")]
    InvalidCount { option: String, value: String },

    /// Invalid working directory
    #[error("invalid path '{path}': {message}")]
    InvalidPath { path: PathBuf, message: String },

    /// Conflicting options
    #[error("conflicting options: {message}")]
    ConflictingOptions { message: String },
}

impl CommandError {
    /// Creates a Spawn error
    pub fn spawn(program: impl Into<String>, source: std::io::Error) -> Self {
        CommandError::Spawn {
            program: program.into(),
            source,
        }
    }

    /// Creates a Failed error, trimming the captured stderr
    pub fn failed(
        command: impl Into<String>,
        status: impl Into<String>,
        stderr: impl AsRef<str>,
    ) -> Self {
        CommandError::Failed {
            command: command.into(),
            status: status.into(),
            stderr: stderr.as_ref().trim().to_string(),
        }
    }

    /// Captured stderr of a failed command
    pub fn stderr(&self) -> Option<&str> {
        match self {
            CommandError::Failed { stderr, .. } => Some(stderr),
            CommandError::Spawn { .. } => None,
        }
    }
}

impl QueryError {
    /// Creates a Command error
    pub fn command(identifier: impl Into<String>, source: CommandError) -> Self {
        QueryError::Command {
            identifier: identifier.into(),
            source,
        }
    }

    /// Creates an InvalidResponse error
    pub fn invalid_response(identifier: impl Into<String>, message: impl Into<String>) -> Self {
        QueryError::InvalidResponse {
            identifier: identifier.into(),
            message: message.into(),
        }
    }
}

impl ApplyError {
    /// Creates a Command error
    pub fn command(identifier: impl Into<String>, source: CommandError) -> Self {
        ApplyError::Command {
            identifier: identifier.into(),
            source,
        }
    }

    /// Creates a Hook error
    pub fn hook(identifier: impl Into<String>, hook: impl Into<PathBuf>, source: CommandError) -> Self {
        ApplyError::Hook {
            identifier: identifier.into(),
            hook: hook.into(),
            source,
        }
    }
}
