//! Post-upgrade hook
//!
//! Runs a user-supplied executable as `<hook> <path> <from> <to>` after each
//! successful upgrade.

use super::CommandRunner;
use crate::domain::Module;
use crate::error::ApplyError;
use std::path::{Path, PathBuf};

/// Executable run after every successful upgrade
#[derive(Debug, Clone)]
pub struct Hook {
    path: PathBuf,
    runner: CommandRunner,
}

impl Hook {
    /// Create a hook for `path`, run inside `working_dir`
    pub fn new(path: impl Into<PathBuf>, working_dir: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let runner = CommandRunner::new(path.to_string_lossy(), working_dir);
        Self { path, runner }
    }

    /// Path of the hook executable
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run the hook for an upgraded module
    pub async fn run(&self, module: &Module) -> Result<(), ApplyError> {
        let from = module.current_tag();
        let to = module.latest_tag();
        self.runner
            .output(&[module.identifier.as_str(), from.as_str(), to.as_str()])
            .await
            .map(|_| ())
            .map_err(|e| ApplyError::hook(&module.identifier, &self.path, e))
    }
}
