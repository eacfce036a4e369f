//! External editor invocation.

use std::path::Path;
use std::process::Command;

use tracing::{debug, warn};

use crate::error::DraftError;

/// Opens a file for the user to edit and blocks until they are done.
#[cfg_attr(test, mockall::automock)]
pub trait Editor {
    fn edit(&self, path: &Path) -> Result<(), DraftError>;
}

/// Runs the configured editor command, e.g. `vim` or `code --wait`.
///
/// There is no timeout: the run waits for as long as the editor is open.
pub struct SystemEditor {
    command: String,
}

impl SystemEditor {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// Split the command into program and leading arguments.
    fn program_and_args(&self) -> Result<(&str, Vec<&str>), DraftError> {
        let mut parts = self.command.split_whitespace();
        let program = parts.next().ok_or(DraftError::EditorNotConfigured)?;
        Ok((program, parts.collect()))
    }
}

impl Editor for SystemEditor {
    fn edit(&self, path: &Path) -> Result<(), DraftError> {
        let (program, args) = self.program_and_args()?;
        let resolved =
            which::which(program).map_err(|_| DraftError::EditorNotFound(program.to_string()))?;

        debug!("Opening {} with {}", path.display(), resolved.display());

        let status = Command::new(&resolved)
            .args(&args)
            .arg(path)
            .status()
            .map_err(|source| DraftError::EditorSpawn {
                program: program.to_string(),
                source,
            })?;

        // A failing editor does not abort; whatever is in the file is used.
        if !status.success() {
            warn!("Editor '{}' exited with {:?}", program, status.code());
        }

        Ok(())
    }
}
