//! The scratch commit message file, removed when dropped.

use std::fs;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::DraftError;

/// Exclusively owned scratch document for one run.
///
/// Reads and writes go through the path rather than the open handle, since
/// editors commonly replace the file instead of writing in place.
pub struct ScratchFile {
    file: NamedTempFile,
}

impl ScratchFile {
    /// Create the scratch file in the system temp directory.
    pub fn create() -> Result<Self, DraftError> {
        Self::create_in(std::env::temp_dir())
    }

    pub fn create_in(dir: impl AsRef<Path>) -> Result<Self, DraftError> {
        let file = tempfile::Builder::new()
            .prefix("COMMIT_MSG_")
            .suffix(".txt")
            .tempfile_in(dir)
            .map_err(DraftError::Io)?;
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn write(&self, content: &str) -> Result<(), DraftError> {
        fs::write(self.path(), content).map_err(DraftError::Io)
    }

    pub fn read(&self) -> Result<String, DraftError> {
        fs::read_to_string(self.path()).map_err(DraftError::Io)
    }
}
