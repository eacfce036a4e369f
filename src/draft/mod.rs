//! Draft editor workflow: scratch document, external editor, re-parse.
//!
//! States: drafted (rendered to the scratch file), presented (editor
//! running), edited (comments stripped), then finalized or aborted. The
//! scratch file is removed when its [`ScratchFile`] is dropped, whichever
//! way the run ends.

pub mod editor;
pub mod scratch;

use tracing::debug;

use crate::error::DraftError;
use crate::git::{FileDiff, RepositoryChangeSet};

pub use editor::{Editor, SystemEditor};
pub use scratch::ScratchFile;

/// Lines starting with this character are ignored when parsing the draft.
pub const COMMENT_MARKER: char = '#';

/// A generated message plus the context shown to the user while editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitDraft {
    pub message: String,
    pub modified: Vec<String>,
    pub deleted: Vec<String>,
    pub diffs: Vec<FileDiff>,
}

/// How the edit ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftOutcome {
    /// Non-empty message, also written back to the scratch file.
    Finalized(String),
    /// The user left the message empty.
    Aborted,
}

impl CommitDraft {
    pub fn new(message: String, changes: &RepositoryChangeSet, diffs: Vec<FileDiff>) -> Self {
        Self {
            message,
            modified: changes.staged_modified.iter().cloned().collect(),
            deleted: changes.staged_deleted.iter().cloned().collect(),
            diffs,
        }
    }

    /// Render the scratch document: message, blank line, then a comment block
    /// with instructions, the file list and every diff line commented out.
    pub fn render(&self) -> String {
        let c = COMMENT_MARKER;
        let mut lines = vec![
            self.message.clone(),
            String::new(),
            format!("{c} Please enter the commit message for your changes. Lines starting"),
            format!("{c} with '{c}' will be ignored, and an empty message aborts the commit."),
            format!("{c}"),
            format!("{c} Changes to be committed:"),
            format!("{c}"),
        ];
        lines.extend(self.modified.iter().map(|path| format!("{c}\t{path}")));

        if !self.deleted.is_empty() {
            lines.push(format!("{c}"));
            lines.push(format!("{c} Deleted files:"));
            lines.extend(self.deleted.iter().map(|path| format!("{c}\t{path} (deleted)")));
        }

        lines.push(format!("{c}"));
        for diff in &self.diffs {
            lines.push(format!("{c} Changes in {}:", diff.path));
            lines.extend(diff.text.lines().map(|line| format!("{c} {line}")));
            lines.push(format!("{c}"));
        }

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}

/// Drop comment lines, join the rest and trim.
pub fn parse_edited(text: &str) -> String {
    text.lines()
        .filter(|line| !line.starts_with(COMMENT_MARKER))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Run the draft through the editor and return the final message.
///
/// On [`DraftOutcome::Finalized`] the scratch file holds exactly the final
/// message, ready to be used as the commit message source.
pub fn edit_draft<E: Editor + ?Sized>(
    draft: &CommitDraft,
    scratch: &ScratchFile,
    editor: &E,
) -> Result<DraftOutcome, DraftError> {
    scratch.write(&draft.render())?;
    debug!("Draft written to {}", scratch.path().display());

    editor.edit(scratch.path())?;

    let edited = scratch.read()?;
    let message = parse_edited(&edited);
    if message.is_empty() {
        return Ok(DraftOutcome::Aborted);
    }

    scratch.write(&message)?;
    Ok(DraftOutcome::Finalized(message))
}
