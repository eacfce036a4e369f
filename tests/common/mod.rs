//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use git2::{Oid, Repository, Signature};

use autocommit::config::{ProviderConfig, ProviderId, RunOptions, Style};
use autocommit::draft::Editor;
use autocommit::error::{BackendError, DraftError, PublishError};
use autocommit::git::{CommitStatus, PushStatus, Publisher};
use autocommit::llm::GenerationBackend;

/// Create a temporary directory for test output.
pub fn temp_test_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// A test git repository builder for integration tests.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
}

impl TestRepo {
    /// Create a new empty git repository in a temp directory.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let repo = Repository::init(dir.path()).expect("Failed to init git repo");
        Self { dir, repo }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    fn signature(&self) -> Signature<'_> {
        Signature::now("Test User", "test@example.com").expect("Failed to create signature")
    }

    /// Write a file in the working tree, creating parent directories.
    pub fn write(&self, rel: &str, content: &str) {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create directories");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    /// Remove a file from the working tree only.
    pub fn remove(&self, rel: &str) {
        std::fs::remove_file(self.dir.path().join(rel)).expect("Failed to remove file");
    }

    /// Add a path to the index.
    pub fn stage(&self, rel: &str) {
        let mut index = self.repo.index().expect("Failed to get index");
        index.add_path(Path::new(rel)).expect("Failed to add file");
        index.write().expect("Failed to write index");
    }

    /// Remove a path from the index and the working tree.
    pub fn stage_removal(&self, rel: &str) {
        self.remove(rel);
        let mut index = self.repo.index().expect("Failed to get index");
        index.remove_path(Path::new(rel)).expect("Failed to remove from index");
        index.write().expect("Failed to write index");
    }

    /// Commit whatever is in the index. Returns the commit OID.
    pub fn commit_index(&self, message: &str) -> Oid {
        let sig = self.signature();
        let mut index = self.repo.index().expect("Failed to get index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");

        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("Failed to create commit")
    }

    /// Write, stage and commit a single file.
    pub fn commit_file(&self, rel: &str, content: &str, message: &str) -> Oid {
        self.write(rel, content);
        self.stage(rel);
        self.commit_index(message)
    }

    pub fn add_remote(&self, name: &str, url: &str) {
        self.repo.remote(name, url).expect("Failed to add remote");
    }
}

/// Options for a run against a fake backend.
pub fn test_options() -> RunOptions {
    RunOptions {
        provider: ProviderConfig {
            provider: ProviderId::Gemini,
            model: "test-model".to_string(),
            base_url: None,
            api_key: "test-key".to_string(),
            style: Style::Standard,
            language: "English".to_string(),
        },
        editor: "true".to_string(),
        remote: "origin".to_string(),
    }
}

/// Backend returning a canned reply and counting calls.
pub struct FakeBackend {
    reply: Box<dyn Fn() -> Result<Option<String>, BackendError> + Send + Sync>,
    calls: std::sync::atomic::AtomicUsize,
    pub last_prompt: std::sync::Mutex<Option<String>>,
}

impl FakeBackend {
    pub fn replying(
        reply: impl Fn() -> Result<Option<String>, BackendError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            reply: Box::new(reply),
            calls: Default::default(),
            last_prompt: Default::default(),
        }
    }

    pub fn text(message: &str) -> Self {
        let message = message.to_string();
        Self::replying(move || Ok(Some(message.clone())))
    }

    pub fn quota() -> Self {
        Self::replying(|| {
            Err(BackendError::Api {
                status: 429,
                code: Some("RESOURCE_EXHAUSTED".to_string()),
                message: "Quota exceeded".to_string(),
            })
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerationBackend for FakeBackend {
    fn provider(&self) -> ProviderId {
        ProviderId::Gemini
    }

    async fn complete(&self, prompt: &str) -> Result<Option<String>, BackendError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
        (self.reply)()
    }
}

/// Editor that rewrites the file with a closure and records the path it saw.
pub struct FakeEditor {
    transform: Box<dyn Fn(&str) -> Result<String, DraftError>>,
    pub seen: RefCell<Vec<PathBuf>>,
}

impl FakeEditor {
    /// Leaves the draft untouched.
    pub fn accept() -> Self {
        Self::rewriting(|s| s.to_string())
    }

    /// Deletes every non-comment line.
    pub fn clear() -> Self {
        Self::rewriting(|s| {
            s.lines()
                .filter(|l| l.starts_with('#'))
                .map(|l| format!("{l}\n"))
                .collect()
        })
    }

    pub fn rewriting(transform: impl Fn(&str) -> String + 'static) -> Self {
        Self {
            transform: Box::new(move |s| Ok(transform(s))),
            seen: RefCell::new(Vec::new()),
        }
    }

    /// Fails as if the editor binary could not be found.
    pub fn missing() -> Self {
        Self {
            transform: Box::new(|_| Err(DraftError::EditorNotFound("no-such-editor".to_string()))),
            seen: RefCell::new(Vec::new()),
        }
    }
}

impl Editor for FakeEditor {
    fn edit(&self, path: &Path) -> Result<(), DraftError> {
        self.seen.borrow_mut().push(path.to_path_buf());
        let content = std::fs::read_to_string(path).map_err(DraftError::Io)?;
        let edited = (self.transform)(&content)?;
        std::fs::write(path, edited).map_err(DraftError::Io)
    }
}

/// Publisher that records the message it was asked to commit.
pub struct FakePublisher {
    pub commit_status: CommitStatus,
    pub remote_exists: bool,
    /// Make `commit` fail as if `git` could not be started.
    pub spawn_fails: bool,
    pub committed: RefCell<Vec<String>>,
    pub pushed: RefCell<Vec<String>>,
}

impl FakePublisher {
    pub fn new(commit_status: CommitStatus, remote_exists: bool) -> Self {
        Self {
            commit_status,
            remote_exists,
            spawn_fails: false,
            committed: RefCell::new(Vec::new()),
            pushed: RefCell::new(Vec::new()),
        }
    }
}

impl Publisher for FakePublisher {
    fn commit(&self, message_file: &Path) -> Result<CommitStatus, PublishError> {
        if self.spawn_fails {
            return Err(PublishError::Spawn {
                operation: "commit",
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "git not found"),
            });
        }
        let message = std::fs::read_to_string(message_file).map_err(|source| PublishError::Spawn {
            operation: "commit",
            source,
        })?;
        self.committed.borrow_mut().push(message);
        Ok(self.commit_status)
    }

    fn has_remote(&self, _name: &str) -> bool {
        self.remote_exists
    }

    fn push(&self, remote: &str) -> Result<PushStatus, PublishError> {
        self.pushed.borrow_mut().push(remote.to_string());
        Ok(PushStatus::Pushed)
    }
}
