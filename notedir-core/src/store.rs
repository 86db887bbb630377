//! Document store and UI collaborator interfaces.
//!
//! The core never touches a filesystem directly: embedding shells hand it a
//! [`DocumentStore`] for storage, a [`UserInterface`] for anything the user
//! must see, and push [`FileEvent`]s for every change the store observes.
//! Store paths are store-relative and use `/` separators on every platform.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::NotedirResult;

/// Extension of files that participate in the note index.
pub const NOTE_EXTENSION: &str = "md";

/// Handle to a file in the document store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteFile {
    path: String,
}

impl NoteFile {
    pub fn new(path: impl Into<String>) -> Self {
        NoteFile { path: path.into() }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Final path segment with any extension stripped.
    pub fn basename(&self) -> &str {
        basename(&self.path)
    }

    pub fn extension(&self) -> &str {
        let name = final_segment(&self.path);
        match name.rfind('.') {
            Some(idx) => &name[idx + 1..],
            None => "",
        }
    }
}

impl fmt::Display for NoteFile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.path)
    }
}

/// Opaque collapsed-section state, copied from a template file to a newly
/// created note without interpretation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoldInfo(pub serde_json::Value);

/// A change notification from the document store, pushed by the host.
#[derive(Debug, Clone)]
pub enum FileEvent {
    Created(NoteFile),
    Deleted(NoteFile),
    Modified(NoteFile),
    Renamed { file: NoteFile, old_path: String },
}

/// Storage capability of the host document store.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All files under `folder`, recursively. An empty folder means the store
    /// root.
    fn list_files(&self, folder: &str) -> NotedirResult<Vec<NoteFile>>;

    fn folder_exists(&self, path: &str) -> bool;

    /// Fails if the folder already exists; callers check [`folder_exists`]
    /// first.
    ///
    /// [`folder_exists`]: DocumentStore::folder_exists
    async fn create_folder(&self, path: &str) -> NotedirResult<()>;

    /// Whole-file text read.
    async fn read(&self, path: &str) -> NotedirResult<String>;

    /// Atomic create with initial content. Fails when `path` is occupied or a
    /// parent folder is missing.
    async fn create(&self, path: &str, content: &str) -> NotedirResult<NoteFile>;

    fn load_folds(&self, path: &str) -> Option<FoldInfo>;

    fn save_folds(&self, file: &NoteFile, folds: &FoldInfo) -> NotedirResult<()>;
}

/// What the embedding shell shows the user.
#[async_trait]
pub trait UserInterface: Send + Sync {
    async fn open(&self, file: &NoteFile, in_new_split: bool) -> NotedirResult<()>;

    /// Yes/no confirmation. Resolves only on user action; dismissal counts as
    /// a decline.
    async fn confirm(&self, title: &str, text: &str) -> bool;

    /// One-line, user-visible notice.
    fn notify(&self, message: &str);
}

// =============================================================================
// Store path helpers
// =============================================================================

/// Join store path segments with `/`, dropping empty and `.` parts.
pub fn join_path(segments: &[&str]) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for segment in segments {
        for part in segment.split('/') {
            if part.is_empty() || part == "." {
                continue;
            }
            parts.push(part);
        }
    }
    parts.join("/")
}

/// Normalize a store path: backslashes become `/`, repeated and edge
/// separators collapse away.
pub fn normalize_path(path: &str) -> String {
    let forward = path.replace('\\', "/");
    join_path(&[&forward])
}

/// Final path segment with any extension stripped.
pub fn basename(path: &str) -> &str {
    let name = final_segment(path);
    match name.rfind('.') {
        Some(idx) => &name[..idx],
        None => name,
    }
}

fn final_segment(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}
