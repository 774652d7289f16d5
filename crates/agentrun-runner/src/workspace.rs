//! Per-task ephemeral workspace.

use std::path::{Path, PathBuf};

use agentrun_core::RunId;
use tempfile::TempDir;
use tracing::debug;

use crate::error::RunnerError;

/// A top-level file found in the workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceEntry {
    /// File name, lossily decoded for display.
    pub name: String,
    /// Absolute path inside the workspace.
    pub path: PathBuf,
}

/// Fresh empty directory owned by a single task invocation.
///
/// The directory and everything in it is removed when the workspace is
/// closed or dropped, including when the owning future is cancelled.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Create a workspace under `root`, or the system temp dir if `None`.
    pub fn create(root: Option<&Path>, run_id: &RunId) -> Result<Self, RunnerError> {
        let prefix = format!("agentrun-{}-", run_id.short());
        let mut builder = tempfile::Builder::new();
        builder.prefix(&prefix);

        let dir = match root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
        .map_err(RunnerError::Workspace)?;

        debug!(run_id = %run_id, path = %dir.path().display(), "Workspace created");
        Ok(Self { dir })
    }

    /// Workspace directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Regular, non-hidden files directly inside the workspace, sorted by name.
    ///
    /// Directories are skipped and so are symbolic links, which are never
    /// followed out of the workspace.
    pub async fn files(&self) -> Result<Vec<WorkspaceEntry>, RunnerError> {
        let mut entries = tokio::fs::read_dir(self.path())
            .await
            .map_err(RunnerError::Listing)?;

        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(RunnerError::Listing)? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }

            let file_type = entry.file_type().await.map_err(RunnerError::Listing)?;
            if !file_type.is_file() {
                continue;
            }

            files.push(WorkspaceEntry {
                name,
                path: entry.path(),
            });
        }

        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }

    /// Remove the workspace, reporting removal errors.
    pub fn close(self) -> std::io::Result<()> {
        self.dir.close()
    }
}
