//! Ephemeral per-job workspace.
//!
//! Every job owns exactly one workspace: a uniquely named scratch directory
//! holding the raw frame images, their recompressed counterparts, and the
//! extracted audio track. The directory is removed on every exit path -
//! normal completion, failure, cancellation, or a panic unwinding through
//! the worker - because removal is tied to `Drop`.
//!
//! The artifact names are a fixed external contract shared with ffmpeg's
//! sequence patterns: `frame%08d.png`, `processed_frame%08d.jpg`, `audio.aac`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use thiserror::Error;

/// File name prefix of workspace directories under the temp root.
const WORKSPACE_PREFIX: &str = "framepress-";

/// ffmpeg sequence pattern for raw extracted frames.
pub const RAW_FRAME_PATTERN: &str = "frame%08d.png";

/// ffmpeg sequence pattern for recompressed frames.
pub const PROCESSED_FRAME_PATTERN: &str = "processed_frame%08d.jpg";

/// File name of the extracted audio artifact.
pub const AUDIO_FILE: &str = "audio.aac";

/// Errors from workspace acquisition and release.
#[derive(Error, Debug)]
pub enum WorkspaceError {
    #[error("failed to create workspace under {root}: {source}")]
    Create {
        root: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to remove workspace {path}: {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Exclusively-owned scratch directory for one job.
///
/// Dropping the workspace removes the directory and everything in it.
/// [`Workspace::release`] does the same but surfaces the error.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Create a fresh, uniquely named workspace directory under `temp_root`.
    ///
    /// The temp root itself is created if missing. Uniqueness of the
    /// directory name guarantees that no two jobs ever share a workspace.
    pub fn acquire(temp_root: &Path) -> Result<Self, WorkspaceError> {
        fs::create_dir_all(temp_root).map_err(|source| WorkspaceError::Create {
            root: temp_root.to_path_buf(),
            source,
        })?;

        let dir = TempDir::with_prefix_in(WORKSPACE_PREFIX, temp_root).map_err(|source| {
            WorkspaceError::Create {
                root: temp_root.to_path_buf(),
                source,
            }
        })?;

        tracing::debug!("acquired workspace {}", dir.path().display());
        Ok(Self { dir })
    }

    /// Path of the workspace directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path of the raw extracted frame at a 1-based index.
    pub fn raw_frame(&self, index: u64) -> PathBuf {
        self.path().join(format!("frame{:08}.png", index))
    }

    /// Path of the recompressed frame at a 1-based index.
    pub fn processed_frame(&self, index: u64) -> PathBuf {
        self.path().join(format!("processed_frame{:08}.jpg", index))
    }

    /// ffmpeg sequence pattern for raw frames, rooted in this workspace.
    pub fn raw_frame_pattern(&self) -> PathBuf {
        self.path().join(RAW_FRAME_PATTERN)
    }

    /// ffmpeg sequence pattern for recompressed frames, rooted in this workspace.
    pub fn processed_frame_pattern(&self) -> PathBuf {
        self.path().join(PROCESSED_FRAME_PATTERN)
    }

    /// Path of the extracted audio artifact.
    pub fn audio_path(&self) -> PathBuf {
        self.path().join(AUDIO_FILE)
    }

    /// Remove the workspace directory and all its contents.
    ///
    /// Equivalent to dropping, but reports removal failures.
    pub fn release(self) -> Result<(), WorkspaceError> {
        let path = self.dir.path().to_path_buf();
        tracing::debug!("releasing workspace {}", path.display());
        self.dir
            .close()
            .map_err(|source| WorkspaceError::Remove { path, source })
    }
}
