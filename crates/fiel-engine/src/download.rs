//! Download completion detection.
//!
//! The browser writes a download under a partial name and renames it when
//! done, so a new file only counts once it carries the target extension and
//! no longer carries the partial marker.

use crate::error::FielError;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tokio::time::{Instant, sleep};
use tracing::{debug, info};

/// Filenames present in a directory at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadSnapshot {
    names: BTreeSet<String>,
}

impl DownloadSnapshot {
    /// Regular files directly inside `dir`. A missing or unreadable
    /// directory yields an empty snapshot.
    pub async fn capture(dir: &Path) -> Self {
        let mut names = BTreeSet::new();
        let mut entries = match fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) => {
                debug!(dir = %dir.display(), "Snapshot of unreadable directory: {}", e);
                return Self { names };
            }
        };
        while let Ok(Some(entry)) = entries.next_entry().await {
            if entry.file_type().await.map(|t| t.is_file()).unwrap_or(false) {
                names.insert(entry.file_name().to_string_lossy().into_owned());
            }
        }
        Self { names }
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Names in `self` but not in `earlier`, in sorted order.
    pub fn arrivals<'a>(&'a self, earlier: &'a DownloadSnapshot) -> impl Iterator<Item = &'a str> {
        self.names.difference(&earlier.names).map(String::as_str)
    }
}

/// Which new filenames count as a finished artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactFilter {
    pub extension: String,
    pub partial_marker: String,
}

impl ArtifactFilter {
    pub fn new(extension: impl Into<String>, partial_marker: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
            partial_marker: partial_marker.into(),
        }
    }

    pub fn is_complete(&self, name: &str) -> bool {
        name.to_lowercase().ends_with(&self.extension.to_lowercase())
            && !name.ends_with(&self.partial_marker)
    }
}

pub struct DownloadWatcher {
    poll_interval: Duration,
}

impl DownloadWatcher {
    pub fn new(poll_interval: Duration) -> Self {
        Self { poll_interval }
    }

    /// Poll `dir` until a file not in `known` passes `filter`.
    ///
    /// After the first hit one more interval passes before the path is
    /// returned, letting the browser finish its final flush.
    pub async fn await_new_artifact(
        &self,
        dir: &Path,
        known: &DownloadSnapshot,
        filter: &ArtifactFilter,
        timeout: Duration,
    ) -> Result<PathBuf, FielError> {
        let started = Instant::now();
        info!(dir = %dir.display(), ?timeout, "Waiting for download");

        while started.elapsed() < timeout {
            let current = DownloadSnapshot::capture(dir).await;
            let found = current
                .arrivals(known)
                .find(|name| filter.is_complete(name))
                .map(|name| dir.join(name));

            if let Some(path) = found {
                sleep(self.poll_interval).await;
                info!(path = %path.display(), "Download complete");
                return Ok(path);
            }
            sleep(self.poll_interval).await;
        }

        Err(FielError::DownloadTimeout {
            dir: dir.to_path_buf(),
            timeout,
        })
    }
}

/// Move `downloaded` to `final_path`, replacing whatever is already there.
///
/// A download the browser already saved under the final name stays put.
pub async fn promote_artifact(downloaded: &Path, final_path: &Path) -> std::io::Result<PathBuf> {
    if downloaded != final_path {
        fs::rename(downloaded, final_path).await?;
    }
    Ok(final_path.to_path_buf())
}
