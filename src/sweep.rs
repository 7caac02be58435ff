//! Retention sweeper
//!
//! A timer-driven task that deletes managed artifacts past their retention
//! window from the staging and output directories. It owns nothing but the
//! directories and thresholds it was configured with; it shares no state
//! with request handlers except the filesystem itself.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// File extensions the sweeper is allowed to delete. Anything else (e.g.
/// `.keep` placeholders) is never touched.
const MANAGED_EXTENSIONS: &[&str] = &["pdf"];

/// Periodically deletes stale files from a set of directories.
#[derive(Debug, Clone)]
pub struct RetentionSweeper {
    dirs: Vec<PathBuf>,
    max_age: Duration,
    interval: Duration,
}

impl RetentionSweeper {
    pub fn new(dirs: Vec<PathBuf>, max_age: Duration, interval: Duration) -> Self {
        Self {
            dirs,
            max_age,
            interval,
        }
    }

    /// Sweep every configured directory once. Returns the number of files
    /// removed.
    pub async fn sweep_all(&self) -> usize {
        let mut removed = 0;
        for dir in &self.dirs {
            removed += self.sweep_dir(dir).await;
        }
        removed
    }

    /// Sweep a single directory: delete every managed file whose
    /// modification time is at least `max_age` in the past.
    ///
    /// A missing directory is a no-op. Per-file stat/delete failures are
    /// logged and do not abort the sweep of the remaining entries.
    pub async fn sweep_dir(&self, dir: &Path) -> usize {
        let mut entries = match tokio::fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return 0,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "Failed to read directory");
                return 0;
            }
        };

        let now = SystemTime::now();
        let mut removed = 0;

        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(dir = %dir.display(), error = %e, "Failed to read directory entry");
                    break;
                }
            };

            let path = entry.path();
            if !is_managed(&path) {
                continue;
            }

            let metadata = match entry.metadata().await {
                Ok(metadata) => metadata,
                Err(e) => {
                    tracing::warn!(file = %path.display(), error = %e, "Failed to stat file");
                    continue;
                }
            };
            if !metadata.is_file() {
                continue;
            }

            let modified = match metadata.modified() {
                Ok(modified) => modified,
                Err(e) => {
                    tracing::warn!(file = %path.display(), error = %e, "No modification time");
                    continue;
                }
            };

            // A file with a modification time in the future counts as fresh.
            let age = now.duration_since(modified).unwrap_or_default();
            if age < self.max_age {
                continue;
            }

            match tokio::fs::remove_file(&path).await {
                Ok(()) => {
                    removed += 1;
                    tracing::info!(
                        file = %path.display(),
                        age_secs = age.as_secs(),
                        "Removed stale file"
                    );
                }
                Err(e) => {
                    tracing::warn!(file = %path.display(), error = %e, "Failed to remove stale file");
                }
            }
        }

        if removed > 0 {
            tracing::info!(dir = %dir.display(), count = removed, "Sweep complete");
        }

        removed
    }

    /// Start the recurring sweep task.
    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.interval);
            loop {
                interval.tick().await;
                self.sweep_all().await;
            }
        })
    }
}

/// Whether the sweeper may delete this path, judged by extension.
fn is_managed(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            MANAGED_EXTENSIONS
                .iter()
                .any(|managed| ext.eq_ignore_ascii_case(managed))
        })
        .unwrap_or(false)
}
