// src/core/logging.rs
//! JSON log file setup

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::warn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::core::FsOps;

const FALLBACK_LOG_FILE: &str = "resume-tailor.log";

/// Log file actually opened, and the error that ruled out the preferred one.
#[derive(Debug)]
pub struct LogTarget {
    pub file: File,
    pub path: PathBuf,
    pub fallback_reason: Option<String>,
}

/// Opens `preferred`, else a file in the system temp directory.
///
/// Returns `None` when neither can be opened. An unusable data directory must
/// not stop the program, since the store has its own in-memory fallback.
pub fn open_log_file(preferred: &Path) -> Option<LogTarget> {
    let reason = match truncate_open(preferred) {
        Ok(file) => {
            return Some(LogTarget {
                file,
                path: preferred.to_path_buf(),
                fallback_reason: None,
            })
        }
        Err(e) => format!("{e:#}"),
    };

    let fallback = std::env::temp_dir().join(FALLBACK_LOG_FILE);
    truncate_open(&fallback).ok().map(|file| LogTarget {
        file,
        path: fallback,
        fallback_reason: Some(reason),
    })
}

fn truncate_open(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        FsOps::ensure_dir_exists(parent)?;
    }
    OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true) // Clear file on startup
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))
}

/// Installs the global subscriber. Without a usable file only the filter is set.
pub fn init(preferred: &Path) {
    let target = open_log_file(preferred);
    let (file, report) = match target {
        Some(LogTarget {
            file,
            path,
            fallback_reason,
        }) => (Some(file), fallback_reason.map(|reason| (reason, Some(path)))),
        None => (None, Some(("no writable log location".to_string(), None))),
    };

    tracing_subscriber::registry()
        .with(file.map(|file| {
            fmt::layer()
                .json()
                .with_writer(file)
                .with_current_span(false)
                .with_span_list(false)
        }))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Some((reason, path)) = report {
        match path {
            Some(path) => warn!("Logging to {} instead: {}", path.display(), reason),
            None => eprintln!("Logging disabled: {reason}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_opens_preferred_path_and_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let preferred = dir.path().join("data").join("app.log");

        let target = open_log_file(&preferred).unwrap();
        assert_eq!(target.path, preferred);
        assert!(target.fallback_reason.is_none());
        assert!(preferred.exists());
    }

    #[test]
    fn test_unusable_directory_falls_back_to_temp_dir() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "a file, not a directory").unwrap();
        let preferred = blocker.join("data").join("resume-tailor.log");

        let target = open_log_file(&preferred).unwrap();
        assert_eq!(target.path, std::env::temp_dir().join(FALLBACK_LOG_FILE));
        assert!(target.fallback_reason.is_some());
    }
}
