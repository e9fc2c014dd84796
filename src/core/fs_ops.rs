// src/core/fs_ops.rs
//! File system helpers for exported documents

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub struct FsOps;

impl FsOps {
    pub fn ensure_dir_exists(path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
            info!("Created directory: {}", path.display());
        }
        Ok(())
    }

    pub fn read_file(path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))
    }

    /// Writes the file, creating parent directories first.
    pub fn write_file(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            Self::ensure_dir_exists(parent)?;
        }

        fs::write(path, content)
            .with_context(|| format!("Failed to write file: {}", path.display()))?;

        info!("Written file: {}", path.display());
        Ok(())
    }

    /// `<dir>/<name>_<kind>_<timestamp>` without extension.
    pub fn output_stem(dir: &Path, full_name: &str, kind: &str) -> PathBuf {
        let name = Self::normalize_name(full_name);
        let name = if name.is_empty() { "profile".to_string() } else { name };
        dir.join(format!(
            "{}_{}_{}",
            name,
            kind,
            chrono::Local::now().format("%Y%m%d_%H%M%S")
        ))
    }

    pub fn normalize_name(name: &str) -> String {
        name.trim()
            .to_lowercase()
            .chars()
            .map(|c| match c {
                c if c.is_alphanumeric() => c,
                _ => '-',
            })
            .collect::<String>()
            .split('-')
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("-")
    }
}
