// src/render/pdf.rs
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};
use tracing::info;

use crate::core::FsOps;

/// Runs the external `typst` binary.
pub struct TypstCompiler {
    program: PathBuf,
}

impl Default for TypstCompiler {
    fn default() -> Self {
        Self {
            program: PathBuf::from("typst"),
        }
    }
}

impl TypstCompiler {
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Writes `source` next to `output` (same stem, `.typ`) and compiles it.
    pub fn compile(&self, source: &str, output: &Path) -> Result<PathBuf> {
        let source_path = output.with_extension("typ");
        FsOps::write_file(&source_path, source)?;

        let status = Command::new(&self.program)
            .arg("compile")
            .arg(&source_path)
            .arg(output)
            .status()
            .with_context(|| {
                format!(
                    "Failed to execute {} (is Typst installed?)",
                    self.program.display()
                )
            })?;

        if !status.success() {
            anyhow::bail!("Typst compilation failed for {}", source_path.display());
        }

        info!("Compiled {} to {}", source_path.display(), output.display());
        Ok(output.to_path_buf())
    }
}
