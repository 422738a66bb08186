//! CUPS `lp` transport.
//!
//! Spools the job to a temporary file and submits it with
//! `lp -d <queue> -o raw <file>`, bypassing CUPS filters so the printer
//! receives the raster bytes untouched. The file is removed afterwards
//! whether or not `lp` succeeded.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::Transport;
use crate::error::PrintError;

/// Submits jobs to a CUPS queue via the `lp` command.
#[derive(Debug, Clone)]
pub struct LpTransport {
    program: String,
}

impl Default for LpTransport {
    fn default() -> Self {
        Self {
            program: "lp".to_string(),
        }
    }
}

impl LpTransport {
    /// Use a different `lp`-compatible program.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn spool_path() -> PathBuf {
        std::env::temp_dir().join(format!("print_{}.bin", Uuid::new_v4()))
    }

    async fn submit(&self, file: &Path, queue: &str) -> Result<(), PrintError> {
        let output = Command::new(&self.program)
            .arg("-d")
            .arg(queue)
            .arg("-o")
            .arg("raw")
            .arg(file)
            .output()
            .await
            .map_err(|e| PrintError::Transport(format!("Failed to run {}: {}", self.program, e)))?;

        if !output.status.success() {
            return Err(PrintError::Transport(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            debug!(output = %stdout.trim(), "lp output");
        }
        Ok(())
    }
}

#[async_trait]
impl Transport for LpTransport {
    fn name(&self) -> &'static str {
        "lp"
    }

    async fn send(&self, data: &[u8], destination: &str) -> Result<(), PrintError> {
        let file = Self::spool_path();
        tokio::fs::write(&file, data).await?;

        let result = self.submit(&file, destination).await;

        if let Err(e) = tokio::fs::remove_file(&file).await {
            warn!(file = %file.display(), error = %e, "failed to remove spool file");
        }

        result?;
        info!(queue = destination, bytes = data.len(), "job submitted to lp");
        Ok(())
    }
}
