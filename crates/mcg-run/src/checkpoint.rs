//! Per-stage artifacts and status files for checkpoint and resume.

use std::fs;
use std::path::{Path, PathBuf};

use mcg_core::{ErrorInfo, McgError};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::serde::{from_json_slice, to_canonical_json_bytes};

/// Lifecycle of one pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StageState {
    /// Artifact written.
    Complete,
    /// Stage raised an error; independent stages still ran.
    Failed,
    /// An upstream stage failed so this one could not run.
    Skipped,
}

/// Status record written next to each stage artifact and copied into the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageStatus {
    /// Stage state.
    pub state: StageState,
    /// Hash of everything the stage consumed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_hash: Option<String>,
    /// Whether the artifact came from an earlier run.
    #[serde(default)]
    pub resumed: bool,
    /// Stage whose absence prevented this one from running.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream: Option<String>,
    /// Failure cause.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<McgError>,
}

impl StageStatus {
    /// Completed stage.
    pub fn complete(input_hash: impl Into<String>, resumed: bool) -> Self {
        Self {
            state: StageState::Complete,
            input_hash: Some(input_hash.into()),
            resumed,
            upstream: None,
            error: None,
        }
    }

    /// Failed stage.
    pub fn failed(input_hash: Option<String>, error: McgError) -> Self {
        Self {
            state: StageState::Failed,
            input_hash,
            resumed: false,
            upstream: None,
            error: Some(error),
        }
    }

    /// Stage that never ran because `upstream` did not complete.
    pub fn skipped(upstream: &str) -> Self {
        Self {
            state: StageState::Skipped,
            input_hash: None,
            resumed: false,
            upstream: Some(upstream.to_string()),
            error: None,
        }
    }
}

/// Directory holding one stage's `artifact.json` and `status.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageCheckpoint {
    name: String,
    dir: PathBuf,
}

impl StageCheckpoint {
    /// Checkpoint for stage `name` under `out/stages/`.
    pub fn new(out: &Path, name: impl Into<String>) -> Self {
        let name = name.into();
        let dir = out.join("stages").join(&name);
        Self { name, dir }
    }

    /// Stage name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Artifact file.
    pub fn artifact_path(&self) -> PathBuf {
        self.dir.join("artifact.json")
    }

    /// Status file.
    pub fn status_path(&self) -> PathBuf {
        self.dir.join("status.json")
    }

    /// Reads the recorded status, if any.
    pub fn status(&self) -> Result<Option<StageStatus>, McgError> {
        let path = self.status_path();
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&path).map_err(|err| io_error("checkpoint-read", err, &path))?;
        from_json_slice(&bytes)
            .map(Some)
            .map_err(|err| McgError::Serde(err.info().clone().with_context("path", path.display().to_string())))
    }

    /// Loads the artifact of a completed stage whose input hash matches.
    pub fn resume<T: DeserializeOwned>(&self, input_hash: &str) -> Result<Option<T>, McgError> {
        let Some(status) = self.status()? else {
            return Ok(None);
        };
        if status.state != StageState::Complete || status.input_hash.as_deref() != Some(input_hash) {
            debug!(stage = %self.name, "checkpoint stale; recomputing");
            return Ok(None);
        }
        let path = self.artifact_path();
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&path).map_err(|err| io_error("checkpoint-read", err, &path))?;
        from_json_slice(&bytes)
            .map(Some)
            .map_err(|err| McgError::Serde(err.info().clone().with_context("path", path.display().to_string())))
    }

    /// Writes the artifact, then a complete status.
    pub fn store<T: Serialize>(&self, input_hash: &str, artifact: &T) -> Result<StageStatus, McgError> {
        write_json(&self.artifact_path(), artifact)?;
        let status = StageStatus::complete(input_hash, false);
        write_json(&self.status_path(), &status)?;
        Ok(status)
    }

    /// Records a status without an artifact.
    pub fn record(&self, status: &StageStatus) -> Result<(), McgError> {
        write_json(&self.status_path(), status)
    }
}

/// Writes canonical JSON, creating parent directories as needed.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), McgError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|err| io_error("checkpoint-mkdir", err, parent))?;
    }
    let bytes = to_canonical_json_bytes(value)?;
    fs::write(path, bytes).map_err(|err| io_error("checkpoint-write", err, path))
}

fn io_error(code: &str, err: std::io::Error, path: &Path) -> McgError {
    McgError::Serde(ErrorInfo::new(code, err.to_string()).with_context("path", path.display().to_string()))
}
