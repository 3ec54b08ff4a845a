//! Structured error types shared across MCG crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`McgError`] variant.
///
/// The same shape doubles as the record used for non-fatal notes in reports, so a
/// degraded metric and a hard failure are described with identical fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (identifiers, sizes, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the MCG engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum McgError {
    /// Caller misuse detected while validating configuration.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Corpus reading errors.
    #[error("corpus error: {0}")]
    Corpus(ErrorInfo),
    /// Morphological decomposition errors.
    #[error("morph error: {0}")]
    Morph(ErrorInfo),
    /// Compatibility graph structural errors.
    #[error("graph error: {0}")]
    Graph(ErrorInfo),
    /// Eigen-solver and spectral metric errors.
    #[error("spectral error: {0}")]
    Spectral(ErrorInfo),
    /// Dimensionality estimation errors.
    #[error("estimate error: {0}")]
    Estimate(ErrorInfo),
    /// Null-ensemble generation and comparison errors.
    #[error("ensemble error: {0}")]
    Ensemble(ErrorInfo),
    /// Randomness and seeding errors.
    #[error("rng error: {0}")]
    Rng(ErrorInfo),
    /// Serialization, schema and artifact I/O errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl McgError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            McgError::Config(info)
            | McgError::Corpus(info)
            | McgError::Morph(info)
            | McgError::Graph(info)
            | McgError::Spectral(info)
            | McgError::Estimate(info)
            | McgError::Ensemble(info)
            | McgError::Rng(info)
            | McgError::Serde(info) => info,
        }
    }

    /// Shorthand for a configuration error with a code and message.
    pub fn config(code: impl Into<String>, message: impl Into<String>) -> Self {
        McgError::Config(ErrorInfo::new(code, message))
    }

    /// Returns true when the error was raised by eager configuration validation.
    pub fn is_config(&self) -> bool {
        matches!(self, McgError::Config(_))
    }
}
