//! Error types for model-diagram.
//!
//! Each stage of the pipeline has its own error enum so callers can match on
//! the failures they care about. The CLI folds all of them into `anyhow`.

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Errors raised while loading model files
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported model file extension: {0} (expected .yaml, .yml or .json)")]
    UnsupportedFormat(PathBuf),

    #[error("no model files match pattern: {0}")]
    NoMatch(String),

    #[error("invalid glob pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },
}

/// Errors raised while loading a diagram configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },
}

/// Errors raised by the diagram generator
#[derive(Error, Debug)]
pub enum DiagramError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Graphviz '{program}' command not found. Install Graphviz or use --dot-only instead.")]
    RendererNotFound { program: String },

    #[error("Graphviz {program} command failed with status: {status}{}", format_stderr(.stderr))]
    RendererFailed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("relationship '{key}' on {entity} targets unknown entity '{target}'")]
    UnknownTarget {
        entity: String,
        target: String,
        key: String,
    },
}

fn format_stderr(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("\n{}", trimmed)
    }
}

/// Errors raised by the in-memory SVG transform
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnhanceError {
    #[error("{0}")]
    Parse(String),
}
