//! Model file loading.
//!
//! A model file is YAML or JSON with a top-level `entities` list. The input
//! may be a literal path or a glob pattern like `models/**/*.yaml`; matched
//! files are loaded in sorted order and their entities concatenated.

use super::Model;
use crate::error::ModelError;
use std::fs;
use std::path::{Path, PathBuf};

/// Check if a path string contains glob pattern characters.
pub fn is_glob_pattern(path: &str) -> bool {
    path.contains('*') || path.contains('?') || path.contains('[')
}

/// Expand a file path or glob pattern into a list of matching files.
///
/// # Errors
///
/// Returns an error if:
/// - The glob pattern is invalid
/// - No files match the pattern
/// - A literal path doesn't exist
pub fn expand_model_pattern(pattern: &Path) -> Result<Vec<PathBuf>, ModelError> {
    let pattern_str = pattern.to_string_lossy();

    if !is_glob_pattern(&pattern_str) {
        if !pattern.exists() {
            return Err(ModelError::NoMatch(pattern_str.into_owned()));
        }
        return Ok(vec![pattern.to_path_buf()]);
    }

    let entries = glob::glob(&pattern_str).map_err(|e| ModelError::Pattern {
        pattern: pattern_str.to_string(),
        message: e.to_string(),
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| ModelError::Pattern {
            pattern: pattern_str.to_string(),
            message: e.to_string(),
        })?;
        if path.is_file() {
            files.push(path);
        }
    }

    if files.is_empty() {
        return Err(ModelError::NoMatch(pattern_str.into_owned()));
    }

    files.sort();
    Ok(files)
}

/// Parse model source text, picking the format from the file extension
pub fn parse_model(path: &Path, content: &str) -> Result<Model, ModelError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match ext.as_deref() {
        Some("yaml") | Some("yml") => {
            serde_yaml_ng::from_str(content).map_err(|source| ModelError::Yaml {
                path: path.to_path_buf(),
                source,
            })
        }
        Some("json") => serde_json::from_str(content).map_err(|source| ModelError::Json {
            path: path.to_path_buf(),
            source,
        }),
        _ => Err(ModelError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Load a single model file
pub fn load_model_file(path: &Path) -> Result<Model, ModelError> {
    let content = fs::read_to_string(path).map_err(|source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_model(path, &content)
}

/// Load and merge every model file matching `pattern`
pub fn load_models(pattern: &Path) -> Result<Model, ModelError> {
    let mut merged = Model::default();
    for file in expand_model_pattern(pattern)? {
        let model = load_model_file(&file)?;
        merged.entities.extend(model.entities);
    }
    Ok(merged)
}
