//! Policy document loading
//!
//! Loads policy documents from JSON files or from a directory of `*.json`
//! documents. Directory loads return the documents sorted by file name so
//! callers can rely on the most-general-first merge order by naming
//! convention (e.g., `00-base.json`, `10-lcv-overlay.json`).
//!
//! I/O lives here, at the document boundary; the engine core itself never
//! touches the filesystem.

use std::fs;
use std::path::Path;

use crate::error::{PolicyEngineError, Result};

use super::document::PolicyDocument;

/// Load a single policy document from a JSON file
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<PolicyDocument> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| PolicyEngineError::DocumentLoadError {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    serde_json::from_str(&content).map_err(|e| PolicyEngineError::DocumentLoadError {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Load every `*.json` document in a directory, sorted by file name
pub fn load_from_directory<P: AsRef<Path>>(path: P) -> Result<Vec<PolicyDocument>> {
    let path = path.as_ref();

    if !path.is_dir() {
        return Err(PolicyEngineError::DocumentLoadError {
            path: path.display().to_string(),
            reason: "not a directory".to_string(),
        });
    }

    let mut files = vec![];
    let entries = fs::read_dir(path).map_err(|e| PolicyEngineError::DocumentLoadError {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    for entry in entries {
        let entry = entry.map_err(|e| PolicyEngineError::DocumentLoadError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let file_path = entry.path();
        if file_path.extension().and_then(|e| e.to_str()) == Some("json") {
            files.push(file_path);
        }
    }
    files.sort();

    let mut documents = vec![];
    for file in files {
        documents.push(load_from_file(&file)?);
    }

    Ok(documents)
}
