//! Startup configuration: where the model and label artifacts live.
//!
//! The artifacts are deposited by an external download step before the
//! service starts. Nothing here fetches or refreshes them.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_MODEL_FILE: &str = "model.onnx";
pub const DEFAULT_LABELS_FILE: &str = "synset.txt";
pub const DEFAULT_TOP_K: usize = 3;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("artifact directory not found: {0}")]
    MissingDir(PathBuf),

    #[error("top_k must be at least 1")]
    ZeroTopK,

    #[error("intra_threads must be at least 1")]
    ZeroThreads,
}

/// Locations and tuning knobs for the scoring service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactConfig {
    /// Directory holding both the model and the label file.
    pub model_dir: PathBuf,
    /// Model file name, relative to `model_dir`.
    #[serde(default = "default_model_file")]
    pub model_file: String,
    /// Label table file name, relative to `model_dir`.
    #[serde(default = "default_labels_file")]
    pub labels_file: String,
    /// Number of ranked results returned per request.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Threads the execution engine may use within a single inference call.
    #[serde(default = "default_intra_threads")]
    pub intra_threads: usize,
}

fn default_model_file() -> String {
    DEFAULT_MODEL_FILE.to_string()
}

fn default_labels_file() -> String {
    DEFAULT_LABELS_FILE.to_string()
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

fn default_intra_threads() -> usize {
    1
}

impl ArtifactConfig {
    /// Configuration with default file names for the given artifact directory.
    pub fn new(model_dir: impl Into<PathBuf>) -> Self {
        Self {
            model_dir: model_dir.into(),
            model_file: default_model_file(),
            labels_file: default_labels_file(),
            top_k: default_top_k(),
            intra_threads: default_intra_threads(),
        }
    }

    pub fn model_path(&self) -> PathBuf {
        self.model_dir.join(&self.model_file)
    }

    pub fn labels_path(&self) -> PathBuf {
        self.model_dir.join(&self.labels_file)
    }

    pub fn model_dir(&self) -> &Path {
        &self.model_dir
    }

    /// Reject configurations that can never serve a request.
    ///
    /// Individual artifact files are checked when they are loaded, so only
    /// the directory is verified here.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_k == 0 {
            return Err(ConfigError::ZeroTopK);
        }
        if self.intra_threads == 0 {
            return Err(ConfigError::ZeroThreads);
        }
        if !self.model_dir.is_dir() {
            return Err(ConfigError::MissingDir(self.model_dir.clone()));
        }
        tracing::debug!(dir = %self.model_dir.display(), top_k = self.top_k, "artifact config validated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_file_names() {
        let config = ArtifactConfig::new("/srv/models");
        assert_eq!(config.model_path(), PathBuf::from("/srv/models/model.onnx"));
        assert_eq!(config.labels_path(), PathBuf::from("/srv/models/synset.txt"));
        assert_eq!(config.top_k, 3);
    }

    #[test]
    fn deserialize_with_defaults() {
        let config: ArtifactConfig =
            serde_json::from_str(r#"{"model_dir": "/srv/models", "top_k": 5}"#).unwrap();
        assert_eq!(config.top_k, 5);
        assert_eq!(config.model_file, DEFAULT_MODEL_FILE);
        assert_eq!(config.labels_file, DEFAULT_LABELS_FILE);
        assert_eq!(config.intra_threads, 1);
    }

    #[test]
    fn validate_accepts_existing_dir() {
        let dir = tempfile::tempdir().unwrap();
        ArtifactConfig::new(dir.path()).validate().unwrap();
    }

    #[test]
    fn validate_rejects_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = ArtifactConfig::new(dir.path().join("absent"));
        assert!(matches!(config.validate(), Err(ConfigError::MissingDir(_))));
    }

    #[test]
    fn validate_rejects_zero_top_k() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ArtifactConfig::new(dir.path());
        config.top_k = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ZeroTopK)));
    }

    #[test]
    fn validate_rejects_zero_threads() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ArtifactConfig::new(dir.path());
        config.intra_threads = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ZeroThreads)));
    }
}
