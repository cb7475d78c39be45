use std::fmt;
use std::path::PathBuf;

use synscore_core::{ConfigError, ImageShape};
use thiserror::Error;

/// Startup failure: the service cannot become ready.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("label file not found: {0}")]
    LabelsNotFound(PathBuf),

    #[error("failed to read label file {path}: {source}")]
    ReadLabels {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("label file is empty: {0}")]
    EmptyLabels(PathBuf),

    #[error("model file not found: {0}")]
    ModelNotFound(PathBuf),

    #[error("failed to load model {path}: {reason}")]
    Model { path: PathBuf, reason: String },

    #[error("label table has {labels} entries but the model outputs {outputs} scores")]
    LabelCountMismatch { labels: usize, outputs: usize },
}

/// The input image does not match the model's fixed input contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("expected input shape {expected}, got {actual}")]
    Mismatch {
        expected: ImageShape,
        actual: ImageShape,
    },

    #[error("buffer of {actual} bytes does not hold a {shape} image ({expected} bytes)")]
    BufferLength {
        shape: ImageShape,
        expected: usize,
        actual: usize,
    },

    #[error("image shape {shape} is too large to address")]
    TooLarge { shape: ImageShape },
}

/// The execution engine failed or produced output of the wrong size.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("execution engine error: {0}")]
    Engine(String),

    #[error("model produced {actual} scores, expected {expected}")]
    OutputDim { expected: usize, actual: usize },

    #[error("model session lock poisoned by an earlier panic")]
    Poisoned,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    #[error("label index {index} out of range for table of {len}")]
    OutOfRange { index: usize, len: usize },

    #[error("label line {index} has no display name: {line:?}")]
    MissingDisplayName { index: usize, line: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RankError {
    #[error("cannot take top {k} of {len} scores")]
    KTooLarge { k: usize, len: usize },

    #[error("label table has {labels} entries but the model produced {outputs} scores")]
    LabelCountMismatch { labels: usize, outputs: usize },

    #[error("label lookup failed: {0}")]
    Label(#[from] IndexError),
}

/// Pipeline stage a [`ScoreError`] originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Preprocess,
    Inference,
    Postprocess,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Preprocess => "preprocess",
            Self::Inference => "inference",
            Self::Postprocess => "postprocess",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-request failure, tagged with the stage that failed and the input shape.
#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("preprocess failed for {shape} input: {source}")]
    Preprocess {
        shape: ImageShape,
        #[source]
        source: ShapeError,
    },

    #[error("inference failed for {shape} input: {source}")]
    Inference {
        shape: ImageShape,
        #[source]
        source: InferenceError,
    },

    #[error("postprocess failed for {shape} input: {source}")]
    Postprocess {
        shape: ImageShape,
        #[source]
        source: RankError,
    },
}

impl ScoreError {
    pub fn stage(&self) -> Stage {
        match self {
            Self::Preprocess { .. } => Stage::Preprocess,
            Self::Inference { .. } => Stage::Inference,
            Self::Postprocess { .. } => Stage::Postprocess,
        }
    }

    /// Shape of the input that triggered the failure.
    pub fn shape(&self) -> ImageShape {
        match self {
            Self::Preprocess { shape, .. }
            | Self::Inference { shape, .. }
            | Self::Postprocess { shape, .. } => *shape,
        }
    }
}
