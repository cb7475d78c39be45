//! Request orchestration: preprocess and run under the session guard, rank outside it.

use synscore_core::{ClassificationResult, ImageShape, ScoreRecord};
use tracing::{debug, info, warn};

use crate::error::{LoadError, ScoreError};
use crate::labels::LabelTable;
use crate::postprocess::{check_consistency, rank};
use crate::preprocess::{RawImage, transform};
use crate::session::{InferenceBackend, ModelSession, ProbabilityVector};

/// Scoring facade owning the process-lifetime session and label table.
///
/// `Scorer` is `Sync`; share it across request threads behind an `Arc` or a
/// scoped borrow. Only one request preprocesses and runs at a time; ranking
/// runs concurrently.
pub struct Scorer<B> {
    session: ModelSession<B>,
    labels: LabelTable,
    top_k: usize,
}

impl<B: InferenceBackend> Scorer<B> {
    /// Assemble a scorer, checking the label table against the model's
    /// declared output dimension when it has one.
    pub fn new(
        session: ModelSession<B>,
        labels: LabelTable,
        top_k: usize,
    ) -> Result<Self, LoadError> {
        if let Some(outputs) = session.output_dim()
            && outputs != labels.len()
        {
            return Err(LoadError::LabelCountMismatch {
                labels: labels.len(),
                outputs,
            });
        }
        info!(labels = labels.len(), output_dim = ?session.output_dim(), top_k, "scorer ready");
        Ok(Self {
            session,
            labels,
            top_k,
        })
    }

    pub fn labels(&self) -> &LabelTable {
        &self.labels
    }

    pub fn session(&self) -> &ModelSession<B> {
        &self.session
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Score one image, returning the top-K results in descending confidence.
    ///
    /// Blocks until every stage completes. Failures are logged and returned,
    /// never retried.
    pub fn score(&self, image: &RawImage) -> Result<Vec<ClassificationResult>, ScoreError> {
        self.score_inner(image).inspect_err(|e| {
            warn!(stage = %e.stage(), shape = %e.shape(), error = %e, "scoring failed");
        })
    }

    /// Score one image into wire records.
    pub fn score_records(&self, image: &RawImage) -> Result<Vec<ScoreRecord>, ScoreError> {
        Ok(self
            .score(image)?
            .into_iter()
            .map(ScoreRecord::from)
            .collect())
    }

    fn score_inner(&self, image: &RawImage) -> Result<Vec<ClassificationResult>, ScoreError> {
        let shape = image.shape();
        let probabilities = self.forward(image, shape)?;

        let results = check_consistency(&self.labels, probabilities.len())
            .and_then(|()| rank(probabilities.as_slice(), &self.labels, self.top_k))
            .map_err(|source| ScoreError::Postprocess { shape, source })?;

        if let Some(top) = results.first() {
            debug!(label = %top.label, confidence = top.confidence, "scored image");
        }
        Ok(results)
    }

    /// Preprocess and run while holding the session guard.
    fn forward(
        &self,
        image: &RawImage,
        shape: ImageShape,
    ) -> Result<ProbabilityVector, ScoreError> {
        let mut guard = self
            .session
            .lock()
            .map_err(|source| ScoreError::Inference { shape, source })?;
        let tensor = transform(image).map_err(|source| ScoreError::Preprocess { shape, source })?;
        guard
            .run(tensor)
            .map_err(|source| ScoreError::Inference { shape, source })
    }
}

#[cfg(feature = "onnx")]
impl Scorer<crate::onnx::OrtBackend> {
    /// Load both artifacts named by `config` and assemble a ready scorer.
    pub fn from_config(config: &synscore_core::ArtifactConfig) -> Result<Self, LoadError> {
        config.validate()?;
        let labels = LabelTable::load(&config.labels_path())?;
        let session = ModelSession::load(&config.model_path(), config.intra_threads)?;
        Self::new(session, labels, config.top_k)
    }
}
