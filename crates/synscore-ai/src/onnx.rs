//! ONNX Runtime backend for [`ModelSession`].

use std::path::Path;

use ort::session::Session;
use ort::session::builder::GraphOptimizationLevel;
use ort::value::Tensor;
use tracing::info;

use crate::error::{InferenceError, LoadError};
use crate::preprocess::ImageTensor;
use crate::session::{InferenceBackend, ModelSession};

/// A classification model loaded into ONNX Runtime.
///
/// Feeds the first declared input and reads the first declared output.
pub struct OrtBackend {
    session: Session,
    input_name: String,
    output_dim: Option<usize>,
}

impl OrtBackend {
    /// Load an `.onnx` model file.
    pub fn load(model_path: &Path, intra_threads: usize) -> Result<Self, LoadError> {
        if !model_path.exists() {
            return Err(LoadError::ModelNotFound(model_path.to_path_buf()));
        }
        let model_error = |reason: String| LoadError::Model {
            path: model_path.to_path_buf(),
            reason,
        };

        let session =
            build_session(model_path, intra_threads).map_err(|e| model_error(format!("{e:#}")))?;

        let input_name = session
            .inputs()
            .first()
            .map(|input| input.name().to_string())
            .ok_or_else(|| model_error("model declares no inputs".to_string()))?;
        let output_dim = session
            .outputs()
            .first()
            .ok_or_else(|| model_error("model declares no outputs".to_string()))
            .map(|output| infer_dim(output.dtype()))?;

        info!(
            model = %model_path.display(),
            input = %input_name,
            output_dim = ?output_dim,
            intra_threads,
            "loaded classification model"
        );
        Ok(Self {
            session,
            input_name,
            output_dim,
        })
    }
}

impl InferenceBackend for OrtBackend {
    fn infer(&mut self, tensor: ImageTensor) -> Result<Vec<f32>, InferenceError> {
        let (shape, data) = tensor.into_parts();
        let shape = shape.map(|d| d as i64);

        let input = Tensor::from_array((shape, data.into_boxed_slice()))
            .map_err(|e| InferenceError::Engine(format!("build input tensor: {e}")))?;

        let outputs = self
            .session
            .run(ort::inputs![self.input_name.as_str() => input])
            .map_err(|e| InferenceError::Engine(format!("run: {e}")))?;

        // Output is [1, N]; flatten to N scores.
        let (_, scores) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| InferenceError::Engine(format!("extract output: {e}")))?;
        Ok(scores.to_vec())
    }

    fn output_dim(&self) -> Option<usize> {
        self.output_dim
    }
}

impl ModelSession<OrtBackend> {
    /// Load an ONNX model into a new synchronized session.
    pub fn load(model_path: &Path, intra_threads: usize) -> Result<Self, LoadError> {
        Ok(Self::new(OrtBackend::load(model_path, intra_threads)?))
    }
}

fn build_session(model_path: &Path, intra_threads: usize) -> anyhow::Result<Session> {
    let session = Session::builder()?
        .with_optimization_level(GraphOptimizationLevel::Level3)?
        .with_intra_threads(intra_threads)?
        .commit_from_file(model_path)?;
    Ok(session)
}

/// Output dimension from the model's declared output type: the product of
/// all non-batch dimensions, or `None` if any of them is dynamic.
fn infer_dim(output_type: &ort::value::ValueType) -> Option<usize> {
    match output_type {
        ort::value::ValueType::Tensor { shape, .. } => {
            let dims: &[i64] = shape;
            dims.iter()
                .skip(1)
                .try_fold(1usize, |acc, &d| (d > 0).then(|| acc * d as usize))
        }
        _ => None,
    }
}
