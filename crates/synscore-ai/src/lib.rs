//! Inference wrapper: BGR image in, ranked labelled confidences out.
//!
//! `preprocess` → [`ModelSession::run`] → `postprocess`, orchestrated by
//! [`Scorer`]. The ONNX Runtime backend is gated behind the `onnx` feature.

mod error;
pub mod labels;
pub mod postprocess;
pub mod preprocess;
mod scorer;
mod session;

#[cfg(feature = "onnx")]
mod onnx;

pub use error::{IndexError, InferenceError, LoadError, RankError, ScoreError, ShapeError, Stage};
pub use labels::LabelTable;
pub use postprocess::rank;
pub use preprocess::{ImageTensor, RawImage, transform};
pub use scorer::Scorer;
pub use session::{InferenceBackend, ModelSession, ProbabilityVector, SessionGuard};

#[cfg(feature = "onnx")]
pub use onnx::OrtBackend;
