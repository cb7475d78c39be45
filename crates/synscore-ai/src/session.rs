//! Synchronized access to a single loaded model.
//!
//! The execution engine keeps mutable state across calls, so every
//! invocation goes through a [`SessionGuard`] obtained from
//! [`ModelSession::lock`]. The backend is never reachable without the guard.

use std::sync::{Mutex, MutexGuard};

use tracing::trace;

use crate::error::InferenceError;
use crate::preprocess::ImageTensor;

/// Execution engine behind a [`ModelSession`].
///
/// Implementations may assume calls are never concurrent.
pub trait InferenceBackend: Send {
    /// Run one forward pass, returning the flattened output scores.
    fn infer(&mut self, tensor: ImageTensor) -> Result<Vec<f32>, InferenceError>;

    /// Output dimension declared by the model, if it is fixed.
    fn output_dim(&self) -> Option<usize>;
}

/// Raw per-label scores from one forward pass, indexed like the label table.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityVector(Vec<f32>);

impl ProbabilityVector {
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.0
    }
}

impl From<Vec<f32>> for ProbabilityVector {
    fn from(scores: Vec<f32>) -> Self {
        Self(scores)
    }
}

/// One loaded model, shared read-only across requests.
///
/// At most one [`SessionGuard`] exists at a time. Waiters are woken in
/// whatever order the OS mutex chooses; no FIFO fairness is promised.
pub struct ModelSession<B> {
    backend: Mutex<B>,
    output_dim: Option<usize>,
}

impl<B: InferenceBackend> ModelSession<B> {
    pub fn new(backend: B) -> Self {
        let output_dim = backend.output_dim();
        Self {
            backend: Mutex::new(backend),
            output_dim,
        }
    }

    pub fn output_dim(&self) -> Option<usize> {
        self.output_dim
    }

    /// Take exclusive access to the engine. Blocks while another request holds it.
    pub fn lock(&self) -> Result<SessionGuard<'_, B>, InferenceError> {
        let backend = self.backend.lock().map_err(|_| InferenceError::Poisoned)?;
        Ok(SessionGuard {
            backend,
            output_dim: self.output_dim,
        })
    }

    /// Lock, run a single forward pass, and release.
    pub fn run(&self, tensor: ImageTensor) -> Result<ProbabilityVector, InferenceError> {
        self.lock()?.run(tensor)
    }
}

/// Exclusive handle on the engine, released on drop.
pub struct SessionGuard<'a, B> {
    backend: MutexGuard<'a, B>,
    output_dim: Option<usize>,
}

impl<B: InferenceBackend> SessionGuard<'_, B> {
    pub fn run(&mut self, tensor: ImageTensor) -> Result<ProbabilityVector, InferenceError> {
        let scores = self.backend.infer(tensor)?;
        if let Some(expected) = self.output_dim
            && scores.len() != expected
        {
            return Err(InferenceError::OutputDim {
                expected,
                actual: scores.len(),
            });
        }
        trace!(outputs = scores.len(), "forward pass complete");
        Ok(ProbabilityVector(scores))
    }
}
