pub mod config;
pub mod record;
pub mod shape;

pub use config::{ArtifactConfig, ConfigError};
pub use record::{ClassificationResult, ScoreRecord};
pub use shape::ImageShape;
