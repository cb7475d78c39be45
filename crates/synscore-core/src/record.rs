//! Ranked classification results and their wire representation.

use serde::{Deserialize, Serialize};

/// One entry of a top-K classification, as produced by the postprocessor.
///
/// `rank` is zero-based: the highest-scoring label has rank 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub label: String,
    pub confidence: f32,
    pub rank: usize,
}

impl ClassificationResult {
    pub fn new(label: impl Into<String>, confidence: f32, rank: usize) -> Self {
        Self {
            label: label.into(),
            confidence,
            rank,
        }
    }
}

/// A scored label as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub value: String,
    pub confidence: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub tag: Tag,
}

/// Output record returned to callers of the scoring service.
///
/// Serializes as
/// `{"type": "classification", "classification": {"tag": {"value": .., "confidence": ..}}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ScoreRecord {
    Classification { classification: Classification },
}

impl From<&ClassificationResult> for ScoreRecord {
    fn from(result: &ClassificationResult) -> Self {
        ScoreRecord::Classification {
            classification: Classification {
                tag: Tag {
                    value: result.label.clone(),
                    confidence: result.confidence,
                },
            },
        }
    }
}

impl From<ClassificationResult> for ScoreRecord {
    fn from(result: ClassificationResult) -> Self {
        ScoreRecord::Classification {
            classification: Classification {
                tag: Tag {
                    value: result.label,
                    confidence: result.confidence,
                },
            },
        }
    }
}

impl ScoreRecord {
    pub fn value(&self) -> &str {
        match self {
            ScoreRecord::Classification { classification } => &classification.tag.value,
        }
    }

    pub fn confidence(&self) -> f32 {
        match self {
            ScoreRecord::Classification { classification } => classification.tag.confidence,
        }
    }
}
