//! Image geometry shared between input loading, preprocessing, and error reporting.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Height, width, and channel count of an interleaved (HWC) image buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageShape {
    pub height: usize,
    pub width: usize,
    pub channels: usize,
}

impl ImageShape {
    /// The fixed input contract of the loaded model: 224×224, three colour channels.
    pub const MODEL_INPUT: ImageShape = ImageShape::new(224, 224, 3);

    pub const fn new(height: usize, width: usize, channels: usize) -> Self {
        Self {
            height,
            width,
            channels,
        }
    }

    /// Number of samples a buffer of this shape holds, or `None` if that
    /// count does not fit in `usize`.
    pub const fn checked_len(&self) -> Option<usize> {
        match self.height.checked_mul(self.width) {
            Some(plane) => plane.checked_mul(self.channels),
            None => None,
        }
    }

    /// Number of samples a buffer of this shape holds, saturating at `usize::MAX`.
    pub const fn len(&self) -> usize {
        self.height
            .saturating_mul(self.width)
            .saturating_mul(self.channels)
    }

    pub const fn is_empty(&self) -> bool {
        self.height == 0 || self.width == 0 || self.channels == 0
    }
}

impl fmt::Display for ImageShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.height, self.width, self.channels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_input_len() {
        assert_eq!(ImageShape::MODEL_INPUT.len(), 224 * 224 * 3);
        assert!(!ImageShape::MODEL_INPUT.is_empty());
    }

    #[test]
    fn display_is_hwc() {
        assert_eq!(ImageShape::new(100, 120, 3).to_string(), "100x120x3");
    }

    #[test]
    fn zero_dimension_is_empty() {
        assert!(ImageShape::new(0, 224, 3).is_empty());
        assert!(ImageShape::new(usize::MAX, 0, 3).is_empty());
    }

    #[test]
    fn oversized_shape_has_no_len() {
        let shape = ImageShape::new(usize::MAX, 2, 3);
        assert_eq!(shape.checked_len(), None);
        assert_eq!(shape.len(), usize::MAX);
        assert_eq!(ImageShape::MODEL_INPUT.checked_len(), Some(224 * 224 * 3));
    }
}
