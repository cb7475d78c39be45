//! BGR byte image → normalized NCHW float tensor.

use synscore_core::ImageShape;

use crate::error::ShapeError;

/// An interleaved (HWC) 8-bit image in B,G,R channel order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImage {
    shape: ImageShape,
    data: Vec<u8>,
}

impl RawImage {
    /// Wrap a raw buffer, checking that its length matches `shape`.
    pub fn new(shape: ImageShape, data: Vec<u8>) -> Result<Self, ShapeError> {
        let expected = shape.checked_len().ok_or(ShapeError::TooLarge { shape })?;
        if data.len() != expected {
            return Err(ShapeError::BufferLength {
                shape,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    /// Wrap a buffer assumed to hold a 224×224 BGR image.
    pub fn from_bgr224(data: Vec<u8>) -> Result<Self, ShapeError> {
        Self::new(ImageShape::MODEL_INPUT, data)
    }

    pub fn shape(&self) -> ImageShape {
        self.shape
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// Model input: `[1, 3, H, W]` row-major, R,G,B planes, values in [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTensor {
    shape: [usize; 4],
    data: Vec<f32>,
}

impl ImageTensor {
    pub fn shape(&self) -> [usize; 4] {
        self.shape
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn into_parts(self) -> ([usize; 4], Vec<f32>) {
        (self.shape, self.data)
    }
}

/// Convert a 224×224 BGR image into the model's input tensor.
///
/// In order: reorder channels BGR → RGB, cast to `f32`, divide by 255,
/// transpose HWC → CHW, prepend a batch dimension of 1. Any other input
/// shape is rejected before touching the data.
pub fn transform(image: &RawImage) -> Result<ImageTensor, ShapeError> {
    let expected = ImageShape::MODEL_INPUT;
    if image.shape != expected {
        return Err(ShapeError::Mismatch {
            expected,
            actual: image.shape,
        });
    }

    let ImageShape {
        height,
        width,
        channels,
    } = expected;
    let plane = height * width;
    let mut data = vec![0.0f32; channels * plane];

    for c in 0..channels {
        // Output plane c (R, G, B) reads interleaved channel 2 - c (B, G, R).
        let src_c = channels - 1 - c;
        let dst = &mut data[c * plane..(c + 1) * plane];
        for (i, out) in dst.iter_mut().enumerate() {
            *out = image.data[i * channels + src_c] as f32 / 255.0;
        }
    }

    Ok(ImageTensor {
        shape: [1, channels, height, width],
        data,
    })
}
