//! Reading images from disk into BGR buffers.
//!
//! `.bgr` and `.raw` files are taken as-is: 224×224×3 bytes, B,G,R
//! interleaved. Anything else is decoded with the `image` crate and
//! reordered from RGB to BGR. No resizing happens here; an image of the
//! wrong size is rejected when it is scored.

use std::path::Path;

use anyhow::Context;
use synscore_ai::RawImage;
use synscore_core::ImageShape;

const RAW_EXTENSIONS: &[&str] = &["bgr", "raw"];

pub fn load_image(path: &Path) -> anyhow::Result<RawImage> {
    let is_raw = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| RAW_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()));

    if is_raw {
        let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        return RawImage::from_bgr224(bytes)
            .with_context(|| format!("raw image {}", path.display()));
    }

    let rgb = image::open(path)
        .with_context(|| format!("decoding {}", path.display()))?
        .to_rgb8();
    let (width, height) = rgb.dimensions();

    let mut bgr = Vec::with_capacity(rgb.as_raw().len());
    for pixel in rgb.pixels() {
        let [r, g, b] = pixel.0;
        bgr.extend_from_slice(&[b, g, r]);
    }

    let shape = ImageShape::new(height as usize, width as usize, 3);
    Ok(RawImage::new(shape, bgr)?)
}
