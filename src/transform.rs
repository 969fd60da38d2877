//! Image fetch and transform adapter.
//!
//! The loader core treats decoding as a black box behind [`SampleTransform`]:
//! given an image path, produce a tensor of a fixed shape. [`DecodeResize`]
//! is the stock implementation; anything else (augmentation chains, cached
//! decoders, synthetic test inputs) plugs in through the same trait.

use crate::error::DecodeError;
use crate::manifest::ManifestEntry;
use anyhow::{Context, Result};
use image::imageops::FilterType;
use image::io::Reader as ImageReader;
use std::path::Path;
use tch::{Kind, Tensor};

/// Converts one image path into a sample tensor.
///
/// Implementations must produce the same output shape for every input so a
/// batch can be stacked along dim 0. `Send` is required because the
/// transform runs on the producer thread.
pub trait SampleTransform: Send {
    fn apply(&self, path: &Path) -> Result<Tensor>;
}

/// Decodes an image from disk and resizes it to a fixed `[3, H, W]` f32
/// tensor in the `[0, 1]` range.
#[derive(Debug, Clone)]
pub struct DecodeResize {
    height: u32,
    width: u32,
}

impl DecodeResize {
    pub fn new(height: u32, width: u32) -> Self {
        Self { height, width }
    }
}

impl SampleTransform for DecodeResize {
    fn apply(&self, path: &Path) -> Result<Tensor> {
        let image = ImageReader::open(path)
            .with_context(|| format!("failed to open image: {}", path.display()))?
            .with_guessed_format()
            .with_context(|| format!("failed to probe image format: {}", path.display()))?
            .decode()
            .with_context(|| format!("failed to decode image: {}", path.display()))?;

        let rgb = image
            .resize_exact(self.width, self.height, FilterType::Triangle)
            .to_rgb8();

        // Raw buffer is HWC interleaved; reorder to channel-first.
        let tensor = Tensor::from_slice(rgb.as_raw())
            .reshape(&[self.height as i64, self.width as i64, 3])
            .permute(&[2, 0, 1])
            .to_kind(Kind::Float)
            .f_div_scalar(255.0)
            .context("failed to scale pixel values")?;
        Ok(tensor)
    }
}

/// Runs the transform for one manifest entry, wrapping any failure in a
/// [`DecodeError`] that names the offending sample path.
pub(crate) fn fetch_sample<T: SampleTransform>(
    transform: &T,
    entry: &ManifestEntry,
) -> Result<Tensor> {
    transform.apply(&entry.path).map_err(|reason| {
        DecodeError {
            path: entry.path.clone(),
            reason,
        }
        .into()
    })
}
