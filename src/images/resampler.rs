//! Image resampling capability
//!
//! Decoding, scaling and re-encoding sit behind [`ImageResampler`] so that a
//! deployment can run without any codec support. The ingestor reports a
//! missing resampler as [`ImageError::UnsupportedPlatform`].

use std::io::Cursor;
use std::sync::Arc;

use image::{imageops::FilterType, DynamicImage, ImageFormat, ImageReader, Limits};

use super::{ingestor::proportional_height, ImageError, DEFAULT_MAX_PIXELS};

/// Scales an encoded image to a given width and re-encodes it
#[cfg_attr(test, mockall::automock)]
pub trait ImageResampler: Send + Sync {
    /// Resample `source` to exactly `target_width` pixels wide, keeping the
    /// aspect ratio, and return it encoded in the source's own format.
    fn resample(&self, source: &[u8], target_width: u32) -> Result<Vec<u8>, ImageError>;
}

pub type DynImageResampler = Arc<dyn ImageResampler>;

/// Resampler backed by the `image` crate codecs
#[derive(Debug, Clone, Copy)]
pub struct RasterResampler {
    max_pixels: u64,
}

impl RasterResampler {
    /// Bicubic (Catmull-Rom) filter
    const FILTER: FilterType = FilterType::CatmullRom;

    /// Bytes per pixel of the widest decoded layout (RGBA, 16 bits per channel)
    const MAX_BYTES_PER_PIXEL: u64 = 8;

    /// Longest source side accepted by the decoders
    const MAX_SOURCE_SIDE: u32 = 16_384;

    /// Resampler refusing to produce more than `max_pixels` pixels
    pub fn new(max_pixels: u64) -> Self {
        Self { max_pixels }
    }

    fn decoder_limits(&self) -> Limits {
        let mut limits = Limits::default();
        limits.max_image_width = Some(Self::MAX_SOURCE_SIDE);
        limits.max_image_height = Some(Self::MAX_SOURCE_SIDE);
        limits.max_alloc = Some(self.max_pixels.saturating_mul(Self::MAX_BYTES_PER_PIXEL));
        limits
    }
}

impl Default for RasterResampler {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PIXELS)
    }
}

impl ImageResampler for RasterResampler {
    fn resample(&self, source: &[u8], target_width: u32) -> Result<Vec<u8>, ImageError> {
        let mut reader = ImageReader::new(Cursor::new(source))
            .with_guessed_format()
            .map_err(|e| ImageError::Decode(e.into()))?;
        reader.limits(self.decoder_limits());
        let format = reader.format().ok_or(ImageError::UnknownFormat)?;
        let original = reader.decode().map_err(ImageError::Decode)?;

        let target_height = proportional_height(original.width(), original.height(), target_width);
        tracing::debug!(
            ?format,
            width = original.width(),
            height = original.height(),
            target_width,
            target_height,
            "Resampling image"
        );

        // The aspect ratio drives the height, so only the area bounds the allocation
        if u64::from(target_width) * u64::from(target_height) > self.max_pixels {
            return Err(ImageError::TooLarge {
                width: target_width,
                height: target_height,
                max_pixels: self.max_pixels,
            });
        }

        let resized = original.resize_exact(target_width, target_height, Self::FILTER);
        let resized = match format {
            // The JPEG encoder rejects alpha channels
            ImageFormat::Jpeg if resized.color().has_alpha() => {
                DynamicImage::ImageRgb8(resized.to_rgb8())
            }
            _ => resized,
        };

        let mut out = Cursor::new(Vec::new());
        resized
            .write_to(&mut out, format)
            .map_err(|source| ImageError::Encode {
                format: format!("{:?}", format),
                source,
            })?;

        Ok(out.into_inner())
    }
}
