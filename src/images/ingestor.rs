//! Image to data URI conversion

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use super::{DynImageResampler, ImageError, DATA_URI_PREFIX};

/// Height that keeps the aspect ratio for `target_width`.
///
/// Integer division (floor), never below one pixel.
pub fn proportional_height(original_width: u32, original_height: u32, target_width: u32) -> u32 {
    let height = u64::from(target_width) * u64::from(original_height) / u64::from(original_width.max(1));
    u32::try_from(height).unwrap_or(u32::MAX).max(1)
}

/// Prefix encoded image bytes with the data URI scheme
pub fn encode_data_uri(bytes: &[u8]) -> String {
    let mut uri = String::with_capacity(DATA_URI_PREFIX.len() + bytes.len().div_ceil(3) * 4);
    uri.push_str(DATA_URI_PREFIX);
    BASE64.encode_string(bytes, &mut uri);
    uri
}

/// Turns uploaded image bytes into a resized data URI.
///
/// Stateless apart from its configuration; clones share the same resampler.
#[derive(Clone)]
pub struct ImageIngestor {
    resampler: Option<DynImageResampler>,
    max_width: u32,
}

impl ImageIngestor {
    pub fn new(resampler: Option<DynImageResampler>, max_width: u32) -> Self {
        Self { resampler, max_width }
    }

    /// Whether a resampler is available
    pub fn is_supported(&self) -> bool {
        self.resampler.is_some()
    }

    pub fn max_width(&self) -> u32 {
        self.max_width
    }

    /// Resize `source` to `target_width` and return it as `data:image;base64,...`
    pub fn convert_to_data_uri(&self, source: &[u8], target_width: u32) -> Result<String, ImageError> {
        if source.is_empty() {
            return Err(ImageError::EmptyInput);
        }
        if target_width == 0 || target_width > self.max_width {
            return Err(ImageError::InvalidWidth {
                width: target_width,
                max: self.max_width,
            });
        }

        let resampler = self.resampler.as_ref().ok_or(ImageError::UnsupportedPlatform)?;
        let resized = resampler.resample(source, target_width)?;

        Ok(encode_data_uri(&resized))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::Arc;

    use image::{DynamicImage, GenericImageView, ImageFormat, Rgb, RgbImage};

    use super::*;
    use crate::images::{resampler::MockImageResampler, RasterResampler, DEFAULT_TARGET_WIDTH};

    fn raster_ingestor() -> ImageIngestor {
        ImageIngestor::new(Some(Arc::new(RasterResampler::default())), 4096)
    }

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, 0]));
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img).write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    fn payload(uri: &str) -> Vec<u8> {
        let encoded = uri.strip_prefix(DATA_URI_PREFIX).expect("missing data URI prefix");
        BASE64.decode(encoded).expect("payload is not valid base64")
    }

    #[test]
    fn test_proportional_height() {
        assert_eq!(proportional_height(400, 300, 256), 192);
        assert_eq!(proportional_height(3, 2, 256), 170);
        assert_eq!(proportional_height(100, 100, 256), 256);
        assert_eq!(proportional_height(1000, 1, 10), 1);
        assert_eq!(proportional_height(u32::MAX, u32::MAX, u32::MAX), u32::MAX);
    }

    #[test]
    fn test_encode_data_uri() {
        assert_eq!(encode_data_uri(b"abc"), "data:image;base64,YWJj");
        assert_eq!(encode_data_uri(b""), "data:image;base64,");
    }

    #[test]
    fn test_convert_default_width() {
        let uri = raster_ingestor().convert_to_data_uri(&png(512, 384), DEFAULT_TARGET_WIDTH).unwrap();

        assert!(uri.starts_with("data:image;base64,"));
        let bytes = payload(&uri);
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Png);
        assert_eq!(image::load_from_memory(&bytes).unwrap().dimensions(), (256, 192));
    }

    #[test]
    fn test_convert_height_is_floored() {
        let uri = raster_ingestor().convert_to_data_uri(&png(300, 200), 100).unwrap();
        // 100 * 200 / 300 = 66.67
        assert_eq!(image::load_from_memory(&payload(&uri)).unwrap().dimensions(), (100, 66));
    }

    #[test]
    fn test_convert_identity_width() {
        let uri = raster_ingestor().convert_to_data_uri(&png(77, 33), 77).unwrap();
        assert_eq!(image::load_from_memory(&payload(&uri)).unwrap().dimensions(), (77, 33));
    }

    #[test]
    fn test_convert_empty_input() {
        let result = raster_ingestor().convert_to_data_uri(&[], 256);
        assert!(matches!(result, Err(ImageError::EmptyInput)));
    }

    #[test]
    fn test_empty_input_checked_before_platform() {
        let ingestor = ImageIngestor::new(None, 4096);
        let result = ingestor.convert_to_data_uri(&[], 256);
        assert!(matches!(result, Err(ImageError::EmptyInput)));
    }

    #[test]
    fn test_convert_without_resampler() {
        let ingestor = ImageIngestor::new(None, 4096);
        assert!(!ingestor.is_supported());

        let result = ingestor.convert_to_data_uri(&png(10, 10), 256);
        assert!(matches!(result, Err(ImageError::UnsupportedPlatform)));
    }

    #[test]
    fn test_convert_invalid_width() {
        let ingestor = raster_ingestor();
        assert!(matches!(
            ingestor.convert_to_data_uri(&png(10, 10), 0),
            Err(ImageError::InvalidWidth { width: 0, max: 4096 })
        ));
        assert!(matches!(
            ingestor.convert_to_data_uri(&png(10, 10), 5000),
            Err(ImageError::InvalidWidth { width: 5000, .. })
        ));
    }

    #[test]
    fn test_convert_rejects_tall_sliver() {
        let ingestor = raster_ingestor();
        let sliver = png(1, 2000);

        assert!(matches!(
            ingestor.convert_to_data_uri(&sliver, 4096),
            Err(ImageError::TooLarge { width: 4096, height: 8_192_000, .. })
        ));
        assert!(matches!(
            ingestor.convert_to_data_uri(&sliver, DEFAULT_TARGET_WIDTH),
            Err(ImageError::TooLarge { width: 256, height: 512_000, .. })
        ));
        // Narrow enough to stay within budget
        let uri = ingestor.convert_to_data_uri(&sliver, 2).unwrap();
        assert_eq!(image::load_from_memory(&payload(&uri)).unwrap().dimensions(), (2, 4000));
    }

    #[test]
    fn test_convert_delegates_to_resampler() {
        let mut mock = MockImageResampler::new();
        mock.expect_resample()
            .withf(|source, width| source.to_vec() == b"raw".to_vec() && *width == 128)
            .times(1)
            .returning(|_, _| Ok(b"resized".to_vec()));

        let ingestor = ImageIngestor::new(Some(Arc::new(mock)), 4096);
        let uri = ingestor.convert_to_data_uri(b"raw", 128).unwrap();

        assert_eq!(payload(&uri), b"resized");
    }

    #[test]
    fn test_convert_propagates_resampler_failure() {
        let mut mock = MockImageResampler::new();
        mock.expect_resample().returning(|_, _| Err(ImageError::UnknownFormat));

        let ingestor = ImageIngestor::new(Some(Arc::new(mock)), 4096);
        let result = ingestor.convert_to_data_uri(b"raw", 128);

        assert!(matches!(result, Err(ImageError::UnknownFormat)));
    }

    #[test]
    fn test_concurrent_conversions() {
        let ingestor = raster_ingestor();
        let source = Arc::new(png(120, 90));

        let handles: Vec<_> = (1..=4)
            .map(|i| {
                let ingestor = ingestor.clone();
                let source = Arc::clone(&source);
                std::thread::spawn(move || ingestor.convert_to_data_uri(&source, 30 * i))
            })
            .collect();

        for (i, handle) in (1..=4).zip(handles) {
            let uri = handle.join().unwrap().unwrap();
            let width = image::load_from_memory(&payload(&uri)).unwrap().width();
            assert_eq!(width, 30 * i);
        }
    }
}
