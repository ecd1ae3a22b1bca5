//! Cover image ingestion
//!
//! Uploaded cover pictures are never stored as files: they are scaled down to a
//! fixed width, re-encoded in their own format and kept as a base64 data URI
//! that can be dropped straight into an `img` `src` attribute.

pub mod ingestor;
pub mod resampler;

use thiserror::Error;

pub use ingestor::{encode_data_uri, proportional_height, ImageIngestor};
pub use resampler::{DynImageResampler, ImageResampler, RasterResampler};

/// Width used when the caller does not ask for one
pub const DEFAULT_TARGET_WIDTH: u32 = 256;

/// Largest output, in pixels, a resize may produce (4096 x 4096)
pub const DEFAULT_MAX_PIXELS: u64 = 4096 * 4096;

/// Scheme prefix of every produced data URI
pub const DATA_URI_PREFIX: &str = "data:image;base64,";

/// Cover shown for books without an uploaded photo (100x100 PNG)
pub const PLACEHOLDER_COVER: &str = "data:image;base64,iVBORw0KGgoAAAANSUhEUgAAAGQAAABkCAYAAABw4pVUAAAABmJLR0QA/wD/AP+gvaeTAAAEJElEQVR4nO3dv49MURTA8e8Ku4kIiUKCRKHRaFQqlYqCjdiQkCgp7Cr5Eyh1dHTb6VSikbAaK1HQiFixiSAhg8KuXcWbiTFz38977jtnZs43ec3uvDt35pP33sydNcDzPM/z5JoDvgAfgVnluUx8U8BnYLO7rQHnVGfk8Yl/II5ioDNkCI5iqLMMo6wDFzUnNek5isEcxWCOYjBHMZijKLUJvAb2Bn4XQvEtbiutd0NHMQbiKAZBHMUgSFF+oa9fUhBwlLolBwFHqVMrIOAoVWsNBBylSq2CgKOU1ToIOEpRKiDgKHmpgYCjhFIFAUcZTB0EHKU/EyDgKL3MgED2p0RW/8RoBlgAloAf3W0JmO/+TipTIGATZT/wkuHH3tuWu7eRyBwI2EKZoRijH0XiSDEJAnZQFijH6G1XBe7PLAjYQHlOdZBnAvdnGgT0X311qA7SEbg/8yCgi1IH5LvA/Y0ECOidvvyUVZAGyjzVQcb6oj4F7Az8vG2UGbKXtGUYy8C0wP2ZBNkC3AFeAXsCv28bZT/FKGP9xnAbsNg3vhWUabJT0jOyC30HeNr9mcSR0csUyHbgYeA+Hufc3sL7FOnMgOwCngTGXwUOF+yn/T5FOhMge4AXgbHfAgcr7D9OKOogB4A3gXFfAftqjDMuKKogh4D3gTGXgN0NxhsHFDWQIwx/CcEm8AjYETHuqKOogBwDvgXGeoDMZwqjjNI6yEngZ2Cce8DWBuPlNaoorYKcB34HxrhFtlQineT7lFngQ3dL+S1IrYFcBv4E9r9ZY4wmSRwpcwNjpDzSWgG5DmwM7LcBXKs52abFoAxipEZJCjJFdgQM7rMGXGo238Y1QcnDSImSDGQLcDdw+19kF3aN6lxT8m6beu0sCcg0/6/Y9rYOcDxuvtFVOVJCR8Y6cKHi/jGJg+St2H4FjsbPV6SiJ7UIo8r+sYmC5K3YrpAtk1gq9pSUaulfDCR2xVajsi83GDwyquwfe6SIgEit2GqUh1KGUbR/DEo0SN6K7XOardhqFPukSqJEg4RWbB+SXdxHqdhrgtQ1JRpkcFtE9kP/VIUWMi2giILcR3bFNlVzZNe3qt9i1ObpSwzkNmlWbKXrf59R56ul2kKJBtkAblScqHahU8pLbJ2+okGuVJygdrPUf4I0UKJBRqUPNHti20aZSJC6r3zaRJkYkBNkKCs0+wi2LZSJAZGojVdfDlKz1CgO0qCUKA7SsFTXFAeJKMWR4iCRpUYpzUGGS4lSmoOES4VSmoPkJ3GhdxDh1D8P8YZT/TzEC9cUJRrEt7T/qU1p2g/e6pYKpTTtB255S4FSmvaDtr5Jo3gJG9V/iDrWOYrBHMVgjmIwRzGYoxgsb5X4tOakJr0QyorqjLwhlFXd6XiQnabekR0dp5Tn4nme541RfwFbbDokN3PzagAAAABJRU5ErkJggg==";

/// Failures of the ingestion pipeline
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Image stream is empty")]
    EmptyInput,

    #[error("Invalid target width {width}: expected 1..={max}")]
    InvalidWidth { width: u32, max: u32 },

    #[error("Image resizing is not supported on this platform")]
    UnsupportedPlatform,

    #[error("Resized image would be {width}x{height}, above the {max_pixels} pixel budget")]
    TooLarge { width: u32, height: u32, max_pixels: u64 },

    #[error("Unrecognized image format")]
    UnknownFormat,

    #[error("Failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Failed to encode image as {format}: {source}")]
    Encode {
        format: String,
        #[source]
        source: image::ImageError,
    },
}

/// Returns the stored photo, or the placeholder cover when there is none
pub fn cover_or_placeholder(photo: Option<&str>) -> &str {
    match photo {
        Some(p) if !p.is_empty() => p,
        _ => PLACEHOLDER_COVER,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_is_data_uri() {
        assert!(PLACEHOLDER_COVER.starts_with(DATA_URI_PREFIX));
    }

    #[test]
    fn test_cover_or_placeholder() {
        assert_eq!(cover_or_placeholder(Some("data:image;base64,AAAA")), "data:image;base64,AAAA");
        assert_eq!(cover_or_placeholder(Some("")), PLACEHOLDER_COVER);
        assert_eq!(cover_or_placeholder(None), PLACEHOLDER_COVER);
    }
}
