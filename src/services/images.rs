//! Image ingestion service

use axum::body::Bytes;

use crate::{
    error::{AppError, AppResult},
    images::{ImageIngestor, PLACEHOLDER_COVER},
};

#[derive(Clone)]
pub struct ImagesService {
    ingestor: ImageIngestor,
    default_width: u32,
}

impl ImagesService {
    pub fn new(ingestor: ImageIngestor, default_width: u32) -> Self {
        Self {
            ingestor,
            default_width,
        }
    }

    pub fn default_width(&self) -> u32 {
        self.default_width
    }

    pub fn placeholder(&self) -> &'static str {
        PLACEHOLDER_COVER
    }

    /// Resize an uploaded image and return it as a data URI.
    ///
    /// Decoding and resampling are CPU bound, so they run on the blocking pool.
    pub async fn to_data_uri(&self, source: Bytes, width: Option<u32>) -> AppResult<String> {
        let width = width.unwrap_or(self.default_width);
        let ingestor = self.ingestor.clone();
        let size = source.len();

        let data_uri = tokio::task::spawn_blocking(move || ingestor.convert_to_data_uri(&source, width))
            .await
            .map_err(|e| AppError::Internal(format!("Image task failed: {}", e)))??;

        tracing::info!(size, width, encoded = data_uri.len(), "Image ingested");
        Ok(data_uri)
    }
}
