//! Business logic services

pub mod books;
pub mod images;
pub mod loans;
pub mod stats;
pub mod users;

use crate::{config::ImagesConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub books: books::BooksService,
    pub users: users::UsersService,
    pub loans: loans::LoansService,
    pub stats: stats::StatsService,
    pub images: images::ImagesService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, images_config: &ImagesConfig) -> Self {
        let images = images::ImagesService::new(images_config.ingestor(), images_config.default_width);

        Self {
            books: books::BooksService::new(repository.clone(), images.clone()),
            users: users::UsersService::new(repository.clone()),
            loans: loans::LoansService::new(repository.clone()),
            stats: stats::StatsService::new(repository.clone()),
            images,
            repository,
        }
    }

    /// Whether the database answers
    pub async fn is_ready(&self) -> bool {
        match self.repository.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Readiness check failed: {}", e);
                false
            }
        }
    }
}
