//! Biblio Library Management Server
//!
//! A REST JSON API for managing a small library: the book catalog (with
//! resized cover pictures stored as data URIs), borrowers and loans.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod images;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

impl AppState {
    pub fn new(config: AppConfig, repository: repository::Repository) -> Self {
        let services = services::Services::new(repository, &config.images);
        Self {
            config: Arc::new(config),
            services: Arc::new(services),
        }
    }
}
