//! Field Sales Manager Service
//!
//! JSON service for field-sales managers: classifies rep visits, runs the
//! exception approve/flag workflow against the field-sales backend, and
//! folds visit and report data into coverage, compliance, at-risk and
//! leaderboard views.

use std::sync::Arc;

pub mod analytics;
pub mod api;
pub mod config;
pub mod error;
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
        let services = services::Services::new(repository, &config.risk);
        Self {
            config: Arc::new(config),
            services: Arc::new(services),
        }
    }
}
