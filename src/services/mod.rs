//! Business logic services

pub mod reports;
pub mod review;
pub mod session;

use crate::{config::RiskConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub session: session::SessionService,
    pub review: review::ReviewService,
    pub reports: reports::ReportsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, risk: &RiskConfig) -> Self {
        Self {
            session: session::SessionService::new(repository.clone()),
            review: review::ReviewService::new(repository.clone()),
            reports: reports::ReportsService::new(repository, risk),
        }
    }
}
