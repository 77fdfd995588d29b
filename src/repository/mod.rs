//! Repository layer: typed access to the backend that owns the records

pub mod client;
pub mod reports;
pub mod session;
pub mod visits;

use std::sync::Arc;

pub use client::ApiClient;

/// Main repository struct holding one store per backend resource
#[derive(Clone)]
pub struct Repository {
    pub sessions: Arc<dyn session::SessionStore>,
    pub visits: Arc<dyn visits::VisitStore>,
    pub reports: Arc<dyn reports::ReportStore>,
}

impl Repository {
    /// Create a repository talking HTTP through `client`
    pub fn new(client: ApiClient) -> Self {
        Self {
            sessions: Arc::new(session::HttpSessionStore::new(client.clone())),
            visits: Arc::new(visits::HttpVisitStore::new(client.clone())),
            reports: Arc::new(reports::HttpReportStore::new(client)),
        }
    }

    /// Create a repository from explicit stores
    pub fn from_stores(
        sessions: Arc<dyn session::SessionStore>,
        visits: Arc<dyn visits::VisitStore>,
        reports: Arc<dyn reports::ReportStore>,
    ) -> Self {
        Self {
            sessions,
            visits,
            reports,
        }
    }
}
