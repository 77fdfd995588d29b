//! Session resolution service

use crate::{
    error::AppResult,
    models::{Session, SessionToken},
    repository::Repository,
};

#[derive(Clone)]
pub struct SessionService {
    repository: Repository,
}

impl SessionService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Build the session behind a cookie value
    pub async fn resolve(&self, token: SessionToken) -> AppResult<Session> {
        let (user, company) = self.repository.sessions.current(&token).await?;
        tracing::debug!(user_id = %user.id, company_id = %company.id, "Session resolved");
        Ok(Session::new(user, company, token))
    }

    /// Fetch the session again, returning a new value
    pub async fn refresh(&self, session: &Session) -> AppResult<Session> {
        self.resolve(session.token().clone()).await
    }
}
