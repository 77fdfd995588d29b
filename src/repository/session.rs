//! Session lookup against `/api/auth/me`

use async_trait::async_trait;
use serde::Deserialize;

use super::client::ApiClient;
use crate::{
    error::AppResult,
    models::{Company, SessionToken, SessionUser},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// User and company behind a session cookie
    async fn current(&self, token: &SessionToken) -> AppResult<(SessionUser, Company)>;
}

#[derive(Debug, Deserialize)]
struct MeBody {
    user: SessionUser,
    company: Company,
}

#[derive(Clone)]
pub struct HttpSessionStore {
    client: ApiClient,
}

impl HttpSessionStore {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SessionStore for HttpSessionStore {
    async fn current(&self, token: &SessionToken) -> AppResult<(SessionUser, Company)> {
        let body: MeBody = self.client.get(token, &["api", "auth", "me"], &[]).await?;
        Ok((body.user, body.company))
    }
}
