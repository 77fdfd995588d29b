//! Manager session model

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::enums::StaffRole;
use crate::error::{AppError, AppResult};

/// Opaque session cookie value forwarded to the backend
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionToken(..)")
    }
}

/// Signed-in company user
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionUser {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    #[schema(value_type = String)]
    pub role: StaffRole,
}

/// Company the session is scoped to
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Company {
    pub id: String,
    pub name: String,
}

/// Session context built once per request and passed explicitly
#[derive(Debug, Clone)]
pub struct Session {
    pub user: SessionUser,
    pub company: Company,
    token: SessionToken,
}

impl Session {
    pub fn new(user: SessionUser, company: Company, token: SessionToken) -> Self {
        Self { user, company, token }
    }

    pub fn token(&self) -> &SessionToken {
        &self.token
    }

    /// Fail unless the signed-in user may approve or flag exceptions
    pub fn require_reviewer(&self) -> AppResult<()> {
        if self.user.role.can_review_visits() {
            Ok(())
        } else {
            Err(AppError::Authorization(format!(
                "Role '{}' cannot review visits",
                self.user.role
            )))
        }
    }
}

/// Session as returned to the dashboard (no credentials)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SessionResponse {
    pub user: SessionUser,
    pub company: Company,
}

impl From<&Session> for SessionResponse {
    fn from(s: &Session) -> Self {
        Self {
            user: s.user.clone(),
            company: s.company.clone(),
        }
    }
}
