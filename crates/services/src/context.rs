//! Signed-in user state, passed explicitly to whatever needs it.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use study_core::model::{User, UserId};

use crate::error::{ApiError, ContextError};

/// Resolves the account behind a bearer token.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// # Errors
    ///
    /// Returns `ApiError` if the token is rejected or the lookup fails.
    async fn current_user(&self, token: &str, user_id: UserId) -> Result<User, ApiError>;
}

/// Bearer token plus the user it belongs to.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthSession {
    token: String,
    user: User,
}

impl AuthSession {
    #[must_use]
    pub fn new(token: impl Into<String>, user: User) -> Self {
        Self {
            token: token.into(),
            user,
        }
    }

    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    #[must_use]
    pub fn user(&self) -> &User {
        &self.user
    }
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSession")
            .field("token", &"<redacted>")
            .field("user", &self.user)
            .finish()
    }
}

/// Who is using the app right now. Created at startup, replaced on sign-in/out.
#[derive(Debug, Clone, Default)]
pub struct UserContext {
    session: Option<Arc<AuthSession>>,
}

impl UserContext {
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_session(session: AuthSession) -> Self {
        Self {
            session: Some(Arc::new(session)),
        }
    }

    /// Looks up `user_id` with `token` and, on success, signs in.
    ///
    /// On failure the context is left as it was.
    ///
    /// # Errors
    ///
    /// Returns `ContextError::MissingToken` for a blank token, or
    /// `ContextError::Api` if the identity lookup fails.
    pub async fn sign_in(
        &mut self,
        identity: &dyn IdentityProvider,
        token: &str,
        user_id: UserId,
    ) -> Result<&User, ContextError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ContextError::MissingToken);
        }
        let user = identity.current_user(token, user_id).await?;
        tracing::info!(user_id = %user.id, "signed in");
        let session = self
            .session
            .insert(Arc::new(AuthSession::new(token, user)));
        Ok(session.user())
    }

    pub fn sign_out(&mut self) {
        if let Some(session) = self.session.take() {
            tracing::info!(user_id = %session.user().id, "signed out");
        }
    }

    #[must_use]
    pub fn session(&self) -> Option<&AuthSession> {
        self.session.as_deref()
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.session().map(AuthSession::user)
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }
}
