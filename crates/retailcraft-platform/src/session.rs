use std::fmt;

use chrono::{DateTime, Utc};
use retailcraft_core::Principal;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot {action} while session is {state}")]
pub struct SessionError {
    pub action: &'static str,
    pub state: &'static str,
}

#[derive(Clone, PartialEq, Eq)]
pub struct AuthSession {
    token: String,
    principal: Principal,
    signed_in_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
}

impl AuthSession {
    pub fn new(token: String, principal: Principal, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            token,
            principal,
            signed_in_at: Utc::now(),
            expires_at,
        }
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    pub fn signed_in_at(&self) -> DateTime<Utc> {
        self.signed_in_at
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSession")
            .field("token", &"<redacted>")
            .field("principal", &self.principal)
            .field("signed_in_at", &self.signed_in_at)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Anonymous,
    Authenticated(AuthSession),
    Refreshing(AuthSession),
    Expired {
        principal: Principal,
        at: DateTime<Utc>,
    },
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Anonymous => "anonymous",
            SessionState::Authenticated(_) => "authenticated",
            SessionState::Refreshing(_) => "refreshing",
            SessionState::Expired { .. } => "expired",
        }
    }
}

/// Session lifecycle: anonymous -> authenticated <-> refreshing -> expired.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    state: SessionState,
}

impl Session {
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn sign_in(&mut self, auth: AuthSession) {
        self.state = SessionState::Authenticated(auth);
    }

    pub fn sign_out(&mut self) {
        self.state = SessionState::Anonymous;
    }

    pub fn begin_refresh(&mut self) -> Result<(), SessionError> {
        match std::mem::take(&mut self.state) {
            SessionState::Authenticated(auth) => {
                self.state = SessionState::Refreshing(auth);
                Ok(())
            }
            other => self.reject(other, "begin refresh"),
        }
    }

    pub fn complete_refresh(
        &mut self,
        token: String,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<(), SessionError> {
        match std::mem::take(&mut self.state) {
            SessionState::Refreshing(auth) => {
                self.state = SessionState::Authenticated(AuthSession {
                    token,
                    expires_at,
                    ..auth
                });
                Ok(())
            }
            other => self.reject(other, "complete refresh"),
        }
    }

    pub fn expire(&mut self) -> Result<(), SessionError> {
        match std::mem::take(&mut self.state) {
            SessionState::Authenticated(auth) | SessionState::Refreshing(auth) => {
                self.state = SessionState::Expired {
                    principal: auth.principal,
                    at: Utc::now(),
                };
                Ok(())
            }
            other => self.reject(other, "expire"),
        }
    }

    pub fn bearer_token(&self) -> Option<&str> {
        match &self.state {
            SessionState::Authenticated(auth) | SessionState::Refreshing(auth) => {
                Some(auth.token.as_str())
            }
            _ => None,
        }
    }

    pub fn principal(&self) -> Option<&Principal> {
        match &self.state {
            SessionState::Authenticated(auth) | SessionState::Refreshing(auth) => {
                Some(&auth.principal)
            }
            SessionState::Expired { principal, .. } => Some(principal),
            SessionState::Anonymous => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.bearer_token().is_some()
    }

    pub fn is_past_expiry(&self, now: DateTime<Utc>) -> bool {
        match &self.state {
            SessionState::Authenticated(auth) | SessionState::Refreshing(auth) => {
                auth.expires_at.is_some_and(|expires_at| expires_at <= now)
            }
            _ => false,
        }
    }

    fn reject(&mut self, previous: SessionState, action: &'static str) -> Result<(), SessionError> {
        let state = previous.name();
        self.state = previous;
        Err(SessionError { action, state })
    }
}
