//! Session Controller.
//!
//! `Uninitialized -> Active(token)`. `initialize()` and `reset()` always mint a
//! fresh token; every other board operation requires an active session and
//! leaves the token alone. There is no terminal state.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(Uuid);

impl SessionToken {
    fn mint() -> Self {
        SessionToken(Uuid::new_v4())
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("skill session has not been initialized")]
    NotInitialized,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Uninitialized,
    Active {
        token: SessionToken,
        minted_at: DateTime<Utc>,
    },
}

#[derive(Debug, Clone)]
pub struct SessionController {
    state: SessionState,
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionController {
    pub fn new() -> Self {
        Self {
            state: SessionState::Uninitialized,
        }
    }

    /// First load of the skill step.
    pub fn initialize(&mut self) -> SessionToken {
        self.rotate()
    }

    /// Explicit "clear all". The new token never equals the previous one.
    pub fn reset(&mut self) -> SessionToken {
        self.rotate()
    }

    fn rotate(&mut self) -> SessionToken {
        let previous = self.current();
        let mut token = SessionToken::mint();
        while Some(token) == previous {
            token = SessionToken::mint();
        }
        self.state = SessionState::Active {
            token,
            minted_at: Utc::now(),
        };
        token
    }

    pub fn current(&self) -> Option<SessionToken> {
        match self.state {
            SessionState::Active { token, .. } => Some(token),
            SessionState::Uninitialized => None,
        }
    }

    pub fn minted_at(&self) -> Option<DateTime<Utc>> {
        match self.state {
            SessionState::Active { minted_at, .. } => Some(minted_at),
            SessionState::Uninitialized => None,
        }
    }

    pub fn require_active(&self) -> Result<SessionToken, SessionError> {
        self.current().ok_or(SessionError::NotInitialized)
    }

    /// Stale-result check for responses issued under `token`.
    pub fn is_current(&self, token: SessionToken) -> bool {
        self.current() == Some(token)
    }
}
