//! Process-wide session owner.
//!
//! The one writer of auth state: the four operations below are the only code
//! paths that touch the in-memory [`Session`] or the persisted credential.
//! Callers get read access through [`SessionStore::session`]. Single-writer
//! by design, not mutex-protected: the app drives one operation at a time.

use api_types::auth::{LoginRequest, SignupRequest};
use engine::{CoreError, Session, validate_signup};

use crate::{
    client::{ApiClient, ClientError},
    error::Result,
    local_state::LocalState,
};

pub struct SessionStore {
    session: Session,
    client: ApiClient,
    local: LocalState,
    state_path: String,
}

impl SessionStore {
    pub fn new(client: ApiClient, state_path: String) -> Result<Self> {
        let local = LocalState::load(&state_path)?;
        Ok(Self {
            session: Session::new(),
            client,
            local,
            state_path,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn seen_welcome(&self) -> bool {
        self.local.seen_welcome
    }

    pub fn saved_email(&self) -> Option<&str> {
        self.local.email.as_deref()
    }

    pub fn mark_welcome_seen(&mut self) {
        self.local.seen_welcome = true;
        self.persist();
    }

    /// Runs once at process start. A persisted credential is only trusted
    /// after the profile fetch succeeds; otherwise the session resets to
    /// unauthenticated and the stale credential is dropped from disk.
    pub async fn restore(&mut self) {
        let Some(credential) = self.local.credential.clone() else {
            return;
        };

        match self.client.me(&credential).await {
            Ok(identity) => {
                self.session.begin_auth();
                self.session.complete(credential, identity);
                tracing::info!("session restored");
            }
            Err(err) => {
                tracing::warn!("session restore failed: {}", describe(&err));
                self.session.clear();
                self.local.credential = None;
                self.persist();
            }
        }
    }

    pub async fn login(&mut self, email: &str, password: &str) -> std::result::Result<(), CoreError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(CoreError::Validation(
                "email and password are required".to_string(),
            ));
        }

        self.session.begin_auth();
        let payload = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        match self.client.login(&payload).await {
            Ok(response) => {
                self.local.credential = Some(response.token.clone());
                self.local.email = Some(response.user.email.clone());
                self.persist();
                self.session.complete(response.token, response.user);
                Ok(())
            }
            Err(err) => {
                self.session.fail();
                Err(map_auth_error(err))
            }
        }
    }

    /// Creates an account. Never authenticates: new accounts wait for admin
    /// activation before their first login.
    pub async fn signup(&mut self, request: &SignupRequest) -> std::result::Result<(), CoreError> {
        validate_signup(request)?;
        self.client.signup(request).await.map_err(|err| match err {
            ClientError::Conflict(message) => CoreError::Validation(message),
            other => map_auth_error(other),
        })
    }

    /// Local-first: memory and disk are cleared even when the remote
    /// invalidation call fails.
    pub async fn logout(&mut self) {
        if let Some(credential) = self.session.credential() {
            if let Err(err) = self.client.logout(credential).await {
                tracing::warn!("remote logout failed: {}", describe(&err));
            }
        }
        self.session.clear();
        self.local.credential = None;
        self.persist();
    }

    fn persist(&self) {
        if let Err(err) = self.local.save(&self.state_path) {
            tracing::error!("failed to persist local state: {err}");
        }
    }
}

fn map_auth_error(err: ClientError) -> CoreError {
    match err {
        ClientError::Unauthorized | ClientError::Forbidden => {
            CoreError::Auth("invalid credentials".to_string())
        }
        ClientError::NotFound => CoreError::NotFound("account".to_string()),
        ClientError::Conflict(message) | ClientError::Validation(message) => {
            CoreError::Validation(message)
        }
        ClientError::Server(message) => CoreError::Server(message),
        ClientError::Transport(err) => CoreError::Network(err.to_string()),
    }
}

fn describe(err: &ClientError) -> String {
    match err {
        ClientError::Unauthorized => "unauthorized".to_string(),
        ClientError::Forbidden => "forbidden".to_string(),
        ClientError::NotFound => "not found".to_string(),
        ClientError::Conflict(message)
        | ClientError::Validation(message)
        | ClientError::Server(message) => message.clone(),
        ClientError::Transport(err) => err.to_string(),
    }
}
