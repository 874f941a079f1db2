//! Authentication session state machine.
//!
//! The session is process-wide shared state with a single writer: every
//! mutation funnels through the four named transitions below. No other code
//! path may touch auth state.

use api_types::auth::{SignupRequest, Token, UserView};

use crate::CoreError;

/// User role as understood by the client.
///
/// Parsed from the raw server string; anything unrecognized parses to `None`
/// and the gate treats the session as unauthenticated (fail-closed).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Admin,
    Driver,
    Viewer,
}

impl Role {
    pub fn parse(raw: &str) -> Option<Role> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "driver" => Some(Role::Driver),
            "viewer" => Some(Role::Viewer),
            _ => None,
        }
    }

    /// Returns the canonical role string used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Driver => "driver",
            Self::Viewer => "viewer",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionStatus {
    #[default]
    Unauthenticated,
    Authenticating,
    Authenticated,
    Failed,
}

/// In-memory auth state.
///
/// Invariant: `status == Authenticated` iff both the credential and the
/// identity are present. The fields are private so the invariant cannot be
/// broken from outside; reads go through the accessors, writes through
/// [`begin_auth`], [`complete`], [`fail`] and [`clear`].
///
/// [`begin_auth`]: Session::begin_auth
/// [`complete`]: Session::complete
/// [`fail`]: Session::fail
/// [`clear`]: Session::clear
#[derive(Debug, Default)]
pub struct Session {
    credential: Option<Token>,
    identity: Option<UserView>,
    status: SessionStatus,
}

impl Session {
    /// Creates the empty session used at process start.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn credential(&self) -> Option<&Token> {
        self.credential.as_ref()
    }

    pub fn identity(&self) -> Option<&UserView> {
        self.identity.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.status == SessionStatus::Authenticated
    }

    /// Parsed role of the authenticated user, `None` when not authenticated
    /// or when the server sent an unknown role string.
    pub fn role(&self) -> Option<Role> {
        if !self.is_authenticated() {
            return None;
        }
        self.identity.as_ref().and_then(|user| Role::parse(&user.role))
    }

    /// Marks a login/signup attempt as started.
    pub fn begin_auth(&mut self) {
        self.credential = None;
        self.identity = None;
        self.status = SessionStatus::Authenticating;
    }

    /// Completes authentication with a credential and the matching profile.
    pub fn complete(&mut self, credential: Token, identity: UserView) {
        self.credential = Some(credential);
        self.identity = Some(identity);
        self.status = SessionStatus::Authenticated;
    }

    /// Records a failed attempt; a retry goes through [`Session::begin_auth`].
    pub fn fail(&mut self) {
        self.credential = None;
        self.identity = None;
        self.status = SessionStatus::Failed;
    }

    /// Resets to the unauthenticated state (logout, failed restore).
    pub fn clear(&mut self) {
        self.credential = None;
        self.identity = None;
        self.status = SessionStatus::Unauthenticated;
    }
}

/// Validates a signup request locally, before any network call.
///
/// A request that fails here is never sent.
pub fn validate_signup(request: &SignupRequest) -> Result<(), CoreError> {
    if request.name.trim().is_empty() {
        return Err(CoreError::Validation("name is required".to_string()));
    }

    let email = request.email.trim();
    let valid_email = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.ends_with('.'),
        None => false,
    };
    if !valid_email {
        return Err(CoreError::Validation(format!("invalid email: {email}")));
    }

    if request.password.len() < 8 {
        return Err(CoreError::Validation(
            "password must be at least 8 characters".to_string(),
        ));
    }

    if Role::parse(&request.role).is_none() {
        return Err(CoreError::Validation(format!(
            "unknown role: {}",
            request.role
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn user(role: &str) -> UserView {
        UserView {
            id: Uuid::new_v4(),
            name: "Anna".to_string(),
            email: "anna@example.com".to_string(),
            role: role.to_string(),
            is_active: true,
        }
    }

    #[test]
    fn starts_unauthenticated_and_empty() {
        let session = Session::new();
        assert_eq!(session.status(), SessionStatus::Unauthenticated);
        assert!(session.credential().is_none());
        assert!(session.identity().is_none());
    }

    #[test]
    fn complete_sets_both_fields_and_status() {
        let mut session = Session::new();
        session.begin_auth();
        assert_eq!(session.status(), SessionStatus::Authenticating);

        session.complete(Token::new("tok"), user("driver"));
        assert!(session.is_authenticated());
        assert!(session.credential().is_some());
        assert_eq!(session.role(), Some(Role::Driver));
    }

    #[test]
    fn fail_clears_partial_state() {
        let mut session = Session::new();
        session.begin_auth();
        session.fail();
        assert_eq!(session.status(), SessionStatus::Failed);
        assert!(session.credential().is_none());
        assert!(session.identity().is_none());
    }

    #[test]
    fn clear_resets_authenticated_session() {
        let mut session = Session::new();
        session.begin_auth();
        session.complete(Token::new("tok"), user("admin"));
        session.clear();
        assert_eq!(session.status(), SessionStatus::Unauthenticated);
        assert!(session.credential().is_none());
    }

    #[test]
    fn unknown_role_string_parses_to_none() {
        let mut session = Session::new();
        session.begin_auth();
        session.complete(Token::new("tok"), user("superuser"));
        assert!(session.is_authenticated());
        assert_eq!(session.role(), None);
    }

    #[test]
    fn signup_validation_rejects_bad_input() {
        let mut request = SignupRequest {
            name: "Anna".to_string(),
            email: "anna@example.com".to_string(),
            password: "passw0rd!".to_string(),
            role: "driver".to_string(),
        };
        assert!(validate_signup(&request).is_ok());

        request.email = "not-an-email".to_string();
        assert!(validate_signup(&request).is_err());

        request.email = "anna@example.com".to_string();
        request.password = "short".to_string();
        assert!(validate_signup(&request).is_err());

        request.password = "passw0rd!".to_string();
        request.role = "root".to_string();
        assert!(validate_signup(&request).is_err());
    }
}
