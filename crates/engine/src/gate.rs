//! Authorization gate.
//!
//! One pure function decides where a session is allowed to go; every screen
//! asks it on mount instead of re-implementing its own role check. Pure and
//! idempotent: evaluating the same session twice yields the same answer, so
//! re-invocation on every render is safe.

use crate::session::{Role, Session};

/// Navigable destinations, one per role dashboard plus the public screens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Destination {
    Welcome,
    Login,
    AdminDashboard,
    DriverDashboard,
    ViewerDashboard,
}

impl Destination {
    pub fn dashboard_for(role: Role) -> Destination {
        match role {
            Role::Admin => Destination::AdminDashboard,
            Role::Driver => Destination::DriverDashboard,
            Role::Viewer => Destination::ViewerDashboard,
        }
    }
}

/// Outcome of guarding a role-bound screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Guard {
    Allowed,
    Redirect(Destination),
}

/// Resolves the destination a session may view.
///
/// Anything short of a fully authenticated session with a recognized role
/// lands on the login screen. An unknown role string means "logged out",
/// never the least-privileged valid role.
pub fn resolve_destination(session: &Session) -> Destination {
    match session.role() {
        Some(role) => Destination::dashboard_for(role),
        None => Destination::Login,
    }
}

/// Guards a screen bound to exactly one role.
///
/// A mismatch always produces a redirect, never a partial render.
pub fn guard(required: Role, session: &Session) -> Guard {
    match session.role() {
        Some(role) if role == required => Guard::Allowed,
        _ => Guard::Redirect(resolve_destination(session)),
    }
}

/// Destination at process start: the first-run welcome screen takes
/// precedence only for users who never completed it and are not logged in.
pub fn entry_destination(session: &Session, seen_welcome: bool) -> Destination {
    let destination = resolve_destination(session);
    if destination == Destination::Login && !seen_welcome {
        return Destination::Welcome;
    }
    destination
}

#[cfg(test)]
mod tests {
    use api_types::auth::{Token, UserView};
    use uuid::Uuid;

    use super::*;

    fn authenticated(role: &str) -> Session {
        let mut session = Session::new();
        session.begin_auth();
        session.complete(
            Token::new("tok"),
            UserView {
                id: Uuid::new_v4(),
                name: "Anna".to_string(),
                email: "anna@example.com".to_string(),
                role: role.to_string(),
                is_active: true,
            },
        );
        session
    }

    #[test]
    fn each_role_maps_to_its_dashboard() {
        assert_eq!(
            resolve_destination(&authenticated("admin")),
            Destination::AdminDashboard
        );
        assert_eq!(
            resolve_destination(&authenticated("driver")),
            Destination::DriverDashboard
        );
        assert_eq!(
            resolve_destination(&authenticated("viewer")),
            Destination::ViewerDashboard
        );
    }

    #[test]
    fn anything_else_resolves_to_login() {
        assert_eq!(resolve_destination(&Session::new()), Destination::Login);

        let mut authenticating = Session::new();
        authenticating.begin_auth();
        assert_eq!(resolve_destination(&authenticating), Destination::Login);

        let mut failed = Session::new();
        failed.begin_auth();
        failed.fail();
        assert_eq!(resolve_destination(&failed), Destination::Login);

        // Unknown role: fail-closed, not "viewer".
        assert_eq!(
            resolve_destination(&authenticated("superuser")),
            Destination::Login
        );
    }

    #[test]
    fn resolve_is_idempotent() {
        let session = authenticated("driver");
        let first = resolve_destination(&session);
        let second = resolve_destination(&session);
        assert_eq!(first, second);
    }

    #[test]
    fn guard_redirects_on_role_mismatch() {
        let driver = authenticated("driver");
        assert_eq!(guard(Role::Driver, &driver), Guard::Allowed);
        assert_eq!(
            guard(Role::Admin, &driver),
            Guard::Redirect(Destination::DriverDashboard)
        );
        assert_eq!(
            guard(Role::Admin, &Session::new()),
            Guard::Redirect(Destination::Login)
        );
    }

    #[test]
    fn welcome_shown_only_on_first_run() {
        let session = Session::new();
        assert_eq!(entry_destination(&session, false), Destination::Welcome);
        assert_eq!(entry_destination(&session, true), Destination::Login);
        // An authenticated user never sees the welcome screen again.
        assert_eq!(
            entry_destination(&authenticated("admin"), false),
            Destination::AdminDashboard
        );
    }
}
