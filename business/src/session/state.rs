//! Session data and its transitions.
//!
//! `Session` is plain data mutated by [`SessionManager`](super::SessionManager)
//! only. The phase is never stored: it is read off the fields, so the fields
//! can never disagree with it.

use crate::model::UserProfile;

/// Lifecycle phase of the session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionPhase {
    #[default]
    Anonymous,
    Authenticating,
    Authenticated,
    AuthError,
}

/// Token and email from a reset link, kept until the reset succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetPasswordForm {
    pub token: String,
    pub email: String,
}

/// Authentication state of the operator.
///
/// `authenticated` is true exactly when a token is held, and a user profile is
/// only present while authenticated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    user: Option<UserProfile>,
    token: Option<String>,
    pending: bool,
    authenticating: bool,
    last_error: Option<String>,
    notice: Option<String>,
}

impl Session {
    /// Session rebuilt at start-up from a stored token. The user stays unknown
    /// until the next login.
    pub fn restored(token: Option<String>) -> Self {
        Self {
            token,
            ..Self::default()
        }
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Last success message of register, forgot-password or reset-password.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn phase(&self) -> SessionPhase {
        if self.last_error.is_some() {
            SessionPhase::AuthError
        } else if self.authenticating {
            SessionPhase::Authenticating
        } else if self.is_authenticated() {
            SessionPhase::Authenticated
        } else {
            SessionPhase::Anonymous
        }
    }

    pub(crate) fn begin_auth(&mut self) {
        self.pending = true;
        self.authenticating = true;
        self.last_error = None;
        self.notice = None;
    }

    pub(crate) fn auth_succeeded(
        &mut self,
        user: UserProfile,
        token: String,
        notice: Option<String>,
    ) {
        self.user = Some(user);
        self.token = Some(token);
        self.pending = false;
        self.authenticating = false;
        self.last_error = None;
        self.notice = notice;
    }

    /// The token, if any, is left as it was.
    pub(crate) fn auth_failed(&mut self, message: String) {
        self.pending = false;
        self.authenticating = false;
        self.last_error = Some(message);
    }

    /// Supersedes any sign-in still in flight.
    pub(crate) fn begin_request(&mut self) {
        self.pending = true;
        self.authenticating = false;
        self.last_error = None;
        self.notice = None;
    }

    pub(crate) fn request_succeeded(&mut self, notice: String) {
        self.pending = false;
        self.notice = Some(notice);
    }

    pub(crate) fn request_failed(&mut self, message: String) {
        self.pending = false;
        self.last_error = Some(message);
    }

    pub(crate) fn reset_to_anonymous(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn clear_error(&mut self) {
        self.last_error = None;
    }
}
