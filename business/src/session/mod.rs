//! Session lifecycle: login, register, logout, forced de-authentication and
//! the password-recovery calls.
//!
//! All session calls share one [`RequestStream`]. A response is applied only if
//! no later session call was started and no logout happened meanwhile.

mod api;
mod state;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chaos_states::{Notices, RequestStream};
use log::{info, warn};

use crate::model::{ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest};
use crate::route::Route;
use crate::token_store::TokenTier;
use crate::transport::Transport;

pub use state::{ResetPasswordForm, Session, SessionPhase};

pub const LOGIN_FAILED: &str = "Login failed";
pub const REGISTRATION_FAILED: &str = "Registration failed";
pub const RESET_LINK_FAILED: &str = "Failed to send reset link";
pub const RESET_FAILED: &str = "Failed to reset password";
pub const RESET_LINK_SENT: &str = "Password reset link sent to your email.";
pub const RESET_SUCCEEDED: &str = "Password reset successfully.";
pub const EMAIL_PENDING_DEFAULT: &str = "We have sent a confirmation link to your email address. Please click the link to activate your account.";

#[derive(Debug, Default)]
struct SessionInner {
    session: Session,
    route: Route,
    reset_form: Option<ResetPasswordForm>,
}

/// Owns the [`Session`] and the current [`Route`].
///
/// Cheap to clone; clones share state, so calls may overlap on different
/// clones or on one handle under `tokio::join!`.
#[derive(Debug, Clone)]
pub struct SessionManager {
    inner: Arc<Mutex<SessionInner>>,
    transport: Transport,
    stream: RequestStream,
    notices: Notices,
}

impl SessionManager {
    /// Restores the session from whichever token tier holds a value.
    pub fn new(transport: Transport, notices: Notices) -> Self {
        let session = Session::restored(transport.tokens().current());
        let route = if session.is_authenticated() {
            Route::Panel
        } else {
            Route::Login
        };
        Self {
            inner: Arc::new(Mutex::new(SessionInner {
                session,
                route,
                reset_form: None,
            })),
            transport,
            stream: RequestStream::new("session"),
            notices,
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Copy of the current session.
    pub fn snapshot(&self) -> Session {
        self.lock().session.clone()
    }

    pub fn phase(&self) -> SessionPhase {
        self.lock().session.phase()
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock().session.is_authenticated()
    }

    pub fn route(&self) -> Route {
        self.lock().route.clone()
    }

    /// Reset link data kept after a failed reset.
    pub fn pending_reset(&self) -> Option<ResetPasswordForm> {
        self.lock().reset_form.clone()
    }

    /// Moves to `route`, subject to the authentication guard. Returns where
    /// navigation actually landed.
    pub fn navigate(&self, route: Route) -> Route {
        let mut inner = self.lock();
        let landed = route.guard(inner.session.is_authenticated());
        if let Route::ResetPassword { token, email } = &landed {
            inner.reset_form = Some(ResetPasswordForm {
                token: token.clone(),
                email: email.clone(),
            });
        }
        inner.route = landed.clone();
        landed
    }

    pub async fn login(&self, email: &str, password: &str, remember: bool) {
        let ticket = self.stream.issue();
        self.lock().session.begin_auth();

        let request = LoginRequest {
            email: email.to_owned(),
            password: password.to_owned(),
        };
        let result = api::login(&self.transport, &request).await;

        if !self.stream.is_latest(ticket) {
            return;
        }

        match result {
            Ok(response) => {
                let tier = self
                    .transport
                    .tokens()
                    .set(&response.token, TokenTier::for_remember(remember));
                info!("login: signed in as {} ({tier:?} token)", response.user.email);
                let mut inner = self.lock();
                inner
                    .session
                    .auth_succeeded(response.user, response.token, None);
                inner.route = Route::Panel;
            }
            Err(e) => {
                warn!("login: {e}");
                let message = e.user_message(LOGIN_FAILED);
                self.lock().session.auth_failed(message.clone());
                self.notices.error(message);
            }
        }
    }

    /// Registers and signs in. On success the route moves to
    /// [`Route::EmailPending`] carrying the server's message.
    pub async fn register(&self, request: RegisterRequest, remember: bool) {
        let ticket = self.stream.issue();
        self.lock().session.begin_auth();

        let result = api::register(&self.transport, &request).await;

        if !self.stream.is_latest(ticket) {
            return;
        }

        match result {
            Ok(response) => {
                self.transport
                    .tokens()
                    .set(&response.token, TokenTier::for_remember(remember));
                info!("register: account created for {}", response.user.email);
                let message = response
                    .message
                    .clone()
                    .unwrap_or_else(|| EMAIL_PENDING_DEFAULT.to_owned());
                let mut inner = self.lock();
                inner.session.auth_succeeded(
                    response.user,
                    response.token,
                    Some(message.clone()),
                );
                inner.route = Route::EmailPending { message };
            }
            Err(e) => {
                warn!("register: {e}");
                let message = e.user_message(REGISTRATION_FAILED);
                self.lock().session.auth_failed(message.clone());
                self.notices.error(message);
            }
        }
    }

    /// Signs out. Never fails.
    pub fn logout(&self) {
        info!("logout");
        self.deauthenticate();
    }

    /// Same as [`logout`](Self::logout), for callers that observed an
    /// authorization failure.
    pub fn force_deauth(&self) {
        warn!("force_deauth: authorization rejected, signing out");
        self.deauthenticate();
    }

    fn deauthenticate(&self) {
        self.transport.tokens().clear();
        self.stream.invalidate();
        let mut inner = self.lock();
        inner.session.reset_to_anonymous();
        inner.route = Route::Login;
    }

    pub fn clear_error(&self) {
        self.lock().session.clear_error();
    }

    pub async fn forgot_password(&self, email: &str) {
        let ticket = self.stream.issue();
        self.lock().session.begin_request();

        let request = ForgotPasswordRequest {
            email: email.to_owned(),
        };
        let result = api::forgot_password(&self.transport, &request).await;

        if !self.stream.is_latest(ticket) {
            return;
        }

        match result {
            Ok(()) => {
                self.lock()
                    .session
                    .request_succeeded(RESET_LINK_SENT.to_owned());
                self.notices.success(RESET_LINK_SENT);
            }
            Err(e) => {
                warn!("forgot_password: {e}");
                let message = e.user_message(RESET_LINK_FAILED);
                self.lock().session.request_failed(message.clone());
                self.notices.error(message);
            }
        }
    }

    /// On failure the token and email are kept (see
    /// [`pending_reset`](Self::pending_reset)) so the operator can retry with
    /// a new password only.
    pub async fn reset_password(&self, token: &str, email: &str, new_password: &str) {
        let ticket = self.stream.issue();
        {
            let mut inner = self.lock();
            inner.session.begin_request();
            inner.reset_form = Some(ResetPasswordForm {
                token: token.to_owned(),
                email: email.to_owned(),
            });
        }

        let request = ResetPasswordRequest {
            token: token.to_owned(),
            email: email.to_owned(),
            new_password: new_password.to_owned(),
        };
        let result = api::reset_password(&self.transport, &request).await;

        if !self.stream.is_latest(ticket) {
            return;
        }

        match result {
            Ok(()) => {
                let mut inner = self.lock();
                inner
                    .session
                    .request_succeeded(RESET_SUCCEEDED.to_owned());
                inner.reset_form = None;
                inner.route = Route::Login.guard(inner.session.is_authenticated());
                drop(inner);
                self.notices.success(RESET_SUCCEEDED);
            }
            Err(e) => {
                warn!("reset_password: {e}");
                let message = e.user_message(RESET_FAILED);
                self.lock().session.request_failed(message.clone());
                self.notices.error(message);
            }
        }
    }

    /// Back to a fresh anonymous session without touching the token store.
    pub fn reset(&self) {
        self.stream.invalidate();
        *self.lock() = SessionInner::default();
    }
}
