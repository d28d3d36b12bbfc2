//! Route state for screen navigation.
//!
//! This module defines the route enum that determines which screen the
//! front-end shows, and the guard that keeps the operator out of screens that
//! do not match the authentication state.

/// Represents the current screen of the console.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Route {
    /// Login screen - shown when the operator is not authenticated
    #[default]
    Login,
    Register,
    /// Shown after registration until the address is confirmed
    EmailPending { message: String },
    ForgotPassword,
    /// Reached from the emailed reset link
    ResetPassword { token: String, email: String },
    /// The user directory - authenticated only
    Panel,
}

impl Route {
    /// Screens meant for operators who are not signed in.
    pub fn is_public_auth(&self) -> bool {
        matches!(
            self,
            Self::Login | Self::Register | Self::ForgotPassword | Self::ResetPassword { .. }
        )
    }

    /// Where a request for `self` actually lands.
    pub fn guard(self, authenticated: bool) -> Self {
        match self {
            Self::Panel if !authenticated => Self::Login,
            route if authenticated && route.is_public_auth() => Self::Panel,
            route => route,
        }
    }
}
