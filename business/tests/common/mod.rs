//! Shared fixtures for the integration tests.

#![allow(
    clippy::allow_attributes,
    reason = "dead_code fires in some test binaries and not others, so expect would fail"
)]
#![allow(dead_code, reason = "each test binary uses a different subset")]

use chaos_business::{BusinessConfig, Console, NoticeReceiver, TokenStore, TokenTier};
use serde_json::{Value, json};
use wiremock::MockServer;

pub const TEST_TOKEN: &str = "test_token";

/// Mock server plus a console pointed at it.
pub struct TestContext {
    pub server: MockServer,
    pub tokens: TokenStore,
    pub console: Console,
    pub notices: NoticeReceiver,
}

impl TestContext {
    /// Anonymous console.
    pub async fn new() -> Self {
        Self::with_tokens(TokenStore::in_memory()).await
    }

    /// Console restored from an ephemeral `TEST_TOKEN`.
    pub async fn signed_in() -> Self {
        let tokens = TokenStore::in_memory();
        tokens.set(TEST_TOKEN, TokenTier::Ephemeral);
        Self::with_tokens(tokens).await
    }

    pub async fn with_tokens(tokens: TokenStore) -> Self {
        let server = MockServer::start().await;
        let (console, notices) = Console::new(BusinessConfig::new(server.uri()), tokens.clone());
        Self {
            server,
            tokens,
            console,
            notices,
        }
    }

    /// Requests the server saw for `path`, in arrival order.
    pub async fn requests_to(&self, path: &str) -> Vec<wiremock::Request> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|request| request.url.path() == path)
            .collect()
    }

    pub fn notice_messages(&self) -> Vec<String> {
        self.notices
            .drain()
            .into_iter()
            .map(|notice| notice.message)
            .collect()
    }
}

pub fn user_json(email: &str) -> Value {
    json!({
        "id": "admin-1",
        "email": email,
        "fullName": "Ann Admin",
        "role": "Admin"
    })
}

pub fn auth_body(email: &str, token: &str) -> Value {
    json!({ "user": user_json(email), "token": token })
}

pub fn row_json(id: &str) -> Value {
    json!({
        "id": id,
        "email": format!("{id}@x.com"),
        "fullName": format!("User {id}"),
        "isBlocked": false,
        "isEmailConfirmed": true,
        "lastLoginTime": "2024-05-01T08:00:00Z",
        "registrationTime": "2024-01-01T08:00:00Z"
    })
}

pub fn page_json(ids: &[&str], total: u64) -> Value {
    json!({
        "items": ids.iter().map(|id| row_json(id)).collect::<Vec<_>>(),
        "total": total
    })
}
