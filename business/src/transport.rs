//! Authenticated access to the admin API.
//!
//! The token is read from the [`TokenStore`] when a request is built, not when
//! it is sent. A logout that lands while a request is in flight therefore does
//! not change the credential of that request.

use log::{debug, warn};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::config::BusinessConfig;
use crate::error::{ApiError, ApiResult};
use crate::http::{Client, RequestBuilder, Response};
use crate::token_store::TokenStore;

/// Shape of error bodies. Anything else is treated as "no message".
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Transport {
    config: BusinessConfig,
    tokens: TokenStore,
    client: Client,
}

impl Transport {
    pub fn new(config: BusinessConfig, tokens: TokenStore) -> Self {
        Self {
            config,
            tokens,
            client: Client::new(),
        }
    }

    pub fn config(&self) -> &BusinessConfig {
        &self.config
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.tokens.current() {
            Some(token) => request.header("Authorization", format!("Bearer {token}")),
            None => request,
        }
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.authorize(self.client.get(self.config.url(path)))
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.authorize(self.client.post(self.config.url(path)))
    }

    pub fn delete(&self, path: &str) -> RequestBuilder {
        self.authorize(self.client.delete(self.config.url(path)))
    }

    /// Sends `request` and classifies any non-2xx answer.
    ///
    /// 401/403 clears the persistent token tier before the error is returned.
    /// Tearing down the session is left to the caller.
    pub async fn send(&self, request: RequestBuilder) -> ApiResult<Response> {
        let method = request.method();
        let url = request.url().to_owned();

        let response = request.send().await.map_err(|e| {
            warn!("Transport: {method:?} {url} failed: {e}");
            ApiError::transient(e.message)
        })?;
        debug!("Transport: {method:?} {url} -> {}", response.status);

        if response.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<ErrorBody>()
            .ok()
            .and_then(|body| body.message)
            .filter(|m| !m.trim().is_empty());
        let error = ApiError::from_status(response.status, message);

        if error.is_auth_failure() {
            warn!(
                "Transport: {method:?} {url} rejected with {}, dropping persisted token",
                response.status
            );
            self.tokens.clear_persistent();
        }

        Err(error)
    }

    /// Sends `request` and decodes a JSON body.
    pub async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let response = self.send(request).await?;
        response
            .json()
            .map_err(|e| ApiError::transient(format!("unreadable response body: {e}")))
    }

    /// Sends `request`, ignoring whatever body a success carries.
    pub async fn send_ack(&self, request: RequestBuilder) -> ApiResult<()> {
        self.send(request).await.map(|_| ())
    }
}

/// Wraps a serialization failure of an outgoing request.
pub(crate) fn encode_error(e: &serde_json::Error) -> ApiError {
    ApiError::transient(format!("failed to encode request: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token_store::TokenTier;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn transport_for(server: &MockServer) -> Transport {
        Transport::new(BusinessConfig::new(server.uri()), TokenStore::in_memory())
    }

    #[tokio::test]
    async fn test_bearer_header_attached_when_token_present() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/Admin/users"))
            .and(header("Authorization", "Bearer test_token"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(1)
            .mount(&server)
            .await;

        let transport = transport_for(&server);
        transport.tokens().set("test_token", TokenTier::Ephemeral);

        let result = transport.send(transport.get("/api/Admin/users")).await;
        assert!(result.is_ok(), "authorized request should succeed");
    }

    #[tokio::test]
    async fn test_no_header_without_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .mount(&server)
            .await;

        let transport = transport_for(&server);
        let result = transport.send(transport.post("/login")).await;
        assert!(result.is_ok(), "request should succeed");

        let received = server.received_requests().await.unwrap_or_default();
        assert_eq!(received.len(), 1);
        assert!(!received[0].headers.contains_key("authorization"));
    }

    #[tokio::test]
    async fn test_unauthorized_clears_persistent_tier() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let transport = transport_for(&server);
        transport.tokens().set("stale", TokenTier::Persistent);

        let err = transport
            .send(transport.get("/api/Admin/users"))
            .await
            .expect_err("401 must fail");

        assert!(err.is_auth_failure());
        assert_eq!(transport.tokens().current(), None);
    }

    #[tokio::test]
    async fn test_forbidden_leaves_ephemeral_tier_alone() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let transport = transport_for(&server);
        transport.tokens().set("session", TokenTier::Ephemeral);

        let err = transport
            .send(transport.get("/api/Admin/users"))
            .await
            .expect_err("403 must fail");

        assert!(err.is_auth_failure());
        assert_eq!(transport.tokens().current().as_deref(), Some("session"));
    }

    #[tokio::test]
    async fn test_error_body_message_is_kept() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/register"))
            .respond_with(
                ResponseTemplate::new(409)
                    .set_body_json(serde_json::json!({ "message": "Email already registered" })),
            )
            .mount(&server)
            .await;

        let transport = transport_for(&server);
        let err = transport
            .send(transport.post("/register"))
            .await
            .expect_err("409 must fail");

        assert_eq!(
            err,
            ApiError::Business {
                status: 409,
                message: Some("Email already registered".to_owned()),
            }
        );
    }

    #[tokio::test]
    async fn test_server_error_is_transient() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let transport = transport_for(&server);
        let err = transport
            .send(transport.get("/api/Admin/users"))
            .await
            .expect_err("502 must fail");

        assert!(matches!(err, ApiError::Transient { message: None, .. }));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transient() {
        let transport = Transport::new(
            BusinessConfig::new("http://127.0.0.1:1"),
            TokenStore::in_memory(),
        );

        let err = transport
            .send(transport.get("/login"))
            .await
            .expect_err("connection must fail");

        assert!(matches!(err, ApiError::Transient { .. }));
    }
}
