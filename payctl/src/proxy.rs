//! Outbound HTTP client for the payment backend.
//!
//! Every proxied request carries a token-style `Authorization` header built
//! from the caller's session cookie. When no session cookie is present the
//! header is the literal string `Token undefined`, which the backend
//! rejects with 401. Requests have no timeout and are never retried; a slow
//! backend surfaces as a slow gateway response.
//!
//! Failures (network errors, non-2xx statuses, unparseable bodies) become
//! [`Error::Upstream`] carrying a route-specific message. In the default
//! collapse mode that renders as `{"error": <message>}` with HTTP 500; with
//! `proxy.passthrough_status` enabled the backend's own status and body are
//! relayed instead.

use reqwest::{Client, Method, StatusCode};
use url::Url;

use crate::auth::session::SessionToken;
use crate::config::Config;
use crate::errors::{Error, Result};

/// Value sent when the request carried no session cookie. The backend sees
/// an invalid token and answers 401, the same as an expired session.
const TOKEN_ABSENT: &str = "Token undefined";

#[derive(Debug, Clone)]
pub struct ProxyClient {
    client: Client,
    base_url: Url,
    passthrough_status: bool,
}

impl ProxyClient {
    pub fn new(config: &Config) -> Self {
        Self {
            // reqwest applies no timeout unless one is configured, which is
            // exactly the contract here
            client: Client::new(),
            base_url: config.backend.base_url.clone(),
            passthrough_status: config.proxy.passthrough_status,
        }
    }

    /// Format the outbound Authorization header for a (possibly absent)
    /// session token.
    pub fn auth_header(token: Option<&SessionToken>) -> String {
        match token {
            Some(t) => format!("Token {}", t.as_str()),
            None => TOKEN_ABSENT.to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url.join(path).map_err(|e| Error::Internal {
            operation: format!("build backend URL for '{path}': {e}"),
        })
    }

    /// GET a backend resource, relaying its JSON body verbatim.
    pub async fn get(&self, path: &str, token: Option<&SessionToken>, failure_message: &str) -> Result<serde_json::Value> {
        self.send(Method::GET, path, Some(Self::auth_header(token)), None, failure_message)
            .await
    }

    /// POST a JSON body to the backend.
    pub async fn post(
        &self,
        path: &str,
        token: Option<&SessionToken>,
        body: &serde_json::Value,
        failure_message: &str,
    ) -> Result<serde_json::Value> {
        self.send(Method::POST, path, Some(Self::auth_header(token)), Some(body), failure_message)
            .await
    }

    /// POST a JSON body with no Authorization header at all. Used for the
    /// login exchange: the backend's token endpoint authenticates the
    /// credentials in the body, and a stray `Token undefined` header would
    /// make it reject the request before reading them.
    pub async fn post_anonymous(&self, path: &str, body: &serde_json::Value, failure_message: &str) -> Result<serde_json::Value> {
        self.send(Method::POST, path, None, Some(body), failure_message).await
    }

    /// POST with no body (logout, cancel and similar action endpoints).
    pub async fn post_empty(
        &self,
        path: &str,
        token: Option<&SessionToken>,
        failure_message: &str,
    ) -> Result<serde_json::Value> {
        self.send(Method::POST, path, Some(Self::auth_header(token)), None, failure_message)
            .await
    }

    /// PATCH a JSON body onto a backend resource.
    pub async fn patch(
        &self,
        path: &str,
        token: Option<&SessionToken>,
        body: &serde_json::Value,
        failure_message: &str,
    ) -> Result<serde_json::Value> {
        self.send(Method::PATCH, path, Some(Self::auth_header(token)), Some(body), failure_message)
            .await
    }

    /// DELETE a backend resource. A 204 with an empty body yields JSON null.
    pub async fn delete(&self, path: &str, token: Option<&SessionToken>, failure_message: &str) -> Result<serde_json::Value> {
        self.send(Method::DELETE, path, Some(Self::auth_header(token)), None, failure_message)
            .await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        auth_header: Option<String>,
        body: Option<&serde_json::Value>,
        failure_message: &str,
    ) -> Result<serde_json::Value> {
        let url = self.endpoint(path)?;

        let mut request = self
            .client
            .request(method.clone(), url)
            .header(reqwest::header::CONTENT_TYPE, "application/json");

        if let Some(auth) = auth_header {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            tracing::warn!("Backend request {method} {path} failed: {e}");
            Error::Upstream {
                message: failure_message.to_string(),
                status: None,
                body: None,
                passthrough: self.passthrough_status,
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let backend_body = response.text().await.unwrap_or_default();
            tracing::warn!("Backend returned {status} for {method} {path}");
            return Err(Error::Upstream {
                message: failure_message.to_string(),
                status: Some(StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)),
                body: (!backend_body.is_empty()).then_some(backend_body),
                passthrough: self.passthrough_status,
            });
        }

        // Action endpoints answer 204 with no body
        let bytes = response.bytes().await.map_err(|_| Error::Upstream {
            message: failure_message.to_string(),
            status: None,
            body: None,
            passthrough: self.passthrough_status,
        })?;

        if bytes.is_empty() {
            return Ok(serde_json::Value::Null);
        }

        serde_json::from_slice(&bytes).map_err(|e| {
            tracing::warn!("Backend returned unparseable JSON for {method} {path}: {e}");
            Error::Upstream {
                message: failure_message.to_string(),
                status: None,
                body: None,
                passthrough: self.passthrough_status,
            }
        })
    }
}
