use crate::domain::session::SessionStore;
use crate::shared::config::{ClientConfig, ensure_trailing_slash};
use crate::shared::error::{AppError, ErrorEnvelope};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Method, StatusCode, Url};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// JSON transport shared by every resource repository.
///
/// Attaches the bearer token from the session store to each request. A 401
/// comes back as [`AppError::Unauthorized`]; tearing the session down is left
/// to [`crate::application::session::SessionGuard`].
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    session: Arc<dyn SessionStore>,
}

impl ApiClient {
    pub fn new(
        mut base_url: Url,
        timeout: Duration,
        session: Arc<dyn SessionStore>,
    ) -> Result<Self, AppError> {
        ensure_trailing_slash(&mut base_url);
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    pub fn from_config(
        config: &ClientConfig,
        session: Arc<dyn SessionStore>,
    ) -> Result<Self, AppError> {
        Self::new(config.api_url.clone(), config.request_timeout, session)
    }

    /// GET `path` and parse the body as JSON.
    pub async fn get(&self, path: &str) -> Result<Value, AppError> {
        let bytes = self.send::<()>(Method::GET, path, None).await?;
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// GET a list endpoint. A success body that is not JSON reads as `null`,
    /// which the list envelope turns into an empty collection.
    pub async fn get_list(&self, path: &str) -> Result<Value, AppError> {
        let bytes = self.send::<()>(Method::GET, path, None).await?;
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes).unwrap_or_else(|e| {
            tracing::warn!(path, error = %e, "list response is not JSON, treating as empty");
            Value::Null
        }))
    }

    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, AppError> {
        let bytes = self.send(Method::POST, path, Some(body)).await?;
        Ok(parse_write_response(&bytes))
    }

    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, AppError> {
        let bytes = self.send(Method::PUT, path, Some(body)).await?;
        Ok(parse_write_response(&bytes))
    }

    pub async fn delete(&self, path: &str) -> Result<Value, AppError> {
        let bytes = self.send::<()>(Method::DELETE, path, None).await?;
        Ok(parse_write_response(&bytes))
    }

    fn url(&self, path: &str) -> Result<Url, AppError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| AppError::Config(format!("invalid request path {path:?}: {e}")))
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Vec<u8>, AppError> {
        let url = self.url(path)?;
        tracing::debug!(%method, %url, "sending request");

        let mut request = self
            .http
            .request(method.clone(), url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json");

        if let Some(token) = self.session.token() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?.to_vec();

        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!(%method, path, "request rejected as unauthorized");
            return Err(AppError::Unauthorized);
        }

        if !status.is_success() {
            let body = serde_json::from_slice::<ErrorEnvelope>(&bytes).ok();
            tracing::debug!(%method, path, status = status.as_u16(), ?body, "request failed");
            return Err(AppError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(bytes)
    }
}

/// Write responses are server-defined; a body that is not JSON is not a
/// failure once the status said the write went through.
fn parse_write_response(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(bytes).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "write response is not JSON, ignoring body");
        Value::Null
    })
}
