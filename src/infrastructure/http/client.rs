//! HTTP gateway to the platform backend
//!
//! Wraps reqwest with the crate's auth and error conventions: bearer
//! token from the session store, a correlation id per request, a fixed
//! timeout and no transport-level retry. A 401 clears the session and
//! broadcasts the expiry before the error is returned.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use uuid::Uuid;

use super::envelope::error_message;
use crate::config::AppConfig;
use crate::domain::error::{ApiError, ApiResult};
use crate::domain::ports::{ApiGateway, MultipartForm};
use crate::infrastructure::session::SessionStore;

#[derive(Clone)]
pub struct HttpApiGateway {
    http: Client,
    base_url: String,
    session: Arc<SessionStore>,
    cancel: CancellationToken,
}

impl HttpApiGateway {
    pub fn new(config: &AppConfig, session: Arc<SessionStore>) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.api.timeout_secs))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
            session,
            cancel: CancellationToken::new(),
        }
    }

    /// Clone bound to a view-scoped cancellation token. Cancelling the
    /// token aborts this clone's in-flight calls with
    /// [`ApiError::Cancelled`].
    pub fn with_scope(&self, cancel: CancellationToken) -> Self {
        Self {
            cancel,
            ..self.clone()
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn builder(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let request_id = Uuid::new_v4().to_string();
        debug!(%method, path, request_id, "API request");
        let mut builder = self
            .http
            .request(method, self.url(path))
            .header("x-request-id", request_id);
        if let Some(token) = self.session.token() {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn send(&self, builder: reqwest::RequestBuilder) -> ApiResult<Value> {
        let response = tokio::select! {
            _ = self.cancel.cancelled() => return Err(ApiError::Cancelled),
            result = builder.send() => result.map_err(transport_error)?,
        };
        self.handle(response).await
    }

    async fn handle(&self, response: reqwest::Response) -> ApiResult<Value> {
        let status = response.status();

        if status.is_success() {
            let text = response.text().await.map_err(transport_error)?;
            if text.is_empty() {
                return Ok(Value::Null);
            }
            return serde_json::from_str(&text)
                .map_err(|e| ApiError::InvalidResponse(e.to_string()));
        }

        let body = response.text().await.unwrap_or_default();
        let message = error_message(status.as_u16(), &body);
        warn!(status = status.as_u16(), %message, "API request failed");

        Err(match status {
            StatusCode::UNAUTHORIZED => {
                // Session is gone; the shell hears about it on the
                // watch channel and routes to sign-in.
                self.session.expire();
                ApiError::AuthExpired
            }
            StatusCode::FORBIDDEN => ApiError::Forbidden(message),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                ApiError::ValidationRejected(message)
            }
            StatusCode::NOT_FOUND => ApiError::NotFound(message),
            StatusCode::CONFLICT => ApiError::Conflict(message),
            _ => ApiError::NetworkOrServer(message),
        })
    }
}

fn transport_error(error: reqwest::Error) -> ApiError {
    if error.is_timeout() {
        ApiError::NetworkOrServer("request timed out".to_string())
    } else {
        ApiError::NetworkOrServer(error.to_string())
    }
}

#[async_trait]
impl ApiGateway for HttpApiGateway {
    async fn get(&self, path: &str) -> ApiResult<Value> {
        self.send(self.builder(Method::GET, path)).await
    }

    async fn post(&self, path: &str, body: Value) -> ApiResult<Value> {
        self.send(self.builder(Method::POST, path).json(&body)).await
    }

    async fn put(&self, path: &str, body: Value) -> ApiResult<Value> {
        self.send(self.builder(Method::PUT, path).json(&body)).await
    }

    async fn patch(&self, path: &str, body: Value) -> ApiResult<Value> {
        self.send(self.builder(Method::PATCH, path).json(&body)).await
    }

    async fn delete(&self, path: &str, body: Option<Value>) -> ApiResult<Value> {
        let mut builder = self.builder(Method::DELETE, path);
        if let Some(body) = body {
            builder = builder.json(&body);
        }
        self.send(builder).await
    }

    async fn post_multipart(&self, path: &str, form: MultipartForm) -> ApiResult<Value> {
        let mut multipart = Form::new();
        for (name, value) in form.texts {
            multipart = multipart.text(name, value);
        }
        for file in form.files {
            let part = match Part::bytes(file.bytes.clone())
                .file_name(file.file_name.clone())
                .mime_str(&file.mime)
            {
                Ok(part) => part,
                // Unknown mime: let the server sniff it
                Err(_) => Part::bytes(file.bytes).file_name(file.file_name),
            };
            multipart = multipart.part(file.name, part);
        }
        self.send(self.builder(Method::POST, path).multipart(multipart))
            .await
    }
}
