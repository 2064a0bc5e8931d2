//! Outbound ports
//!
//! The service layer talks to the platform backend through
//! [`ApiGateway`]; the production implementation lives in
//! `infrastructure::http`, and tests substitute an in-memory fake.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::error::ApiResult;

/// One file attached to a multipart request.
#[derive(Debug, Clone)]
pub struct FilePart {
    /// Form field name
    pub name: String,
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// A multipart form: text fields plus file parts.
#[derive(Debug, Clone, Default)]
pub struct MultipartForm {
    pub texts: Vec<(String, String)>,
    pub files: Vec<FilePart>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.texts.push((name.into(), value.into()));
        self
    }

    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        mime: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        self.files.push(FilePart {
            name: name.into(),
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
        });
        self
    }
}

/// Read access to the signed-in identity, implemented by the session
/// store. Services consult it before calling the backend so that an
/// unauthenticated terminal fails fast instead of issuing doomed
/// requests.
pub trait SessionContext: Send + Sync {
    fn is_authenticated(&self) -> bool;

    /// Display name of the signed-in staff member.
    fn staff_name(&self) -> Option<String>;
}

/// Verb-level access to the platform REST backend.
///
/// Bodies and responses are JSON values; typed decoding happens in the
/// service layer via [`crate::shared::wire`]. Implementations attach
/// authentication and map HTTP failures to [`crate::domain::ApiError`].
#[async_trait]
pub trait ApiGateway: Send + Sync {
    async fn get(&self, path: &str) -> ApiResult<Value>;

    async fn post(&self, path: &str, body: Value) -> ApiResult<Value>;

    async fn put(&self, path: &str, body: Value) -> ApiResult<Value>;

    async fn patch(&self, path: &str, body: Value) -> ApiResult<Value>;

    /// DELETE with an optional body (cancel endpoints carry a reason).
    async fn delete(&self, path: &str, body: Option<Value>) -> ApiResult<Value>;

    async fn post_multipart(&self, path: &str, form: MultipartForm) -> ApiResult<Value>;
}
