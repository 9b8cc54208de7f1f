//! HTTP transport — the boundary every request crosses.
//!
//! [`HttpTransport`] is deliberately dumb: it sends, and hands back the
//! status and raw body. Interpreting the body is the envelope's job.

use async_trait::async_trait;
use bytes::Bytes;
use minion_core::{RawResponse, TransportError};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(m: Method) -> Self {
        match m {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Request payload.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(Value),
    /// Sent as `multipart/form-data`, like a browser `FormData`.
    Form(FormData),
}

/// Field/file pairs of a page form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormData {
    pub fields: Vec<(String, String)>,
    pub files: Vec<FilePart>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilePart {
    /// Form field name.
    pub name: String,
    pub file_name: String,
    pub bytes: Bytes,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn file(mut self, part: FilePart) -> Self {
        self.files.push(part);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn into_multipart(self) -> reqwest::multipart::Form {
        let mut form = reqwest::multipart::Form::new();
        for (name, value) in self.fields {
            form = form.text(name, value);
        }
        for file in self.files {
            let part = reqwest::multipart::Part::bytes(file.bytes.to_vec()).file_name(file.file_name);
            form = form.part(file.name, part);
        }
        form
    }
}

impl FilePart {
    pub fn new(name: impl Into<String>, file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }
}

/// Sends one request and returns whatever came back.
///
/// A non-2xx status is still `Ok`; only failures that produced no
/// response at all are `Err`.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(
        &self,
        url: &str,
        method: Method,
        body: Option<RequestBody>,
    ) -> Result<RawResponse, TransportError>;
}

/// [`HttpTransport`] backed by [`reqwest`].
#[derive(Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Reuse an existing client (connection pool, proxy settings...).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(
        &self,
        url: &str,
        method: Method,
        body: Option<RequestBody>,
    ) -> Result<RawResponse, TransportError> {
        let mut request = self.client.request(method.into(), url);
        match body {
            Some(RequestBody::Json(value)) => request = request.json(&value),
            Some(RequestBody::Form(form)) => request = request.multipart(form.into_multipart()),
            None => {}
        }

        let response = request
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        Ok(RawResponse::new(status, body))
    }
}
