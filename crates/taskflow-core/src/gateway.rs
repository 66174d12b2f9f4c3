//! Authorized transport and response normalization.
//!
//! Every feature call reaches the remote API through [`ApiClient`], which is
//! the single place authorization headers are attached and HTTP/transport
//! failures are classified. Feature clients never inspect status codes.

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ApiError, ApiResult};
use crate::session::SharedSession;

/// HTTP client bound to one API base URL and the shared session state.
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    session: SharedSession,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, session: SharedSession) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
            session,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the header set for a request.
    ///
    /// Always declares a JSON content type; carries a bearer authorization
    /// header only when the current session holds a token. Pure read of
    /// session state.
    pub fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = self.session.token() {
            match HeaderValue::from_str(&format!("Bearer {token}")) {
                Ok(value) => {
                    headers.insert(AUTHORIZATION, value);
                }
                Err(_) => {
                    tracing::warn!("stored token is not a valid header value; sending anonymous");
                }
            }
        }

        headers
    }

    async fn request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> ApiResult<reqwest::Response> {
        let url = format!("{}{path}", self.base_url);
        tracing::debug!(%method, %path, "api request");

        let mut builder = self
            .http
            .request(method, &url)
            .headers(self.auth_headers());
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| ApiError::transport(&e))?;
        tracing::debug!(status = %response.status(), %path, "api response");
        Ok(response)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let response = self.request::<()>(Method::GET, path, None).await?;
        normalize(response).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let response = self.request(Method::POST, path, Some(body)).await?;
        normalize(response).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let response = self.request(Method::PUT, path, Some(body)).await?;
        normalize(response).await
    }

    /// PUT with no body, for endpoints driven entirely by query parameters.
    pub async fn put_empty<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let response = self.request::<()>(Method::PUT, path, None).await?;
        normalize(response).await
    }

    /// PATCH with no body, for endpoints driven entirely by query parameters.
    pub async fn patch_empty<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let response = self.request::<()>(Method::PATCH, path, None).await?;
        normalize(response).await
    }

    pub async fn delete(&self, path: &str) -> ApiResult<()> {
        let response = self.request::<()>(Method::DELETE, path, None).await?;
        normalize_unit(response).await
    }
}

/// Reads the response status and decoded body, or the classified error.
///
/// An undecodable body is itself a contract violation and surfaces as a parse
/// error naming the status text.
async fn decode_body(response: reqwest::Response) -> ApiResult<(reqwest::StatusCode, Value)> {
    let status = response.status();
    let status_text = status.canonical_reason().unwrap_or("Unknown Status");

    let bytes = response.bytes().await.map_err(|e| ApiError::transport(&e))?;
    let body: Value = serde_json::from_slice(&bytes)
        .map_err(|_| ApiError::parse(format!("Failed to parse response: {status_text}")))?;

    if status.is_success() {
        Ok((status, body))
    } else {
        Err(ApiError::http_status(status.as_u16(), status_text, &body))
    }
}

/// Normalizes a raw response into a decoded payload.
///
/// The remote API is not consistent about enveloping payloads in `{data: ...}`.
/// When the body carries a `data` field, that level is decoded first, falling
/// back to the whole body so responses whose own contract has a `data` field
/// (e.g. paginated pages) stay intact.
pub async fn normalize<T: DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
    let (_, body) = decode_body(response).await?;

    if let Some(data) = body.get("data") {
        if let Ok(decoded) = serde_json::from_value::<T>(data.clone()) {
            return Ok(decoded);
        }
    }

    serde_json::from_value(body)
        .map_err(|e| ApiError::parse(format!("Failed to decode response body: {e}")))
}

/// Normalizes a response whose payload is irrelevant (delete endpoints).
///
/// Errors are classified exactly as in [`normalize`]; any 2xx succeeds even
/// when the body is empty or not JSON.
pub async fn normalize_unit(response: reqwest::Response) -> ApiResult<()> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }

    let status_text = status.canonical_reason().unwrap_or("Unknown Status");
    let bytes = response.bytes().await.map_err(|e| ApiError::transport(&e))?;
    let body: Value = serde_json::from_slice(&bytes)
        .map_err(|_| ApiError::parse(format!("Failed to parse response: {status_text}")))?;

    Err(ApiError::http_status(status.as_u16(), status_text, &body))
}
