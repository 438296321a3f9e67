use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::error::{HttpError, HttpResult};

/// Request client configured with the headers computed for one invocation.
///
/// Built fresh for every run and dropped when the run ends, which closes
/// its pooled connections.
#[derive(Debug, Clone)]
pub struct HttpClient {
    http: Client,
    headers: BTreeMap<String, String>,
}

/// Response with its body decoded as JSON
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Response status
    pub status: StatusCode,
    /// Final request URL
    pub url: String,
    /// Response headers (lower-case names)
    pub headers: BTreeMap<String, String>,
    /// Decoded body; non-JSON payloads become a JSON string, empty ones `null`
    pub body: Value,
}

impl HttpClient {
    /// Create a client sending `headers` with every request
    pub fn new(headers: &BTreeMap<String, String>) -> HttpResult<Self> {
        Self::with_timeout(headers, None)
    }

    /// Create a client with an optional per-request timeout
    pub fn with_timeout(
        headers: &BTreeMap<String, String>,
        timeout: Option<Duration>,
    ) -> HttpResult<Self> {
        let mut builder = Client::builder().default_headers(build_header_map(headers)?);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;
        Ok(Self {
            http,
            headers: headers.clone(),
        })
    }

    /// Headers sent with every request
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Look up a configured header, ignoring case
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Send a GET request
    pub async fn get(&self, url: &str) -> HttpResult<HttpResponse> {
        self.request(Method::GET, url, None).await
    }

    /// Send a DELETE request
    pub async fn delete(&self, url: &str) -> HttpResult<HttpResponse> {
        self.request(Method::DELETE, url, None).await
    }

    /// Send a POST request with a JSON body
    pub async fn post<B: Serialize + ?Sized>(&self, url: &str, body: &B) -> HttpResult<HttpResponse> {
        let body = serde_json::to_value(body)?;
        self.request(Method::POST, url, Some(&body)).await
    }

    /// Send a PUT request with a JSON body
    pub async fn put<B: Serialize + ?Sized>(&self, url: &str, body: &B) -> HttpResult<HttpResponse> {
        let body = serde_json::to_value(body)?;
        self.request(Method::PUT, url, Some(&body)).await
    }

    /// Send a PATCH request with a JSON body
    pub async fn patch<B: Serialize + ?Sized>(&self, url: &str, body: &B) -> HttpResult<HttpResponse> {
        let body = serde_json::to_value(body)?;
        self.request(Method::PATCH, url, Some(&body)).await
    }

    /// Send a request with an optional JSON body
    pub async fn request(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> HttpResult<HttpResponse> {
        tracing::debug!(%method, url, "sending request");

        let mut request = self.http.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let url = response.url().to_string();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let bytes = response.bytes().await?;

        tracing::debug!(status = status.as_u16(), url = %url, "received response");

        Ok(HttpResponse {
            status,
            url,
            headers,
            body: decode_body(&bytes),
        })
    }
}

impl HttpResponse {
    /// Whether the status is 2xx
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// The decoded body
    pub fn json(&self) -> &Value {
        &self.body
    }

    /// Deserialize the body into `T`
    pub fn json_as<T: DeserializeOwned>(&self) -> HttpResult<T> {
        Ok(serde_json::from_value(self.body.clone())?)
    }

    /// Turn 4xx/5xx responses into `HttpError::Status`
    pub fn error_for_status(self) -> HttpResult<Self> {
        if self.status.is_client_error() || self.status.is_server_error() {
            return Err(HttpError::Status {
                status: self.status,
                url: self.url,
                body: self.body,
            });
        }
        Ok(self)
    }
}

fn build_header_map(headers: &BTreeMap<String, String>) -> HttpResult<HeaderMap> {
    let mut out = HeaderMap::new();
    for (key, value) in headers {
        let name = HeaderName::from_bytes(key.as_bytes()).map_err(|e| HttpError::InvalidHeader {
            name: key.clone(),
            reason: e.to_string(),
        })?;
        let value = HeaderValue::from_str(value).map_err(|e| HttpError::InvalidHeader {
            name: key.clone(),
            reason: e.to_string(),
        })?;
        out.insert(name, value);
    }
    Ok(out)
}

fn decode_body(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}
