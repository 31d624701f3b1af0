//! HTTP request descriptors for the YouTube client.
//!
//! This module provides the [`HttpRequest`] type and its builder. A request
//! descriptor is immutable once built: every retry attempt rebuilds the
//! outgoing request (URL, headers and body) from the same descriptor.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use bytes::Bytes;

use crate::auth::Authenticator;
use crate::clients::errors::InvalidHttpRequestError;
use crate::config::{ApiKey, DEFAULT_API_HOST};

/// HTTP methods used by the YouTube Data API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    /// HTTP GET method for reading resources.
    Get,
    /// HTTP POST method for inserting resources and actions such as rating.
    Post,
    /// HTTP PUT method for replacing resources.
    Put,
    /// HTTP PATCH method for partial updates.
    Patch,
    /// HTTP DELETE method for removing resources.
    Delete,
}

impl HttpMethod {
    /// Returns the method name as sent on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    pub(crate) const fn as_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Patch => reqwest::Method::PATCH,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A query parameter value: a scalar or a list joined with commas.
///
/// ```rust
/// use yt::clients::QueryValue;
///
/// assert_eq!(QueryValue::from(vec!["snippet", "status"]).to_param(), "snippet,status");
/// assert_eq!(QueryValue::from(50_u32).to_param(), "50");
/// assert_eq!(QueryValue::from(true).to_param(), "true");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryValue {
    /// A single value.
    Scalar(String),
    /// Several values, serialized as a comma-separated list.
    List(Vec<String>),
}

impl QueryValue {
    /// Returns the value as serialized into the query string.
    #[must_use]
    pub fn to_param(&self) -> String {
        match self {
            Self::Scalar(value) => value.clone(),
            Self::List(values) => values.join(","),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::Scalar(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::Scalar(value)
    }
}

impl From<&String> for QueryValue {
    fn from(value: &String) -> Self {
        Self::Scalar(value.clone())
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        Self::Scalar(value.to_string())
    }
}

impl From<u32> for QueryValue {
    fn from(value: u32) -> Self {
        Self::Scalar(value.to_string())
    }
}

impl From<u64> for QueryValue {
    fn from(value: u64) -> Self {
        Self::Scalar(value.to_string())
    }
}

impl From<Vec<&str>> for QueryValue {
    fn from(values: Vec<&str>) -> Self {
        Self::List(values.into_iter().map(String::from).collect())
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(values: Vec<String>) -> Self {
        Self::List(values)
    }
}

impl<const N: usize> From<[&str; N]> for QueryValue {
    fn from(values: [&str; N]) -> Self {
        Self::List(values.iter().map(|v| (*v).to_string()).collect())
    }
}

/// Request body, in exactly one encoding.
#[derive(Clone, Debug, PartialEq)]
pub enum RequestBody {
    /// A JSON document (`application/json`).
    Json(serde_json::Value),
    /// URL-encoded form pairs (`application/x-www-form-urlencoded`).
    Form(Vec<(String, String)>),
    /// Raw bytes sent with an explicit `Content-Length`.
    Stream {
        /// The bytes to upload.
        data: Bytes,
        /// The MIME type of the bytes.
        content_type: String,
    },
}

impl RequestBody {
    /// Returns the `Content-Type` header value for this body.
    #[must_use]
    pub fn content_type(&self) -> &str {
        match self {
            Self::Json(_) => "application/json",
            Self::Form(_) => "application/x-www-form-urlencoded",
            Self::Stream { content_type, .. } => content_type,
        }
    }
}

/// How the response body is decoded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResponseFormat {
    /// Decode as JSON.
    #[default]
    Json,
    /// Decode XML into a JSON-like mapping.
    Xml,
    /// Keep the body as a string.
    Text,
}

/// The status class a request must receive to count as successful.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExpectedResponse {
    /// Any 2xx status.
    #[default]
    Success,
    /// Exactly 200.
    Ok,
    /// Exactly 201.
    Created,
    /// Exactly 204.
    NoContent,
}

impl ExpectedResponse {
    /// Returns `true` if `code` satisfies this expectation.
    #[must_use]
    pub const fn matches(self, code: u16) -> bool {
        match self {
            Self::Success => code >= 200 && code < 300,
            Self::Ok => code == 200,
            Self::Created => code == 201,
            Self::NoContent => code == 204,
        }
    }
}

/// Converts a parameter name to the lower-camel-case form the API expects.
///
/// ```rust
/// use yt::clients::camelize_key;
///
/// assert_eq!(camelize_key("max_results"), "maxResults");
/// assert_eq!(camelize_key("MaxResults"), "maxResults");
/// assert_eq!(camelize_key("onBehalfOfContentOwner"), "onBehalfOfContentOwner");
/// ```
#[must_use]
pub fn camelize_key(key: &str) -> String {
    let mut camelized = String::with_capacity(key.len());
    for (index, segment) in key.split('_').filter(|s| !s.is_empty()).enumerate() {
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            if index == 0 {
                camelized.extend(first.to_lowercase());
            } else {
                camelized.extend(first.to_uppercase());
            }
            camelized.push_str(chars.as_str());
        }
    }
    camelized
}

/// A request to be sent to the YouTube API.
///
/// Use [`HttpRequest::builder`] to construct requests.
///
/// # Example
///
/// ```rust
/// use yt::clients::{HttpRequest, HttpMethod, ExpectedResponse};
///
/// let request = HttpRequest::builder(HttpMethod::Get, "/youtube/v3/videos")
///     .query_param("part", vec!["snippet", "statistics"])
///     .query_param("max_results", 50_u32)
///     .build()
///     .unwrap();
///
/// assert_eq!(request.expected_response, ExpectedResponse::Success);
/// assert!(request.query.contains_key("maxResults"));
/// ```
#[derive(Clone, Debug)]
pub struct HttpRequest {
    /// The HTTP method for this request.
    pub http_method: HttpMethod,
    /// Scheme and authority, e.g. `https://www.googleapis.com`.
    pub host: String,
    /// Absolute path, e.g. `/youtube/v3/videos`.
    pub path: String,
    /// Query parameters, keyed by their wire name.
    pub query: BTreeMap<String, QueryValue>,
    /// The request body, if any.
    pub body: Option<RequestBody>,
    /// Additional headers to include in the request.
    pub headers: BTreeMap<String, String>,
    /// The status class that counts as success.
    pub expected_response: ExpectedResponse,
    /// How to decode the response body.
    pub response_format: ResponseFormat,
    /// Supplies the bearer token, if the request is authenticated.
    pub auth: Option<Arc<dyn Authenticator>>,
    /// Sent as the `key` query parameter, if present.
    pub api_key: Option<ApiKey>,
}

impl HttpRequest {
    /// Creates a new builder for constructing an `HttpRequest`.
    #[must_use]
    pub fn builder(method: HttpMethod, path: impl Into<String>) -> HttpRequestBuilder {
        HttpRequestBuilder::new(method, path)
    }

    /// Validates the request.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if:
    /// - the host has no scheme or is empty
    /// - a GET or DELETE request carries a body
    pub fn verify(&self) -> Result<(), InvalidHttpRequestError> {
        if self.host.is_empty() || !self.host.contains("://") {
            return Err(InvalidHttpRequestError::InvalidHost {
                host: self.host.clone(),
            });
        }

        if matches!(self.http_method, HttpMethod::Get | HttpMethod::Delete) && self.body.is_some()
        {
            return Err(InvalidHttpRequestError::BodyNotAllowed {
                method: self.http_method.to_string(),
            });
        }

        Ok(())
    }

    /// Returns a copy of this request with one more query parameter.
    ///
    /// The key is used verbatim.
    #[must_use]
    pub fn with_query(&self, key: &str, value: impl Into<QueryValue>) -> Self {
        let mut request = self.clone();
        request.query.insert(key.to_string(), value.into());
        request
    }

    /// Returns the query pairs as sent on the wire, including the API key.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self
            .query
            .iter()
            .map(|(key, value)| (key.clone(), value.to_param()))
            .collect();
        if let Some(key) = &self.api_key {
            pairs.push(("key".to_string(), key.as_ref().to_string()));
        }
        pairs
    }

    /// Builds the full URL for this request.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError::InvalidUrl`] if the host and path do
    /// not form a valid URL.
    pub fn url(&self) -> Result<reqwest::Url, InvalidHttpRequestError> {
        let raw = format!("{}{}", self.host, self.path);
        let mut url = reqwest::Url::parse(&raw)
            .map_err(|_| InvalidHttpRequestError::InvalidUrl { url: raw.clone() })?;

        let pairs = self.query_pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(url)
    }

    /// Reconstructs a curl command equivalent to this request.
    ///
    /// The command includes the bearer token and the API key, so it must only
    /// be shown when debugging is enabled.
    #[must_use]
    pub fn to_curl(&self, access_token: Option<&str>) -> String {
        let url = self
            .url()
            .map_or_else(|_| format!("{}{}", self.host, self.path), String::from);

        let mut command = format!("curl -X {}", self.http_method);
        if let Some(token) = access_token {
            command.push_str(&format!(" -H \"Authorization: Bearer {token}\""));
        }
        for (name, value) in &self.headers {
            command.push_str(&format!(" -H \"{name}: {value}\""));
        }
        if let Some(body) = &self.body {
            command.push_str(&format!(" -H \"Content-Type: {}\"", body.content_type()));
            match body {
                RequestBody::Json(value) => {
                    command.push_str(&format!(" -d '{value}'"));
                }
                RequestBody::Form(pairs) => {
                    let encoded: Vec<String> = pairs
                        .iter()
                        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
                        .collect();
                    command.push_str(&format!(" -d '{}'", encoded.join("&")));
                }
                RequestBody::Stream { data, .. } => {
                    command.push_str(&format!(" --data-binary '<{} bytes>'", data.len()));
                }
            }
        }
        command.push_str(&format!(" \"{url}\""));
        command
    }
}

/// Builder for constructing [`HttpRequest`] instances.
#[derive(Debug)]
pub struct HttpRequestBuilder {
    request: HttpRequest,
}

impl HttpRequestBuilder {
    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        let path = path.into();
        let path = if path.starts_with('/') {
            path
        } else {
            format!("/{path}")
        };

        Self {
            request: HttpRequest {
                http_method: method,
                host: DEFAULT_API_HOST.to_string(),
                path,
                query: BTreeMap::new(),
                body: None,
                headers: BTreeMap::new(),
                expected_response: ExpectedResponse::default(),
                response_format: ResponseFormat::default(),
                auth: None,
                api_key: None,
            },
        }
    }

    /// Sets the scheme and authority, e.g. `https://accounts.google.com`.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.request.host = host.into().trim_end_matches('/').to_string();
        self
    }

    /// Adds a query parameter, normalizing its name to lower camel case.
    ///
    /// A later parameter with the same normalized name replaces an earlier one.
    #[must_use]
    pub fn query_param(mut self, key: &str, value: impl Into<QueryValue>) -> Self {
        self.request.query.insert(camelize_key(key), value.into());
        self
    }

    /// Adds several query parameters, normalizing their names.
    #[must_use]
    pub fn query_params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<QueryValue>,
    {
        for (key, value) in params {
            self.request
                .query
                .insert(camelize_key(key.as_ref()), value.into());
        }
        self
    }

    /// Adds a query parameter whose name is used verbatim.
    #[must_use]
    pub fn raw_query_param(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.request.query.insert(key.into(), value.into());
        self
    }

    /// Sets a JSON body.
    #[must_use]
    pub fn json_body(mut self, body: impl Into<serde_json::Value>) -> Self {
        self.request.body = Some(RequestBody::Json(body.into()));
        self
    }

    /// Sets a URL-encoded form body.
    #[must_use]
    pub fn form_body<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let pairs = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.request.body = Some(RequestBody::Form(pairs));
        self
    }

    /// Sets a raw byte body.
    #[must_use]
    pub fn stream_body(mut self, data: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        self.request.body = Some(RequestBody::Stream {
            data: data.into(),
            content_type: content_type.into(),
        });
        self
    }

    /// Adds a single header.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.headers.insert(key.into(), value.into());
        self
    }

    /// Sets the status class that counts as success.
    #[must_use]
    pub const fn expected_response(mut self, expected: ExpectedResponse) -> Self {
        self.request.expected_response = expected;
        self
    }

    /// Sets how the response body is decoded.
    #[must_use]
    pub const fn response_format(mut self, format: ResponseFormat) -> Self {
        self.request.response_format = format;
        self
    }

    /// Authenticates the request with a bearer token from `auth`.
    #[must_use]
    pub fn auth(mut self, auth: Option<Arc<dyn Authenticator>>) -> Self {
        self.request.auth = auth;
        self
    }

    /// Sends `key` as the `key` query parameter.
    #[must_use]
    pub fn api_key(mut self, key: Option<ApiKey>) -> Self {
        self.request.api_key = key;
        self
    }

    /// Builds the [`HttpRequest`], validating it in the process.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if the request fails validation.
    pub fn build(self) -> Result<HttpRequest, InvalidHttpRequestError> {
        self.request.verify()?;
        Ok(self.request)
    }
}
