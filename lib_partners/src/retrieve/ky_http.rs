//! # HTTP Retrieval Utilities
//!
//! An asynchronous API client wrapper around `reqwest` with a fixed base URL,
//! default headers, connect/response timeouts and a ceiling on body size. Upstream listings are read-only,
//! so only `GET` with query parameters is exposed. There is no retry
//! layer: a failed call is reported once and the caller decides what to do.

use super::error::FetchError;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::time::Duration;

const DEFAULT_USER_AGENT: &str = "PartnerDirectory-Service";

/// A standardized container for API responses.
///
/// Wraps the deserialized data along with the HTTP status of the transaction.
#[derive(Debug)]
pub struct ApiResponse<T> {
    /// The successfully deserialized response body, if any.
    pub data: Option<T>,
    /// The raw error body returned by the server if the request failed.
    pub error_body: Option<String>,
    /// The numeric HTTP status code.
    pub status: u16,
    /// Indicates if the status code was in the 2xx range.
    pub success: bool,
    /// The absolute URL that was requested, for logging.
    pub url: String,
}

/// A shared asynchronous HTTP client bound to one base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// The underlying client; cloning shares its connection pool.
    inner: reqwest::Client,
    /// The base URL to which all relative paths are joined.
    base_url: Url,
    /// Bodies longer than this are abandoned with `FetchError::TooLarge`.
    max_body_bytes: usize,
}

impl ApiClient {
    /// Creates a new `ApiClient`.
    ///
    /// # Arguments
    /// * `base_url` - Absolute base URL, e.g. `https://www.opentext.com/`.
    /// * `connect_timeout` - Budget for establishing a connection.
    /// * `response_timeout` - Budget for one whole request/response.
    /// * `max_body_bytes` - Largest response body read into memory.
    ///
    /// # Errors
    /// Fails if `base_url` is not an absolute URL or the TLS backend cannot start.
    pub fn new(
        base_url: &str,
        connect_timeout: Duration,
        response_timeout: Duration,
        max_body_bytes: usize,
    ) -> Result<Self, FetchError> {
        let url = Url::parse(base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let inner = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(connect_timeout)
            .timeout(response_timeout)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            inner,
            base_url: url,
            max_body_bytes,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Performs a `GET` against `path` (relative to the base URL) and decodes a
    /// JSON body on success.
    ///
    /// Non-2xx answers are not errors here; they come back with `success == false`
    /// and the raw body captured for debugging.
    ///
    /// # Errors
    /// URL joining, transport failures, oversized bodies and undecodable 2xx bodies.
    pub async fn get_json<T>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<ApiResponse<T>, FetchError>
    where
        T: DeserializeOwned,
    {
        let mut full_url = self.base_url.join(path)?;
        if !query.is_empty() {
            full_url
                .query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        let url_text = full_url.to_string();

        let response = self
            .inner
            .get(full_url)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url_text.clone(),
                source,
            })?;
        let status = response.status();

        if status.is_success() {
            let body = self.read_body(response, &url_text).await?;
            let data = serde_json::from_slice::<T>(&body).map_err(|source| FetchError::Decode {
                url: url_text.clone(),
                source,
            })?;
            Ok(ApiResponse {
                data: Some(data),
                error_body: None,
                status: status.as_u16(),
                success: true,
                url: url_text,
            })
        } else {
            let error_text = self
                .read_body(response, &url_text)
                .await
                .ok()
                .map(|body| String::from_utf8_lossy(&body).into_owned());
            Ok(ApiResponse {
                data: None,
                error_body: error_text,
                status: status.as_u16(),
                success: false,
                url: url_text,
            })
        }
    }

    /// Reads the body chunk by chunk, giving up as soon as it passes `max_body_bytes`.
    async fn read_body(
        &self,
        mut response: reqwest::Response,
        url: &str,
    ) -> Result<Vec<u8>, FetchError> {
        let limit = self.max_body_bytes;
        let too_large = || FetchError::TooLarge {
            url: url.to_string(),
            limit,
        };

        if response
            .content_length()
            .is_some_and(|declared| declared > limit as u64)
        {
            return Err(too_large());
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })? {
            if body.len() + chunk.len() > limit {
                return Err(too_large());
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }
}
