use super::error::FetchError;
use super::ky_http::ApiClient;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// # Page Source
///
/// One paginated upstream listing. Implementations return the raw JSON envelope
/// for records `[start, start + max)`; interpreting it is the caller's job.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Short label for log lines, e.g. `"partners"`.
    fn name(&self) -> &str;

    async fn fetch_page(&self, start: u64, max: u64) -> Result<Value, FetchError>;
}

/// `PageSource` backed by an upstream `.ajax` listing endpoint.
#[derive(Debug, Clone)]
pub struct HttpPageSource {
    client: Arc<ApiClient>,
    name: String,
    path: String,
    sorter: String,
}

impl HttpPageSource {
    pub fn new(
        client: Arc<ApiClient>,
        name: impl Into<String>,
        path: impl Into<String>,
        sorter: impl Into<String>,
    ) -> Self {
        Self {
            client,
            name: name.into(),
            path: path.into(),
            sorter: sorter.into(),
        }
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_page(&self, start: u64, max: u64) -> Result<Value, FetchError> {
        let query = [
            ("q", String::new()),
            ("start", start.to_string()),
            ("max", max.to_string()),
            ("sorter", self.sorter.clone()),
        ];
        let response = self.client.get_json::<Value>(&self.path, &query).await?;
        debug!(source = %self.name, start, max, status = response.status, "page fetched");

        match response.data {
            Some(body) if response.success => Ok(body),
            _ => Err(FetchError::Status {
                url: response.url,
                status: response.status,
                body: response.error_body,
            }),
        }
    }
}
