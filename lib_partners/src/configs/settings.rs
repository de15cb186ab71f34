use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One upstream listing endpoint, relative to the directory base URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointSettings {
    /// Path joined onto the base URL, e.g. `en/partners/.../1716790338234.ajax`.
    pub path: String,
    /// Value sent as the `sorter` query parameter.
    pub sorter: String,
}

/// # Pipeline Settings
///
/// Everything the refresh pipeline needs to know. Constructed by the binaries; the
/// library never reads the environment itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineSettings {
    /// Absolute base URL shared by both listing endpoints.
    pub base_url: String,
    pub partners: EndpointSettings,
    pub solutions: EndpointSettings,
    /// Records requested per batch.
    pub batch_size: usize,
    /// Upper bound on in-flight batch requests per endpoint.
    pub max_concurrent_batches: usize,
    /// End-to-end budget for one endpoint's probe plus all of its batches.
    pub fetch_timeout_seconds: u64,
    pub connect_timeout_seconds: u64,
    pub response_timeout_seconds: u64,
    /// Six-field cron expression (with seconds) for the periodic refresh.
    pub refresh_cron: String,
    /// Whether a refresh that joined zero partners may replace the cache.
    pub publish_empty_results: bool,
    /// Largest upstream `total` taken at face value; anything above means no data.
    pub max_total: u64,
    /// Largest upstream response body accepted, in bytes.
    pub max_body_bytes: usize,
}

/// Ceiling on the record count a listing may report.
pub const DEFAULT_MAX_TOTAL: u64 = 1_000_000;
/// Upstream bodies above this size are rejected.
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            base_url: "https://www.opentext.com/".to_string(),
            partners: EndpointSettings {
                path: "en/partners/partners-directory-overview/1716790338234.ajax".to_string(),
                sorter: "Default_Sort".to_string(),
            },
            solutions: EndpointSettings {
                path: "en/partners/ApplicationMarketplace/1754971906819.ajax".to_string(),
                sorter: "Name".to_string(),
            },
            batch_size: 200,
            max_concurrent_batches: 8,
            fetch_timeout_seconds: 50,
            connect_timeout_seconds: 10,
            response_timeout_seconds: 30,
            refresh_cron: "0 */3 * * * *".to_string(),
            publish_empty_results: true,
            max_total: DEFAULT_MAX_TOTAL,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl PipelineSettings {
    /// Batch size clamped to at least one record.
    pub fn effective_batch_size(&self) -> usize {
        self.batch_size.max(1)
    }

    /// Concurrency cap clamped to at least one request.
    pub fn effective_concurrency(&self) -> usize {
        self.max_concurrent_batches.max(1)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_seconds)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }

    pub fn response_timeout(&self) -> Duration {
        Duration::from_secs(self.response_timeout_seconds)
    }
}
