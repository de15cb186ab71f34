use anyhow::{Context, Result};
use clap::Parser;
use lib_partners::configs::{EndpointSettings, PipelineSettings};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_FILE: &str = "server_partners.conf";
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

#[derive(Parser, Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[clap(about = "Partner directory REST server", version)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[clap(long, env = "PARTNERS_PORT", help = "Port to listen on for HTTP clients.")]
    pub port: Option<u16>,

    #[clap(long, env = "PARTNERS_CONFIG_PATH", help = "Path to the JSON configuration file.")]
    pub config_path: Option<PathBuf>,

    #[clap(long, env = "PARTNERS_LOG_DIR", help = "Directory for log files.")]
    pub log_dir: Option<PathBuf>,

    #[clap(long, env = "PARTNERS_LOG_LEVEL", help = "Logging level or filter directives (RUST_LOG wins).")]
    pub log_level: Option<String>,

    #[clap(long, env = "PARTNERS_BASE_URL", help = "Base URL shared by both upstream listings.")]
    pub base_url: Option<String>,

    #[clap(long, env = "PARTNERS_PARTNERS_PATH", help = "Partner listing path, relative to the base URL.")]
    pub partners_path: Option<String>,

    #[clap(long, env = "PARTNERS_PARTNERS_SORTER", help = "Sorter sent to the partner listing.")]
    pub partners_sorter: Option<String>,

    #[clap(long, env = "PARTNERS_SOLUTIONS_PATH", help = "Solution listing path, relative to the base URL.")]
    pub solutions_path: Option<String>,

    #[clap(long, env = "PARTNERS_SOLUTIONS_SORTER", help = "Sorter sent to the solution listing.")]
    pub solutions_sorter: Option<String>,

    #[clap(long, env = "PARTNERS_BATCH_SIZE", help = "Records requested per batch (0 is treated as 1).")]
    pub batch_size: Option<usize>,

    #[clap(long, env = "PARTNERS_MAX_CONCURRENT_BATCHES", help = "In-flight batch requests per listing (0 is treated as 1).")]
    pub max_concurrent_batches: Option<usize>,

    #[clap(long, env = "PARTNERS_FETCH_TIMEOUT_SECONDS", help = "End-to-end timeout for fetching one listing.")]
    pub fetch_timeout_seconds: Option<u64>,

    #[clap(long, env = "PARTNERS_CONNECT_TIMEOUT_SECONDS", help = "Upstream connect timeout.")]
    pub connect_timeout_seconds: Option<u64>,

    #[clap(long, env = "PARTNERS_RESPONSE_TIMEOUT_SECONDS", help = "Upstream per-request timeout.")]
    pub response_timeout_seconds: Option<u64>,

    #[clap(long, env = "PARTNERS_REFRESH_CRON", help = "Six-field cron expression for the periodic refresh.")]
    pub refresh_cron: Option<String>,

    #[clap(long, env = "PARTNERS_PUBLISH_EMPTY_RESULTS", help = "Publish a refresh that joined zero partners (true/false).")]
    pub publish_empty_results: Option<bool>,

    #[clap(long, env = "PARTNERS_MAX_TOTAL", help = "Largest upstream total accepted; above it a listing counts as empty.")]
    pub max_total: Option<u64>,

    #[clap(long, env = "PARTNERS_MAX_BODY_BYTES", help = "Largest upstream response body read into memory.")]
    pub max_body_bytes: Option<usize>,

    #[clap(long, env = "PARTNERS_CORS_ORIGIN", help = "Origin allowed to call the API from a browser.")]
    pub cors_origin: Option<String>,
}

/// Fully resolved settings for `server_partners`.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerSettings {
    pub port: u16,
    pub log_dir: PathBuf,
    pub log_level: String,
    pub cors_origin: String,
    pub pipeline: PipelineSettings,
}

impl Config {
    // Merge two Config structs, where 'other' overrides 'self' for Some values
    fn merge(self, other: Config) -> Config {
        Config {
            port: other.port.or(self.port),
            config_path: other.config_path.or(self.config_path),
            log_dir: other.log_dir.or(self.log_dir),
            log_level: other.log_level.or(self.log_level),
            base_url: other.base_url.or(self.base_url),
            partners_path: other.partners_path.or(self.partners_path),
            partners_sorter: other.partners_sorter.or(self.partners_sorter),
            solutions_path: other.solutions_path.or(self.solutions_path),
            solutions_sorter: other.solutions_sorter.or(self.solutions_sorter),
            batch_size: other.batch_size.or(self.batch_size),
            max_concurrent_batches: other.max_concurrent_batches.or(self.max_concurrent_batches),
            fetch_timeout_seconds: other.fetch_timeout_seconds.or(self.fetch_timeout_seconds),
            connect_timeout_seconds: other.connect_timeout_seconds.or(self.connect_timeout_seconds),
            response_timeout_seconds: other.response_timeout_seconds.or(self.response_timeout_seconds),
            refresh_cron: other.refresh_cron.or(self.refresh_cron),
            publish_empty_results: other.publish_empty_results.or(self.publish_empty_results),
            max_total: other.max_total.or(self.max_total),
            max_body_bytes: other.max_body_bytes.or(self.max_body_bytes),
            cors_origin: other.cors_origin.or(self.cors_origin),
        }
    }

    /// Fills every unset field from the built-in defaults. The pipeline defaults
    /// come from `PipelineSettings::default()`.
    pub fn resolve(self) -> ServerSettings {
        let pipeline = PipelineSettings::default();
        ServerSettings {
            port: self.port.unwrap_or(8080),
            log_dir: self.log_dir.unwrap_or_else(|| PathBuf::from("./logs")),
            log_level: self.log_level.unwrap_or_else(|| "info".to_string()),
            cors_origin: self
                .cors_origin
                .unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string()),
            pipeline: PipelineSettings {
                base_url: self.base_url.unwrap_or(pipeline.base_url),
                partners: EndpointSettings {
                    path: self.partners_path.unwrap_or(pipeline.partners.path),
                    sorter: self.partners_sorter.unwrap_or(pipeline.partners.sorter),
                },
                solutions: EndpointSettings {
                    path: self.solutions_path.unwrap_or(pipeline.solutions.path),
                    sorter: self.solutions_sorter.unwrap_or(pipeline.solutions.sorter),
                },
                batch_size: self.batch_size.unwrap_or(pipeline.batch_size),
                max_concurrent_batches: self
                    .max_concurrent_batches
                    .unwrap_or(pipeline.max_concurrent_batches),
                fetch_timeout_seconds: self
                    .fetch_timeout_seconds
                    .unwrap_or(pipeline.fetch_timeout_seconds),
                connect_timeout_seconds: self
                    .connect_timeout_seconds
                    .unwrap_or(pipeline.connect_timeout_seconds),
                response_timeout_seconds: self
                    .response_timeout_seconds
                    .unwrap_or(pipeline.response_timeout_seconds),
                refresh_cron: self.refresh_cron.unwrap_or(pipeline.refresh_cron),
                publish_empty_results: self
                    .publish_empty_results
                    .unwrap_or(pipeline.publish_empty_results),
                max_total: self.max_total.unwrap_or(pipeline.max_total),
                max_body_bytes: self.max_body_bytes.unwrap_or(pipeline.max_body_bytes),
            },
        }
    }
}

/// Reads a JSON config file. A missing file at the default location is not an error.
fn read_config_file(path: &Path, explicit: bool) -> Result<Option<Config>> {
    if !path.exists() {
        if explicit {
            anyhow::bail!("Config file not found at {}", path.display());
        }
        return Ok(None);
    }
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let file_config = serde_json::from_str::<Config>(&text)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    Ok(Some(file_config))
}

/// Layers defaults, then the config file, then environment/CLI values.
pub fn load_from(cli: Config) -> Result<ServerSettings> {
    let explicit = cli.config_path.is_some();
    let config_file_path = cli
        .config_path
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

    let mut current = Config::default();
    if let Some(file_config) = read_config_file(&config_file_path, explicit)? {
        current = current.merge(file_config);
    }
    current = current.merge(cli);

    Ok(current.resolve())
}

/// `load_from` with the process arguments and environment.
pub fn load_config() -> Result<ServerSettings> {
    load_from(Config::parse())
}
