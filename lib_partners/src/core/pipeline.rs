//! # Refresh Pipeline
//!
//! One refresh: fetch partners and solutions concurrently, then left-join them.
//! The pipeline never touches the cache; its caller decides what to do with the
//! result.

use crate::configs::PipelineSettings;
use crate::directory::{join, PartnerSolution, RawPartner, RawSolution};
use crate::ingestors::BatchFetcher;
use crate::retrieve::{ApiClient, FetchError, HttpPageSource};
use std::sync::Arc;
use tracing::info;

pub struct RefreshPipeline {
    partners: BatchFetcher<RawPartner>,
    solutions: BatchFetcher<RawSolution>,
}

impl RefreshPipeline {
    pub fn new(partners: BatchFetcher<RawPartner>, solutions: BatchFetcher<RawSolution>) -> Self {
        Self {
            partners,
            solutions,
        }
    }

    /// Wires both fetchers to the live listings through one shared `ApiClient`.
    ///
    /// # Errors
    /// Fails if the base URL is not absolute or the HTTP client cannot be built.
    pub fn from_settings(settings: &PipelineSettings) -> Result<Self, FetchError> {
        let client = Arc::new(ApiClient::new(
            &settings.base_url,
            settings.connect_timeout(),
            settings.response_timeout(),
            settings.max_body_bytes,
        )?);

        let partners = HttpPageSource::new(
            Arc::clone(&client),
            "partners",
            settings.partners.path.as_str(),
            settings.partners.sorter.as_str(),
        );
        let solutions = HttpPageSource::new(
            client,
            "solutions",
            settings.solutions.path.as_str(),
            settings.solutions.sorter.as_str(),
        );

        Ok(Self::new(
            BatchFetcher::from_settings(Arc::new(partners), settings),
            BatchFetcher::from_settings(Arc::new(solutions), settings),
        ))
    }

    pub async fn run(&self) -> Vec<PartnerSolution> {
        let (partners, solutions) =
            tokio::join!(self.partners.fetch_all(), self.solutions.fetch_all());

        let joined = join(&partners, &solutions);
        let with_solutions = joined.iter().filter(|p| p.has_solutions()).count();
        info!(
            partners = partners.len(),
            solutions = solutions.len(),
            joined = joined.len(),
            with_solutions,
            "Joined partner directory."
        );
        joined
    }
}
