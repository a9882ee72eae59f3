use async_trait::async_trait;

use super::model::{BreedRecord, ImageRecord};

/// Failure talking to the upstream catalog.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Upstream returned {status} for {endpoint}")]
    Status {
        status: reqwest::StatusCode,
        endpoint: String,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

/// Parameters of an image search. `has_breeds` asks the upstream to drop
/// images without any breed tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageQuery {
    pub breed_id: String,
    pub limit: u32,
    pub has_breeds: bool,
}

/// Capability of fetching breeds and images from a catalog.
///
/// Each call is exactly one round trip: no retries, no caching. Absence on
/// the by-id lookup is `Ok(None)`; absence on the list calls is an empty
/// vector. Deciding what absence means is left to [`super::CatalogService`].
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn list_breeds(&self) -> Result<Vec<BreedRecord>, UpstreamError>;

    async fn breed(&self, id: &str) -> Result<Option<BreedRecord>, UpstreamError>;

    async fn search_breeds(&self, query: &str) -> Result<Vec<BreedRecord>, UpstreamError>;

    async fn search_images(&self, query: &ImageQuery) -> Result<Vec<ImageRecord>, UpstreamError>;
}
