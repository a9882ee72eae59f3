use std::{fmt, time::Duration};

use async_trait::async_trait;
use reqwest::{
    Client, StatusCode,
    header::{HeaderMap, HeaderValue},
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::{
    model::{BreedRecord, ImageRecord},
    source::{CatalogSource, ImageQuery, UpstreamError},
};

pub const DEFAULT_BASE_URL: &str = "https://api.thecatapi.com/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const API_KEY_HEADER: &str = "x-api-key";

/// Connection settings for a TheCatAPI compatible upstream.
#[derive(Clone)]
pub struct CatApiConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    /// Overall deadline for one request, connect through body.
    pub timeout: Duration,
}

impl Default for CatApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl fmt::Debug for CatApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatApiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// reqwest-backed [`CatalogSource`].
#[derive(Debug, Clone)]
pub struct CatApiClient {
    client: Client,
    base_url: Url,
}

impl CatApiClient {
    pub fn new(config: CatApiConfig) -> Result<Self, UpstreamError> {
        let base_url = Url::parse(&config.base_url).map_err(|err| {
            UpstreamError::InvalidEndpoint(format!("{}: {err}", config.base_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(UpstreamError::InvalidEndpoint(config.base_url));
        }

        let mut headers = HeaderMap::new();
        if let Some(key) = config.api_key.as_deref().filter(|key| !key.is_empty()) {
            let mut value = HeaderValue::from_str(key).map_err(|_| {
                UpstreamError::InvalidEndpoint("API key is not a valid header value".into())
            })?;
            value.set_sensitive(true);
            headers.insert(API_KEY_HEADER, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, UpstreamError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| UpstreamError::InvalidEndpoint(self.base_url.to_string()))?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    /// Issue one GET and hand back the body of a 2xx answer. A 404 yields
    /// `None` so the by-id lookup can report absence; every other non-2xx
    /// status is an error.
    async fn get(&self, url: Url) -> Result<Option<String>, UpstreamError> {
        let endpoint = url.path().to_owned();
        debug!(%endpoint, "catalog request");

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            debug!(%endpoint, "catalog reported not found");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(UpstreamError::Status { status, endpoint });
        }

        Ok(Some(response.text().await?))
    }

    async fn get_list<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>, UpstreamError> {
        let endpoint = url.path().to_owned();
        match self.get(url).await? {
            Some(body) => decode_list(&body),
            None => Err(UpstreamError::Status {
                status: StatusCode::NOT_FOUND,
                endpoint,
            }),
        }
    }
}

#[async_trait]
impl CatalogSource for CatApiClient {
    async fn list_breeds(&self) -> Result<Vec<BreedRecord>, UpstreamError> {
        let url = self.endpoint(&["breeds"])?;
        self.get_list(url).await
    }

    async fn breed(&self, id: &str) -> Result<Option<BreedRecord>, UpstreamError> {
        let url = self.endpoint(&["breeds", id])?;
        match self.get(url).await? {
            Some(body) => decode_optional(&body),
            None => Ok(None),
        }
    }

    async fn search_breeds(&self, query: &str) -> Result<Vec<BreedRecord>, UpstreamError> {
        let mut url = self.endpoint(&["breeds", "search"])?;
        url.query_pairs_mut().append_pair("q", query);
        self.get_list(url).await
    }

    async fn search_images(&self, query: &ImageQuery) -> Result<Vec<ImageRecord>, UpstreamError> {
        let mut url = self.endpoint(&["images", "search"])?;
        url.query_pairs_mut()
            .append_pair("breed_ids", &query.breed_id)
            .append_pair("limit", &query.limit.to_string())
            .append_pair("has_breeds", if query.has_breeds { "true" } else { "false" });
        self.get_list(url).await
    }
}

/// A blank body and a JSON `null` both decode to an empty list.
fn decode_list<T: DeserializeOwned>(body: &str) -> Result<Vec<T>, UpstreamError> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    let items: Option<Vec<T>> = serde_json::from_str(body)?;
    Ok(items.unwrap_or_default())
}

/// A blank body, `null`, `{}` and `[]` all mean the record does not exist.
fn decode_optional<T: DeserializeOwned>(body: &str) -> Result<Option<T>, UpstreamError> {
    if body.trim().is_empty() {
        return Ok(None);
    }
    match serde_json::from_str::<Value>(body)? {
        Value::Null => Ok(None),
        Value::Object(map) if map.is_empty() => Ok(None),
        Value::Array(items) if items.is_empty() => Ok(None),
        value => Ok(Some(serde_json::from_value(value)?)),
    }
}
