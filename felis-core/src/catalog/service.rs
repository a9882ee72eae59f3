use std::{any::type_name_of_val, fmt, sync::Arc};

use thiserror::Error;
use tracing::{info, warn};

use super::{
    model::{BreedRecord, ImageRecord},
    source::{CatalogSource, ImageQuery, UpstreamError},
};
use crate::error::ErrorKind;

pub const DEFAULT_IMAGE_LIMIT: u32 = 10;
pub const MAX_IMAGE_LIMIT: u32 = 100;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    NotFound(String),

    #[error("catalog upstream failed: {context}")]
    Upstream {
        context: &'static str,
        #[source]
        source: UpstreamError,
    },
}

impl CatalogError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::InvalidInput(_) => ErrorKind::InvalidInput,
            CatalogError::NotFound(_) => ErrorKind::NotFound,
            CatalogError::Upstream { .. } => ErrorKind::UpstreamFailure,
        }
    }

    fn upstream(context: &'static str) -> impl FnOnce(UpstreamError) -> Self {
        move |source| {
            warn!(error = %source, "{context}");
            CatalogError::Upstream { context, source }
        }
    }
}

/// Domain façade over a [`CatalogSource`].
///
/// Direct lookups (full list, by id, images for a breed) treat an empty
/// upstream answer as `NotFound`. Free-text search does not: no matches is a
/// successful empty result.
pub struct CatalogService<S>
where
    S: CatalogSource + ?Sized,
{
    source: Arc<S>,
}

impl<S> Clone for CatalogService<S>
where
    S: CatalogSource + ?Sized,
{
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
        }
    }
}

impl<S> fmt::Debug for CatalogService<S>
where
    S: CatalogSource + ?Sized,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogService")
            .field("source", &type_name_of_val(self.source.as_ref()))
            .finish()
    }
}

impl<S> CatalogService<S>
where
    S: CatalogSource + ?Sized,
{
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }

    pub async fn list_all_breeds(&self) -> Result<Vec<BreedRecord>, CatalogError> {
        let breeds = self
            .source
            .list_breeds()
            .await
            .map_err(CatalogError::upstream("failed to list breeds"))?;

        if breeds.is_empty() {
            warn!("catalog returned no breeds");
            return Err(CatalogError::NotFound("no breeds available".into()));
        }

        info!(count = breeds.len(), "fetched breeds");
        Ok(breeds)
    }

    pub async fn get_breed(&self, breed_id: &str) -> Result<BreedRecord, CatalogError> {
        let breed_id = require_id(breed_id)?;

        let breed = self
            .source
            .breed(breed_id)
            .await
            .map_err(CatalogError::upstream("failed to fetch breed"))?;

        match breed {
            Some(breed) => Ok(breed),
            None => {
                warn!(breed_id, "breed not found");
                Err(CatalogError::NotFound(format!("breed not found: {breed_id}")))
            }
        }
    }

    /// A missing or blank query is the same call as [`Self::list_all_breeds`],
    /// including its not-found rule.
    pub async fn search_breeds(
        &self,
        query: Option<&str>,
    ) -> Result<Vec<BreedRecord>, CatalogError> {
        let query = match query.map(str::trim) {
            Some(query) if !query.is_empty() => query,
            _ => return self.list_all_breeds().await,
        };

        let breeds = self
            .source
            .search_breeds(query)
            .await
            .map_err(CatalogError::upstream("failed to search breeds"))?;

        info!(query, count = breeds.len(), "searched breeds");
        Ok(breeds)
    }

    pub async fn images_by_breed(
        &self,
        breed_id: &str,
        limit: Option<i64>,
    ) -> Result<Vec<ImageRecord>, CatalogError> {
        let breed_id = require_id(breed_id)?;

        let query = ImageQuery {
            breed_id: breed_id.to_string(),
            limit: effective_image_limit(limit),
            has_breeds: true,
        };

        let images = self
            .source
            .search_images(&query)
            .await
            .map_err(CatalogError::upstream("failed to fetch images"))?;

        if images.is_empty() {
            warn!(breed_id, "no images for breed");
            return Err(CatalogError::NotFound(format!(
                "no images for breed {breed_id}"
            )));
        }

        info!(breed_id, count = images.len(), "fetched images");
        Ok(images)
    }
}

/// Absent or non-positive limits fall back to the default; large ones are
/// capped without complaint.
pub fn effective_image_limit(limit: Option<i64>) -> u32 {
    match limit {
        Some(limit) if limit > 0 => limit.min(i64::from(MAX_IMAGE_LIMIT)) as u32,
        _ => DEFAULT_IMAGE_LIMIT,
    }
}

fn require_id(breed_id: &str) -> Result<&str, CatalogError> {
    let trimmed = breed_id.trim();
    if trimmed.is_empty() {
        return Err(CatalogError::InvalidInput(
            "breed id must not be empty".into(),
        ));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        List,
        Breed(String),
        Search(String),
        Images(ImageQuery),
    }

    /// Scripted source that records every call it receives.
    #[derive(Default)]
    struct FakeSource {
        breeds: Vec<BreedRecord>,
        search_results: Vec<BreedRecord>,
        images: Vec<ImageRecord>,
        fail: bool,
        calls: Mutex<Vec<Call>>,
    }

    impl FakeSource {
        fn with_breeds(breeds: Vec<BreedRecord>) -> Self {
            Self {
                breeds,
                ..Self::default()
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: Call) -> Result<(), UpstreamError> {
            self.calls.lock().unwrap().push(call);
            if self.fail {
                return Err(UpstreamError::Status {
                    status: reqwest::StatusCode::BAD_GATEWAY,
                    endpoint: "/fake".into(),
                });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl CatalogSource for FakeSource {
        async fn list_breeds(&self) -> Result<Vec<BreedRecord>, UpstreamError> {
            self.record(Call::List)?;
            Ok(self.breeds.clone())
        }

        async fn breed(&self, id: &str) -> Result<Option<BreedRecord>, UpstreamError> {
            self.record(Call::Breed(id.to_string()))?;
            Ok(self.breeds.iter().find(|breed| breed.id == id).cloned())
        }

        async fn search_breeds(&self, query: &str) -> Result<Vec<BreedRecord>, UpstreamError> {
            self.record(Call::Search(query.to_string()))?;
            Ok(self.search_results.clone())
        }

        async fn search_images(
            &self,
            query: &ImageQuery,
        ) -> Result<Vec<ImageRecord>, UpstreamError> {
            self.record(Call::Images(query.clone()))?;
            Ok(self.images.clone())
        }
    }

    fn abys_and_aege() -> Vec<BreedRecord> {
        vec![
            BreedRecord::new("abys", "Abyssinian"),
            BreedRecord::new("aege", "Aegean"),
        ]
    }

    fn image(id: &str) -> ImageRecord {
        ImageRecord {
            id: id.to_string(),
            url: format!("https://example.com/{id}.jpg"),
            width: Some(800),
            height: Some(600),
            breed_ids: vec!["abys".into()],
        }
    }

    fn service(source: FakeSource) -> (CatalogService<FakeSource>, Arc<FakeSource>) {
        let source = Arc::new(source);
        (CatalogService::new(source.clone()), source)
    }

    #[tokio::test]
    async fn list_returns_breeds_in_upstream_order() {
        let (catalog, _) = service(FakeSource::with_breeds(abys_and_aege()));

        let breeds = catalog.list_all_breeds().await.unwrap();
        let names: Vec<_> = breeds.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, ["Abyssinian", "Aegean"]);
    }

    #[tokio::test]
    async fn empty_list_is_not_found() {
        let (catalog, _) = service(FakeSource::default());

        let err = catalog.list_all_breeds().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "no breeds available");
    }

    #[tokio::test]
    async fn upstream_failure_keeps_cause() {
        let (catalog, _) = service(FakeSource::failing());

        let err = catalog.list_all_breeds().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UpstreamFailure);
        let source = std::error::Error::source(&err).expect("cause preserved");
        assert!(source.to_string().contains("502"));
    }

    #[tokio::test]
    async fn blank_breed_id_fails_before_any_call() {
        let (catalog, source) = service(FakeSource::with_breeds(abys_and_aege()));

        for id in ["", "   ", "\t\n"] {
            let err = catalog.get_breed(id).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput);

            let err = catalog.images_by_breed(id, Some(5)).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput);
        }
        assert!(source.calls().is_empty());
    }

    #[tokio::test]
    async fn get_breed_trims_and_finds() {
        let (catalog, source) = service(FakeSource::with_breeds(abys_and_aege()));

        let breed = catalog.get_breed("  abys ").await.unwrap();
        assert_eq!(breed.name, "Abyssinian");
        assert_eq!(source.calls(), vec![Call::Breed("abys".into())]);
    }

    #[tokio::test]
    async fn missing_breed_is_not_found() {
        let (catalog, _) = service(FakeSource::with_breeds(abys_and_aege()));

        let err = catalog.get_breed("nope").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "breed not found: nope");
    }

    #[tokio::test]
    async fn get_breed_surfaces_upstream_failure() {
        let (catalog, _) = service(FakeSource::failing());

        let err = catalog.get_breed("abys").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UpstreamFailure);
    }

    #[tokio::test]
    async fn blank_search_is_the_list_call() {
        for query in [None, Some(""), Some("   ")] {
            let (catalog, source) = service(FakeSource::with_breeds(abys_and_aege()));
            let breeds = catalog.search_breeds(query).await.unwrap();
            assert_eq!(breeds, abys_and_aege());
            assert_eq!(source.calls(), vec![Call::List]);

            let (catalog, _) = service(FakeSource::default());
            let err = catalog.search_breeds(query).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::NotFound);
        }
    }

    #[tokio::test]
    async fn search_without_matches_is_empty_success() {
        let (catalog, source) = service(FakeSource::with_breeds(abys_and_aege()));

        let breeds = catalog.search_breeds(Some("zzz-no-match")).await.unwrap();
        assert!(breeds.is_empty());
        assert_eq!(source.calls(), vec![Call::Search("zzz-no-match".into())]);
    }

    #[tokio::test]
    async fn search_sends_trimmed_query() {
        let source = FakeSource {
            search_results: vec![BreedRecord::new("pers", "Persian")],
            ..FakeSource::default()
        };
        let (catalog, source) = service(source);

        let breeds = catalog.search_breeds(Some("  pers ")).await.unwrap();
        assert_eq!(breeds[0].name, "Persian");
        assert_eq!(source.calls(), vec![Call::Search("pers".into())]);
    }

    #[tokio::test]
    async fn search_surfaces_upstream_failure() {
        let (catalog, _) = service(FakeSource::failing());

        let err = catalog.search_breeds(Some("pers")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UpstreamFailure);
    }

    #[test]
    fn image_limit_defaults_and_caps() {
        assert_eq!(effective_image_limit(None), 10);
        assert_eq!(effective_image_limit(Some(0)), 10);
        assert_eq!(effective_image_limit(Some(-5)), 10);
        assert_eq!(effective_image_limit(Some(1)), 1);
        assert_eq!(effective_image_limit(Some(100)), 100);
        assert_eq!(effective_image_limit(Some(150)), 100);
        assert_eq!(effective_image_limit(Some(i64::MAX)), 100);
    }

    #[tokio::test]
    async fn images_request_filters_to_tagged_images() {
        let mut seen = Vec::new();
        for limit in [None, Some(0), Some(-5), Some(10), Some(150), Some(100)] {
            let source = FakeSource {
                images: vec![image("img1"), image("img2")],
                ..FakeSource::default()
            };
            let (catalog, source) = service(source);

            let images = catalog.images_by_breed(" abys ", limit).await.unwrap();
            assert_eq!(images.len(), 2);
            assert_eq!(images[0].id, "img1");
            seen.extend(source.calls());
        }

        let expected = |limit| {
            Call::Images(ImageQuery {
                breed_id: "abys".into(),
                limit,
                has_breeds: true,
            })
        };
        assert_eq!(
            seen,
            vec![
                expected(10),
                expected(10),
                expected(10),
                expected(10),
                expected(100),
                expected(100),
            ]
        );
    }

    #[tokio::test]
    async fn no_images_is_not_found() {
        let (catalog, _) = service(FakeSource::default());

        let err = catalog.images_by_breed("abys", None).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "no images for breed abys");
    }

    #[tokio::test]
    async fn images_surface_upstream_failure() {
        let (catalog, _) = service(FakeSource::failing());

        let err = catalog.images_by_breed("abys", Some(3)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UpstreamFailure);
    }

    #[tokio::test]
    async fn works_behind_a_trait_object() {
        let source: Arc<dyn CatalogSource> = Arc::new(FakeSource::with_breeds(abys_and_aege()));
        let catalog = CatalogService::new(source);

        assert_eq!(catalog.list_all_breeds().await.unwrap().len(), 2);
    }
}
