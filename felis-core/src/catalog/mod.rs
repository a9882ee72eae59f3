//! Upstream catalog integration.
//!
//! [`CatalogSource`] is the seam to the remote service and [`CatApiClient`]
//! its reqwest implementation. [`CatalogService`] turns raw upstream answers
//! into domain outcomes.

pub mod cat_api;
pub mod model;
pub mod service;
pub mod source;

pub use cat_api::{CatApiClient, CatApiConfig};
pub use model::{BreedRecord, ImageRecord};
pub use service::{CatalogError, CatalogService, DEFAULT_IMAGE_LIMIT, MAX_IMAGE_LIMIT};
pub use source::{CatalogSource, ImageQuery, UpstreamError};
