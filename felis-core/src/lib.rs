//! # Felis Core
//!
//! Core library for the Felis API, providing the two pieces of the service
//! that actually make decisions:
//!
//! - **Catalog façade**: breed and image lookups proxied to a TheCatAPI
//!   compatible upstream, with absent results normalised into domain outcomes
//! - **Credential workflow**: login and registration against a user store,
//!   with Argon2id password hashing and store-enforced uniqueness
//!
//! Everything else (routing, status codes, configuration) lives in
//! `felis-server` and only forwards into the types exported here.
//!
//! ## Feature Flags
//!
//! - `database`: Enables the PostgreSQL account store and embedded migrations
//! - `pg-tests`: Compiles the PostgreSQL store integration suite
//!
//! ## Examples
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use felis_core::catalog::{CatApiClient, CatApiConfig, CatalogService};
//!
//! async fn first_breed() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CatApiClient::new(CatApiConfig::default())?;
//!     let catalog = CatalogService::new(Arc::new(client));
//!
//!     let breeds = catalog.list_all_breeds().await?;
//!     println!("first breed: {}", breeds[0].name);
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

/// Breed and image lookups against the upstream catalog
pub mod catalog;

/// Login and registration against the account store
pub mod credentials;

/// Error taxonomy shared by both components
pub mod error;

#[cfg(feature = "database")]
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

pub use catalog::{BreedRecord, CatalogError, CatalogService, ImageRecord};
pub use credentials::{CredentialError, CredentialService, UserAccount};
pub use error::ErrorKind;
