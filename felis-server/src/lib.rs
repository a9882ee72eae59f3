//! # Felis Server
//!
//! HTTP bindings for the Felis catalog façade and credential workflow.
//!
//! Every route forwards into `felis-core`; this crate only decides how
//! requests are decoded and how error kinds become status codes.

pub mod handlers;
pub mod infra;
pub mod routes;

pub use infra::app_state::AppState;
pub use infra::config::Config;
pub use infra::errors::{AppError, AppResult};
