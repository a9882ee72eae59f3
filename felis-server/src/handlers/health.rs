use axum::response::Json;
use serde_json::{Value, json};

pub const SERVICE_NAME: &str = "felis-server";

pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "UP",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn ping_handler() -> &'static str {
    "pong"
}
