use axum::{
    Json,
    extract::{Path, Query, State},
};
use felis_core::{BreedRecord, ImageRecord};
use serde::Deserialize;

use crate::infra::{app_state::AppState, errors::AppResult};

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ImagesQuery {
    #[serde(default)]
    pub breed_id: String,
    pub limit: Option<i64>,
}

/// List every breed the catalog knows, in upstream order.
///
/// - `200 OK` with a JSON array of breeds
/// - `404 Not Found` when the catalog has none
/// - `502 Bad Gateway` when the catalog cannot be reached
pub async fn list_breeds_handler(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<BreedRecord>>> {
    Ok(Json(state.catalog.list_all_breeds().await?))
}

pub async fn get_breed_handler(
    State(state): State<AppState>,
    Path(breed_id): Path<String>,
) -> AppResult<Json<BreedRecord>> {
    Ok(Json(state.catalog.get_breed(&breed_id).await?))
}

/// Free-text breed search.
///
/// Without `q` (or with a blank one) this behaves exactly like
/// [`list_breeds_handler`]. A query that matches nothing is `200 OK` with `[]`.
pub async fn search_breeds_handler(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<BreedRecord>>> {
    Ok(Json(
        state.catalog.search_breeds(query.q.as_deref()).await?,
    ))
}

/// Images for one breed. `limit` defaults to 10 and is capped at 100.
pub async fn images_by_breed_handler(
    State(state): State<AppState>,
    Query(query): Query<ImagesQuery>,
) -> AppResult<Json<Vec<ImageRecord>>> {
    Ok(Json(
        state
            .catalog
            .images_by_breed(&query.breed_id, query.limit)
            .await?,
    ))
}
