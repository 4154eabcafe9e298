//! Artist handlers: batch acceptance and withdrawal.

use axum::{
    Json,
    extract::{Path, State},
};
use gallery::ArtistResult;
use serde::Deserialize;

use super::run_engine;
use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Request body for accepting an artist into a show.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptArtistRequest {
    pub show_id: String,
    pub location_id: Option<String>,
    #[serde(default)]
    pub artwork_ids: Vec<String>,
}

/// POST /api/artists/:id/accept
pub async fn accept_artist(
    State(state): State<AppState>,
    Path(artist_id): Path<String>,
    Json(req): Json<AcceptArtistRequest>,
) -> Result<Json<ArtistResult>, ApiError> {
    let result = run_engine(&state, move |engine| {
        engine.accept_artist_into_show(
            &artist_id,
            &req.show_id,
            req.location_id.as_deref(),
            &req.artwork_ids,
        )
    })
    .await?;
    Ok(Json(result))
}

/// POST /api/artists/:id/remove
pub async fn remove_artist(
    State(state): State<AppState>,
    Path(artist_id): Path<String>,
) -> Result<Json<ArtistResult>, ApiError> {
    let result =
        run_engine(&state, move |engine| engine.remove_artist_from_show(&artist_id)).await?;
    Ok(Json(result))
}
