//! Artwork handlers: lifecycle and placement.

use axum::{
    Json,
    extract::{Path, State},
};
use gallery::{AssignmentResult, NewArtwork};
use serde::Deserialize;

use super::run_engine;
use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Request body for creating an artwork.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateArtworkRequest {
    pub artist_id: String,
    pub id: Option<String>,
    pub title: Option<String>,
}

/// Request body naming a target show and location.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementRequest {
    pub show_id: String,
    pub location_id: Option<String>,
}

/// Request body for marking an artwork shown.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkShownRequest {
    pub show_id: String,
}

/// POST /api/artworks
pub async fn create_artwork(
    State(state): State<AppState>,
    Json(req): Json<CreateArtworkRequest>,
) -> Result<Json<AssignmentResult>, ApiError> {
    let new = NewArtwork {
        id: req.id,
        title: req.title,
    };
    let result = run_engine(&state, move |engine| engine.create_artwork(&req.artist_id, new)).await?;
    Ok(Json(result))
}

/// DELETE /api/artworks/:id
pub async fn delete_artwork(
    State(state): State<AppState>,
    Path(artwork_id): Path<String>,
) -> Result<Json<AssignmentResult>, ApiError> {
    let result = run_engine(&state, move |engine| engine.delete_artwork(&artwork_id)).await?;
    Ok(Json(result))
}

/// POST /api/artworks/:id/assign
pub async fn assign_artwork(
    State(state): State<AppState>,
    Path(artwork_id): Path<String>,
    Json(req): Json<PlacementRequest>,
) -> Result<Json<AssignmentResult>, ApiError> {
    let result = run_engine(&state, move |engine| {
        engine.assign_artwork(&artwork_id, &req.show_id, req.location_id.as_deref())
    })
    .await?;
    Ok(Json(result))
}

/// POST /api/artworks/:id/reject
pub async fn reject_artwork(
    State(state): State<AppState>,
    Path(artwork_id): Path<String>,
) -> Result<Json<AssignmentResult>, ApiError> {
    let result = run_engine(&state, move |engine| engine.reject_artwork(&artwork_id)).await?;
    Ok(Json(result))
}

/// POST /api/artworks/:id/reassign
pub async fn reassign_artwork(
    State(state): State<AppState>,
    Path(artwork_id): Path<String>,
    Json(req): Json<PlacementRequest>,
) -> Result<Json<AssignmentResult>, ApiError> {
    let result = run_engine(&state, move |engine| {
        engine.reassign_artwork(&artwork_id, &req.show_id, req.location_id.as_deref())
    })
    .await?;
    Ok(Json(result))
}

/// POST /api/artworks/:id/shown
pub async fn mark_shown(
    State(state): State<AppState>,
    Path(artwork_id): Path<String>,
    Json(req): Json<MarkShownRequest>,
) -> Result<Json<AssignmentResult>, ApiError> {
    let result =
        run_engine(&state, move |engine| engine.mark_shown(&artwork_id, &req.show_id)).await?;
    Ok(Json(result))
}
