//! Show handlers: curation order.

use axum::{
    Json,
    extract::{Path, State},
};
use gallery::OrderResult;
use serde::Deserialize;

use super::run_engine;
use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Request body for replacing a show's order.
#[derive(Deserialize)]
pub struct ReorderRequest {
    pub order: Vec<String>,
}

/// Request body for appending to a show's order.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendRequest {
    pub artwork_id: String,
}

/// PUT /api/shows/:id/order
pub async fn reorder(
    State(state): State<AppState>,
    Path(show_id): Path<String>,
    Json(req): Json<ReorderRequest>,
) -> Result<Json<OrderResult>, ApiError> {
    let result = run_engine(&state, move |engine| engine.reorder(&show_id, &req.order)).await?;
    Ok(Json(result))
}

/// POST /api/shows/:id/order
pub async fn append_to_order(
    State(state): State<AppState>,
    Path(show_id): Path<String>,
    Json(req): Json<AppendRequest>,
) -> Result<Json<OrderResult>, ApiError> {
    let result = run_engine(&state, move |engine| {
        engine.orderer().append_to_order(&show_id, &req.artwork_id)
    })
    .await?;
    Ok(Json(result))
}

/// DELETE /api/shows/:id/order/:artwork_id
pub async fn remove_from_order(
    State(state): State<AppState>,
    Path((show_id, artwork_id)): Path<(String, String)>,
) -> Result<Json<OrderResult>, ApiError> {
    let result = run_engine(&state, move |engine| {
        engine.orderer().remove_from_order(&show_id, &artwork_id)
    })
    .await?;
    Ok(Json(result))
}
