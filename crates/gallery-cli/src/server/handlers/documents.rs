//! Read-only handlers: documents and audit.

use axum::{
    Json,
    extract::{Path, State},
};
use gallery::{AuditReport, Collection, DocumentStore};
use serde_json::Value;

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// GET /api/documents/:collection/:id
pub async fn get_document(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let collection = Collection::ALL
        .into_iter()
        .find(|c| c.as_str() == collection)
        .ok_or_else(|| ApiError::BadRequest(format!("Unknown collection: {}", collection)))?;

    let doc = state
        .store
        .get(collection, &id)?
        .ok_or_else(|| ApiError::NotFound(format!("{} document '{}'", collection, id)))?;
    Ok(Json(doc))
}

/// GET /api/audit
pub async fn get_audit(State(state): State<AppState>) -> Result<Json<AuditReport>, ApiError> {
    let engine = state.engine.clone();
    let report = tokio::task::spawn_blocking(move || engine.audit())
        .await
        .map_err(|e| ApiError::Internal(format!("audit task failed: {}", e)))??;
    Ok(Json(report))
}
