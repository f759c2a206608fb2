use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;

use crate::app::AppState;
use crate::error::ApiError;
use crate::services::license_service::normalize_document;

/// GET /api/licenses/:document - Validate a tenant's license by document
///
/// The document is normalized before lookup, so formatted and bare
/// registration numbers address the same record. An active record returns
/// its display name; a blocked record is refused with 403 and the caller
/// must not proceed with tenant-scoped work; an unknown document is 404 at
/// this surface.
pub async fn license_get(
    State(state): State<AppState>,
    Path(document): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let document = normalize_document(&document);
    if document.is_empty() {
        return Err(ApiError::bad_request("Document must not be empty"));
    }

    match state.licenses.validate(&document).await? {
        Some(display_name) => Ok(Json(json!({
            "success": true,
            "data": {
                "document": document,
                "display_name": display_name,
                "blocked": false,
            }
        }))),
        None => Err(ApiError::not_found(format!(
            "No license found for document '{}'",
            document
        ))),
    }
}
