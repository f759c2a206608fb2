use axum::{response::IntoResponse, Extension, Json};
use serde_json::json;

use crate::database::route_state::RouteState;
use crate::middleware::tenant_context::RequestContext;

/// GET /api/context - Echo the tenant context resolved for this request
///
/// Returns the tenant/branch pair parsed from the identifying headers and
/// the database alias currently selected for the request. Requests with
/// missing or malformed headers still succeed and report an anonymous
/// context.
pub async fn context_get(
    Extension(context): Extension<RequestContext>,
    Extension(route_state): Extension<RouteState>,
) -> impl IntoResponse {
    Json(json!({
        "success": true,
        "data": {
            "tenant_id": context.tenant_id,
            "branch_id": context.branch_id,
            "database_alias": route_state.get_current_alias(),
        }
    }))
}
