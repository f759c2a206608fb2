use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use serde::Serialize;

use crate::database::route_state::RouteState;

/// Header carrying the tenant ("empresa") identifier.
pub const TENANT_HEADER: &str = "X-Empresa";

/// Header carrying the branch ("filial") identifier.
pub const BRANCH_HEADER: &str = "X-Filial";

/// Tenant/branch identity resolved for one request.
///
/// Exclusively owned by the request: created at entry, dropped at exit,
/// never shared across requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RequestContext {
    pub tenant_id: Option<i64>,
    pub branch_id: Option<i64>,
}

impl RequestContext {
    /// Resolve the context from the raw header values.
    ///
    /// An absent header leaves its field unset. A header that is present but
    /// not a base-10 integer voids the whole pair: both fields come back
    /// unset, regardless of whether the other header parsed. The caller is
    /// never rejected over a malformed header.
    pub fn from_headers(tenant: Option<&str>, branch: Option<&str>) -> Self {
        let tenant_id = tenant.map(parse_id);
        let branch_id = branch.map(parse_id);

        // a parse failure on either header nulls the pair atomically
        if tenant_id == Some(None) || branch_id == Some(None) {
            return Self::default();
        }

        Self {
            tenant_id: tenant_id.flatten(),
            branch_id: branch_id.flatten(),
        }
    }
}

fn parse_id(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
}

/// Middleware that resolves the tenant context once per inbound request.
///
/// Attaches the resolved [`RequestContext`] and a fresh [`RouteState`] slot
/// to the request extensions. Creating the slot here is the request-entry
/// reset that keeps routing state from leaking between requests. Requests
/// always proceed; a malformed header only degrades the context to
/// anonymous and is logged for metering.
pub async fn tenant_context_middleware(mut request: Request, next: Next) -> Response {
    let tenant = header_value(request.headers(), TENANT_HEADER);
    let branch = header_value(request.headers(), BRANCH_HEADER);

    let context = RequestContext::from_headers(tenant.as_deref(), branch.as_deref());

    let malformed = tenant.as_deref().map_or(false, |v| parse_id(v).is_none())
        || branch.as_deref().map_or(false, |v| parse_id(v).is_none());
    if malformed {
        tracing::warn!(
            target: "tenant_context",
            tenant = tenant.as_deref(),
            branch = branch.as_deref(),
            "unparseable tenant headers, degrading to anonymous context"
        );
    }

    request.extensions_mut().insert(context);
    request.extensions_mut().insert(RouteState::new());

    next.run(request).await
}
