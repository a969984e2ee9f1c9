use axum::{
    extract::Request,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use restock_core::TenantId;

use crate::app::errors::json_error;
use crate::context::TenantContext;

pub const TENANT_HEADER: &str = "x-tenant-id";

/// Resolve the tenant from [`TENANT_HEADER`] and attach a [`TenantContext`].
///
/// Authentication happens upstream; this layer only scopes the request.
pub async fn tenant_middleware(mut req: Request, next: Next) -> Response {
    let tenant_id = match extract_tenant(req.headers()) {
        Ok(t) => t,
        Err(resp) => return resp,
    };

    req.extensions_mut().insert(TenantContext::new(tenant_id));
    next.run(req).await
}

fn extract_tenant(headers: &HeaderMap) -> Result<TenantId, Response> {
    let raw = headers
        .get(TENANT_HEADER)
        .ok_or_else(|| json_error(StatusCode::BAD_REQUEST, "missing_tenant", "x-tenant-id header is required"))?;

    let raw = raw
        .to_str()
        .map_err(|_| json_error(StatusCode::BAD_REQUEST, "invalid_tenant", "x-tenant-id must be ASCII"))?;

    raw.trim()
        .parse::<TenantId>()
        .map_err(|e| json_error(StatusCode::BAD_REQUEST, "invalid_tenant", e.to_string()))
}
