use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

/// Shared secret for admin routes.
///
/// When `token` is `None` the middleware is a transparent no-op.
#[derive(Clone, Debug)]
pub struct AdminAuth {
    pub token: Option<String>,
}

impl AdminAuth {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: token.filter(|t| !t.is_empty()),
        }
    }
}

/// Axum middleware gating admin routes behind `Authorization: Bearer <token>`.
///
/// 1. No token configured → passthrough
/// 2. Bearer value matches → passthrough
/// 3. Otherwise → 401 JSON
pub async fn admin_auth_middleware(
    State(auth): State<Arc<AdminAuth>>,
    req: Request,
    next: Next,
) -> Response {
    let Some(ref token) = auth.token else {
        return next.run(req).await;
    };

    let presented = req
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(extract_bearer);

    if presented == Some(token.as_str()) {
        return next.run(req).await;
    }

    tracing::warn!(path = %req.uri().path(), "rejected admin request");
    Response::builder()
        .status(401)
        .header("Content-Type", "application/json")
        .body(Body::from(r#"{"error":"unauthorized"}"#))
        .expect("infallible: all header values are valid ASCII")
}

fn extract_bearer(header: &str) -> Option<&str> {
    let (scheme, value) = header.trim().split_once(' ')?;
    if scheme.eq_ignore_ascii_case("bearer") {
        Some(value.trim())
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
