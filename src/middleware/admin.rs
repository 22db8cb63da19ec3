//! Admin authentication middleware.
//!
//! Admin routes are protected by a static bearer token configured under
//! `[auth]`. The token is compared in constant time to prevent timing
//! attacks. When no token is configured the routes are left open, which is
//! only acceptable behind a trusted network boundary; the server logs a
//! warning at startup in that case.

use axum::{
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;

use crate::AppState;

/// Identity of the authenticated admin, available to handlers as a request
/// extension. The email comes from `auth.admin_email` and feeds the
/// self-deactivation guard.
#[derive(Debug, Clone)]
pub struct AdminAuth {
    pub email: Option<String>,
}

/// Middleware that requires the configured admin bearer token.
pub async fn admin_auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let expected = match &state.config.auth.admin_token {
        Some(token) if !token.is_empty() => token,
        _ => {
            req.extensions_mut().insert(AdminAuth {
                email: state.config.auth.admin_email.clone(),
            });
            return next.run(req).await;
        }
    };

    let provided = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim);

    let authorized = match provided {
        Some(token) => bool::from(token.as_bytes().ct_eq(expected.as_bytes())),
        None => false,
    };

    if !authorized {
        tracing::debug!(path = %req.uri().path(), "Rejected unauthenticated admin request");
        return (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
    }

    req.extensions_mut().insert(AdminAuth {
        email: state.config.auth.admin_email.clone(),
    });
    next.run(req).await
}
