use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};

use crate::{dto::ErrorResponse, services::auth::AuthService, AppState};

pub struct AuthMiddleware;

impl AuthMiddleware {
    /// Resolve the caller from a bearer token (header or `auth_token` cookie)
    /// and store it as an `AuthUser` extension for the handlers.
    pub async fn auth_middleware(
        State(state): State<AppState>,
        headers: HeaderMap,
        mut request: Request,
        next: Next,
    ) -> Response {
        let Some(token) = extract_token_from_headers(&headers) else {
            tracing::debug!("No auth token found in headers");
            return unauthorized_response();
        };

        let auth_service = AuthService::new(state.config.auth.jwt_secret.as_str());
        let user = match auth_service.authenticate(&token) {
            Ok(user) => user,
            Err(_) => return unauthorized_response(),
        };

        tracing::debug!(user_id = %user.user_id, "Authenticated request");
        request.extensions_mut().insert(user);

        next.run(request).await
    }
}

pub fn extract_token_from_headers(headers: &HeaderMap) -> Option<String> {
    if let Some(auth_header) = headers.get(header::AUTHORIZATION) {
        if let Ok(header_str) = auth_header.to_str() {
            if let Some(token) = header_str.strip_prefix("Bearer ") {
                tracing::debug!("Found Bearer token in Authorization header");
                return Some(token.trim().to_string());
            }
        }
    }

    if let Some(cookie_header) = headers.get(header::COOKIE) {
        if let Ok(cookie_str) = cookie_header.to_str() {
            for cookie in cookie_str.split(';') {
                if let Some(token) = cookie.trim().strip_prefix("auth_token=") {
                    tracing::debug!("Found auth_token in cookies");
                    return Some(token.to_string());
                }
            }
        }
    }

    None
}

fn unauthorized_response() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse {
            error: "UNAUTHORIZED".to_string(),
            message: "Authentication required".to_string(),
        }),
    )
        .into_response()
}
