use axum::{
    RequestPartsExt,
    extract::{Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use subtle::ConstantTimeEq;
use tracing::warn;

use super::http::server::{api_entities::api_error::ApiError, app_state::AppState};

pub async fn extract_token_from_bearer(parts: &mut Parts) -> Result<String, ApiError> {
    let TypedHeader(Authorization(bearer)) = parts
        .extract::<TypedHeader<Authorization<Bearer>>>()
        .await
        .map_err(|_| ApiError::Unauthorized("Missing bearer token".to_string()))?;

    Ok(bearer.token().to_string())
}

/// Compares in constant time for equal lengths
fn tokens_match(provided: &str, expected: &str) -> bool {
    provided.as_bytes().ct_eq(expected.as_bytes()).into()
}

/// Requires `Authorization: Bearer <token>` when an API token is configured.
/// Without a configured token every request passes.
pub async fn auth(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(expected) = state.args.server.api_token.as_deref() else {
        return Ok(next.run(req).await);
    };

    let (mut parts, body) = req.into_parts();
    let token = extract_token_from_bearer(&mut parts).await?;

    if !tokens_match(&token, expected) {
        warn!(uri = %parts.uri, "Rejected request with invalid token");
        return Err(ApiError::Unauthorized("Invalid token".to_string()));
    }

    Ok(next.run(Request::from_parts(parts, body)).await)
}
