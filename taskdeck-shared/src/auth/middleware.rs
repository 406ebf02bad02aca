/// Authentication middleware for Axum
///
/// Turns an incoming `Authorization: Bearer <token>` header into a resolved
/// [`CurrentUser`] request extension. The pipeline is: extract the bearer
/// token, validate it against the signing secret, then resolve the token
/// subject to a user row — the subject may no longer exist if the account
/// went away after issuance.
///
/// Every credential failure — missing header, malformed header, forged or
/// expired token, unknown subject — produces the same 401 response with a
/// `WWW-Authenticate: Bearer` challenge. Callers cannot tell an expired
/// token from a forged one. Only a store I/O failure is different: that is a
/// 500, because the credentials were never judged.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Extension, Router};
/// use sqlx::PgPool;
/// use taskdeck_shared::auth::middleware::{create_bearer_auth, CurrentUser};
///
/// async fn whoami(Extension(CurrentUser(user)): Extension<CurrentUser>) -> String {
///     user.username
/// }
///
/// fn protected(pool: PgPool) -> Router {
///     Router::new()
///         .route("/whoami", get(whoami))
///         .layer(middleware::from_fn(create_bearer_auth(pool, "secret")))
/// }
/// ```

use axum::{
    extract::Request,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use sqlx::PgPool;

use super::token::validate_token;
use crate::models::user::User;

/// Generic message returned for every credential failure
const UNAUTHENTICATED_MESSAGE: &str = "Invalid authentication credentials";

/// The authenticated identity attached to the request
///
/// Added to request extensions after successful authentication; handlers
/// extract it with Axum's `Extension` extractor. Holds the full resolved
/// user row so handlers never re-fetch the caller.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Error type for the authentication middleware
///
/// The variants exist for logging and tests; over HTTP all credential
/// variants collapse into one uniform 401.
#[derive(Debug)]
pub enum AuthError {
    /// Authorization header absent
    MissingCredentials,

    /// Authorization header present but not a Bearer token
    InvalidFormat,

    /// Token failed validation (bad signature, malformed, expired)
    InvalidToken,

    /// Token subject does not resolve to an existing user
    UnknownSubject,

    /// Credential store I/O failed before the credentials could be judged
    DatabaseError(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::DatabaseError(msg) => {
                tracing::error!("auth middleware store failure: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "internal_error",
                        "message": "An internal error occurred",
                    })),
                )
                    .into_response()
            }
            _ => {
                let mut response = (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({
                        "error": "unauthenticated",
                        "message": UNAUTHENTICATED_MESSAGE,
                    })),
                )
                    .into_response();
                response.headers_mut().insert(
                    header::WWW_AUTHENTICATE,
                    HeaderValue::from_static("Bearer"),
                );
                response
            }
        }
    }
}

/// Extracts the bearer token from a header map
///
/// # Errors
///
/// Returns `AuthError::MissingCredentials` when the Authorization header is
/// absent or not valid ASCII, and `AuthError::InvalidFormat` when it does
/// not carry a non-empty Bearer token.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    value
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::InvalidFormat)
}

/// Bearer authentication middleware
///
/// Validates the request's bearer token, resolves the subject against the
/// user store, and injects [`CurrentUser`] into request extensions. The
/// middleware itself is read-only.
pub async fn bearer_auth_middleware(
    pool: PgPool,
    secret: String,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = bearer_token(req.headers())?.to_owned();

    // Expired, forged and malformed tokens are deliberately not distinguished
    let claims = validate_token(&token, &secret).map_err(|_| AuthError::InvalidToken)?;

    let user = User::find_by_username(&pool, &claims.sub)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?
        .ok_or(AuthError::UnknownSubject)?;

    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}

/// Creates a bearer authentication middleware closure
///
/// Captures the pool and signing secret so the result can be handed to
/// `axum::middleware::from_fn`.
pub fn create_bearer_auth(
    pool: PgPool,
    secret: impl Into<String>,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AuthError>> + Send>>
       + Clone {
    let secret = secret.into();
    move |req, next| {
        let pool = pool.clone();
        let secret = secret.clone();
        Box::pin(bearer_auth_middleware(pool, secret, req, next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with_auth(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_extraction() {
        let headers = headers_with_auth("Bearer abc.def.ghi");
        assert_eq!(bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_bearer_token_missing_header() {
        let headers = HeaderMap::new();
        assert!(matches!(
            bearer_token(&headers),
            Err(AuthError::MissingCredentials)
        ));
    }

    #[test]
    fn test_bearer_token_wrong_scheme() {
        let headers = headers_with_auth("Basic dXNlcjpwYXNz");
        assert!(matches!(
            bearer_token(&headers),
            Err(AuthError::InvalidFormat)
        ));
    }

    #[test]
    fn test_bearer_token_empty_token() {
        let headers = headers_with_auth("Bearer ");
        assert!(matches!(
            bearer_token(&headers),
            Err(AuthError::InvalidFormat)
        ));
    }

    #[test]
    fn test_credential_failures_are_uniform_401() {
        let variants = [
            AuthError::MissingCredentials,
            AuthError::InvalidFormat,
            AuthError::InvalidToken,
            AuthError::UnknownSubject,
        ];

        for err in variants {
            let response = err.into_response();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            assert_eq!(
                response
                    .headers()
                    .get(header::WWW_AUTHENTICATE)
                    .and_then(|v| v.to_str().ok()),
                Some("Bearer")
            );
        }
    }

    #[test]
    fn test_store_failure_is_500_without_challenge() {
        let response = AuthError::DatabaseError("pool exhausted".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().get(header::WWW_AUTHENTICATE).is_none());
    }
}
