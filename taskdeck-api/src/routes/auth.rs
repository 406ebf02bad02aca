/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /register` - Create an account
/// - `POST /login` - Exchange credentials for an access token

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::profile::UserProfile,
};
use axum::{extract::State, http::StatusCode, Form, Json};
use serde::{Deserialize, Serialize};
use taskdeck_shared::{
    auth::{
        password::{hash_password, verify_password},
        token::{create_token, Claims},
    },
    models::user::{CreateUser, User},
};
use validator::Validate;

/// Registration request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Username (unique, case-sensitive)
    #[validate(length(min = 3, max = 64, message = "Username must be 3-64 characters"))]
    pub username: String,

    /// Email address (unique)
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Optional display name
    #[validate(length(max = 255, message = "Name must be at most 255 characters"))]
    pub name: Option<String>,

    /// Optional phone number
    #[validate(length(max = 32, message = "Phone must be at most 32 characters"))]
    pub phone: Option<String>,
}

/// Login form body (`application/x-www-form-urlencoded`)
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    /// Username
    pub username: String,

    /// Password
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    /// Signed access token, valid for 30 minutes
    pub access_token: String,

    /// Always "bearer"
    pub token_type: String,
}

/// Registers a new user
///
/// Performs one combined duplicate check over username and email, hashes the
/// password, and inserts the account. The check is advisory: losing the race
/// to a concurrent insert surfaces the unique violation as the same conflict
/// response.
///
/// # Endpoint
///
/// ```text
/// POST /register
/// Content-Type: application/json
///
/// {
///   "username": "alice",
///   "email": "alice@example.com",
///   "password": "correct-horse-battery",
///   "name": "Alice"
/// }
/// ```
///
/// # Errors
///
/// - `400`: username or email already registered
/// - `422`: validation failed
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<UserProfile>)> {
    req.validate()?;

    if User::find_by_username_or_email(&state.db, &req.username, &req.email)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict(
            "Username or email already registered".to_string(),
        ));
    }

    let password_hash = hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            username: req.username,
            email: req.email,
            password_hash,
            name: req.name,
            phone: req.phone,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(UserProfile::from(&user))))
}

/// Logs a user in and issues an access token
///
/// Unknown usernames and wrong passwords produce the same response, so the
/// endpoint cannot be used to probe which usernames exist.
///
/// # Endpoint
///
/// ```text
/// POST /login
/// Content-Type: application/x-www-form-urlencoded
///
/// username=alice&password=correct-horse-battery
/// ```
///
/// # Response
///
/// ```json
/// {
///   "access_token": "eyJ...",
///   "token_type": "bearer"
/// }
/// ```
///
/// # Errors
///
/// - `401`: invalid username or password
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> ApiResult<Json<TokenResponse>> {
    let user = User::find_by_username(&state.db, &form.username)
        .await?
        .ok_or_else(|| ApiError::Unauthenticated("Invalid username or password".to_string()))?;

    let valid = verify_password(&form.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthenticated(
            "Invalid username or password".to_string(),
        ));
    }

    let claims = Claims::new(user.username.as_str());
    let access_token = create_token(&claims, state.jwt_secret())?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> RegisterRequest {
        RegisterRequest {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "correct-horse-battery".to_string(),
            name: None,
            phone: None,
        }
    }

    #[test]
    fn test_register_request_valid() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_register_request_rejects_bad_email() {
        let mut req = valid_request();
        req.email = "nope".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_register_request_rejects_short_username() {
        let mut req = valid_request();
        req.username = "ab".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_register_request_rejects_short_password() {
        let mut req = valid_request();
        req.password = "short".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_token_response_shape() {
        let response = TokenResponse {
            access_token: "abc".to_string(),
            token_type: "bearer".to_string(),
        };

        let json = serde_json::to_value(&response).expect("Should serialize");
        assert_eq!(json["token_type"], "bearer");
        assert_eq!(json["access_token"], "abc");
    }
}
