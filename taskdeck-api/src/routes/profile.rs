/// Profile and credential management endpoints
///
/// All endpoints here require a valid bearer token; the auth middleware has
/// already resolved the caller into a [`CurrentUser`] extension.
///
/// # Endpoints
///
/// - `GET /profile` - Own public profile
/// - `PUT /profile` - Partial profile update (name/email/phone)
/// - `PUT /update-password` - Change password after verifying the old one
/// - `GET /users/me` - Own public profile, alternate path

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use taskdeck_shared::{
    auth::{
        middleware::CurrentUser,
        password::{hash_password, verify_password},
    },
    models::user::{UpdateProfile, User},
};
use uuid::Uuid;
use validator::Validate;

/// Public view of a user account
///
/// Never carries the password hash.
#[derive(Debug, Serialize)]
pub struct UserProfile {
    /// User ID
    pub id: Uuid,

    /// Username
    pub username: String,

    /// Display name
    pub name: Option<String>,

    /// Email address
    pub email: String,

    /// Phone number
    pub phone: Option<String>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
        }
    }
}

/// Profile update request
///
/// Only provided fields are applied; omitted fields keep their prior value.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    /// New display name
    #[validate(length(max = 255, message = "Name must be at most 255 characters"))]
    pub name: Option<String>,

    /// New email address
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    /// New phone number
    #[validate(length(max = 32, message = "Phone must be at most 32 characters"))]
    pub phone: Option<String>,
}

/// Password change request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePasswordRequest {
    /// Current password, verified before anything changes
    pub old_password: String,

    /// Replacement password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,
}

/// Returns the caller's public profile
///
/// # Endpoint
///
/// `GET /profile`
pub async fn get_profile(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Json<UserProfile>> {
    Ok(Json(UserProfile::from(&user)))
}

/// Alternate profile path kept for client compatibility
///
/// # Endpoint
///
/// `GET /users/me`
pub async fn me(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Json<UserProfile>> {
    Ok(Json(UserProfile::from(&user)))
}

/// Applies a partial profile update
///
/// Email uniqueness is not pre-checked here; the unique constraint on the
/// users table remains authoritative and a collision surfaces as a conflict.
///
/// # Endpoint
///
/// `PUT /profile`
///
/// # Errors
///
/// - `400`: new email collides with another account
/// - `401`: missing/invalid token
/// - `404`: the account no longer exists
/// - `422`: validation failed
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<Value>> {
    req.validate()?;

    let updated = User::update_profile(
        &state.db,
        user.id,
        UpdateProfile {
            name: req.name,
            email: req.email,
            phone: req.phone,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(json!({
        "id": updated.id,
        "name": updated.name,
        "email": updated.email,
        "phone": updated.phone,
    })))
}

/// Replaces the caller's password
///
/// The old password must verify against the stored hash before the new one
/// is accepted; on a mismatch nothing is written. Tokens issued before the
/// change remain valid until their own expiry.
///
/// # Endpoint
///
/// `PUT /update-password`
///
/// # Errors
///
/// - `400`: old password does not verify
/// - `401`: missing/invalid token
/// - `422`: validation failed
pub async fn update_password(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(req): Json<UpdatePasswordRequest>,
) -> ApiResult<Json<Value>> {
    req.validate()?;

    let valid = verify_password(&req.old_password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::InvalidCredential(
            "Incorrect old password".to_string(),
        ));
    }

    let new_hash = hash_password(&req.new_password)?;

    let replaced = User::update_password_hash(&state.db, user.id, &new_hash).await?;
    if !replaced {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    Ok(Json(json!({ "message": "Password updated successfully" })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "$argon2id$hash".to_string(),
            name: Some("Alice".to_string()),
            phone: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_profile_from_user_omits_hash() {
        let user = sample_user();
        let profile = UserProfile::from(&user);

        let json = serde_json::to_string(&profile).expect("Should serialize");
        assert!(json.contains("alice@example.com"));
        assert!(!json.contains("argon2id"));
    }

    #[test]
    fn test_update_profile_request_validation() {
        let req = UpdateProfileRequest {
            name: None,
            email: Some("not-an-email".to_string()),
            phone: None,
        };
        assert!(req.validate().is_err());

        let req = UpdateProfileRequest {
            name: Some("New Name".to_string()),
            email: Some("new@example.com".to_string()),
            phone: None,
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_update_password_request_validation() {
        let req = UpdatePasswordRequest {
            old_password: "old-password".to_string(),
            new_password: "short".to_string(),
        };
        assert!(req.validate().is_err());

        let req = UpdatePasswordRequest {
            old_password: "old-password".to_string(),
            new_password: "long-enough-password".to_string(),
        };
        assert!(req.validate().is_ok());
    }
}
