/// Access token issuance and validation
///
/// Taskdeck authenticates API requests with signed, time-limited bearer
/// tokens. Tokens are JWTs signed with HS256 (HMAC-SHA256) and carry the
/// owning username as their subject. They are stateless: nothing is stored
/// server-side, and validity is a pure function of (token, current time,
/// signing secret).
///
/// # Security
///
/// - **Algorithm**: HS256 (HMAC with SHA-256)
/// - **Lifetime**: fixed 30 minutes from issuance
/// - **Validation**: signature, expiration (zero leeway), and issuer checks
/// - **Secret Management**: the signing secret comes from configuration
///   loaded at startup and should be at least 32 bytes
///
/// There is no revocation list: a token cannot be invalidated before its
/// expiry. The short fixed lifetime is the accepted trade-off.
///
/// # Timekeeping
///
/// All timestamps are UTC seconds since the Unix epoch, produced and compared
/// through `chrono::Utc`. Issuance and validation never mix clock bases.
///
/// # Example
///
/// ```
/// use taskdeck_shared::auth::token::{create_token, validate_token, Claims};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let claims = Claims::new("alice");
/// let token = create_token(&claims, "your-secret-key-at-least-32-bytes")?;
///
/// let validated = validate_token(&token, "your-secret-key-at-least-32-bytes")?;
/// assert_eq!(validated.sub, "alice");
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Issuer claim pinned into every token
pub const TOKEN_ISSUER: &str = "taskdeck";

/// Fixed access token lifetime in minutes
pub const ACCESS_TOKEN_TTL_MINUTES: i64 = 30;

/// Error type for token operations
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Invalid issuer
    #[error("Invalid token issuer")]
    InvalidIssuer,
}

/// Fixed access token lifetime
pub fn access_token_ttl() -> Duration {
    Duration::minutes(ACCESS_TOKEN_TTL_MINUTES)
}

/// Claims carried by an access token
///
/// # Standard Claims
///
/// - `sub`: Subject (username)
/// - `iss`: Issuer (always "taskdeck")
/// - `iat`: Issued at (Unix timestamp)
/// - `exp`: Expiration time (Unix timestamp), always `iat` + 30 minutes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - username of the authenticated user
    pub sub: String,

    /// Issuer - always "taskdeck"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Creates claims for `subject` issued at the current instant
    pub fn new(subject: impl Into<String>) -> Self {
        Self::issued_at(subject, Utc::now())
    }

    /// Creates claims for `subject` issued at an explicit instant
    ///
    /// The expiration is always `issued_at` plus the fixed token lifetime.
    /// Useful where the issue instant must be controlled, e.g. in tests.
    pub fn issued_at(subject: impl Into<String>, issued_at: DateTime<Utc>) -> Self {
        let expiration = issued_at + access_token_ttl();

        Self {
            sub: subject.into(),
            iss: TOKEN_ISSUER.to_string(),
            iat: issued_at.timestamp(),
            exp: expiration.timestamp(),
        }
    }

    /// Checks whether the token is expired at `now`
    ///
    /// A token is valid in `[iat, exp)` and expired at or after `exp`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    /// Checks whether the token is expired right now
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// Signs claims into a compact JWT string
///
/// # Errors
///
/// Returns `TokenError::CreateError` if encoding fails.
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, TokenError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| TokenError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a token and extracts its claims
///
/// Verifies, with zero clock leeway:
/// - the signature matches `secret`
/// - the payload parses and carries a subject
/// - the token has not expired
/// - the issuer is "taskdeck"
///
/// # Errors
///
/// Returns `TokenError::Expired` for an expired token,
/// `TokenError::InvalidIssuer` for a foreign issuer, and
/// `TokenError::ValidationError` for a bad signature or malformed payload.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, TokenError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[TOKEN_ISSUER]);
    validation.validate_exp = true;
    validation.leeway = 0;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidIssuer => TokenError::InvalidIssuer,
        _ => TokenError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}
