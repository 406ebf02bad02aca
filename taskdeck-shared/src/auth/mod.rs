/// Authentication and authorization utilities
///
/// This module provides the secure authentication primitives for Taskdeck:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`token`]: Signed access token issuance and validation
/// - [`middleware`]: Axum middleware that turns a bearer token into a resolved user
/// - [`ownership`]: Per-resource owner checks
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with 64 MB memory, 3 iterations
/// - **Access Tokens**: HS256 signing with a fixed 30-minute lifetime
/// - **Constant-time Comparison**: Password verification uses constant-time operations
/// - **Uniform Failures**: Every credential failure surfaces as the same 401

pub mod middleware;
pub mod ownership;
pub mod password;
pub mod token;
