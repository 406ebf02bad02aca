/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Registration and login
/// - `profile`: Profile reads/updates and password changes
/// - `tasks`: Owner-scoped task CRUD

pub mod auth;
pub mod health;
pub mod profile;
pub mod tasks;
