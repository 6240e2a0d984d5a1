/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (register, login, refresh)
/// - `projects`: Owner-scoped project endpoints
/// - `tasks`: Project-scoped task endpoints

pub mod auth;
pub mod health;
pub mod projects;
pub mod tasks;
