/// Middleware modules for the API server
///
/// - `security`: Security response headers
///
/// JWT authentication lives in [`crate::app`] because it needs the
/// application state.

pub mod security;
