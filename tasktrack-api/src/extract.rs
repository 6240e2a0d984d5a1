/// Request extractors with JSON error bodies
///
/// Thin wrappers over axum's `Json` and `Path` whose rejections go through
/// [`ApiError`], so malformed bodies and path segments answer with the same
/// `{error, message, details?}` shape as every other failure.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::ApiError;

/// JSON request body; rejections become [`ApiError`]
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// Path parameters; rejections become [`ApiError`]
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct PathParam<T>(pub T);
