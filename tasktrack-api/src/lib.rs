//! # TaskTrack API Server Library
//!
//! HTTP surface over the owner-scoped data-access core in
//! `tasktrack-shared`.
//!
//! ## Modules
//!
//! - `app`: Application state, router builder and JWT auth layer
//! - `config`: Configuration management
//! - `extract`: Body and path extractors that reject with `ApiError`
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Security headers
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
