//! HTTP access to the VitalPath backend
//!
//! # Module Layout
//!
//! - [`auth`]     -- bearer-token interceptor with one refresh-and-retry
//! - [`client`]   -- [`ApiClient`], one method per endpoint
//! - [`response`] -- status checks and error-body message extraction
//! - [`types`]    -- request and response shapes

pub mod auth;
pub mod client;
pub mod response;
pub mod types;

pub use auth::AuthInterceptor;
pub use client::ApiClient;
