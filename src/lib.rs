//! VitalPath - health coaching study client library
//!
//! This library provides the client side of the VitalPath research study:
//! authentication against the REST API, the onboarding ("discovery")
//! questionnaire, and the wellness dashboard.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `api`: HTTP client, bearer-token interceptor and wire types
//! - `session`: token persistence and the refresh coordinator
//! - `discovery`: questionnaire state, validation, drafts and submission
//! - `dashboard`: history, progress against baseline and rendering
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli` / `commands`: Command-line interface definition and handlers
//!
//! # Example
//!
//! ```no_run
//! use vitalpath::{ApiClient, Config, DashboardView};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     let client = ApiClient::from_config(&config)?;
//!     let view = DashboardView::load(&client).await?;
//!     println!("{} entries", view.history().len());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod dashboard;
pub mod discovery;
pub mod error;
pub mod logging;
pub mod session;

// Re-export commonly used types
pub use api::ApiClient;
pub use config::Config;
pub use dashboard::DashboardView;
pub use discovery::{submit_discovery, DiscoveryForm};
pub use error::{Result, SessionError, VitalPathError};
pub use session::SessionManager;
