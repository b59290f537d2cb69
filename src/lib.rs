// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # stackclient
//!
//! A client for OpenStack-style cloud control planes, built around one
//! uniform way of walking paginated collections.
//!
//! ## Features
//!
//! - **Lazy Pagination**: Pages are fetched one at a time as the caller
//!   consumes them, and a visitor can stop iteration early
//! - **Pagination Strategies**: Embedded next links, marker, single page
//! - **Typed Resources**: Load-balancer virtual IPs, database-service databases
//! - **Identity Auth**: Scoped tokens and Identity v3 password auth
//! - **HTTP Client**: Retry with backoff for idempotent requests, rate limiting
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stackclient::config::CloudsFile;
//! use stackclient::resources::vips;
//!
//! #[tokio::main]
//! async fn main() -> stackclient::Result<()> {
//!     let clouds = CloudsFile::load("clouds.yaml")?;
//!     let network = clouds.cloud("prod")?.network_client()?;
//!
//!     vips::list(&network, &vips::ListOpts::default())
//!         .each_page(|page| {
//!             for vip in vips::extract_vips(&page)? {
//!                 println!("{} {}", vip.id, vip.address);
//!             }
//!             Ok(true)
//!         })
//!         .await
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │              Resources (vips, databases)                  │
//! │   list(client, opts) → Pager     create / get / delete    │
//! └───────────────────────────────────────────────────────────┘
//!                              │
//! ┌──────────────┬─────────────┴─────────────┬────────────────┐
//! │  Pagination  │      ServiceClient        │     Query      │
//! ├──────────────┼───────────────────────────┼────────────────┤
//! │ Pager        │ endpoint + URL building   │ ToQuery        │
//! │ Linked       │ Transport impl            │ populated-only │
//! │ Marker       │                           │ fields         │
//! │ Single       │                           │                │
//! └──────────────┴─────────────┬─────────────┴────────────────┘
//!                              │
//! ┌──────────────┬─────────────┴─────────────┬────────────────┐
//! │     Auth     │          HTTP             │    Config      │
//! │ Token, v3    │ Retry, Rate Limit         │ clouds.yaml    │
//! │ password     │ Expected status codes     │ OS_* env       │
//! └──────────────┴───────────────────────────┴────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Authentication implementations
pub mod auth;

/// HTTP client with retry and rate limiting
pub mod http;

/// Pagination engine
pub mod pagination;

/// Query string construction for list options
pub mod query;

/// Endpoint-bound service clients
pub mod client;

/// Resource collections
pub mod resources;

/// Cloud configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use client::ServiceClient;
pub use config::{CloudConfig, CloudsFile};
pub use error::{Error, Result};
pub use pagination::{Page, PageResult, Pager, Transport};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
