//! Databases on a database-service instance
//!
//! Databases live under `instances/{id}/databases`. Listing follows the
//! `databases_links` next link the service embeds once a page is full; a
//! `marker` in [`ListOpts`] resumes after a known database name.

mod requests;
mod types;

pub use requests::{create, delete, list};
pub use types::{
    extract_databases, BatchCreateOpts, CreateOpts, Database, DatabasePage, ListOpts,
    MAX_NAME_LEN,
};
