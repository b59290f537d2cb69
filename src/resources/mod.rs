//! Resource collections
//!
//! Each resource module follows the same layout:
//! - `types`: records, option structs and the resource's page type
//! - `requests`: `list` returning a [`Pager`](crate::pagination::Pager),
//!   plus single-resource operations
//!
//! Option structs are validated before any request is sent. For `list`,
//! validation errors are delivered through the pager so callers handle one
//! error channel.

pub mod databases;
pub mod vips;

use serde::{Deserialize, Deserializer};

/// Deserialize `null` as the type's default
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
