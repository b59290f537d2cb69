//! Pagination types and traits
//!
//! Defines the core pagination abstractions shared by every resource
//! collection: the fetched [`PageResult`], the [`Page`] capability set,
//! and the [`Transport`] the pager fetches through.

use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

/// One response body already retrieved from the service
///
/// Immutable once built. The URL it was fetched from is kept so relative
/// next links can be resolved against it and marker URLs can be derived
/// from its query.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult {
    /// Decoded response body
    pub body: Value,
    /// Address this page was fetched from
    pub url: Url,
    /// HTTP status of the response
    pub status: u16,
}

impl PageResult {
    /// Create a new page result
    pub fn new(url: Url, status: u16, body: Value) -> Self {
        Self { body, url, status }
    }

    /// Parse a raw response body into a page result
    ///
    /// An empty body decodes to `null`, which every page variant treats
    /// as a page without records.
    pub fn from_body(url: Url, status: u16, raw: &str) -> Result<Self> {
        let body = if raw.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(raw)
                .map_err(|e| Error::decode(format!("response from {url} is not JSON: {e}")))?
        };
        Ok(Self::new(url, status, body))
    }

    /// The records array under `key`, if present and an array
    pub fn records(&self, key: &str) -> Option<&Vec<Value>> {
        self.body.get(key).and_then(Value::as_array)
    }

    /// Whether the page holds zero records under `key`
    ///
    /// A field that is present but not an array counts as non-empty so the
    /// visitor runs and extraction reports the decode error.
    pub fn has_no_records(&self, key: &str) -> bool {
        match self.body.get(key) {
            None | Some(Value::Null) => true,
            Some(Value::Array(items)) => items.is_empty(),
            Some(_) => false,
        }
    }
}

/// Capability set every page variant provides
///
/// The pager only talks to pages through this trait, so it is agnostic to
/// whether a collection paginates by embedded link, by marker, or not at all.
pub trait Page: Send {
    /// The response this page wraps
    fn result(&self) -> &PageResult;

    /// True if this page contains zero records
    fn is_empty(&self) -> bool;

    /// Absolute URL of the following page, `None` on the last page
    ///
    /// Fails only when the link metadata in the body is malformed.
    fn next_page_url(&self) -> Result<Option<String>>;
}

/// The fetch side of the pager
///
/// Implementations must return an error for any non-2xx status or network
/// failure. Timeouts and cancellation are the transport's concern and
/// surface here as ordinary errors.
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `url` and wrap the response body
    async fn get_page(&self, url: &str) -> Result<PageResult>;
}

/// Decode the collection under `key` into typed records
///
/// Absent or `null` collections decode to an empty vector. Order matches
/// the response body.
pub fn extract_collection<T: DeserializeOwned>(body: &Value, key: &str) -> Result<Vec<T>> {
    match body.get(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                T::deserialize(item)
                    .map_err(|e| Error::decode(format!("{key}[{i}]: {e}")))
            })
            .collect(),
        Some(other) => Err(Error::decode(format!(
            "expected '{key}' to be an array, found {}",
            json_kind(other)
        ))),
    }
}

/// Short name of a JSON value's kind for error messages
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
