//! Page linking strategies
//!
//! Each base implements [`Page`] once; per-resource page types wrap a base
//! and delegate, so link parsing is never duplicated per resource.

use super::types::{json_kind, Page, PageResult};
use crate::error::{Error, Result};
use serde_json::Value;

// ============================================================================
// Linked Pagination
// ============================================================================

/// Pagination by links embedded in the body
///
/// The next address is read from a `<collection>_links` array:
///
/// ```json
/// {
///   "vips": [ ... ],
///   "vips_links": [
///     { "href": "https://net.example.com/v2.0/lb/vips?marker=x", "rel": "next" }
///   ]
/// }
/// ```
///
/// Relative hrefs are resolved against the URL the page was fetched from.
#[derive(Debug, Clone)]
pub struct LinkedPageBase {
    result: PageResult,
    collection_key: String,
    links_key: String,
}

impl LinkedPageBase {
    /// Wrap `result`, reading records from `collection_key` and links from
    /// `<collection_key>_links`
    pub fn new(result: PageResult, collection_key: impl Into<String>) -> Self {
        let collection_key = collection_key.into();
        let links_key = format!("{collection_key}_links");
        Self {
            result,
            collection_key,
            links_key,
        }
    }

    /// Read links from a differently named field
    #[must_use]
    pub fn with_links_key(mut self, links_key: impl Into<String>) -> Self {
        self.links_key = links_key.into();
        self
    }

    /// Field holding the records
    pub fn collection_key(&self) -> &str {
        &self.collection_key
    }
}

impl Page for LinkedPageBase {
    fn result(&self) -> &PageResult {
        &self.result
    }

    fn is_empty(&self) -> bool {
        self.result.has_no_records(&self.collection_key)
    }

    fn next_page_url(&self) -> Result<Option<String>> {
        let links = match self.result.body.get(&self.links_key) {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::Array(links)) => links,
            Some(other) => {
                return Err(Error::link(format!(
                    "'{}' must be an array, found {}",
                    self.links_key,
                    json_kind(other)
                )))
            }
        };

        for link in links {
            if link.get("rel").and_then(Value::as_str) != Some("next") {
                continue;
            }

            let href = match link.get("href") {
                Some(Value::String(href)) => href,
                Some(other) => {
                    return Err(Error::link(format!(
                        "next href must be a string, found {}",
                        json_kind(other)
                    )))
                }
                None => return Err(Error::link("next link has no href")),
            };

            if href.is_empty() {
                return Ok(None);
            }

            let resolved = self
                .result
                .url
                .join(href)
                .map_err(|e| Error::link(format!("cannot resolve '{href}': {e}")))?;
            return Ok(Some(resolved.to_string()));
        }

        Ok(None)
    }
}

// ============================================================================
// Marker Pagination
// ============================================================================

/// Pagination by marker
///
/// For services that do not embed links: the next address is the current
/// page's URL, all original query parameters kept, with `marker` set to the
/// identifier of the last record. A page without records ends iteration.
#[derive(Debug, Clone)]
pub struct MarkerPageBase {
    result: PageResult,
    collection_key: String,
    marker_field: String,
}

/// Query parameter carrying the marker
pub const MARKER_PARAM: &str = "marker";

impl MarkerPageBase {
    /// Wrap `result`, reading records from `collection_key` and the marker
    /// from each record's `marker_field`
    pub fn new(
        result: PageResult,
        collection_key: impl Into<String>,
        marker_field: impl Into<String>,
    ) -> Self {
        Self {
            result,
            collection_key: collection_key.into(),
            marker_field: marker_field.into(),
        }
    }

    /// Identifier of the last record on this page
    pub fn last_marker(&self) -> Result<Option<String>> {
        let Some(last) = self
            .result
            .records(&self.collection_key)
            .and_then(|records| records.last())
        else {
            return Ok(None);
        };

        match last.get(&self.marker_field) {
            Some(Value::String(marker)) => Ok(Some(marker.clone())),
            Some(Value::Number(marker)) => Ok(Some(marker.to_string())),
            Some(other) => Err(Error::link(format!(
                "marker field '{}' must be a string, found {}",
                self.marker_field,
                json_kind(other)
            ))),
            None => Err(Error::link(format!(
                "last record has no '{}' to use as marker",
                self.marker_field
            ))),
        }
    }
}

impl Page for MarkerPageBase {
    fn result(&self) -> &PageResult {
        &self.result
    }

    fn is_empty(&self) -> bool {
        self.result.has_no_records(&self.collection_key)
    }

    fn next_page_url(&self) -> Result<Option<String>> {
        let Some(marker) = self.last_marker()? else {
            return Ok(None);
        };

        let mut next = self.result.url.clone();
        let kept: Vec<(String, String)> = next
            .query_pairs()
            .filter(|(key, _)| key != MARKER_PARAM)
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        next.query_pairs_mut()
            .clear()
            .extend_pairs(kept)
            .append_pair(MARKER_PARAM, &marker);

        Ok(Some(next.to_string()))
    }
}

// ============================================================================
// Single Page
// ============================================================================

/// Collections the service returns in one response
#[derive(Debug, Clone)]
pub struct SinglePageBase {
    result: PageResult,
    collection_key: String,
}

impl SinglePageBase {
    /// Wrap `result`, reading records from `collection_key`
    pub fn new(result: PageResult, collection_key: impl Into<String>) -> Self {
        Self {
            result,
            collection_key: collection_key.into(),
        }
    }
}

impl Page for SinglePageBase {
    fn result(&self) -> &PageResult {
        &self.result
    }

    fn is_empty(&self) -> bool {
        self.result.has_no_records(&self.collection_key)
    }

    fn next_page_url(&self) -> Result<Option<String>> {
        Ok(None)
    }
}
