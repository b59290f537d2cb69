//! Pagination module
//!
//! Supports: embedded next links, marker, single page
//!
//! # Overview
//!
//! Every resource collection is iterated the same way: a `list` call
//! returns a [`Pager`] bound to the first URL, and [`Pager::each_page`]
//! fetches pages one by one, handing each to a visitor that decides
//! whether to continue. Resource pages implement the [`Page`] trait by
//! wrapping one of the strategy bases, and per-resource extraction helpers
//! decode a page into typed records with [`extract_collection`].
//!
//! ```rust,ignore
//! let mut names = Vec::new();
//! vips::list(&client, &ListOpts::default())
//!     .each_page(|page| {
//!         for vip in vips::extract_vips(&page)? {
//!             names.push(vip.name);
//!         }
//!         Ok(true)
//!     })
//!     .await?;
//! ```

mod pager;
mod strategies;
mod types;

pub use pager::{PageConstructor, Pager};
pub use strategies::{LinkedPageBase, MarkerPageBase, SinglePageBase, MARKER_PARAM};
pub use types::{extract_collection, Page, PageResult, Transport};

#[cfg(test)]
mod tests;
