//! Pager: fetch-and-advance driver over a paginated collection

use super::types::{Page, PageResult, Transport};
use crate::error::{Error, Result};
use tracing::debug;
use url::Url;

/// Constructor turning a fetched response into a resource's page type
pub type PageConstructor<'t, P> = Box<dyn Fn(PageResult) -> P + Send + Sync + 't>;

/// Cursor over a paginated collection
///
/// Created per `list` call and consumed by iteration, so a pager is never
/// reused. Pages are fetched one at a time: the visitor for page N returns
/// before page N+1 is requested, and nothing is fetched ahead.
pub struct Pager<'t, P> {
    transport: &'t dyn Transport,
    initial_url: String,
    create_page: PageConstructor<'t, P>,
    err: Option<Error>,
}

impl<'t, P: Page> Pager<'t, P> {
    /// Create a pager starting at `initial_url`
    pub fn new<F>(transport: &'t dyn Transport, initial_url: impl Into<String>, create_page: F) -> Self
    where
        F: Fn(PageResult) -> P + Send + Sync + 't,
    {
        Self {
            transport,
            initial_url: initial_url.into(),
            create_page: Box::new(create_page),
            err: None,
        }
    }

    /// Create a pager that fails with `err` on iteration, without fetching
    ///
    /// Lets `list` functions report invalid options through the same error
    /// channel as transport failures.
    pub fn invalid<F>(transport: &'t dyn Transport, err: Error, create_page: F) -> Self
    where
        F: Fn(PageResult) -> P + Send + Sync + 't,
    {
        Self {
            transport,
            initial_url: String::new(),
            create_page: Box::new(create_page),
            err: Some(err),
        }
    }

    /// Address of the first page
    pub fn initial_url(&self) -> &str {
        &self.initial_url
    }

    /// Visit every page in order
    ///
    /// The visitor returns `Ok(true)` to continue, `Ok(false)` to stop
    /// early (not an error), or an error, which is returned unchanged.
    /// Iteration also ends successfully on a page with no records (the
    /// visitor is not called for it) or when a page has no next link.
    ///
    /// A malformed next link is reported only after the visitor has seen
    /// the page carrying it. So is a next link that points back at the page
    /// just fetched, which would otherwise repeat forever.
    pub async fn each_page<F>(self, mut visitor: F) -> Result<()>
    where
        F: FnMut(P) -> Result<bool>,
    {
        if let Some(err) = self.err {
            return Err(err);
        }

        let mut current = Some(self.initial_url);
        let mut page_number = 0usize;

        while let Some(url) = current.take() {
            if url.is_empty() {
                break;
            }

            page_number += 1;
            debug!(page = page_number, url = %url, "Fetching page");

            let result = self.transport.get_page(&url).await?;
            let page = (self.create_page)(result);

            if page.is_empty() {
                debug!(page = page_number, "Empty page, pagination complete");
                return Ok(());
            }

            let fetched = page.result().url.clone();
            let next = page.next_page_url();

            if !visitor(page)? {
                debug!(page = page_number, "Visitor stopped pagination");
                return Ok(());
            }

            current = next?;
            if let Some(next) = &current {
                if *next == url || Url::parse(next).is_ok_and(|next| next == fetched) {
                    return Err(Error::link(format!(
                        "next link {next} repeats the page just fetched"
                    )));
                }
            }
        }

        debug!(pages = page_number, "No next page, pagination complete");
        Ok(())
    }

    /// Fetch every page
    pub async fn all_pages(self) -> Result<Vec<P>> {
        let mut pages = Vec::new();
        self.each_page(|page| {
            pages.push(page);
            Ok(true)
        })
        .await?;
        Ok(pages)
    }

    /// Fetch every page and concatenate the records `extract` decodes
    pub async fn extract_all<T, E>(self, extract: E) -> Result<Vec<T>>
    where
        E: Fn(&P) -> Result<Vec<T>>,
    {
        let mut records = Vec::new();
        self.each_page(|page| {
            records.extend(extract(&page)?);
            Ok(true)
        })
        .await?;
        Ok(records)
    }
}

impl<P> std::fmt::Debug for Pager<'_, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pager")
            .field("initial_url", &self.initial_url)
            .field("err", &self.err)
            .finish_non_exhaustive()
    }
}
