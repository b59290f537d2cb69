//! Database types

use crate::error::{Error, Result};
use crate::pagination::{extract_collection, LinkedPageBase, Page, PageResult};
use crate::query::{QueryBuilder, QueryPairs, ToQuery};
use serde::{Deserialize, Serialize};

pub(crate) const DATABASES_KEY: &str = "databases";

/// Longest database name the service accepts
pub const MAX_NAME_LEN: usize = 64;

/// A database on an instance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Database {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_set: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collate: Option<String>,
}

/// One page of databases
#[derive(Debug, Clone)]
pub struct DatabasePage(LinkedPageBase);

impl DatabasePage {
    pub fn new(result: PageResult) -> Self {
        Self(LinkedPageBase::new(result, DATABASES_KEY))
    }
}

impl Page for DatabasePage {
    fn result(&self) -> &PageResult {
        self.0.result()
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn next_page_url(&self) -> Result<Option<String>> {
        self.0.next_page_url()
    }
}

/// Decode the databases on a page, in response order
pub fn extract_databases(page: &DatabasePage) -> Result<Vec<Database>> {
    extract_collection(&page.result().body, DATABASES_KEY)
}

/// Paging for [`list`](super::list)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOpts {
    /// Page size
    pub limit: Option<u32>,
    /// Start after the database with this name
    pub marker: Option<String>,
}

impl ToQuery for ListOpts {
    fn query_pairs(&self) -> Result<QueryPairs> {
        Ok(QueryBuilder::new()
            .number("limit", self.limit)
            .string("marker", &self.marker)
            .build())
    }
}

/// One database to create
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreateOpts {
    pub name: String,

    /// Defaults to `utf8` on the service
    #[serde(skip_serializing_if = "Option::is_none")]
    pub character_set: Option<String>,

    /// Defaults to `utf8_general_ci` on the service
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collate: Option<String>,
}

impl CreateOpts {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::required("name"));
        }
        if self.name.chars().count() > MAX_NAME_LEN {
            return Err(Error::validation(
                "name",
                format!("must be at most {MAX_NAME_LEN} characters"),
            ));
        }
        Ok(())
    }
}

/// Several databases created in one request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchCreateOpts(pub Vec<CreateOpts>);

impl BatchCreateOpts {
    /// Every entry must be valid and there must be at least one
    pub fn validate(&self) -> Result<()> {
        if self.0.is_empty() {
            return Err(Error::validation("databases", "at least one database is required"));
        }
        self.0.iter().try_for_each(CreateOpts::validate)
    }
}

impl From<Vec<CreateOpts>> for BatchCreateOpts {
    fn from(opts: Vec<CreateOpts>) -> Self {
        Self(opts)
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateRequest<'a> {
    pub databases: &'a [CreateOpts],
}
