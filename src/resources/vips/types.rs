//! Virtual IP types

use crate::error::{Error, Result};
use crate::pagination::{extract_collection, LinkedPageBase, Page, PageResult};
use crate::query::{QueryBuilder, QueryPairs, ToQuery};
use crate::resources::null_as_default;
use serde::{Deserialize, Serialize};

/// Field holding the records of a vips page
pub(crate) const VIPS_KEY: &str = "vips";

// ============================================================================
// Records
// ============================================================================

/// A load-balancer virtual IP
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualIp {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,

    /// Owner of the VIP; only admins may set it on create
    #[serde(default, deserialize_with = "null_as_default")]
    pub tenant_id: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,

    /// Subnet the address is allocated from
    #[serde(default, deserialize_with = "null_as_default")]
    pub subnet_id: String,

    /// IP address of the VIP
    #[serde(default, deserialize_with = "null_as_default")]
    pub address: String,

    /// Port holding the address
    #[serde(default, deserialize_with = "null_as_default")]
    pub port_id: String,

    /// TCP, HTTP or HTTPS
    #[serde(default, deserialize_with = "null_as_default")]
    pub protocol: String,

    /// Port clients connect to
    #[serde(default, deserialize_with = "null_as_default")]
    pub protocol_port: u16,

    #[serde(default, deserialize_with = "null_as_default")]
    pub pool_id: String,

    #[serde(default)]
    pub session_persistence: Option<SessionPersistence>,

    /// Maximum concurrent connections, `-1` for unlimited
    #[serde(default, deserialize_with = "null_as_default")]
    pub connection_limit: i64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub admin_state_up: bool,

    /// ACTIVE, PENDING_CREATE, ERROR, ...
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
}

/// How requests from one client stick to a pool member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPersistence {
    /// SOURCE_IP, HTTP_COOKIE or APP_COOKIE
    #[serde(rename = "type")]
    pub kind: String,

    /// Cookie to track, only for APP_COOKIE
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookie_name: Option<String>,
}

impl SessionPersistence {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            cookie_name: None,
        }
    }

    #[must_use]
    pub fn with_cookie(mut self, cookie_name: impl Into<String>) -> Self {
        self.cookie_name = Some(cookie_name.into());
        self
    }
}

// ============================================================================
// Page
// ============================================================================

/// One page of virtual IPs
#[derive(Debug, Clone)]
pub struct VipPage(LinkedPageBase);

impl VipPage {
    pub fn new(result: PageResult) -> Self {
        Self(LinkedPageBase::new(result, VIPS_KEY))
    }
}

impl Page for VipPage {
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

/// Decode the virtual IPs on a page, in response order
pub fn extract_vips(page: &VipPage) -> Result<Vec<VirtualIp>> {
    extract_collection(&page.result().body, VIPS_KEY)
}

// ============================================================================
// Options
// ============================================================================

/// Filters and sorting for [`list`](super::list)
///
/// Unset, empty and zero fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOpts {
    pub id: Option<String>,
    pub name: Option<String>,
    pub admin_state_up: Option<bool>,
    pub status: Option<String>,
    pub tenant_id: Option<String>,
    pub subnet_id: Option<String>,
    pub address: Option<String>,
    pub port_id: Option<String>,
    pub protocol: Option<String>,
    pub protocol_port: Option<u16>,
    pub connection_limit: Option<i64>,
    /// Page size
    pub limit: Option<u32>,
    /// Start after the VIP with this ID
    pub marker: Option<String>,
    /// Attribute to sort by
    pub sort_key: Option<String>,
    /// `asc` or `desc`
    pub sort_dir: Option<String>,
}

impl ToQuery for ListOpts {
    fn query_pairs(&self) -> Result<QueryPairs> {
        Ok(QueryBuilder::new()
            .string("id", &self.id)
            .string("name", &self.name)
            .flag("admin_state_up", self.admin_state_up)
            .string("status", &self.status)
            .string("tenant_id", &self.tenant_id)
            .string("subnet_id", &self.subnet_id)
            .string("address", &self.address)
            .string("port_id", &self.port_id)
            .string("protocol", &self.protocol)
            .number("protocol_port", self.protocol_port)
            .number("connection_limit", self.connection_limit)
            .number("limit", self.limit)
            .string("marker", &self.marker)
            .string("sort_key", &self.sort_key)
            .sort_dir("sort_dir", &self.sort_dir)?
            .build())
    }
}

/// Parameters for [`create`](super::create)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateOpts {
    /// Required; need not be unique
    pub name: String,
    /// Required; subnet to allocate the address from
    pub subnet_id: String,
    /// Required; TCP, HTTP or HTTPS
    pub protocol: String,
    /// Required; port to listen on
    pub protocol_port: u16,
    /// Required; pool to balance over
    pub pool_id: String,
    /// Owner, admin only
    pub tenant_id: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
    /// Omit to disable session persistence
    pub persistence: Option<SessionPersistence>,
    pub connection_limit: Option<i64>,
    pub admin_state_up: Option<bool>,
}

impl CreateOpts {
    /// Check required fields in order: name, subnet_id, protocol,
    /// protocol_port, pool_id
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::required("name"));
        }
        if self.subnet_id.is_empty() {
            return Err(Error::required("subnet_id"));
        }
        if self.protocol.is_empty() {
            return Err(Error::required("protocol"));
        }
        if self.protocol_port == 0 {
            return Err(Error::required("protocol_port"));
        }
        if self.pool_id.is_empty() {
            return Err(Error::required("pool_id"));
        }
        Ok(())
    }

    pub(crate) fn to_body(&self) -> CreateBody<'_> {
        CreateBody {
            name: &self.name,
            subnet_id: &self.subnet_id,
            protocol: &self.protocol,
            protocol_port: self.protocol_port,
            pool_id: &self.pool_id,
            description: non_empty(&self.description),
            tenant_id: non_empty(&self.tenant_id),
            address: non_empty(&self.address),
            session_persistence: self.persistence.as_ref(),
            connection_limit: self.connection_limit,
            admin_state_up: self.admin_state_up,
        }
    }
}

/// Parameters for [`update`](super::update); unset fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateOpts {
    pub name: Option<String>,
    pub pool_id: Option<String>,
    pub description: Option<String>,
    pub persistence: Option<SessionPersistence>,
    pub connection_limit: Option<i64>,
    pub admin_state_up: Option<bool>,
}

impl UpdateOpts {
    pub(crate) fn to_body(&self) -> UpdateBody<'_> {
        UpdateBody {
            name: self.name.as_deref(),
            pool_id: self.pool_id.as_deref(),
            description: self.description.as_deref(),
            session_persistence: self.persistence.as_ref(),
            connection_limit: self.connection_limit,
            admin_state_up: self.admin_state_up,
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

// ============================================================================
// Wire bodies
// ============================================================================

#[derive(Debug, Serialize)]
pub(crate) struct CreateBody<'a> {
    name: &'a str,
    subnet_id: &'a str,
    protocol: &'a str,
    protocol_port: u16,
    pool_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tenant_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    address: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    session_persistence: Option<&'a SessionPersistence>,
    #[serde(skip_serializing_if = "Option::is_none")]
    connection_limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    admin_state_up: Option<bool>,
}

#[derive(Debug, Serialize)]
pub(crate) struct UpdateBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pool_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    session_persistence: Option<&'a SessionPersistence>,
    #[serde(skip_serializing_if = "Option::is_none")]
    connection_limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    admin_state_up: Option<bool>,
}

/// `{"vip": {...}}` envelope used by requests and responses
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct VipEnvelope<T> {
    pub vip: T,
}
