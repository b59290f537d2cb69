//! Load-balancer virtual IPs
//!
//! A virtual IP is the address clients connect to; traffic is balanced over
//! the members of the associated pool. The collection lives under `lb/vips`
//! on the network service and paginates with embedded `vips_links`.

mod requests;
mod types;

pub use requests::{create, delete, get, list, update};
pub use types::{
    extract_vips, CreateOpts, ListOpts, SessionPersistence, UpdateOpts, VipPage, VirtualIp,
};
