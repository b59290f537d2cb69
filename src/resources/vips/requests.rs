//! Virtual IP operations

use super::types::{CreateOpts, ListOpts, UpdateOpts, VipEnvelope, VipPage, VirtualIp};
use crate::client::ServiceClient;
use crate::error::{Error, Result};
use crate::pagination::Pager;
use crate::query::ToQuery;
use tracing::info;

fn root_url(client: &ServiceClient) -> String {
    client.service_url(&["lb", "vips"])
}

fn resource_url(client: &ServiceClient, id: &str) -> String {
    client.service_url(&["lb", "vips", id])
}

/// Page through virtual IPs matching `opts`
///
/// By default the service only returns VIPs owned by the caller's tenant,
/// unless the caller is an admin. An invalid `sort_dir` is reported when
/// the pager is iterated, before any request.
pub fn list<'c>(client: &'c ServiceClient, opts: &ListOpts) -> Pager<'c, VipPage> {
    match opts.to_query_string() {
        Ok(query) => Pager::new(client, format!("{}{query}", root_url(client)), VipPage::new),
        Err(err) => Pager::invalid(client, err, VipPage::new),
    }
}

/// Create a virtual IP; the service answers 201
pub async fn create(client: &ServiceClient, opts: &CreateOpts) -> Result<VirtualIp> {
    opts.validate()?;

    let body = serde_json::to_value(VipEnvelope {
        vip: opts.to_body(),
    })?;
    let created: VipEnvelope<VirtualIp> = client.post(&root_url(client), body, &[201]).await?;

    info!(id = %created.vip.id, name = %created.vip.name, "Created virtual IP");
    Ok(created.vip)
}

/// Fetch one virtual IP
pub async fn get(client: &ServiceClient, id: &str) -> Result<VirtualIp> {
    if id.is_empty() {
        return Err(Error::required("id"));
    }

    let found: VipEnvelope<VirtualIp> = client.get(&resource_url(client, id), &[200]).await?;
    Ok(found.vip)
}

/// Change the mutable attributes of a virtual IP
pub async fn update(client: &ServiceClient, id: &str, opts: &UpdateOpts) -> Result<VirtualIp> {
    if id.is_empty() {
        return Err(Error::required("id"));
    }

    let body = serde_json::to_value(VipEnvelope {
        vip: opts.to_body(),
    })?;
    let updated: VipEnvelope<VirtualIp> = client
        .put(&resource_url(client, id), body, &[200, 202])
        .await?;
    Ok(updated.vip)
}

/// Delete a virtual IP; the service answers 204
pub async fn delete(client: &ServiceClient, id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(Error::required("id"));
    }

    client.delete(&resource_url(client, id), &[204]).await?;
    info!(id, "Deleted virtual IP");
    Ok(())
}
