//! Database operations

use super::types::{BatchCreateOpts, CreateRequest, DatabasePage, ListOpts};
use crate::client::ServiceClient;
use crate::error::{Error, Result};
use crate::pagination::Pager;
use crate::query::ToQuery;
use tracing::info;

fn base_url(client: &ServiceClient, instance_id: &str) -> String {
    client.service_url(&["instances", instance_id, "databases"])
}

/// Create one or more databases on an instance; the service answers 202
pub async fn create(client: &ServiceClient, instance_id: &str, opts: &BatchCreateOpts) -> Result<()> {
    if instance_id.is_empty() {
        return Err(Error::required("instance_id"));
    }
    opts.validate()?;

    let body = serde_json::to_value(CreateRequest { databases: &opts.0 })?;
    client
        .post_no_content(&base_url(client, instance_id), body, &[202])
        .await?;

    info!(instance_id, count = opts.0.len(), "Requested database creation");
    Ok(())
}

/// Page through the databases on an instance
///
/// An empty `instance_id` is reported when the pager is iterated, before
/// any request.
pub fn list<'c>(
    client: &'c ServiceClient,
    instance_id: &str,
    opts: &ListOpts,
) -> Pager<'c, DatabasePage> {
    if instance_id.is_empty() {
        return Pager::invalid(client, Error::required("instance_id"), DatabasePage::new);
    }

    match opts.to_query_string() {
        Ok(query) => Pager::new(
            client,
            format!("{}{query}", base_url(client, instance_id)),
            DatabasePage::new,
        ),
        Err(err) => Pager::invalid(client, err, DatabasePage::new),
    }
}

/// Delete a database by name; the service answers 202
pub async fn delete(client: &ServiceClient, instance_id: &str, name: &str) -> Result<()> {
    if instance_id.is_empty() {
        return Err(Error::required("instance_id"));
    }
    if name.is_empty() {
        return Err(Error::required("name"));
    }

    client
        .delete(&client.service_url(&["instances", instance_id, "databases", name]), &[202])
        .await?;

    info!(instance_id, name, "Deleted database");
    Ok(())
}
