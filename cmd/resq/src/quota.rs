//! Capacity ceiling source: the namespace's ResourceQuota object,
//! fetched once per run from the cluster control plane.

use anyhow::{bail, Context};
use k8s_openapi::api::core::v1::ResourceQuota;
use kube::api::ListParams;
use kube::{Api, Client};
use pkg_aggregate::{CapacityCeiling, Metric};
use pkg_quantity::Quantity;
use tracing::info;

/// Fetch the single ResourceQuota scoped to the namespace and convert
/// its hard limits into a capacity ceiling. Zero or multiple quota
/// objects is a configuration error, never an average or a merge.
pub async fn fetch_ceiling(namespace: Option<&str>) -> anyhow::Result<CapacityCeiling> {
    let client = Client::try_default()
        .await
        .context("failed to create cluster client")?;
    let api: Api<ResourceQuota> = match namespace {
        Some(ns) => Api::namespaced(client, ns),
        None => Api::default_namespaced(client),
    };
    let scope = namespace.unwrap_or("default");
    let quotas = api
        .list(&ListParams::default())
        .await
        .with_context(|| format!("failed to list resource quotas in namespace {}", scope))?;

    match quotas.items.len() {
        0 => bail!("no resource quotas defined in namespace {}", scope),
        1 => {}
        n => bail!("{} resource quotas defined in namespace {}", n, scope),
    }
    let quota = &quotas.items[0];
    info!(
        "using resource quota {} in namespace {}",
        quota.metadata.name.as_deref().unwrap_or("<unnamed>"),
        scope
    );

    let mut ceiling = CapacityCeiling::new();
    if let Some(hard) = quota.status.as_ref().and_then(|s| s.hard.as_ref()) {
        for metric in Metric::ALL {
            if let Some(value) = hard.get(metric.hard_key()) {
                let quantity = Quantity::parse(&value.0).with_context(|| {
                    format!("bad quota value {:?} for {}", value.0, metric.hard_key())
                })?;
                ceiling.insert(metric.hard_key(), quantity);
            }
        }
    }
    Ok(ceiling)
}
