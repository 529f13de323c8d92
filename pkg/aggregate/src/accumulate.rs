use crate::error::AggregateError;
use crate::policy::{AggregateOptions, ComputeResource, Role};
use crate::totals::{ResourceName, ResourceTotals};
use pkg_manifest::shapes::Container;
use pkg_manifest::{classify, split_documents, CountKind, Document};
use pkg_quantity::Quantity;
use tracing::debug;

/// Aggregate compute-resource declarations across a multi-document
/// manifest.
///
/// Each recognized workload contributes per-container CPU and memory
/// (limits and requests) multiplied by its replica count; CronJob
/// contributions land in the synthetic job keys with a fixed multiplier
/// of 1; count-only kinds increment their counter. Unrecognized and
/// malformed documents are skipped. Any parse or policy failure aborts
/// the run with no totals.
pub fn aggregate(
    manifest: &[u8],
    options: &AggregateOptions,
) -> Result<ResourceTotals, AggregateError> {
    let mut totals = ResourceTotals::new();
    for document in split_documents(manifest) {
        let Some(document) = classify(document?) else {
            continue;
        };
        match document {
            Document::Workload {
                kind,
                name,
                replicas,
                containers,
            } => {
                let workload = format!("{}: {}", kind, name);
                debug!("{} x{} ({} containers)", workload, replicas, containers.len());
                for container in &containers {
                    accumulate_container(&mut totals, &workload, container, replicas, options, false)?;
                }
            }
            Document::Job { name, containers } => {
                let workload = format!("CronJob: {}", name);
                debug!("{} ({} containers)", workload, containers.len());
                for container in &containers {
                    accumulate_container(&mut totals, &workload, container, 1, options, true)?;
                }
            }
            Document::Counted { kind, name } => {
                debug!("counting {:?} {}", kind, name);
                totals.bump_limit(counter_key(kind));
            }
        }
    }
    Ok(totals)
}

fn counter_key(kind: CountKind) -> ResourceName {
    match kind {
        CountKind::Service => ResourceName::Services,
        CountKind::ConfigMap => ResourceName::ConfigMaps,
        CountKind::Secret => ResourceName::Secrets,
        CountKind::PersistentVolumeClaim => ResourceName::PersistentVolumeClaims,
    }
}

fn target_key(resource: ComputeResource, job: bool) -> ResourceName {
    match (resource, job) {
        (ComputeResource::Cpu, false) => ResourceName::Cpu,
        (ComputeResource::Memory, false) => ResourceName::Memory,
        (ComputeResource::Cpu, true) => ResourceName::JobCpu,
        (ComputeResource::Memory, true) => ResourceName::JobMemory,
    }
}

/// Merge one container's declarations into the totals: for each of
/// (limit, request) x (cpu, memory), take the declared quantity or
/// consult the defaulting policy, scale by the replica count, and add
/// into the matching key.
fn accumulate_container(
    totals: &mut ResourceTotals,
    workload: &str,
    container: &Container,
    replicas: u32,
    options: &AggregateOptions,
    job: bool,
) -> Result<(), AggregateError> {
    for role in [Role::Limit, Role::Request] {
        for resource in [ComputeResource::Cpu, ComputeResource::Memory] {
            let declared = match role {
                Role::Limit => &container.resources.limits,
                Role::Request => &container.resources.requests,
            }
            .get(&resource.to_string());

            let value = match declared {
                Some(raw) => {
                    let parsed =
                        Quantity::parse(&raw.0).map_err(|source| AggregateError::Format {
                            workload: workload.to_string(),
                            container: container.name.clone(),
                            resource,
                            role,
                            text: raw.0.clone(),
                            source,
                        })?;
                    if parsed.is_zero() {
                        options.resolve_missing(workload, &container.name, resource, role)?
                    } else {
                        parsed
                    }
                }
                None => options.resolve_missing(workload, &container.name, resource, role)?,
            };

            match role {
                Role::Limit => {
                    totals.add_limit(target_key(resource, job), &value.scale(replicas as u64))
                }
                Role::Request => {
                    totals.add_request(target_key(resource, job), &value.scale(replicas as u64))
                }
            }
        }
    }
    Ok(())
}
