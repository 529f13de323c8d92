use crate::error::AggregateError;
use pkg_quantity::Quantity;
use std::fmt;

/// Limit or request side of a resource declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Limit,
    Request,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Limit => write!(f, "limit"),
            Role::Request => write!(f, "request"),
        }
    }
}

/// The compute resources extracted per container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComputeResource {
    Cpu,
    Memory,
}

impl fmt::Display for ComputeResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComputeResource::Cpu => write!(f, "cpu"),
            ComputeResource::Memory => write!(f, "memory"),
        }
    }
}

/// Per-run aggregation configuration: one flat struct covering the
/// default values and the explicit-value requirement.
#[derive(Debug, Clone, Default)]
pub struct AggregateOptions {
    pub default_cpu_limit: Option<String>,
    pub default_mem_limit: Option<String>,
    pub default_cpu_request: Option<String>,
    pub default_mem_request: Option<String>,
    /// Fail instead of substituting zero when a container declares no
    /// value and no default is configured.
    pub require_explicit: bool,
}

impl AggregateOptions {
    /// The configured default for a resource and role. Lookup is keyed
    /// by the resource actually being filled; a memory quantity is never
    /// defaulted from the CPU setting.
    fn configured_default(&self, resource: ComputeResource, role: Role) -> Option<&str> {
        let slot = match (resource, role) {
            (ComputeResource::Cpu, Role::Limit) => &self.default_cpu_limit,
            (ComputeResource::Memory, Role::Limit) => &self.default_mem_limit,
            (ComputeResource::Cpu, Role::Request) => &self.default_cpu_request,
            (ComputeResource::Memory, Role::Request) => &self.default_mem_request,
        };
        slot.as_deref()
    }

    /// Decide what a missing or zero declaration contributes: the
    /// configured default, a failure when explicit values are required,
    /// or zero.
    pub(crate) fn resolve_missing(
        &self,
        workload: &str,
        container: &str,
        resource: ComputeResource,
        role: Role,
    ) -> Result<Quantity, AggregateError> {
        match self.configured_default(resource, role) {
            Some(text) => Quantity::parse(text).map_err(|source| AggregateError::Format {
                workload: workload.to_string(),
                container: container.to_string(),
                resource,
                role,
                text: text.to_string(),
                source,
            }),
            None if self.require_explicit => Err(AggregateError::MissingValue {
                workload: workload.to_string(),
                container: container.to_string(),
                resource,
                role,
            }),
            None => Ok(Quantity::zero()),
        }
    }
}
