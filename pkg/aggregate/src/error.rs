use crate::compare::Metric;
use crate::policy::{ComputeResource, Role};
use pkg_manifest::ManifestError;
use pkg_quantity::QuantityError;
use thiserror::Error;

/// Any of these aborts the whole run; partial totals are never returned.
#[derive(Debug, Error)]
pub enum AggregateError {
    #[error(transparent)]
    Stream(#[from] ManifestError),

    #[error("cannot parse {resource} {role} {text:?} in {workload}, container {container:?}")]
    Format {
        workload: String,
        container: String,
        resource: ComputeResource,
        role: Role,
        text: String,
        #[source]
        source: QuantityError,
    },

    #[error("{resource} {role} not defined in {workload}, container {container:?}")]
    MissingValue {
        workload: String,
        container: String,
        resource: ComputeResource,
        role: Role,
    },

    #[error("quota has no hard limit for {0}")]
    MissingCeilingEntry(Metric),
}
