//! Resource aggregation across a rendered manifest, and comparison of
//! the aggregate against a namespace quota ceiling.
//!
//! One aggregation run walks the manifest's documents, sums compute
//! quantities (with replica multipliers and a configurable defaulting
//! policy) into [`ResourceTotals`], counts recognized object kinds, and
//! either returns the totals or fails — there is no partial-success
//! mode.

mod accumulate;
mod compare;
mod error;
mod policy;
mod totals;

pub use accumulate::aggregate;
pub use compare::{
    compare_to_ceiling, summarize, CapacityCeiling, ComparisonReport, Metric, MetricReport,
    MetricSummary,
};
pub use error::AggregateError;
pub use policy::{AggregateOptions, ComputeResource, Role};
pub use totals::{ResourceName, ResourceTotals};
