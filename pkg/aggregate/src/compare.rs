use crate::error::AggregateError;
use crate::totals::{ResourceName, ResourceTotals};
use pkg_quantity::Quantity;
use std::collections::BTreeMap;
use std::fmt;

/// The four metrics checked against a namespace quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    CpuLimit,
    MemoryLimit,
    CpuRequest,
    MemoryRequest,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::CpuLimit,
        Metric::MemoryLimit,
        Metric::CpuRequest,
        Metric::MemoryRequest,
    ];

    /// The quota hard-limit key for this metric.
    pub fn hard_key(self) -> &'static str {
        match self {
            Metric::CpuLimit => "limits.cpu",
            Metric::MemoryLimit => "limits.memory",
            Metric::CpuRequest => "requests.cpu",
            Metric::MemoryRequest => "requests.memory",
        }
    }

    /// Human-readable row label for output tables.
    pub fn label(self) -> &'static str {
        match self {
            Metric::CpuLimit => "CPU Limit",
            Metric::MemoryLimit => "Memory Limit",
            Metric::CpuRequest => "CPU Request",
            Metric::MemoryRequest => "Memory Request",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hard_key())
    }
}

/// Hard limits of the single quota object scoped to the run's
/// namespace. Consumed read-only.
#[derive(Debug, Clone, Default)]
pub struct CapacityCeiling {
    hard: BTreeMap<String, Quantity>,
}

impl CapacityCeiling {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, quantity: Quantity) {
        self.hard.insert(key.into(), quantity);
    }

    pub fn hard(&self, metric: Metric) -> Option<Quantity> {
        self.hard.get(metric.hard_key()).copied()
    }
}

/// Static, job, and combined totals for one metric.
#[derive(Debug, Clone)]
pub struct MetricSummary {
    pub metric: Metric,
    pub static_total: Quantity,
    pub job_total: Quantity,
    pub combined: Quantity,
}

/// One metric's comparison against the ceiling. Verdicts use strict
/// less-than: a total equal to the hard limit is not within it.
#[derive(Debug, Clone)]
pub struct MetricReport {
    pub metric: Metric,
    pub static_total: Quantity,
    pub job_total: Quantity,
    pub combined: Quantity,
    pub hard: Quantity,
    pub static_within: bool,
    pub combined_within: bool,
}

#[derive(Debug, Clone)]
pub struct ComparisonReport {
    pub metrics: Vec<MetricReport>,
}

/// Per-metric static/job/combined sums, independent of any ceiling.
pub fn summarize(totals: &ResourceTotals) -> Vec<MetricSummary> {
    Metric::ALL
        .iter()
        .map(|&metric| {
            let (static_total, job_total) = metric_totals(totals, metric);
            let combined = static_total.add(&job_total);
            MetricSummary {
                metric,
                static_total,
                job_total,
                combined,
            }
        })
        .collect()
}

/// Compare aggregated totals against a quota ceiling.
///
/// Every metric must have a hard entry in the ceiling; a missing entry
/// is an error, never treated as unlimited.
pub fn compare_to_ceiling(
    totals: &ResourceTotals,
    ceiling: &CapacityCeiling,
) -> Result<ComparisonReport, AggregateError> {
    let mut metrics = Vec::with_capacity(Metric::ALL.len());
    for summary in summarize(totals) {
        let hard = ceiling
            .hard(summary.metric)
            .ok_or(AggregateError::MissingCeilingEntry(summary.metric))?;
        metrics.push(MetricReport {
            metric: summary.metric,
            static_within: summary.static_total < hard,
            combined_within: summary.combined < hard,
            static_total: summary.static_total,
            job_total: summary.job_total,
            combined: summary.combined,
            hard,
        });
    }
    Ok(ComparisonReport { metrics })
}

fn metric_totals(totals: &ResourceTotals, metric: Metric) -> (Quantity, Quantity) {
    match metric {
        Metric::CpuLimit => (
            totals.limit(ResourceName::Cpu),
            totals.limit(ResourceName::JobCpu),
        ),
        Metric::MemoryLimit => (
            totals.limit(ResourceName::Memory),
            totals.limit(ResourceName::JobMemory),
        ),
        Metric::CpuRequest => (
            totals.request(ResourceName::Cpu),
            totals.request(ResourceName::JobCpu),
        ),
        Metric::MemoryRequest => (
            totals.request(ResourceName::Memory),
            totals.request(ResourceName::JobMemory),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::AggregateOptions;

    fn ceiling(entries: &[(&str, &str)]) -> CapacityCeiling {
        let mut ceiling = CapacityCeiling::new();
        for (key, value) in entries {
            ceiling.insert(*key, Quantity::parse(value).unwrap());
        }
        ceiling
    }

    fn full_ceiling(cpu_limit: &str) -> CapacityCeiling {
        ceiling(&[
            ("limits.cpu", cpu_limit),
            ("limits.memory", "16Gi"),
            ("requests.cpu", "4"),
            ("requests.memory", "8Gi"),
        ])
    }

    fn totals_from(manifest: &str) -> ResourceTotals {
        crate::aggregate(manifest.as_bytes(), &AggregateOptions::default()).unwrap()
    }

    const STATIC_AND_JOB: &str = r#"
kind: Deployment
metadata:
  name: web
spec:
  replicas: 1
  template:
    spec:
      containers:
        - name: app
          resources:
            limits:
              cpu: 900m
---
kind: CronJob
metadata:
  name: nightly
spec:
  jobTemplate:
    spec:
      template:
        spec:
          containers:
            - name: batch
              resources:
                limits:
                  cpu: "1"
"#;

    #[test]
    fn combined_verdict_uses_strict_less_than() {
        let totals = totals_from(STATIC_AND_JOB);
        // combined cpu limit is 1.9
        let report = compare_to_ceiling(&totals, &full_ceiling("2")).unwrap();
        let cpu = &report.metrics[0];
        assert_eq!(cpu.metric, Metric::CpuLimit);
        assert_eq!(cpu.combined, Quantity::parse("1900m").unwrap());
        assert!(cpu.static_within);
        assert!(cpu.combined_within);

        // a tighter ceiling flips only the combined verdict
        let report = compare_to_ceiling(&totals, &full_ceiling("1.5")).unwrap();
        let cpu = &report.metrics[0];
        assert!(cpu.static_within);
        assert!(!cpu.combined_within);

        // equality is not within
        let report = compare_to_ceiling(&totals, &full_ceiling("1.9")).unwrap();
        assert!(!report.metrics[0].combined_within);
    }

    #[test]
    fn missing_ceiling_entry_is_an_error() {
        let totals = ResourceTotals::new();
        let err = compare_to_ceiling(
            &totals,
            &ceiling(&[("limits.cpu", "2"), ("limits.memory", "16Gi")]),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AggregateError::MissingCeilingEntry(Metric::CpuRequest)
        ));
    }

    #[test]
    fn summary_splits_static_and_job_contributions() {
        let rows = summarize(&totals_from(STATIC_AND_JOB));
        let cpu = &rows[0];
        assert_eq!(cpu.static_total, Quantity::parse("900m").unwrap());
        assert_eq!(cpu.job_total, Quantity::parse("1").unwrap());
        assert_eq!(cpu.combined, Quantity::parse("1.9").unwrap());
    }
}
