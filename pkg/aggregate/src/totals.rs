use pkg_quantity::Quantity;
use std::collections::BTreeMap;
use std::fmt;

/// Resource keys tracked by an aggregation run.
///
/// `JobCpu` and `JobMemory` hold the portion of CPU/memory contributed
/// by job-type workloads, so periodic work can be reported apart from
/// always-running workloads and summed on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ResourceName {
    Cpu,
    Memory,
    Storage,
    ConfigMaps,
    Secrets,
    PersistentVolumeClaims,
    Services,
    JobCpu,
    JobMemory,
}

impl ResourceName {
    const ALL: [ResourceName; 9] = [
        ResourceName::Cpu,
        ResourceName::Memory,
        ResourceName::Storage,
        ResourceName::ConfigMaps,
        ResourceName::Secrets,
        ResourceName::PersistentVolumeClaims,
        ResourceName::Services,
        ResourceName::JobCpu,
        ResourceName::JobMemory,
    ];
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceName::Cpu => "cpu",
            ResourceName::Memory => "memory",
            ResourceName::Storage => "storage",
            ResourceName::ConfigMaps => "configmaps",
            ResourceName::Secrets => "secrets",
            ResourceName::PersistentVolumeClaims => "persistentvolumeclaims",
            ResourceName::Services => "services",
            ResourceName::JobCpu => "job-cpu",
            ResourceName::JobMemory => "job-memory",
        };
        write!(f, "{}", name)
    }
}

/// Aggregated limits and requests, keyed by resource name.
///
/// Created fresh per run; every tracked key starts at zero so a key
/// that was never touched is still present (distinguishable from an
/// absent one). Accumulating into a key outside the initial map is a
/// no-op.
#[derive(Debug, Clone)]
pub struct ResourceTotals {
    limits: BTreeMap<ResourceName, Quantity>,
    requests: BTreeMap<ResourceName, Quantity>,
}

impl ResourceTotals {
    pub fn new() -> Self {
        let zeroed =
            || -> BTreeMap<_, _> { ResourceName::ALL.iter().map(|&k| (k, Quantity::zero())).collect() };
        ResourceTotals {
            limits: zeroed(),
            requests: zeroed(),
        }
    }

    pub fn limit(&self, key: ResourceName) -> Quantity {
        self.limits.get(&key).copied().unwrap_or_else(Quantity::zero)
    }

    pub fn request(&self, key: ResourceName) -> Quantity {
        self.requests
            .get(&key)
            .copied()
            .unwrap_or_else(Quantity::zero)
    }

    pub fn limits(&self) -> &BTreeMap<ResourceName, Quantity> {
        &self.limits
    }

    pub fn requests(&self) -> &BTreeMap<ResourceName, Quantity> {
        &self.requests
    }

    pub(crate) fn add_limit(&mut self, key: ResourceName, amount: &Quantity) {
        if let Some(total) = self.limits.get_mut(&key) {
            *total = total.add(amount);
        }
    }

    pub(crate) fn add_request(&mut self, key: ResourceName, amount: &Quantity) {
        if let Some(total) = self.requests.get_mut(&key) {
            *total = total.add(amount);
        }
    }

    /// Count one object of a count-only kind.
    pub(crate) fn bump_limit(&mut self, key: ResourceName) {
        self.add_limit(key, &Quantity::from_integer(1));
    }
}

impl Default for ResourceTotals {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_keys_start_at_zero() {
        let totals = ResourceTotals::new();
        for key in ResourceName::ALL {
            assert!(totals.limit(key).is_zero(), "limits[{}] not zero", key);
            assert!(totals.request(key).is_zero(), "requests[{}] not zero", key);
            assert!(totals.limits().contains_key(&key));
        }
    }

    #[test]
    fn adds_accumulate_per_key() {
        let mut totals = ResourceTotals::new();
        let half = Quantity::parse("500m").unwrap();
        totals.add_limit(ResourceName::Cpu, &half);
        totals.add_limit(ResourceName::Cpu, &half);
        totals.add_request(ResourceName::Memory, &Quantity::parse("1Gi").unwrap());
        assert_eq!(totals.limit(ResourceName::Cpu), Quantity::from_integer(1));
        assert_eq!(
            totals.request(ResourceName::Memory),
            Quantity::parse("1024Mi").unwrap()
        );
        assert!(totals.limit(ResourceName::Memory).is_zero());
    }

    #[test]
    fn bump_counts_by_one() {
        let mut totals = ResourceTotals::new();
        totals.bump_limit(ResourceName::ConfigMaps);
        totals.bump_limit(ResourceName::ConfigMaps);
        assert_eq!(
            totals.limit(ResourceName::ConfigMaps),
            Quantity::from_integer(2)
        );
    }
}
