//! Serde shapes for the recognized document kinds, following the
//! conventional container-orchestration schema (camelCase fields,
//! nested container lists with named limits/requests maps).
//!
//! Quantity fields stay as raw text here: parsing happens during
//! accumulation, where a failure can be reported with the owning
//! workload and container attached.

use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

/// Quantity text exactly as written in the manifest. Accepts bare YAML
/// numbers too (`cpu: 2`), preserving their textual form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawQuantity(pub String);

impl<'de> Deserialize<'de> for RawQuantity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RawQuantityVisitor;

        impl<'de> Visitor<'de> for RawQuantityVisitor {
            type Value = RawQuantity;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a quantity string or number")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<RawQuantity, E> {
                Ok(RawQuantity(v.to_string()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<RawQuantity, E> {
                Ok(RawQuantity(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<RawQuantity, E> {
                Ok(RawQuantity(v.to_string()))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<RawQuantity, E> {
                Ok(RawQuantity(v.to_string()))
            }
        }

        deserializer.deserialize_any(RawQuantityVisitor)
    }
}

/// First-pass decode: only the `kind` discriminator is read, so a
/// document is classified before its full shape is parsed.
#[derive(Debug, Clone, Deserialize)]
pub struct KindProbe {
    #[serde(default)]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourceRequirements {
    #[serde(default)]
    pub limits: BTreeMap<String, RawQuantity>,
    #[serde(default)]
    pub requests: BTreeMap<String, RawQuantity>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Container {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub resources: ResourceRequirements,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PodSpec {
    #[serde(default)]
    pub containers: Vec<Container>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PodTemplate {
    #[serde(default)]
    pub spec: PodSpec,
}

/// Deployment / StatefulSet: replica-bearing compute workloads.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkloadDoc {
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub spec: WorkloadSpec,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkloadSpec {
    #[serde(default)]
    pub replicas: Option<u32>,
    #[serde(default)]
    pub template: PodTemplate,
}

/// CronJob: containers live under `spec.jobTemplate.spec.template.spec`.
#[derive(Debug, Clone, Deserialize)]
pub struct CronJobDoc {
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub spec: CronJobSpec,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CronJobSpec {
    #[serde(default)]
    pub job_template: JobTemplate,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobTemplate {
    #[serde(default)]
    pub spec: JobSpec,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobSpec {
    #[serde(default)]
    pub template: PodTemplate,
}

/// Count-only kinds: only the name matters.
#[derive(Debug, Clone, Deserialize)]
pub struct NamedDoc {
    #[serde(default)]
    pub metadata: Metadata,
}
