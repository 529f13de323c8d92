use crate::shapes::{Container, CronJobDoc, KindProbe, NamedDoc, WorkloadDoc};
use serde::de::DeserializeOwned;
use std::fmt;
use tracing::debug;

/// Replica-bearing compute workload kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkloadKind {
    Deployment,
    StatefulSet,
}

impl fmt::Display for WorkloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkloadKind::Deployment => write!(f, "Deployment"),
            WorkloadKind::StatefulSet => write!(f, "StatefulSet"),
        }
    }
}

/// Object kinds that are only counted, never summed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountKind {
    Service,
    ConfigMap,
    Secret,
    PersistentVolumeClaim,
}

/// One classified manifest document, ready for accumulation.
#[derive(Debug, Clone)]
pub enum Document {
    Workload {
        kind: WorkloadKind,
        name: String,
        /// Already defaulted to 1 when the manifest omits it.
        replicas: u32,
        containers: Vec<Container>,
    },
    Job {
        name: String,
        containers: Vec<Container>,
    },
    Counted {
        kind: CountKind,
        name: String,
    },
}

/// Classify one document by its `kind` discriminator.
///
/// Returns `None` for documents that are not structured data, carry no
/// recognized kind, or whose body does not decode as the expected shape
/// — all three are normal skips, never errors. The discriminator is
/// read first so the body is parsed at most once, into exactly one
/// shape. Recognition order: the job kind, then the compute kinds,
/// then the count-only kinds.
pub fn classify(content: &[u8]) -> Option<Document> {
    let probe: KindProbe = match serde_yaml::from_slice(content) {
        Ok(probe) => probe,
        Err(err) => {
            debug!("skipping unstructured document: {}", err);
            return None;
        }
    };
    let kind = match probe.kind {
        Some(kind) => kind,
        None => {
            debug!("skipping document without a kind field");
            return None;
        }
    };
    match kind.as_str() {
        "CronJob" => {
            let doc: CronJobDoc = decode(content, &kind)?;
            Some(Document::Job {
                name: doc.metadata.name,
                containers: doc.spec.job_template.spec.template.spec.containers,
            })
        }
        "Deployment" => compute(WorkloadKind::Deployment, content, &kind),
        "StatefulSet" => compute(WorkloadKind::StatefulSet, content, &kind),
        "Service" => counted(CountKind::Service, content, &kind),
        "ConfigMap" => counted(CountKind::ConfigMap, content, &kind),
        "Secret" => counted(CountKind::Secret, content, &kind),
        "PersistentVolumeClaim" => counted(CountKind::PersistentVolumeClaim, content, &kind),
        other => {
            debug!("skipping unrecognized kind {:?}", other);
            None
        }
    }
}

fn compute(kind: WorkloadKind, content: &[u8], tag: &str) -> Option<Document> {
    let doc: WorkloadDoc = decode(content, tag)?;
    Some(Document::Workload {
        kind,
        name: doc.metadata.name,
        replicas: doc.spec.replicas.unwrap_or(1),
        containers: doc.spec.template.spec.containers,
    })
}

fn counted(kind: CountKind, content: &[u8], tag: &str) -> Option<Document> {
    let doc: NamedDoc = decode(content, tag)?;
    Some(Document::Counted {
        kind,
        name: doc.metadata.name,
    })
}

fn decode<T: DeserializeOwned>(content: &[u8], kind: &str) -> Option<T> {
    match serde_yaml::from_slice(content) {
        Ok(doc) => Some(doc),
        Err(err) => {
            // shape-incompatible YAML is a skip, like an unknown kind
            debug!("skipping malformed {} document: {}", kind, err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deployment_is_classified_with_default_replicas() {
        let doc = classify(b"kind: Deployment\nmetadata:\n  name: web\n").unwrap();
        match doc {
            Document::Workload {
                kind,
                name,
                replicas,
                containers,
            } => {
                assert_eq!(kind, WorkloadKind::Deployment);
                assert_eq!(name, "web");
                assert_eq!(replicas, 1);
                assert!(containers.is_empty());
            }
            other => panic!("unexpected classification: {:?}", other),
        }
    }

    #[test]
    fn cronjob_is_classified_as_job() {
        let doc = classify(
            b"kind: CronJob\nmetadata:\n  name: nightly\nspec:\n  jobTemplate:\n    spec:\n      template:\n        spec:\n          containers:\n            - name: batch\n",
        )
        .unwrap();
        match doc {
            Document::Job { name, containers } => {
                assert_eq!(name, "nightly");
                assert_eq!(containers.len(), 1);
            }
            other => panic!("unexpected classification: {:?}", other),
        }
    }

    #[test]
    fn count_only_kinds_are_recognized() {
        for (yaml, expected) in [
            ("kind: Service\n", CountKind::Service),
            ("kind: ConfigMap\n", CountKind::ConfigMap),
            ("kind: Secret\n", CountKind::Secret),
            ("kind: PersistentVolumeClaim\n", CountKind::PersistentVolumeClaim),
        ] {
            match classify(yaml.as_bytes()) {
                Some(Document::Counted { kind, .. }) => assert_eq!(kind, expected),
                other => panic!("{:?} classified as {:?}", yaml, other),
            }
        }
    }

    #[test]
    fn unrecognized_kind_is_skipped() {
        assert!(classify(b"kind: Ingress\nmetadata:\n  name: edge\n").is_none());
    }

    #[test]
    fn unstructured_document_is_skipped() {
        assert!(classify(b"} not yaml {{{").is_none());
        assert!(classify(b"- just\n- a\n- list\n").is_none());
        assert!(classify(b"").is_none());
    }

    #[test]
    fn missing_kind_is_skipped() {
        assert!(classify(b"metadata:\n  name: anonymous\n").is_none());
    }
}
