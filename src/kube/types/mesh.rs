use super::format::{truncate, NAME_WIDTH};
use k8s_openapi::api::core::v1::Pod;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub const SIDECAR_CONTAINER: &str = "istio-proxy";
pub const INJECT_ANNOTATION: &str = "sidecar.istio.io/inject";
pub const STATUS_ANNOTATION: &str = "sidecar.istio.io/status";

/// Namespaces that hold control-plane or platform pods rather than workloads.
pub const DEFAULT_EXCLUDED_NAMESPACES: [&str; 7] = [
    "kube-system",
    "kube-public",
    "kube-node-lease",
    "local-path-storage",
    "istio-system",
    "istio-cni",
    "sail-operator",
];

pub fn default_excluded_namespaces() -> BTreeSet<String> {
    DEFAULT_EXCLUDED_NAMESPACES
        .iter()
        .map(|ns| ns.to_string())
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeshStatus {
    #[serde(rename = "In Mesh")]
    InMesh,
    #[serde(rename = "Mesh Issues")]
    MeshIssues,
    #[serde(rename = "Not in Mesh")]
    NotInMesh,
}

impl MeshStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeshStatus::InMesh => "In Mesh",
            MeshStatus::MeshIssues => "Mesh Issues",
            MeshStatus::NotInMesh => "Not in Mesh",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadInfo {
    pub name: String,
    pub namespace: String,
    pub kind: String,
    pub sidecar_injected: bool,
    pub sidecar_ready: bool,
    pub mesh_status: MeshStatus,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub labels: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub annotations: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub issues: Vec<String>,
}

impl From<&Pod> for WorkloadInfo {
    fn from(pod: &Pod) -> Self {
        let mut issues = Vec::new();

        let sidecar_injected = pod
            .spec
            .as_ref()
            .map(|spec| spec.containers.iter().any(|c| c.name == SIDECAR_CONTAINER))
            .unwrap_or(false);

        let mut sidecar_ready = false;
        if sidecar_injected {
            let proxy_status = pod
                .status
                .as_ref()
                .and_then(|s| s.container_statuses.as_ref())
                .and_then(|statuses| statuses.iter().find(|c| c.name == SIDECAR_CONTAINER));
            if let Some(status) = proxy_status {
                sidecar_ready = status.ready;
                if !status.ready {
                    issues.push("Istio sidecar not ready".to_string());
                }
            }
        }

        // Pods with no annotation map at all skip the annotation checks.
        if let Some(annotations) = pod.metadata.annotations.as_ref() {
            match annotations.get(INJECT_ANNOTATION).map(String::as_str) {
                Some("false") if sidecar_injected => {
                    issues.push("Pod has sidecar despite injection disabled".to_string())
                }
                Some("true") if !sidecar_injected => {
                    issues.push("Pod missing sidecar despite injection enabled".to_string())
                }
                _ => {}
            }

            if sidecar_injected {
                match annotations.get(STATUS_ANNOTATION) {
                    Some(status) if !status.contains(SIDECAR_CONTAINER) => issues
                        .push("Istio status annotation missing proxy information".to_string()),
                    Some(_) => {}
                    None => issues.push("Missing istio status annotation".to_string()),
                }
            }
        }

        let mesh_status = match (sidecar_injected, sidecar_ready) {
            (true, true) => MeshStatus::InMesh,
            (true, false) => MeshStatus::MeshIssues,
            (false, _) => MeshStatus::NotInMesh,
        };

        WorkloadInfo {
            name: pod.metadata.name.clone().unwrap_or_default(),
            namespace: pod.metadata.namespace.clone().unwrap_or_default(),
            kind: "Pod".to_string(),
            sidecar_injected,
            sidecar_ready,
            mesh_status,
            labels: pod.metadata.labels.clone().unwrap_or_default(),
            annotations: pod.metadata.annotations.clone().unwrap_or_default(),
            issues,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MeshWorkloadsResponse {
    pub status: String,
    pub count: usize,
    pub workloads: Vec<WorkloadInfo>,
}

impl MeshWorkloadsResponse {
    /// Analyzes every pod outside `excluded` namespaces, keeping input order.
    pub fn new(pods: &[Pod], excluded: &BTreeSet<String>) -> Self {
        let workloads: Vec<WorkloadInfo> = pods
            .iter()
            .filter(|pod| {
                pod.metadata
                    .namespace
                    .as_ref()
                    .map_or(true, |ns| !excluded.contains(ns))
            })
            .map(WorkloadInfo::from)
            .collect();
        MeshWorkloadsResponse {
            status: "success".to_string(),
            count: workloads.len(),
            workloads,
        }
    }

    pub fn with_sidecars(&self) -> usize {
        self.workloads.iter().filter(|w| w.sidecar_injected).count()
    }

    pub fn as_string(&self, namespace: Option<&str>) -> String {
        if self.workloads.is_empty() {
            let mut output = "No workloads found".to_string();
            if let Some(ns) = namespace {
                output.push_str(&format!(" in namespace '{}'", ns));
            }
            return output;
        }

        let injected = self.with_sidecars();
        let mut output = "=== Mesh Workloads Analysis ===\n\n".to_string();
        output.push_str(&format!(
            "Found {} workloads ({} with sidecars, {} without)\n\n",
            self.count,
            injected,
            self.count - injected
        ));
        output.push_str(&format!(
            "{:<30} {:<15} {:<12} {:<8} {:<10} {}\n",
            "NAME", "NAMESPACE", "MESH STATUS", "SIDECAR", "READY", "ISSUES"
        ));
        output.push_str(&"-".repeat(100));
        output.push('\n');

        for workload in &self.workloads {
            let sidecar = match (workload.sidecar_injected, workload.sidecar_ready) {
                (true, true) => "✅",
                (true, false) => "⚠️",
                (false, _) => "❌",
            };
            let ready = if workload.sidecar_ready { "✅" } else { "❌" };
            let issues = if workload.issues.is_empty() {
                "None".to_string()
            } else {
                format!("{} issues", workload.issues.len())
            };

            output.push_str(&format!(
                "{:<30} {:<15} {:<12} {:<8} {:<10} {}\n",
                truncate(&workload.name, NAME_WIDTH),
                workload.namespace,
                workload.mesh_status.as_str(),
                sidecar,
                ready,
                issues
            ));
        }

        let with_issues: Vec<&WorkloadInfo> =
            self.workloads.iter().filter(|w| !w.issues.is_empty()).collect();
        if with_issues.is_empty() {
            output.push_str("\n✅ No issues found with mesh workloads");
        } else {
            output.push_str("\n=== Issues Found ===\n");
            for workload in with_issues {
                output.push_str(&format!("\n{} ({}):\n", workload.name, workload.namespace));
                for issue in &workload.issues {
                    output.push_str(&format!("  • {}\n", issue));
                }
            }
        }

        output
    }
}
