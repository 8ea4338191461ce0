use super::format::{format_age, format_timestamp, scope_suffix, truncate, NAME_WIDTH};
use chrono::{DateTime, Utc};
use k8s_openapi::api::core::v1::Pod;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PodInfo {
    pub name: String,
    pub namespace: String,
    pub status: String,
    pub phase: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pod_ip: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub labels: BTreeMap<String, String>,
    pub ready: String,
    pub restarts: i32,
    pub age: String,
    pub created_at: String,
}

impl PodInfo {
    pub fn from_pod(pod: &Pod, now: DateTime<Utc>) -> Self {
        let status = pod.status.as_ref();
        let container_statuses = status
            .and_then(|s| s.container_statuses.as_deref())
            .unwrap_or_default();

        let ready_count = container_statuses.iter().filter(|c| c.ready).count();
        let restarts = container_statuses.iter().map(|c| c.restart_count).sum();
        let phase = status
            .and_then(|s| s.phase.clone())
            .unwrap_or_else(|| "Unknown".to_string());

        PodInfo {
            name: pod.metadata.name.clone().unwrap_or_default(),
            namespace: pod.metadata.namespace.clone().unwrap_or_default(),
            status: display_status(&phase),
            node_name: pod.spec.as_ref().and_then(|s| s.node_name.clone()),
            pod_ip: status.and_then(|s| s.pod_ip.clone()),
            labels: pod.metadata.labels.clone().unwrap_or_default(),
            ready: format!("{}/{}", ready_count, container_statuses.len()),
            restarts,
            age: format_age(pod.metadata.creation_timestamp.as_ref(), now),
            created_at: format_timestamp(pod.metadata.creation_timestamp.as_ref()),
            phase,
        }
    }
}

fn display_status(phase: &str) -> String {
    match phase {
        "Succeeded" => "Completed".to_string(),
        other => other.to_string(),
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PodListResponse {
    pub status: String,
    pub count: usize,
    pub pods: Vec<PodInfo>,
}

impl PodListResponse {
    pub fn new(pods: &[Pod], now: DateTime<Utc>) -> Self {
        let pods: Vec<PodInfo> = pods.iter().map(|p| PodInfo::from_pod(p, now)).collect();
        PodListResponse {
            status: "success".to_string(),
            count: pods.len(),
            pods,
        }
    }

    pub fn as_string(&self, namespace: Option<&str>, label_selector: Option<&str>) -> String {
        if self.pods.is_empty() {
            return format!("No pods found{}", scope_suffix(namespace, label_selector));
        }

        let mut output = String::new();
        output.push_str(&format!("Found {} pods:\n\n", self.count));
        output.push_str(&format!(
            "{:<30} {:<15} {:<10} {:<8} {:<10} {:<10} {}\n",
            "NAME", "NAMESPACE", "STATUS", "READY", "RESTARTS", "AGE", "NODE"
        ));
        output.push_str(&"-".repeat(100));
        output.push('\n');

        for pod in &self.pods {
            output.push_str(&format!(
                "{:<30} {:<15} {:<10} {:<8} {:<10} {:<10} {}\n",
                truncate(&pod.name, NAME_WIDTH),
                pod.namespace,
                pod.status,
                pod.ready,
                pod.restarts,
                pod.age,
                pod.node_name.as_deref().unwrap_or("<none>"),
            ));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pod(name: &str, phase: &str, ready: &[bool]) -> Pod {
        let statuses: Vec<_> = ready
            .iter()
            .enumerate()
            .map(|(i, r)| {
                json!({
                    "name": format!("c{}", i),
                    "ready": r,
                    "restartCount": 1,
                    "image": "busybox",
                    "imageID": ""
                })
            })
            .collect();
        serde_json::from_value(json!({
            "metadata": {
                "name": name,
                "namespace": "default",
                "creationTimestamp": "2024-05-01T10:00:00Z"
            },
            "spec": { "containers": [], "nodeName": "worker-1" },
            "status": { "phase": phase, "containerStatuses": statuses }
        }))
        .unwrap()
    }

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn summarizes_readiness_and_restarts() {
        let info = PodInfo::from_pod(&pod("web", "Running", &[true, false]), now());
        assert_eq!(info.ready, "1/2");
        assert_eq!(info.restarts, 2);
        assert_eq!(info.age, "2h");
        assert_eq!(info.node_name.as_deref(), Some("worker-1"));
    }

    #[test]
    fn succeeded_pods_display_as_completed() {
        let info = PodInfo::from_pod(&pod("job", "Succeeded", &[false]), now());
        assert_eq!(info.status, "Completed");
        assert_eq!(info.phase, "Succeeded");
    }

    #[test]
    fn header_count_matches_structured_list() {
        let pods = vec![
            pod("a", "Running", &[true]),
            pod("b", "Running", &[true, true]),
            pod("c", "Pending", &[]),
        ];
        let list = PodListResponse::new(&pods, now());
        let text = list.as_string(None, None);

        assert_eq!(list.count, 3);
        assert_eq!(list.pods.len(), list.count);
        assert!(text.starts_with("Found 3 pods:"));
        let pending_rows = text
            .lines()
            .skip(3)
            .filter(|line| line.split_whitespace().nth(2) == Some("Pending"))
            .count();
        assert_eq!(pending_rows, 1);
    }

    #[test]
    fn long_names_are_cut_in_the_table_only() {
        let name = "a-very-long-deployment-name-abcdef-12345";
        let list = PodListResponse::new(&[pod(name, "Running", &[true])], now());
        let text = list.as_string(None, None);
        assert!(!text.contains(name));
        assert!(text.contains("..."));
        assert_eq!(list.pods[0].name, name);
    }

    #[test]
    fn empty_lists_describe_the_filters() {
        let list = PodListResponse::new(&[], now());
        assert_eq!(
            list.as_string(Some("bookinfo"), Some("app=ratings")),
            "No pods found in namespace 'bookinfo' with label selector 'app=ratings'"
        );
    }
}
