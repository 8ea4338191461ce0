use super::format::{format_map, format_timestamp};
use k8s_openapi::api::core::v1::Namespace;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Serialize, Deserialize)]
pub struct NamespaceListResponse {
    pub status: String,
    pub count: usize,
    pub namespaces: Vec<String>,
}

impl NamespaceListResponse {
    pub fn new(items: &[Namespace]) -> Self {
        let namespaces: Vec<String> = items
            .iter()
            .filter_map(|ns| ns.metadata.name.clone())
            .collect();
        NamespaceListResponse {
            status: "success".to_string(),
            count: namespaces.len(),
            namespaces,
        }
    }

    pub fn as_string(&self) -> String {
        format!(
            "Found {} namespaces: {}",
            self.count,
            self.namespaces.join(", ")
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamespaceDetail {
    pub name: String,
    pub status: String,
    pub created_at: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub labels: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub annotations: BTreeMap<String, String>,
}

impl From<&Namespace> for NamespaceDetail {
    fn from(ns: &Namespace) -> Self {
        NamespaceDetail {
            name: ns.metadata.name.clone().unwrap_or_default(),
            status: ns
                .status
                .as_ref()
                .and_then(|s| s.phase.clone())
                .unwrap_or_else(|| "Unknown".to_string()),
            created_at: format_timestamp(ns.metadata.creation_timestamp.as_ref()),
            labels: ns.metadata.labels.clone().unwrap_or_default(),
            annotations: ns.metadata.annotations.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NamespaceDetailsResponse {
    pub status: String,
    pub count: usize,
    pub namespaces: Vec<NamespaceDetail>,
}

impl NamespaceDetailsResponse {
    pub fn new(items: &[Namespace]) -> Self {
        let namespaces: Vec<NamespaceDetail> = items.iter().map(NamespaceDetail::from).collect();
        NamespaceDetailsResponse {
            status: "success".to_string(),
            count: namespaces.len(),
            namespaces,
        }
    }

    pub fn as_string(&self) -> String {
        if let [ns] = self.namespaces.as_slice() {
            return format!(
                "Namespace: {}\nStatus: {}\nCreated: {}\nLabels: {}\nAnnotations: {}",
                ns.name,
                ns.status,
                ns.created_at,
                format_map(&ns.labels),
                format_map(&ns.annotations)
            );
        }

        let mut output = format!("Found {} namespaces with details:\n", self.count);
        for ns in &self.namespaces {
            output.push_str(&format!(
                "\n• {} (Status: {}, Created: {})\n  Labels: {}\n  Annotations: {}\n",
                ns.name,
                ns.status,
                ns.created_at,
                format_map(&ns.labels),
                format_map(&ns.annotations)
            ));
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn namespace(name: &str) -> Namespace {
        serde_json::from_value(json!({
            "metadata": {
                "name": name,
                "creationTimestamp": "2024-01-02T03:04:05Z",
                "labels": { "istio-injection": "enabled" },
                "annotations": { "owner": "mesh-team" }
            },
            "status": { "phase": "Active" }
        }))
        .unwrap()
    }

    #[test]
    fn lists_names_in_api_order() {
        let list = NamespaceListResponse::new(&[namespace("default"), namespace("bookinfo")]);
        assert_eq!(list.as_string(), "Found 2 namespaces: default, bookinfo");
    }

    #[test]
    fn single_namespace_renders_a_detail_block() {
        let details = NamespaceDetailsResponse::new(&[namespace("bookinfo")]);
        let text = details.as_string();
        assert!(text.starts_with("Namespace: bookinfo\nStatus: Active\n"));
        assert!(text.contains("Labels: istio-injection=enabled"));
        assert!(text.contains("Annotations: owner=mesh-team"));
        assert!(text.contains("2024-01-02T03:04:05+00:00"));
    }

    #[test]
    fn several_namespaces_render_a_bullet_list() {
        let details = NamespaceDetailsResponse::new(&[namespace("a"), namespace("b")]);
        let text = details.as_string();
        assert!(text.starts_with("Found 2 namespaces with details:"));
        assert_eq!(text.matches("• ").count(), 2);
    }
}
