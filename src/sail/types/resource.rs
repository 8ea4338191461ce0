use super::document::{ResourceCondition, SailDocument};
use crate::kube::types::format::format_timestamp;
use crate::sail::SailKind;
use kube::api::DynamicObject;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct SailResource {
    pub kind: String,
    pub name: String,
    pub namespace: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<ResourceCondition>,
    pub created_at: String,
}

impl SailResource {
    pub fn new(kind: SailKind, obj: &DynamicObject) -> Self {
        let doc = SailDocument::from_object(obj);
        SailResource {
            kind: kind.kind().to_string(),
            name: obj.metadata.name.clone().unwrap_or_default(),
            namespace: obj.metadata.namespace.clone().unwrap_or_default(),
            version: doc.version().map(str::to_string),
            state: doc.state().map(str::to_string),
            conditions: doc.conditions().to_vec(),
            created_at: format_timestamp(obj.metadata.creation_timestamp.as_ref()),
        }
    }

    fn condition_suffix(&self, condition_type: &str, label: &str) -> String {
        self.conditions
            .iter()
            .filter(|c| c.condition_type == condition_type)
            .last()
            .map(|c| format!(" - {}: {}{}", label, c.status, c.reason_suffix()))
            .unwrap_or_default()
    }

    fn line(&self) -> String {
        let mut line = format!("• {}", self.name);
        if !self.namespace.is_empty() {
            line.push_str(&format!(" (namespace: {})", self.namespace));
        }
        if let Some(version) = &self.version {
            line.push_str(&format!(" - Version: {}", version));
        }
        if let Some(state) = &self.state {
            line.push_str(&format!(" - State: {}", state));
        }
        line.push_str(&self.condition_suffix("Ready", "Ready"));
        line.push_str(&self.condition_suffix("Reconciled", "Reconciled"));
        line
    }
}

#[derive(Debug, Serialize)]
pub struct SailResourceListResponse {
    pub status: String,
    pub count: usize,
    pub resources: Vec<SailResource>,
}

impl SailResourceListResponse {
    /// Resources must already be ordered by kind.
    pub fn new(resources: Vec<SailResource>) -> Self {
        SailResourceListResponse {
            status: "success".to_string(),
            count: resources.len(),
            resources,
        }
    }

    pub fn as_string(&self, namespace: Option<&str>, resource: Option<&str>) -> String {
        if self.resources.is_empty() {
            let mut output = "No Sail Operator resources found".to_string();
            if let Some(ns) = namespace {
                output.push_str(&format!(" in namespace '{}'", ns));
            }
            if let Some(r) = resource.filter(|r| !r.eq_ignore_ascii_case("all")) {
                output.push_str(&format!(" of type '{}'", r));
            }
            return output;
        }

        let mut output = format!("Found {} Sail Operator resources:\n\n", self.count);
        let mut current_kind: Option<&str> = None;
        for res in &self.resources {
            if current_kind != Some(res.kind.as_str()) {
                if current_kind.is_some() {
                    output.push('\n');
                }
                output.push_str(&format!("=== {} ===\n", res.kind));
                current_kind = Some(res.kind.as_str());
            }
            output.push_str(&res.line());
            output.push('\n');
        }
        output.push('\n');
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(name: &str, namespace: Option<&str>, status: serde_json::Value) -> DynamicObject {
        serde_json::from_value(json!({
            "apiVersion": "sailoperator.io/v1",
            "kind": "Istio",
            "metadata": { "name": name, "namespace": namespace },
            "spec": { "version": "v1.24.1" },
            "status": status
        }))
        .unwrap()
    }

    #[test]
    fn lines_show_key_conditions() {
        let res = SailResource::new(
            SailKind::IstioRevision,
            &object(
                "default-v1-24-1",
                None,
                json!({
                    "state": "Healthy",
                    "conditions": [
                        { "type": "Ready", "status": "True" },
                        { "type": "Reconciled", "status": "False", "reason": "ReconcileError" }
                    ]
                }),
            ),
        );
        assert_eq!(
            res.line(),
            "• default-v1-24-1 - Version: v1.24.1 - State: Healthy - Ready: True - Reconciled: False (ReconcileError)"
        );
    }

    #[test]
    fn output_is_grouped_by_kind() {
        let list = SailResourceListResponse::new(vec![
            SailResource::new(SailKind::Istio, &object("default", None, json!({}))),
            SailResource::new(SailKind::IstioCni, &object("default", None, json!({}))),
            SailResource::new(SailKind::ZTunnel, &object("default", Some("ztunnel"), json!({}))),
        ]);
        let text = list.as_string(None, None);
        assert!(text.starts_with("Found 3 Sail Operator resources:\n\n=== Istio ===\n"));
        let istio = text.find("=== Istio ===").unwrap();
        let cni = text.find("=== IstioCNI ===").unwrap();
        let ztunnel = text.find("=== ZTunnel ===").unwrap();
        assert!(istio < cni && cni < ztunnel);
        assert!(text.contains("• default (namespace: ztunnel)"));
    }

    #[test]
    fn empty_lists_mention_filters() {
        let list = SailResourceListResponse::new(vec![]);
        assert_eq!(
            list.as_string(Some("istio-system"), Some("ztunnel")),
            "No Sail Operator resources found in namespace 'istio-system' of type 'ztunnel'"
        );
        assert_eq!(list.as_string(None, Some("all")), "No Sail Operator resources found");
    }
}
