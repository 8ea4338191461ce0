use super::document::{ResourceCondition, RevisionSummary, SailDocument};
use crate::kube::types::format::format_timestamp;
use kube::api::DynamicObject;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct IstioStatus {
    pub name: String,
    pub namespace: String,
    pub version: String,
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_revision_name: Option<String>,
    pub revisions: RevisionSummary,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<ResourceCondition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_strategy: Option<String>,
    pub created_at: String,
}

impl From<&DynamicObject> for IstioStatus {
    fn from(obj: &DynamicObject) -> Self {
        let doc = SailDocument::from_object(obj);
        IstioStatus {
            name: obj.metadata.name.clone().unwrap_or_default(),
            namespace: obj.metadata.namespace.clone().unwrap_or_default(),
            version: doc.version().unwrap_or_default().to_string(),
            state: doc.state().unwrap_or_default().to_string(),
            profile: doc.profile().map(str::to_string),
            active_revision_name: doc.active_revision_name().map(str::to_string),
            revisions: doc.revisions(),
            conditions: doc.conditions().to_vec(),
            update_strategy: doc.update_strategy().map(str::to_string),
            created_at: format_timestamp(obj.metadata.creation_timestamp.as_ref()),
        }
    }
}

impl IstioStatus {
    pub fn detailed(&self) -> String {
        let mut output = format!("=== Istio: {} ===\n", self.name);
        output.push_str(&format!("Namespace: {}\n", self.namespace));
        output.push_str(&format!("Version: {}\n", self.version));
        output.push_str(&format!("State: {}\n", self.state));

        if let Some(profile) = &self.profile {
            output.push_str(&format!("Profile: {}\n", profile));
        }
        if let Some(strategy) = &self.update_strategy {
            output.push_str(&format!("Update Strategy: {}\n", strategy));
        }
        if let Some(revision) = &self.active_revision_name {
            output.push_str(&format!("Active Revision: {}\n", revision));
        }
        if self.revisions.total > 0 {
            output.push_str(&format!(
                "Revisions: {} total, {} ready, {} in use\n",
                self.revisions.total, self.revisions.ready, self.revisions.in_use
            ));
        }

        if !self.conditions.is_empty() {
            output.push_str("\nConditions:\n");
            for cond in &self.conditions {
                output.push_str(&format!(
                    "  • {}: {}{}",
                    cond.condition_type,
                    cond.status,
                    cond.reason_suffix()
                ));
                if !cond.message.is_empty() {
                    output.push_str(&format!(" - {}", cond.message));
                }
                output.push('\n');
            }
        }

        output.push_str(&format!("\nCreated: {}", self.created_at));
        output
    }

    pub fn summary(&self) -> String {
        let mut line = format!(
            "• {} (namespace: {}) - Version: {}, State: {}",
            self.name, self.namespace, self.version, self.state
        );
        if let Some(ready) = self.conditions.iter().find(|c| c.condition_type == "Ready") {
            line.push_str(&format!(" - Ready: {}", ready.status));
        }
        line
    }
}

#[derive(Debug, Serialize)]
pub struct IstioStatusResponse {
    pub status: String,
    pub count: usize,
    pub istios: Vec<IstioStatus>,
}

impl IstioStatusResponse {
    pub fn new(items: &[DynamicObject]) -> Self {
        let istios: Vec<IstioStatus> = items.iter().map(IstioStatus::from).collect();
        IstioStatusResponse {
            status: "success".to_string(),
            count: istios.len(),
            istios,
        }
    }

    pub fn as_string(&self, namespace: Option<&str>) -> String {
        match self.istios.as_slice() {
            [] => {
                let mut output = "No Istio installations found".to_string();
                if let Some(ns) = namespace {
                    output.push_str(&format!(" in namespace '{}'", ns));
                }
                output
            }
            [istio] => istio.detailed(),
            istios => {
                let mut output = format!("Found {} Istio installations:\n\n", istios.len());
                for istio in istios {
                    output.push_str(&istio.summary());
                    output.push('\n');
                }
                output
            }
        }
    }
}
