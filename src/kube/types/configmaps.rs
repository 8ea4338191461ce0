use super::format::{format_timestamp, scope_suffix, truncate, NAME_WIDTH};
use k8s_openapi::api::core::v1::ConfigMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigMapInfo {
    pub name: String,
    pub namespace: String,
    pub data_count: usize,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub labels: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub keys: Vec<String>,
    pub created_at: String,
}

impl From<&ConfigMap> for ConfigMapInfo {
    fn from(cm: &ConfigMap) -> Self {
        let keys: Vec<String> = cm
            .data
            .as_ref()
            .map(|data| data.keys().cloned().collect())
            .unwrap_or_default();

        ConfigMapInfo {
            name: cm.metadata.name.clone().unwrap_or_default(),
            namespace: cm.metadata.namespace.clone().unwrap_or_default(),
            data_count: keys.len(),
            labels: cm.metadata.labels.clone().unwrap_or_default(),
            keys,
            created_at: format_timestamp(cm.metadata.creation_timestamp.as_ref()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigMapListResponse {
    pub status: String,
    pub count: usize,
    pub configmaps: Vec<ConfigMapInfo>,
}

impl ConfigMapListResponse {
    pub fn new(items: &[ConfigMap]) -> Self {
        let configmaps: Vec<ConfigMapInfo> = items.iter().map(ConfigMapInfo::from).collect();
        ConfigMapListResponse {
            status: "success".to_string(),
            count: configmaps.len(),
            configmaps,
        }
    }

    pub fn as_string(&self, namespace: Option<&str>, label_selector: Option<&str>) -> String {
        if self.configmaps.is_empty() {
            return format!(
                "No configmaps found{}",
                scope_suffix(namespace, label_selector)
            );
        }

        let mut output = format!("Found {} configmaps:\n\n", self.count);
        output.push_str(&format!(
            "{:<30} {:<15} {:<5} {}\n",
            "NAME", "NAMESPACE", "DATA", "KEYS"
        ));
        output.push_str(&"-".repeat(80));
        output.push('\n');

        for cm in &self.configmaps {
            output.push_str(&format!(
                "{:<30} {:<15} {:<5} {}\n",
                truncate(&cm.name, NAME_WIDTH),
                cm.namespace,
                cm.data_count,
                truncate(&cm.keys.join(","), 40)
            ));
        }

        output
    }
}
