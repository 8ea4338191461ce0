use super::format::{format_age, format_timestamp, scope_suffix, truncate, NAME_WIDTH};
use chrono::{DateTime, Utc};
use k8s_openapi::api::apps::v1::Deployment;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentInfo {
    pub name: String,
    pub namespace: String,
    pub ready: String,
    pub up_to_date: i32,
    pub available: i32,
    pub age: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub labels: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
    pub created_at: String,
}

impl DeploymentInfo {
    pub fn from_deployment(deploy: &Deployment, now: DateTime<Utc>) -> Self {
        let status = deploy.status.as_ref();
        let ready = status.and_then(|s| s.ready_replicas).unwrap_or(0);
        let replicas = status.and_then(|s| s.replicas).unwrap_or(0);

        DeploymentInfo {
            name: deploy.metadata.name.clone().unwrap_or_default(),
            namespace: deploy.metadata.namespace.clone().unwrap_or_default(),
            ready: format!("{}/{}", ready, replicas),
            up_to_date: status.and_then(|s| s.updated_replicas).unwrap_or(0),
            available: status.and_then(|s| s.available_replicas).unwrap_or(0),
            age: format_age(deploy.metadata.creation_timestamp.as_ref(), now),
            labels: deploy.metadata.labels.clone().unwrap_or_default(),
            strategy: deploy
                .spec
                .as_ref()
                .and_then(|s| s.strategy.as_ref())
                .and_then(|s| s.type_.clone()),
            created_at: format_timestamp(deploy.metadata.creation_timestamp.as_ref()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeploymentListResponse {
    pub status: String,
    pub count: usize,
    pub deployments: Vec<DeploymentInfo>,
}

impl DeploymentListResponse {
    pub fn new(items: &[Deployment], now: DateTime<Utc>) -> Self {
        let deployments: Vec<DeploymentInfo> = items
            .iter()
            .map(|d| DeploymentInfo::from_deployment(d, now))
            .collect();
        DeploymentListResponse {
            status: "success".to_string(),
            count: deployments.len(),
            deployments,
        }
    }

    pub fn as_string(&self, namespace: Option<&str>, label_selector: Option<&str>) -> String {
        if self.deployments.is_empty() {
            return format!(
                "No deployments found{}",
                scope_suffix(namespace, label_selector)
            );
        }

        let mut output = format!("Found {} deployments:\n\n", self.count);
        output.push_str(&format!(
            "{:<30} {:<15} {:<8} {:<10} {:<10} {}\n",
            "NAME", "NAMESPACE", "READY", "UP-TO-DATE", "AVAILABLE", "AGE"
        ));
        output.push_str(&"-".repeat(90));
        output.push('\n');

        for deploy in &self.deployments {
            output.push_str(&format!(
                "{:<30} {:<15} {:<8} {:<10} {:<10} {}\n",
                truncate(&deploy.name, NAME_WIDTH),
                deploy.namespace,
                deploy.ready,
                deploy.up_to_date,
                deploy.available,
                deploy.age
            ));
        }

        output
    }
}
