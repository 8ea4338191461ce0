use crate::kube::{non_empty, ClusterClient};
use crate::sail::types::{HealthCheckResult, HealthReport};
use crate::sail::SailKind;
use crate::tool::{bounded, definition, ToolError, ToolOutput};
use rig::completion::ToolDefinition;
use rig::tool::Tool;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::*;

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct SailHealthToolArgs {
    /// Restrict the check to one namespace. Omit for the whole cluster.
    #[serde(default)]
    pub namespace: Option<String>,
}

pub struct SailHealthTool {
    client: Arc<dyn ClusterClient>,
    timeout: Duration,
}

impl SailHealthTool {
    pub fn new(client: Arc<dyn ClusterClient>, timeout: Duration) -> Self {
        SailHealthTool { client, timeout }
    }

    /// Checks every kind one after another. A failure for one kind is recorded
    /// in its component result and never aborts the report.
    pub async fn check_health(&self, namespace: Option<&str>) -> HealthReport {
        let mut components = Vec::with_capacity(SailKind::ALL.len());
        for kind in SailKind::ALL {
            components.push(self.check_kind(kind, namespace).await);
        }
        let report = HealthReport::new(components);
        info!(
            "Sail Operator health: {} ({}/{} components healthy)",
            report.overall_health, report.healthy_count, report.total_count
        );
        report
    }

    async fn check_kind(&self, kind: SailKind, namespace: Option<&str>) -> HealthCheckResult {
        let api = kind.api_resource();
        let action = format!("listing {} resources", kind);
        match bounded(&action, self.timeout, self.client.list_custom(&api, namespace)).await {
            Ok(items) => HealthCheckResult::from_instances(kind, &items),
            Err(ToolError::Query { source, .. }) if source.is_not_found() => {
                HealthCheckResult::crd_missing(kind)
            }
            Err(ToolError::Query { source, .. }) => HealthCheckResult::query_failed(kind, source),
            Err(err) => HealthCheckResult::query_failed(kind, err),
        }
    }
}

impl Tool for SailHealthTool {
    const NAME: &'static str = "check_sailoperator_health";
    type Args = SailHealthToolArgs;
    type Output = ToolOutput;
    type Error = ToolError;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        definition::<SailHealthToolArgs>(
            Self::NAME,
            "Aggregate the health of all Sail Operator resources (Istio, IstioRevision, IstioCNI, ZTunnel).",
        )
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        let namespace = non_empty(args.namespace);
        let report = self.check_health(namespace.as_deref()).await;
        Ok(ToolOutput::with_record(report.as_string(), &report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sail::types::health::HealthStatus;
    use crate::testing::{healthy_status, sail_object, Failure, FakeCluster};
    use serde_json::json;

    #[tokio::test]
    async fn every_kind_healthy() {
        let fake = SailKind::ALL.iter().fold(FakeCluster::new(), |fake, kind| {
            fake.with_custom(
                kind.plural(),
                vec![sail_object(kind.kind(), None, "default", healthy_status())],
            )
        });
        let tool = SailHealthTool::new(Arc::new(fake), Duration::from_secs(1));
        let report = tool.check_health(None).await;
        assert_eq!(report.overall_health, HealthStatus::Healthy);
        assert_eq!(report.healthy_count, 4);
    }

    #[tokio::test]
    async fn failures_stay_inside_their_component() {
        let fake = FakeCluster::new()
            .with_custom(
                "istios",
                vec![sail_object("Istio", None, "default", healthy_status())],
            )
            .with_custom(
                "istiorevisions",
                vec![sail_object(
                    "IstioRevision",
                    None,
                    "default-v1-24-1",
                    json!({ "conditions": [{ "type": "Ready", "status": "False", "reason": "IstiodNotReady" }] }),
                )],
            )
            .failing("istiocnis", Failure::Forbidden)
            .failing("ztunnels", Failure::NotFound);
        let tool = SailHealthTool::new(Arc::new(fake), Duration::from_secs(1));

        let report = tool.check_health(None).await;
        let statuses: Vec<HealthStatus> = report.components.iter().map(|c| c.status).collect();
        assert_eq!(
            statuses,
            vec![
                HealthStatus::Healthy,
                HealthStatus::Unhealthy,
                HealthStatus::Error,
                HealthStatus::NotInstalled,
            ]
        );
        assert_eq!(report.overall_health, HealthStatus::Degraded);
        assert_eq!(
            report.components[1].issues,
            vec!["default-v1-24-1 is not ready (IstiodNotReady)"]
        );
        assert!(report.components[2].issues[0].starts_with("Failed to query IstioCNI resources: "));
    }

    #[tokio::test]
    async fn slow_kinds_are_query_failures() {
        let fake = FakeCluster::new().failing("istios", Failure::Hang);
        let tool = SailHealthTool::new(Arc::new(fake), Duration::from_millis(20));
        let report = tool.check_health(Some("istio-system")).await;
        assert_eq!(report.components[0].status, HealthStatus::Error);
        assert!(report.components[0].issues[0].contains("timed out"));
        assert_eq!(report.overall_health, HealthStatus::Unhealthy);
    }
}
