use super::ResourceListArgs;
use crate::kube::types::MeshWorkloadsResponse;
use crate::kube::{ClusterClient, ListQuery};
use crate::tool::{bounded, definition, ToolError, ToolOutput};
use rig::completion::ToolDefinition;
use rig::tool::Tool;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::*;

pub struct CheckMeshWorkloadsTool {
    client: Arc<dyn ClusterClient>,
    timeout: Duration,
    excluded_namespaces: BTreeSet<String>,
}

impl CheckMeshWorkloadsTool {
    pub fn new(
        client: Arc<dyn ClusterClient>,
        timeout: Duration,
        excluded_namespaces: BTreeSet<String>,
    ) -> Self {
        CheckMeshWorkloadsTool {
            client,
            timeout,
            excluded_namespaces,
        }
    }

    pub async fn check_workloads(&self, query: &ListQuery) -> Result<MeshWorkloadsResponse, ToolError> {
        let pods = bounded("listing pods", self.timeout, self.client.list_pods(query)).await?;
        let report = MeshWorkloadsResponse::new(&pods, &self.excluded_namespaces);
        debug!(
            "Analyzed {} of {} pods for mesh membership",
            report.count,
            pods.len()
        );
        Ok(report)
    }
}

impl Tool for CheckMeshWorkloadsTool {
    const NAME: &'static str = "check_mesh_workloads";
    type Args = ResourceListArgs;
    type Output = ToolOutput;
    type Error = ToolError;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        definition::<ResourceListArgs>(
            Self::NAME,
            "Check Istio sidecar injection and readiness for workload pods, skipping platform namespaces.",
        )
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        let query = ListQuery::new(args.namespace, args.label_selector);
        let report = self.check_workloads(&query).await?;
        Ok(ToolOutput::with_record(
            report.as_string(query.namespace.as_deref()),
            &report,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kube::types::mesh::default_excluded_namespaces;
    use crate::testing::{pod, FakeCluster};
    use serde_json::json;

    #[tokio::test]
    async fn reports_issues_per_workload() {
        let fake = FakeCluster {
            pods: vec![
                pod("istio-system", "istiod-5d9f", &["discovery"], json!({})),
                pod("bookinfo", "ratings-v1", &["ratings", "istio-proxy"], json!({})),
                pod(
                    "bookinfo",
                    "details-v1",
                    &["details"],
                    json!({ "sidecar.istio.io/inject": "true" }),
                ),
            ],
            ..Default::default()
        };
        let tool = CheckMeshWorkloadsTool::new(
            Arc::new(fake),
            Duration::from_secs(1),
            default_excluded_namespaces(),
        );

        let output = tool.call(ResourceListArgs::default()).await.unwrap();
        assert!(output.text.contains("Found 2 workloads (1 with sidecars, 1 without)"));
        assert!(output.text.contains("=== Issues Found ===\n\nratings-v1 (bookinfo):\n  • Missing istio status annotation\n"));
        assert!(output.text.contains("details-v1 (bookinfo):\n  • Pod missing sidecar despite injection enabled\n"));
        assert!(!output.text.contains("istiod"));
    }

    #[tokio::test]
    async fn exclusions_are_configurable() {
        let fake = FakeCluster {
            pods: vec![pod("istio-system", "istiod-5d9f", &["discovery"], json!({}))],
            ..Default::default()
        };
        let tool = CheckMeshWorkloadsTool::new(Arc::new(fake), Duration::from_secs(1), BTreeSet::new());
        let report = tool.check_workloads(&ListQuery::default()).await.unwrap();
        assert_eq!(report.count, 1);
    }
}
