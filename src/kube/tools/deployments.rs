use super::ResourceListArgs;
use crate::kube::types::DeploymentListResponse;
use crate::kube::{ClusterClient, ListQuery};
use crate::tool::{bounded, definition, ToolError, ToolOutput};
use chrono::Utc;
use rig::completion::ToolDefinition;
use rig::tool::Tool;
use std::sync::Arc;
use std::time::Duration;
use tracing::*;

pub struct ListDeploymentsTool {
    client: Arc<dyn ClusterClient>,
    timeout: Duration,
}

impl ListDeploymentsTool {
    pub fn new(client: Arc<dyn ClusterClient>, timeout: Duration) -> Self {
        ListDeploymentsTool { client, timeout }
    }

    pub async fn list_deployments(
        &self,
        query: &ListQuery,
    ) -> Result<DeploymentListResponse, ToolError> {
        let deployments = bounded(
            "listing deployments",
            self.timeout,
            self.client.list_deployments(query),
        )
        .await?;
        debug!("Kubernetes API returned {} deployments", deployments.len());
        Ok(DeploymentListResponse::new(&deployments, Utc::now()))
    }
}

impl Tool for ListDeploymentsTool {
    const NAME: &'static str = "list_deployments";
    type Args = ResourceListArgs;
    type Output = ToolOutput;
    type Error = ToolError;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        definition::<ResourceListArgs>(
            Self::NAME,
            "List deployments with ready, up-to-date and available replica counts. Optionally filter by namespace and label selector.",
        )
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        let query = ListQuery::new(args.namespace, args.label_selector);
        let deployments = self.list_deployments(&query).await?;
        let text = deployments.as_string(query.namespace.as_deref(), query.label_selector.as_deref());
        Ok(ToolOutput::with_record(text, &deployments))
    }
}
